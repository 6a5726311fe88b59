//! Chart-ready series for a reporting window.
//!
//! A [`ReportBuilder`] partitions the transaction list into calendar
//! buckets for the selected [`ReportPeriod`]. Buckets are always emitted,
//! even when nothing falls inside them.

mod buckets;

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::aggregate;
use crate::models::{Category, Transaction};

pub(crate) use buckets::PeriodBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportPeriod {
    Month,
    ThreeMonths,
    SixMonths,
    Year,
}

impl ReportPeriod {
    pub(crate) fn all() -> &'static [ReportPeriod] {
        &[Self::Month, Self::ThreeMonths, Self::SixMonths, Self::Year]
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
            Self::Year => "year",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all().iter().copied().find(|p| p.as_str() == lower)
    }

    pub(crate) fn next(&self) -> Self {
        match self {
            Self::Month => Self::ThreeMonths,
            Self::ThreeMonths => Self::SixMonths,
            Self::SixMonths => Self::Year,
            Self::Year => Self::Month,
        }
    }

    /// First day of the window ending at `today`.
    pub(crate) fn window_start(&self, today: NaiveDate) -> NaiveDate {
        let first = aggregate::first_of_month(today);
        let back = |n: u32| first.checked_sub_months(Months::new(n)).unwrap_or(first);
        match self {
            Self::Month => first,
            Self::ThreeMonths => back(2),
            Self::SixMonths => back(5),
            Self::Year => aggregate::first_of_year(today),
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Month => write!(f, "This Month"),
            Self::ThreeMonths => write!(f, "Last 3 Months"),
            Self::SixMonths => write!(f, "Last 6 Months"),
            Self::Year => write!(f, "This Year"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IncomeExpensePoint {
    pub(crate) label: String,
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrendPoint {
    pub(crate) label: String,
    pub(crate) period_balance: Decimal,
    /// Balance of every transaction dated on or before the bucket end.
    pub(crate) running_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReportSummary {
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
    pub(crate) net_savings: Decimal,
}

pub(crate) struct ReportBuilder<'a> {
    transactions: &'a [Transaction],
    period: ReportPeriod,
    today: NaiveDate,
}

impl<'a> ReportBuilder<'a> {
    pub(crate) fn new(transactions: &'a [Transaction], period: ReportPeriod, today: NaiveDate) -> Self {
        Self {
            transactions,
            period,
            today,
        }
    }

    pub(crate) fn period(&self) -> ReportPeriod {
        self.period
    }

    pub(crate) fn window_start(&self) -> NaiveDate {
        self.period.window_start(self.today)
    }

    pub(crate) fn window_transactions(&self) -> Vec<Transaction> {
        aggregate::filter_between(self.transactions, self.window_start(), self.today)
    }

    /// Buckets for the income-vs-expense bar chart.
    pub(crate) fn bar_buckets(&self) -> Vec<PeriodBucket> {
        match self.period {
            ReportPeriod::Month => buckets::weeks_in_month(self.today),
            ReportPeriod::ThreeMonths | ReportPeriod::SixMonths => {
                buckets::weeks_between(self.window_start(), self.today, buckets::week_number_label)
            }
            ReportPeriod::Year => buckets::months_of_year(self.today),
        }
    }

    /// Buckets for the balance trend line.
    pub(crate) fn trend_buckets(&self) -> Vec<PeriodBucket> {
        match self.period {
            ReportPeriod::Month => buckets::days_of_month(self.today),
            ReportPeriod::ThreeMonths | ReportPeriod::SixMonths => {
                buckets::weeks_between(self.window_start(), self.today, buckets::week_start_label)
            }
            ReportPeriod::Year => buckets::months_of_year(self.today),
        }
    }

    fn in_bucket(&self, bucket: &PeriodBucket) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| bucket.contains(t.date))
            .cloned()
            .collect()
    }

    pub(crate) fn income_expense_series(&self) -> Vec<IncomeExpensePoint> {
        self.bar_buckets()
            .into_iter()
            .map(|bucket| {
                let inside = self.in_bucket(&bucket);
                IncomeExpensePoint {
                    income: aggregate::total_income(&inside),
                    expenses: aggregate::total_expenses(&inside),
                    label: bucket.label,
                }
            })
            .collect()
    }

    pub(crate) fn trend_series(&self) -> Vec<TrendPoint> {
        self.trend_buckets()
            .into_iter()
            .map(|bucket| {
                let running: Decimal = self
                    .transactions
                    .iter()
                    .filter(|t| t.date <= bucket.end)
                    .map(|t| t.amount)
                    .sum();
                TrendPoint {
                    period_balance: aggregate::balance(&self.in_bucket(&bucket)),
                    running_balance: running,
                    label: bucket.label,
                }
            })
            .collect()
    }

    pub(crate) fn category_breakdown(&self) -> BTreeMap<Category, Decimal> {
        aggregate::expenses_by_category(&self.window_transactions())
    }

    pub(crate) fn summary(&self) -> ReportSummary {
        let window = self.window_transactions();
        ReportSummary {
            income: aggregate::total_income(&window),
            expenses: aggregate::total_expenses(&window),
            net_savings: aggregate::balance(&window),
        }
    }
}
