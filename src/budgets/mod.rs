use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::aggregate;
use crate::models::{Budget, BudgetTarget, Category, Transaction};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Progress {
    pub(crate) spent: Decimal,
    pub(crate) budget: Decimal,
    /// Always within 0..=100, even when overspent.
    pub(crate) percentage: u8,
}

impl Progress {
    pub(crate) fn status(&self) -> ProgressStatus {
        ProgressStatus::from_percentage(self.percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProgressStatus {
    Neutral,
    Warning,
    Danger,
}

impl ProgressStatus {
    pub(crate) fn from_percentage(percentage: u8) -> Self {
        if percentage >= 90 {
            Self::Danger
        } else if percentage >= 70 {
            Self::Warning
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neutral => write!(f, "ok"),
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// `round(min(100, spent / budget * 100))`, or 0 without a positive budget.
pub(crate) fn percentage(spent: Decimal, budget: Decimal) -> u8 {
    if budget <= Decimal::ZERO {
        return 0;
    }
    // Overflow only happens for absurd ratios, which saturate
    let ratio = spent
        .checked_div(budget)
        .and_then(|r| r.checked_mul(HUNDRED))
        .unwrap_or(HUNDRED)
        .min(HUNDRED)
        .max(Decimal::ZERO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    ratio.to_u8().unwrap_or(0)
}

/// One row of the budget overview.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetLine {
    pub(crate) budget: Budget,
    pub(crate) progress: Progress,
}

/// Budget progress for the month containing `today`.
pub(crate) struct BudgetEngine<'a> {
    transactions: &'a [Transaction],
    budgets: &'a [Budget],
    today: NaiveDate,
}

impl<'a> BudgetEngine<'a> {
    pub(crate) fn new(
        transactions: &'a [Transaction],
        budgets: &'a [Budget],
        today: NaiveDate,
    ) -> Self {
        Self {
            transactions,
            budgets,
            today,
        }
    }

    pub(crate) fn current_month(&self) -> String {
        aggregate::month_key(self.today)
    }

    pub(crate) fn current_month_budgets(&self) -> Vec<&'a Budget> {
        let month = self.current_month();
        self.budgets.iter().filter(|b| b.month == month).collect()
    }

    /// First match wins when the month has duplicates.
    pub(crate) fn budget_for_category(&self, category: Category) -> Option<&'a Budget> {
        self.current_month_budgets()
            .into_iter()
            .find(|b| b.target == BudgetTarget::Category(category))
    }

    pub(crate) fn savings_goal(&self) -> Option<&'a Budget> {
        self.current_month_budgets()
            .into_iter()
            .find(|b| b.target == BudgetTarget::Savings)
    }

    fn month_transactions(&self) -> Vec<Transaction> {
        aggregate::current_month_transactions(self.transactions, self.today)
    }

    pub(crate) fn category_spending(&self, category: Category) -> Decimal {
        let in_category = aggregate::filter_by_category(&self.month_transactions(), Some(category));
        aggregate::total_expenses(&in_category)
    }

    pub(crate) fn total_spending(&self) -> Decimal {
        aggregate::total_expenses(&self.month_transactions())
    }

    pub(crate) fn total_income(&self) -> Decimal {
        aggregate::total_income(&self.month_transactions())
    }

    /// Income minus expenses this month; negative when overspent.
    pub(crate) fn savings(&self) -> Decimal {
        let month = self.month_transactions();
        aggregate::total_income(&month) - aggregate::total_expenses(&month)
    }

    pub(crate) fn progress(&self, target: BudgetTarget) -> Progress {
        let (spent, budget) = match target {
            BudgetTarget::Savings => (
                self.savings(),
                self.savings_goal().map(|b| b.amount).unwrap_or(Decimal::ZERO),
            ),
            BudgetTarget::Category(category) => (
                self.category_spending(category),
                self.budget_for_category(category)
                    .map(|b| b.amount)
                    .unwrap_or(Decimal::ZERO),
            ),
        };
        Progress {
            spent,
            budget,
            percentage: percentage(spent, budget),
        }
    }

    /// Savings goal first (if set), then each budgeted category of the
    /// month. Shadowed duplicates are left out.
    pub(crate) fn overview(&self) -> Vec<BudgetLine> {
        let mut lines = Vec::new();
        if let Some(goal) = self.savings_goal() {
            lines.push(BudgetLine {
                budget: goal.clone(),
                progress: self.progress(BudgetTarget::Savings),
            });
        }
        for budget in self.current_month_budgets() {
            let BudgetTarget::Category(_) = budget.target else {
                continue;
            };
            if lines.iter().any(|l| l.budget.target == budget.target) {
                continue;
            }
            lines.push(BudgetLine {
                budget: budget.clone(),
                progress: self.progress(budget.target),
            });
        }
        lines
    }
}

#[cfg(test)]
mod tests;
