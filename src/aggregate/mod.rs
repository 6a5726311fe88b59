//! Totals, filters and breakdowns over a transaction list.
//!
//! Everything here is pure: callers pass the list (usually
//! `Database::list_transactions`) and, where the result depends on the
//! calendar, the reference date.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Category, Transaction, TransactionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateRange {
    All,
    Today,
    Week,
    Month,
    Year,
}

impl DateRange {
    pub(crate) fn all() -> &'static [DateRange] {
        &[Self::All, Self::Today, Self::Week, Self::Month, Self::Year]
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all().iter().copied().find(|r| r.as_str() == lower)
    }

    /// Inclusive bounds, or `None` for `All`.
    pub(crate) fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::All => None,
            Self::Today => Some((today, today)),
            Self::Week => Some((today - Days::new(6), today)),
            Self::Month => Some((first_of_month(today), today)),
            Self::Year => Some((first_of_year(today), today)),
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All Time"),
            Self::Today => write!(f, "Today"),
            Self::Week => write!(f, "Last 7 Days"),
            Self::Month => write!(f, "This Month"),
            Self::Year => write!(f, "This Year"),
        }
    }
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn first_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// `YYYY-MM` key used by budgets.
pub(crate) fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

// ── Totals ────────────────────────────────────────────────────

pub(crate) fn total_income(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.amount > Decimal::ZERO)
        .map(|t| t.amount)
        .sum()
}

/// Magnitude of all negative amounts.
pub(crate) fn total_expenses(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.amount < Decimal::ZERO)
        .map(|t| t.amount)
        .sum::<Decimal>()
        .abs()
}

pub(crate) fn balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(|t| t.amount).sum()
}

/// Expense magnitude per category. Categories without expenses are absent.
pub(crate) fn expenses_by_category(transactions: &[Transaction]) -> BTreeMap<Category, Decimal> {
    let mut totals: BTreeMap<Category, Decimal> = BTreeMap::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        *totals.entry(txn.category).or_insert(Decimal::ZERO) += txn.abs_amount();
    }
    totals
}

/// Category totals ordered largest first, for charts and summaries.
pub(crate) fn ranked_categories(breakdown: &BTreeMap<Category, Decimal>) -> Vec<(Category, Decimal)> {
    let mut ranked: Vec<(Category, Decimal)> = breakdown.iter().map(|(c, v)| (*c, *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

// ── Filters ───────────────────────────────────────────────────

/// Transactions dated within `start..=end`, order preserved.
pub(crate) fn filter_between(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .cloned()
        .collect()
}

pub(crate) fn filter_by_date_range(
    transactions: &[Transaction],
    range: DateRange,
    today: NaiveDate,
) -> Vec<Transaction> {
    match range.bounds(today) {
        Some((start, end)) => filter_between(transactions, start, end),
        None => transactions.to_vec(),
    }
}

/// `None` means all categories.
pub(crate) fn filter_by_category(
    transactions: &[Transaction],
    category: Option<Category>,
) -> Vec<Transaction> {
    match category {
        Some(c) => transactions
            .iter()
            .filter(|t| t.category == c)
            .cloned()
            .collect(),
        None => transactions.to_vec(),
    }
}

/// `None` means both types. Zero amounts are income.
pub(crate) fn filter_by_type(
    transactions: &[Transaction],
    kind: Option<TransactionType>,
) -> Vec<Transaction> {
    match kind {
        Some(k) => transactions
            .iter()
            .filter(|t| t.kind() == k)
            .cloned()
            .collect(),
        None => transactions.to_vec(),
    }
}

/// Case-insensitive substring match on description or category key.
pub(crate) fn search(transactions: &[Transaction], query: &str) -> Vec<Transaction> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return transactions.to_vec();
    }
    transactions
        .iter()
        .filter(|t| {
            t.description.to_lowercase().contains(&query) || t.category.as_str().contains(&query)
        })
        .cloned()
        .collect()
}

pub(crate) fn current_month_transactions(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<Transaction> {
    filter_between(transactions, first_of_month(today), today)
}

/// Most recent first; same-day entries by latest timestamp.
pub(crate) fn sorted_by_date_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.timestamp.cmp(&a.timestamp)));
    sorted
}

pub(crate) fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut sorted = sorted_by_date_desc(transactions);
    sorted.truncate(n);
    sorted
}

/// Combined filter state used by the transaction list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransactionFilter {
    pub(crate) range: DateRange,
    pub(crate) kind: Option<TransactionType>,
    pub(crate) category: Option<Category>,
    pub(crate) query: String,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            range: DateRange::All,
            kind: None,
            category: None,
            query: String::new(),
        }
    }
}

impl TransactionFilter {
    pub(crate) fn apply(&self, transactions: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        let by_date = filter_by_date_range(transactions, self.range, today);
        let by_category = filter_by_category(&by_date, self.category);
        let by_type = filter_by_type(&by_category, self.kind);
        search(&by_type, &self.query)
    }
}

#[cfg(test)]
mod tests;
