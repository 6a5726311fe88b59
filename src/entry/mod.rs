//! Parsing of user-entered transactions and budgets, shared by the CLI
//! subcommands and the TUI command bar.

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;

use crate::aggregate::month_key;
use crate::db::{is_valid_month, parse_amount, parse_date};
use crate::models::{Budget, BudgetTarget, Category, Transaction, TransactionType};

pub(crate) const TRANSACTION_USAGE: &str =
    "<income|expense> <amount> <category> [YYYY-MM-DD|today] <description...>";
pub(crate) const BUDGET_USAGE: &str = "<category|savings> <amount> [YYYY-MM]";

fn parse_category(s: &str, kind: TransactionType) -> Result<Category> {
    let category = Category::parse(s).ok_or_else(|| anyhow!("Unknown category '{s}'"))?;
    if !category.allowed_for(kind) {
        let allowed: Vec<&str> = Category::for_type(kind).iter().map(|c| c.as_str()).collect();
        bail!(
            "'{}' is not an {} category (use one of: {})",
            category.as_str(),
            kind.as_str(),
            allowed.join(", ")
        );
    }
    Ok(category)
}

/// `<type> <amount> <category> [date] <description...>`. The date may be
/// omitted, in which case the remaining words are the description and the
/// transaction is dated `today`.
pub(crate) fn parse_transaction(tokens: &[&str], today: NaiveDate) -> Result<Transaction> {
    let [kind, amount, category, rest @ ..] = tokens else {
        bail!("Usage: {TRANSACTION_USAGE}");
    };
    let kind = TransactionType::parse(kind)
        .ok_or_else(|| anyhow!("Type must be 'income' or 'expense', got '{kind}'"))?;
    let amount = parse_amount(amount)?;
    let category = parse_category(category, kind)?;

    let (date, words) = match rest.split_first() {
        Some((first, tail)) if first.eq_ignore_ascii_case("today") => (today, tail),
        Some((first, tail)) if looks_like_date(first) => (parse_date(first)?, tail),
        _ => (today, rest),
    };
    let description = words.join(" ");
    if description.trim().is_empty() {
        bail!("Description is required");
    }
    Ok(Transaction::new(description, kind, amount, category, date))
}

fn looks_like_date(s: &str) -> bool {
    s.len() == 10 && s.as_bytes().get(4) == Some(&b'-') && s.as_bytes().get(7) == Some(&b'-')
}

/// `<category|savings> <amount> [YYYY-MM]`; the month defaults to `today`'s.
pub(crate) fn parse_budget(tokens: &[&str], today: NaiveDate) -> Result<Budget> {
    let [target, amount, rest @ ..] = tokens else {
        bail!("Usage: {BUDGET_USAGE}");
    };
    let target =
        BudgetTarget::parse(target).ok_or_else(|| anyhow!("Unknown budget target '{target}'"))?;
    if let BudgetTarget::Category(c) = target {
        if !c.allowed_for(TransactionType::Expense) {
            bail!("Budgets apply to expense categories, not '{}'", c.as_str());
        }
    }
    let amount = parse_amount(amount)?;
    let month = match rest {
        [] => month_key(today),
        [month] if is_valid_month(month) => (*month).to_string(),
        [month] => bail!("Invalid month '{month}', expected YYYY-MM"),
        _ => bail!("Usage: {BUDGET_USAGE}"),
    };
    Ok(Budget::new(target, amount, month))
}

#[cfg(test)]
mod tests;
