#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
}

#[test]
fn test_parse_expense_with_date() {
    let txn = parse_transaction(
        &["expense", "12.50", "food", "2024-03-05", "Lunch", "downtown"],
        today(),
    )
    .unwrap();
    assert_eq!(txn.amount, dec!(-12.50));
    assert_eq!(txn.category, Category::Food);
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    assert_eq!(txn.description, "Lunch downtown");
    assert!(txn.id.is_none());
}

#[test]
fn test_parse_income_defaults_to_today() {
    let txn = parse_transaction(&["income", "$2,000", "salary", "March", "pay"], today()).unwrap();
    assert_eq!(txn.amount, dec!(2000));
    assert_eq!(txn.date, today());
    assert_eq!(txn.description, "March pay");

    let explicit = parse_transaction(&["in", "5", "gift", "today", "Card"], today()).unwrap();
    assert_eq!(explicit.date, today());
    assert_eq!(explicit.description, "Card");
}

#[test]
fn test_parse_transaction_rejects_bad_input() {
    // Too few tokens
    assert!(parse_transaction(&["expense", "5"], today()).is_err());
    // Unknown type
    assert!(parse_transaction(&["refund", "5", "food", "x"], today()).is_err());
    // Zero amount
    assert!(parse_transaction(&["expense", "0", "food", "x"], today()).is_err());
    // Category outside the type's vocabulary
    assert!(parse_transaction(&["expense", "5", "salary", "x"], today()).is_err());
    // Impossible date
    assert!(parse_transaction(&["expense", "5", "food", "2024-02-30", "x"], today()).is_err());
    // Missing description
    assert!(parse_transaction(&["expense", "5", "food", "2024-03-01"], today()).is_err());
}

#[test]
fn test_other_is_valid_for_both_types() {
    assert!(parse_transaction(&["expense", "1", "other", "misc"], today()).is_ok());
    assert!(parse_transaction(&["income", "1", "other", "misc"], today()).is_ok());
}

#[test]
fn test_parse_budget() {
    let food = parse_budget(&["food", "300"], today()).unwrap();
    assert_eq!(food.target, BudgetTarget::Category(Category::Food));
    assert_eq!(food.amount, dec!(300));
    assert_eq!(food.month, "2024-03");

    let savings = parse_budget(&["savings", "500", "2024-04"], today()).unwrap();
    assert_eq!(savings.target, BudgetTarget::Savings);
    assert_eq!(savings.month, "2024-04");
}

#[test]
fn test_parse_budget_rejects_bad_input() {
    assert!(parse_budget(&["food"], today()).is_err());
    assert!(parse_budget(&["groceries", "10"], today()).is_err());
    assert!(parse_budget(&["salary", "10"], today()).is_err());
    assert!(parse_budget(&["food", "-10"], today()).is_err());
    assert!(parse_budget(&["food", "10", "2024-13"], today()).is_err());
    assert!(parse_budget(&["food", "10", "2024-03", "extra"], today()).is_err());
}
