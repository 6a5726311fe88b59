#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Transaction ───────────────────────────────────────────────

fn make_txn(amount: Decimal) -> Transaction {
    Transaction {
        id: None,
        description: "Test".into(),
        amount,
        category: Category::Other,
        date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        timestamp: String::new(),
    }
}

#[test]
fn test_income() {
    let txn = make_txn(dec!(100.00));
    assert!(txn.is_income());
    assert!(!txn.is_expense());
    assert_eq!(txn.kind(), TransactionType::Income);
}

#[test]
fn test_expense() {
    let txn = make_txn(dec!(-50.00));
    assert!(!txn.is_income());
    assert!(txn.is_expense());
    assert_eq!(txn.kind(), TransactionType::Expense);
}

#[test]
fn test_zero_classified_as_income_type() {
    let txn = make_txn(Decimal::ZERO);
    assert!(!txn.is_income());
    assert!(!txn.is_expense());
    assert_eq!(txn.kind(), TransactionType::Income);
}

#[test]
fn test_abs_amount() {
    assert_eq!(make_txn(dec!(-42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(dec!(42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(Decimal::ZERO).abs_amount(), Decimal::ZERO);
}

#[test]
fn test_new_applies_sign_from_type() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let expense = Transaction::new(
        "Lunch".into(),
        TransactionType::Expense,
        dec!(12.50),
        Category::Food,
        date,
    );
    assert_eq!(expense.amount, dec!(-12.50));

    // A negative magnitude entered for income still stores positive
    let income = Transaction::new(
        "Pay".into(),
        TransactionType::Income,
        dec!(-2000),
        Category::Salary,
        date,
    );
    assert_eq!(income.amount, dec!(2000));
    assert!(!income.timestamp.is_empty());
}

#[test]
fn test_transaction_type_parse() {
    assert_eq!(TransactionType::parse("income"), Some(TransactionType::Income));
    assert_eq!(TransactionType::parse("EXPENSE"), Some(TransactionType::Expense));
    assert_eq!(TransactionType::parse("all"), None);
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_category_parse_roundtrip_keys() {
    for cat in Category::all() {
        assert_eq!(Category::parse(cat.as_str()), Some(*cat));
    }
    assert_eq!(Category::parse("Food"), Some(Category::Food));
    assert_eq!(Category::parse("  housing "), Some(Category::Housing));
    assert_eq!(Category::parse("groceries"), None);
}

#[test]
fn test_category_vocabulary_per_type() {
    let expense = Category::for_type(TransactionType::Expense);
    let income = Category::for_type(TransactionType::Income);
    assert!(expense.contains(&Category::Food));
    assert!(!expense.contains(&Category::Salary));
    assert!(income.contains(&Category::Salary));
    assert!(!income.contains(&Category::Food));
    // "other" is shared between both vocabularies
    assert!(Category::Other.allowed_for(TransactionType::Expense));
    assert!(Category::Other.allowed_for(TransactionType::Income));
}

// ── BudgetTarget ──────────────────────────────────────────────

#[test]
fn test_budget_target_columns() {
    let food = BudgetTarget::Category(Category::Food);
    assert_eq!(food.type_str(), "category");
    assert_eq!(food.category_str(), "food");
    assert_eq!(BudgetTarget::Savings.type_str(), "savings");
    assert_eq!(BudgetTarget::Savings.category_str(), "savings");

    assert_eq!(BudgetTarget::from_columns("category", "food"), Some(food));
    assert_eq!(
        BudgetTarget::from_columns("savings", "anything"),
        Some(BudgetTarget::Savings)
    );
    assert_eq!(BudgetTarget::from_columns("category", "nope"), None);
    assert_eq!(BudgetTarget::from_columns("weekly", "food"), None);
}

#[test]
fn test_budget_target_parse() {
    assert_eq!(BudgetTarget::parse("Savings"), Some(BudgetTarget::Savings));
    assert_eq!(
        BudgetTarget::parse("transport"),
        Some(BudgetTarget::Category(Category::Transport))
    );
    assert_eq!(BudgetTarget::parse("bogus"), None);
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_settings_defaults() {
    let s = Settings::default();
    assert_eq!(s.currency, "$");
    assert_eq!(s.theme, Theme::Light);
    assert!(!s.pin_enabled);
}

#[test]
fn test_theme_parse_and_toggle() {
    assert_eq!(Theme::parse("dark"), Theme::Dark);
    assert_eq!(Theme::parse("DARK"), Theme::Dark);
    assert_eq!(Theme::parse("whatever"), Theme::Light);
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled().as_str(), "light");
}
