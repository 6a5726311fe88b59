#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(description: &str, amount: Decimal, category: Category, on: NaiveDate) -> Transaction {
    Transaction {
        id: None,
        description: description.into(),
        amount,
        category,
        date: on,
        timestamp: String::new(),
    }
}

fn sample() -> Vec<Transaction> {
    vec![
        txn("Groceries", dec!(-50), Category::Food, date(2024, 3, 5)),
        txn("Salary March", dec!(2000), Category::Salary, date(2024, 3, 1)),
        txn("Bus pass", dec!(-30), Category::Transport, date(2024, 2, 20)),
        txn("Pizza", dec!(-22.50), Category::Food, date(2024, 3, 14)),
        txn("Refund", Decimal::ZERO, Category::Other, date(2024, 3, 14)),
        txn("Gift from Ana", dec!(100), Category::Gift, date(2023, 12, 24)),
    ]
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_empty_totals_are_zero() {
    assert_eq!(total_income(&[]), Decimal::ZERO);
    assert_eq!(total_expenses(&[]), Decimal::ZERO);
    assert_eq!(balance(&[]), Decimal::ZERO);
    assert!(expenses_by_category(&[]).is_empty());
}

#[test]
fn test_march_scenario() {
    let list = vec![
        txn("Groceries", dec!(-50), Category::Food, date(2024, 3, 5)),
        txn("Pay", dec!(2000), Category::Salary, date(2024, 3, 1)),
    ];
    assert_eq!(total_income(&list), dec!(2000));
    assert_eq!(total_expenses(&list), dec!(50));
    assert_eq!(balance(&list), dec!(1950));
}

#[test]
fn test_balance_is_income_minus_expenses() {
    let list = sample();
    assert_eq!(balance(&list), total_income(&list) - total_expenses(&list));
    assert_eq!(total_income(&list), dec!(2100));
    assert_eq!(total_expenses(&list), dec!(102.50));
}

#[test]
fn test_zero_amount_counts_toward_neither_total() {
    let list = vec![txn("Nothing", Decimal::ZERO, Category::Other, date(2024, 3, 1))];
    assert_eq!(total_income(&list), Decimal::ZERO);
    assert_eq!(total_expenses(&list), Decimal::ZERO);
}

#[test]
fn test_expenses_by_category_omits_income_only_categories() {
    let breakdown = expenses_by_category(&sample());
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[&Category::Food], dec!(72.50));
    assert_eq!(breakdown[&Category::Transport], dec!(30));
    assert!(!breakdown.contains_key(&Category::Salary));
    assert!(!breakdown.contains_key(&Category::Other));
    assert!(breakdown.values().all(|v| *v > Decimal::ZERO));
}

#[test]
fn test_ranked_categories_largest_first() {
    let ranked = ranked_categories(&expenses_by_category(&sample()));
    assert_eq!(
        ranked,
        vec![(Category::Food, dec!(72.50)), (Category::Transport, dec!(30))]
    );
}

#[test]
fn test_aggregators_do_not_mutate_input() {
    let list = sample();
    let before = list.clone();
    let first = (total_income(&list), expenses_by_category(&list));
    let second = (total_income(&list), expenses_by_category(&list));
    assert_eq!(first, second);
    assert_eq!(list, before);
}

// ── Date ranges ───────────────────────────────────────────────

#[test]
fn test_date_range_all_is_identity() {
    let list = sample();
    assert_eq!(filter_by_date_range(&list, DateRange::All, date(2024, 3, 14)), list);
}

#[test]
fn test_date_range_today() {
    let result = filter_by_date_range(&sample(), DateRange::Today, date(2024, 3, 14));
    let names: Vec<&str> = result.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Pizza", "Refund"]);
}

#[test]
fn test_date_range_week_is_trailing_seven_days() {
    let today = date(2024, 3, 14);
    let list = vec![
        txn("too old", dec!(-1), Category::Food, date(2024, 3, 7)),
        txn("first day", dec!(-1), Category::Food, date(2024, 3, 8)),
        txn("today", dec!(-1), Category::Food, today),
        txn("future", dec!(-1), Category::Food, date(2024, 3, 15)),
    ];
    let result = filter_by_date_range(&list, DateRange::Week, today);
    let names: Vec<&str> = result.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["first day", "today"]);
}

#[test]
fn test_date_range_month_and_year() {
    let today = date(2024, 3, 14);
    let month = filter_by_date_range(&sample(), DateRange::Month, today);
    assert_eq!(month.len(), 4);
    assert!(month.iter().all(|t| t.date.month() == 3));

    let year = filter_by_date_range(&sample(), DateRange::Year, today);
    assert_eq!(year.len(), 5);
    assert!(year.iter().all(|t| t.date.year() == 2024));
}

#[test]
fn test_date_range_preserves_order() {
    let result = filter_by_date_range(&sample(), DateRange::Year, date(2024, 3, 31));
    let names: Vec<&str> = result.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Groceries", "Salary March", "Bus pass", "Pizza", "Refund"]);
}

#[test]
fn test_date_range_parse() {
    assert_eq!(DateRange::parse("week"), Some(DateRange::Week));
    assert_eq!(DateRange::parse("YEAR"), Some(DateRange::Year));
    assert_eq!(DateRange::parse("fortnight"), None);
}

#[test]
fn test_current_month_transactions() {
    let result = current_month_transactions(&sample(), date(2024, 3, 10));
    let names: Vec<&str> = result.iter().map(|t| t.description.as_str()).collect();
    // Pizza and Refund are dated after "today"
    assert_eq!(names, vec!["Groceries", "Salary March"]);
}

// ── Category / type / search ──────────────────────────────────

#[test]
fn test_filter_by_category() {
    let list = sample();
    assert_eq!(filter_by_category(&list, None), list);
    let food = filter_by_category(&list, Some(Category::Food));
    assert_eq!(food.len(), 2);
    assert!(food.iter().all(|t| t.category == Category::Food));
    assert!(filter_by_category(&list, Some(Category::Housing)).is_empty());
}

#[test]
fn test_filter_by_type_partitions_list() {
    let list = sample();
    let income = filter_by_type(&list, Some(TransactionType::Income));
    let expense = filter_by_type(&list, Some(TransactionType::Expense));
    assert_eq!(income.len() + expense.len(), list.len());
    assert!(income.iter().all(|t| t.amount >= Decimal::ZERO));
    assert!(expense.iter().all(|t| t.amount < Decimal::ZERO));
    // Zero-amount refund lands on the income side
    assert!(income.iter().any(|t| t.description == "Refund"));
    assert_eq!(filter_by_type(&list, None), list);
}

#[test]
fn test_search_matches_description_and_category() {
    let list = sample();
    let by_desc = search(&list, "PIZZA");
    assert_eq!(by_desc.len(), 1);

    let by_category = search(&list, "transp");
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].description, "Bus pass");

    // "food" matches both food-category rows via the category key
    assert_eq!(search(&list, "food").len(), 2);
}

#[test]
fn test_search_empty_query_is_identity() {
    let list = sample();
    assert_eq!(search(&list, ""), list);
    assert_eq!(search(&list, "   "), list);
    assert!(search(&list, "zzz").is_empty());
}

// ── Sorting & combined filter ─────────────────────────────────

#[test]
fn test_recent_is_most_recent_first() {
    let recent_three = recent(&sample(), 3);
    let dates: Vec<NaiveDate> = recent_three.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 3, 14), date(2024, 3, 14), date(2024, 3, 5)]
    );
}

#[test]
fn test_sorted_ties_break_on_timestamp() {
    let mut early = txn("early", dec!(-1), Category::Food, date(2024, 3, 1));
    early.timestamp = "2024-03-01T08:00:00+00:00".into();
    let mut late = txn("late", dec!(-1), Category::Food, date(2024, 3, 1));
    late.timestamp = "2024-03-01T20:00:00+00:00".into();
    let sorted = sorted_by_date_desc(&[early, late]);
    assert_eq!(sorted[0].description, "late");
}

#[test]
fn test_transaction_filter_combines_all_criteria() {
    let filter = TransactionFilter {
        range: DateRange::Month,
        kind: Some(TransactionType::Expense),
        category: Some(Category::Food),
        query: "pi".into(),
    };
    let result = filter.apply(&sample(), date(2024, 3, 20));
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].description, "Pizza");

    let everything = TransactionFilter::default().apply(&sample(), date(2024, 3, 20));
    assert_eq!(everything.len(), sample().len());
}

#[test]
fn test_month_key_and_boundaries() {
    assert_eq!(month_key(date(2024, 3, 14)), "2024-03");
    assert_eq!(first_of_month(date(2024, 3, 14)), date(2024, 3, 1));
    assert_eq!(first_of_year(date(2024, 3, 14)), date(2024, 1, 1));
}
