#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(amount: Decimal, category: Category, on: NaiveDate) -> Transaction {
    Transaction {
        id: None,
        description: format!("{category} {amount}"),
        amount,
        category,
        date: on,
        timestamp: String::new(),
    }
}

fn food_budget(amount: Decimal, month: &str) -> Budget {
    Budget::new(BudgetTarget::Category(Category::Food), amount, month.into())
}

const TODAY: (i32, u32, u32) = (2024, 3, 20);

fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

// ── Percentage & status ───────────────────────────────────────

#[test]
fn test_percentage_without_budget_is_zero() {
    assert_eq!(percentage(dec!(50), Decimal::ZERO), 0);
    assert_eq!(percentage(dec!(50), dec!(-10)), 0);
}

#[test]
fn test_percentage_capped_at_hundred() {
    assert_eq!(percentage(dec!(250), dec!(100)), 100);
    assert_eq!(percentage(dec!(100), dec!(100)), 100);
}

#[test]
fn test_percentage_negative_spent_clamps_to_zero() {
    assert_eq!(percentage(dec!(-200), dec!(500)), 0);
}

#[test]
fn test_percentage_rounds_half_away_from_zero() {
    assert_eq!(percentage(dec!(1), dec!(8)), 13); // 12.5
    assert_eq!(percentage(dec!(1), dec!(3)), 33);
    assert_eq!(percentage(dec!(2), dec!(3)), 67);
}

#[test]
fn test_status_thresholds() {
    assert_eq!(ProgressStatus::from_percentage(0), ProgressStatus::Neutral);
    assert_eq!(ProgressStatus::from_percentage(69), ProgressStatus::Neutral);
    assert_eq!(ProgressStatus::from_percentage(70), ProgressStatus::Warning);
    assert_eq!(ProgressStatus::from_percentage(89), ProgressStatus::Warning);
    assert_eq!(ProgressStatus::from_percentage(90), ProgressStatus::Danger);
    assert_eq!(ProgressStatus::from_percentage(100), ProgressStatus::Danger);
}

// ── Lookup ────────────────────────────────────────────────────

#[test]
fn test_only_current_month_budgets_apply() {
    let budgets = vec![food_budget(dec!(100), "2024-02"), food_budget(dec!(200), "2024-03")];
    let engine = BudgetEngine::new(&[], &budgets, today());
    assert_eq!(engine.current_month(), "2024-03");
    assert_eq!(engine.current_month_budgets().len(), 1);
    assert_eq!(
        engine.budget_for_category(Category::Food).unwrap().amount,
        dec!(200)
    );
    assert!(engine.budget_for_category(Category::Transport).is_none());
}

#[test]
fn test_duplicate_budget_first_match_wins() {
    let budgets = vec![
        Budget::new(BudgetTarget::Savings, dec!(300), "2024-03".into()),
        Budget::new(BudgetTarget::Savings, dec!(800), "2024-03".into()),
        food_budget(dec!(50), "2024-03"),
        food_budget(dec!(75), "2024-03"),
    ];
    let engine = BudgetEngine::new(&[], &budgets, today());
    assert_eq!(engine.savings_goal().unwrap().amount, dec!(300));
    assert_eq!(
        engine.budget_for_category(Category::Food).unwrap().amount,
        dec!(50)
    );
}

// ── Spending & progress ───────────────────────────────────────

#[test]
fn test_food_progress_in_danger_zone() {
    let transactions = vec![
        txn(dec!(-60), Category::Food, date(2024, 3, 2)),
        txn(dec!(-30), Category::Food, date(2024, 3, 18)),
        // Previous month is ignored
        txn(dec!(-500), Category::Food, date(2024, 2, 28)),
        txn(dec!(-40), Category::Transport, date(2024, 3, 3)),
    ];
    let budgets = vec![food_budget(dec!(100), "2024-03")];
    let engine = BudgetEngine::new(&transactions, &budgets, today());

    let progress = engine.progress(BudgetTarget::Category(Category::Food));
    assert_eq!(progress.spent, dec!(90));
    assert_eq!(progress.budget, dec!(100));
    assert_eq!(progress.percentage, 90);
    assert_eq!(progress.status(), ProgressStatus::Danger);
}

#[test]
fn test_category_without_budget_reports_spending_only() {
    let transactions = vec![txn(dec!(-40), Category::Transport, date(2024, 3, 3))];
    let engine = BudgetEngine::new(&transactions, &[], today());
    let progress = engine.progress(BudgetTarget::Category(Category::Transport));
    assert_eq!(progress.spent, dec!(40));
    assert_eq!(progress.budget, Decimal::ZERO);
    assert_eq!(progress.percentage, 0);
}

#[test]
fn test_savings_without_goal() {
    let transactions = vec![
        txn(dec!(2000), Category::Salary, date(2024, 3, 1)),
        txn(dec!(-1500), Category::Housing, date(2024, 3, 2)),
    ];
    let engine = BudgetEngine::new(&transactions, &[], today());
    assert_eq!(
        engine.progress(BudgetTarget::Savings),
        Progress {
            spent: dec!(500),
            budget: Decimal::ZERO,
            percentage: 0,
        }
    );
}

#[test]
fn test_negative_savings_reports_zero_percent() {
    let transactions = vec![
        txn(dec!(1000), Category::Salary, date(2024, 3, 1)),
        txn(dec!(-1200), Category::Housing, date(2024, 3, 2)),
    ];
    let budgets = vec![Budget::new(BudgetTarget::Savings, dec!(500), "2024-03".into())];
    let engine = BudgetEngine::new(&transactions, &budgets, today());
    let progress = engine.progress(BudgetTarget::Savings);
    assert_eq!(progress.spent, dec!(-200));
    assert_eq!(progress.percentage, 0);
    assert_eq!(progress.status(), ProgressStatus::Neutral);
}

#[test]
fn test_month_totals() {
    let transactions = vec![
        txn(dec!(2000), Category::Salary, date(2024, 3, 1)),
        txn(dec!(150), Category::Freelance, date(2024, 3, 9)),
        txn(dec!(-80), Category::Food, date(2024, 3, 4)),
        txn(dec!(-20), Category::Entertainment, date(2024, 3, 5)),
        // Dated after today
        txn(dec!(-999), Category::Food, date(2024, 3, 25)),
    ];
    let engine = BudgetEngine::new(&transactions, &[], today());
    assert_eq!(engine.total_income(), dec!(2150));
    assert_eq!(engine.total_spending(), dec!(100));
    assert_eq!(engine.savings(), dec!(2050));
    assert_eq!(engine.category_spending(Category::Food), dec!(80));
}

// ── Overview ──────────────────────────────────────────────────

#[test]
fn test_overview_savings_first_then_categories() {
    let transactions = vec![
        txn(dec!(1000), Category::Salary, date(2024, 3, 1)),
        txn(dec!(-75), Category::Transport, date(2024, 3, 6)),
        txn(dec!(-20), Category::Food, date(2024, 3, 7)),
    ];
    let budgets = vec![
        Budget::new(
            BudgetTarget::Category(Category::Transport),
            dec!(100),
            "2024-03".into(),
        ),
        food_budget(dec!(200), "2024-03"),
        Budget::new(BudgetTarget::Savings, dec!(1810), "2024-03".into()),
        food_budget(dec!(10), "2024-01"),
    ];
    let engine = BudgetEngine::new(&transactions, &budgets, today());
    let overview = engine.overview();

    let targets: Vec<BudgetTarget> = overview.iter().map(|l| l.budget.target).collect();
    assert_eq!(
        targets,
        vec![
            BudgetTarget::Savings,
            BudgetTarget::Category(Category::Transport),
            BudgetTarget::Category(Category::Food),
        ]
    );
    assert_eq!(overview[0].progress.spent, dec!(905));
    assert_eq!(overview[0].progress.percentage, 50);
    assert_eq!(overview[1].progress.status(), ProgressStatus::Warning);
    assert_eq!(overview[2].progress.percentage, 10);
}

#[test]
fn test_overview_empty_without_budgets() {
    let transactions = vec![txn(dec!(-5), Category::Food, date(2024, 3, 1))];
    let engine = BudgetEngine::new(&transactions, &[], today());
    assert!(engine.overview().is_empty());
}

#[test]
fn test_overview_skips_shadowed_duplicates() {
    let budgets = vec![food_budget(dec!(50), "2024-03"), food_budget(dec!(75), "2024-03")];
    let engine = BudgetEngine::new(&[], &budgets, today());
    let overview = engine.overview();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].progress.budget, dec!(50));
}
