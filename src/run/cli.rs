use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing::info;

use crate::aggregate::{self, DateRange, TransactionFilter};
use crate::backup;
use crate::budgets::BudgetEngine;
use crate::db::{is_valid_month, is_valid_pin, Database};
use crate::entry::{self, BUDGET_USAGE, TRANSACTION_USAGE};
use crate::export;
use crate::models::{Category, Transaction, TransactionType};
use crate::report::{ReportBuilder, ReportPeriod};
use crate::ui::util::{format_amount, format_signed, truncate};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    let today = Local::now().date_naive();
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = args.get(2..).unwrap_or_default();
    match command.as_str() {
        "summary" | "s" => cli_summary(rest, db, today),
        "add" | "a" => cli_add(rest, db, today),
        "edit" => cli_edit(rest, db, today),
        "delete" | "rm" => cli_delete(rest, db),
        "list" | "ls" => cli_list(rest, db, today),
        "budget" => cli_budget(rest, db, today),
        "report" => cli_report(rest, db, today),
        "export" => cli_export(rest, db, today),
        "backup" => cli_backup(rest, db, today),
        "currency" => cli_currency(rest, db),
        "pin" => cli_pin(rest, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("finsavvy {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("FinSavvy - local-only personal finance tracker");
    println!();
    println!("Usage: finsavvy [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary [YYYY-MM]             Balance, month savings and spending by category");
    println!("  add {TRANSACTION_USAGE}");
    println!("                                Record a transaction");
    println!("  edit <id> <same as add>       Replace a transaction");
    println!("  delete <id>                   Delete a transaction");
    println!("  list                          List transactions, newest first");
    println!("    --range <all|today|week|month|year>");
    println!("    --type <all|income|expense>");
    println!("    --category <key|all>");
    println!("    --search <text>");
    println!("  budget set {BUDGET_USAGE}");
    println!("  budget list                   Current month budgets with progress");
    println!("  budget delete <id>            Delete a budget");
    println!("  report [month|3months|6months|year]");
    println!("                                Print a period report");
    println!("  export [path]                 Export transactions to CSV");
    println!("    --period <month|3months|6months|year>");
    println!("  backup [path]                 Write all data to JSON (finsavvy-data-YYYY-MM-DD.json)");
    println!("  currency [symbol]             Show or set the currency symbol");
    println!("  pin <4 digits> | pin off      Enable or disable the TUI PIN lock");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument helpers ─────────────────────────────────────────

const VALUE_FLAGS: &[&str] = &["--range", "--type", "--category", "--search", "--period"];

/// Value following `flag`. An explicit flag with no value is an error.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{flag} needs a value")),
    }
}

/// Arguments that are neither value flags nor their values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
        } else if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_id(arg: Option<&String>, usage: &str) -> Result<i64> {
    let raw = arg.ok_or_else(|| anyhow!("Usage: finsavvy {usage}"))?;
    raw.parse::<i64>()
        .with_context(|| format!("Invalid id '{raw}'"))
}

fn build_filter(args: &[String]) -> Result<TransactionFilter> {
    let mut filter = TransactionFilter::default();
    if let Some(range) = flag_value(args, "--range")? {
        filter.range = DateRange::parse(range)
            .ok_or_else(|| anyhow!("Unknown range '{range}' (all, today, week, month, year)"))?;
    }
    if let Some(kind) = flag_value(args, "--type")? {
        filter.kind = match kind {
            "all" => None,
            other => Some(
                TransactionType::parse(other)
                    .ok_or_else(|| anyhow!("Unknown type '{other}' (all, income, expense)"))?,
            ),
        };
    }
    if let Some(category) = flag_value(args, "--category")? {
        filter.category = match category {
            "all" => None,
            other => Some(
                Category::parse(other).ok_or_else(|| anyhow!("Unknown category '{other}'"))?,
            ),
        };
    }
    if let Some(query) = flag_value(args, "--search")? {
        filter.query = query.to_string();
    }
    Ok(filter)
}

fn parse_period(raw: &str) -> Result<ReportPeriod> {
    ReportPeriod::parse(raw)
        .ok_or_else(|| anyhow!("Unknown period '{raw}' (month, 3months, 6months, year)"))
}

fn print_transactions(transactions: &[Transaction], currency: &str) {
    println!(
        "{:<5} {:<10} {:<32} {:<15} {:>14}",
        "ID", "Date", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(80));
    for txn in transactions {
        println!(
            "{:<5} {:<10} {:<32} {:<15} {:>14}",
            txn.id.unwrap_or(0),
            txn.date.format("%Y-%m-%d"),
            truncate(&txn.description, 32),
            txn.category.label(),
            format_signed(txn.amount, currency),
        );
    }
}

// ── Transactions ─────────────────────────────────────────────

fn cli_add(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let tokens: Vec<&str> = args.iter().map(String::as_str).collect();
    let txn = entry::parse_transaction(&tokens, today)?;
    let id = db.insert_transaction(&txn)?;
    info!(id, kind = txn.kind().as_str(), "transaction added from cli");
    let currency = db.get_settings()?.currency;
    println!(
        "Added #{id}: {} {} ({})",
        txn.description,
        format_signed(txn.amount, &currency),
        txn.category.label()
    );
    Ok(())
}

fn cli_edit(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let id = parse_id(args.first(), &format!("edit <id> {TRANSACTION_USAGE}"))?;
    let tokens: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
    let txn = entry::parse_transaction(&tokens, today)?;
    if !db.update_transaction(id, &txn)? {
        bail!("No transaction with id {id}");
    }
    info!(id, "transaction edited from cli");
    println!("Updated #{id}: {}", txn.description);
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(args.first(), "delete <id>")?;
    let txn = db
        .get_transaction(id)?
        .ok_or_else(|| anyhow!("No transaction with id {id}"))?;
    db.delete_transaction(id)?;
    info!(id, "transaction deleted from cli");
    println!("Deleted #{id}: {}", txn.description);
    Ok(())
}

fn cli_list(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let filter = build_filter(args)?;
    let transactions = db.list_transactions()?;
    let visible = aggregate::sorted_by_date_desc(&filter.apply(&transactions, today));
    if visible.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    let currency = db.get_settings()?.currency;
    print_transactions(&visible, &currency);
    println!();
    println!(
        "{} transactions, balance {}",
        visible.len(),
        format_amount(aggregate::balance(&visible), &currency)
    );
    Ok(())
}

// ── Summary & reports ────────────────────────────────────────

fn cli_summary(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let month = match args.first().filter(|a| !a.starts_with('-')) {
        Some(m) if is_valid_month(m) => m.clone(),
        Some(m) => bail!("Invalid month '{m}', expected YYYY-MM"),
        None => aggregate::month_key(today),
    };

    let transactions = db.list_transactions()?;
    let currency = db.get_settings()?.currency;
    let in_month: Vec<Transaction> = transactions
        .iter()
        .filter(|t| aggregate::month_key(t.date) == month)
        .cloned()
        .collect();
    let month_savings = aggregate::total_income(&in_month) - aggregate::total_expenses(&in_month);

    println!("FinSavvy - {month}");
    println!("{}", "─".repeat(40));
    println!(
        "  Balance:      {}",
        format_amount(aggregate::balance(&transactions), &currency)
    );
    println!(
        "  Income:       {}",
        format_amount(aggregate::total_income(&transactions), &currency)
    );
    println!(
        "  Expenses:     {}",
        format_amount(aggregate::total_expenses(&transactions), &currency)
    );
    println!("  Month saved:  {}", format_amount(month_savings, &currency));
    println!("  Total Txns:   {}", db.get_transaction_count()?);

    let spending = aggregate::ranked_categories(&aggregate::expenses_by_category(&in_month));
    if !spending.is_empty() {
        println!();
        println!("Spending by Category:");
        for (category, amount) in &spending {
            println!("  {:<24} {}", category.label(), format_amount(*amount, &currency));
        }
    }
    Ok(())
}

fn cli_report(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let period = match args.first() {
        Some(raw) => parse_period(raw)?,
        None => ReportPeriod::Month,
    };
    let transactions = db.list_transactions()?;
    let currency = db.get_settings()?.currency;
    let report = ReportBuilder::new(&transactions, period, today);
    let summary = report.summary();

    println!(
        "FinSavvy report - {} (since {})",
        report.period(),
        report.window_start().format("%Y-%m-%d")
    );
    println!("{}", "─".repeat(48));
    println!("  Income:       {}", format_amount(summary.income, &currency));
    println!("  Expenses:     {}", format_amount(summary.expenses, &currency));
    println!("  Net Savings:  {}", format_amount(summary.net_savings, &currency));

    let breakdown = aggregate::ranked_categories(&report.category_breakdown());
    if !breakdown.is_empty() {
        println!();
        println!("Spending by Category:");
        for (category, amount) in &breakdown {
            println!("  {:<24} {}", category.label(), format_amount(*amount, &currency));
        }
    }

    println!();
    println!("Income vs Expenses:");
    for point in report.income_expense_series() {
        println!(
            "  {:<10} {:>14} {:>14}",
            point.label,
            format_amount(point.income, &currency),
            format_amount(point.expenses, &currency)
        );
    }

    println!();
    println!("Balance Trend:");
    for point in report.trend_series() {
        println!(
            "  {:<10} {:>14} {:>14}",
            point.label,
            format_signed(point.period_balance, &currency),
            format_amount(point.running_balance, &currency)
        );
    }
    Ok(())
}

// ── Budgets ──────────────────────────────────────────────────

fn cli_budget(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("set") => {
            let tokens: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
            let budget = entry::parse_budget(&tokens, today)?;
            let id = db.set_budget(&budget)?;
            info!(id, month = %budget.month, "budget set from cli");
            let currency = db.get_settings()?.currency;
            println!(
                "Budget #{id}: {} {} for {}",
                budget.target,
                format_amount(budget.amount, &currency),
                budget.month
            );
            Ok(())
        }
        Some("delete") | Some("rm") => {
            let id = parse_id(args.get(1), "budget delete <id>")?;
            if !db.delete_budget(id)? {
                bail!("No budget with id {id}");
            }
            info!(id, "budget deleted from cli");
            println!("Deleted budget #{id}");
            Ok(())
        }
        Some("list") | Some("ls") | None => cli_budget_list(db, today),
        Some(other) => bail!("Unknown budget command '{other}' (set, list, delete)"),
    }
}

fn cli_budget_list(db: &mut Database, today: NaiveDate) -> Result<()> {
    let transactions = db.list_transactions()?;
    let budgets = db.list_budgets()?;
    let currency = db.get_settings()?.currency;
    let engine = BudgetEngine::new(&transactions, &budgets, today);
    let lines = engine.overview();
    if lines.is_empty() {
        println!("No budgets for {}", engine.current_month());
        return Ok(());
    }

    println!("Budgets for {}", engine.current_month());
    println!(
        "{:<5} {:<20} {:>14} {:>14} {:>5}  Status",
        "ID", "Target", "Spent", "Budget", "%"
    );
    println!("{}", "─".repeat(72));
    for line in &lines {
        println!(
            "{:<5} {:<20} {:>14} {:>14} {:>4}%  {}",
            line.budget.id.unwrap_or(0),
            truncate(&line.budget.target.to_string(), 20),
            format_amount(line.progress.spent, &currency),
            format_amount(line.progress.budget, &currency),
            line.progress.percentage,
            line.progress.status()
        );
    }
    println!();
    println!(
        "Spent {} of {} income this month",
        format_amount(engine.total_spending(), &currency),
        format_amount(engine.total_income(), &currency)
    );
    Ok(())
}

// ── Export & settings ────────────────────────────────────────

fn cli_export(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let transactions = db.list_transactions()?;
    let selected = match flag_value(args, "--period")? {
        Some(raw) => ReportBuilder::new(&transactions, parse_period(raw)?, today).window_transactions(),
        None => transactions,
    };
    let rows = aggregate::sorted_by_date_desc(&selected);

    let output_path = positionals(args)
        .first()
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| export::default_path(today));

    let count = export::export_to_path(&output_path, &rows)?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {}", output_path.display());
    }
    Ok(())
}

fn cli_backup(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let output_path = positionals(args)
        .first()
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| backup::default_path(today));

    let written = backup::backup_to_path(&output_path, db)?;
    println!(
        "Backed up {} transactions and {} budgets to {}",
        written.transactions.len(),
        written.budgets.len(),
        output_path.display()
    );
    Ok(())
}

fn cli_currency(args: &[String], db: &mut Database) -> Result<()> {
    let mut settings = db.get_settings()?;
    match args.first() {
        None => println!("Currency is '{}'", settings.currency),
        Some(symbol) => {
            settings.currency = symbol.clone();
            db.save_settings(&settings)?;
            println!("Currency set to '{symbol}'");
        }
    }
    Ok(())
}

fn cli_pin(args: &[String], db: &mut Database) -> Result<()> {
    let mut settings = db.get_settings()?;
    match args.first().map(String::as_str) {
        Some(off) if off.eq_ignore_ascii_case("off") => {
            settings.pin_enabled = false;
            db.save_settings(&settings)?;
            println!("PIN lock disabled");
        }
        Some(pin) if is_valid_pin(pin) => {
            db.set_pin(pin)?;
            settings.pin_enabled = true;
            db.save_settings(&settings)?;
            println!("PIN lock enabled");
        }
        _ => bail!("Usage: finsavvy pin <4 digits> | pin off"),
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
