use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::info;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::aggregate::DateRange;
use crate::backup;
use crate::db::Database;
use crate::entry;
use crate::export;
use crate::models::{Category, Theme, TransactionType};
use crate::report::ReportPeriod;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit FinSavvy", cmd_quit, r);
    register_command!("quit", "Quit FinSavvy", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("r", "Go to Reports", cmd_reports, r);
    register_command!("reports", "Go to Reports", cmd_reports, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add expense 12.50 food Lunch)",
        cmd_add,
        r
    );
    register_command!("a", "Add transaction", cmd_add, r);
    register_command!(
        "edit",
        "Replace selected transaction (same arguments as :add)",
        cmd_edit,
        r
    );
    register_command!(
        "delete",
        "Delete selected transaction or budget",
        cmd_delete,
        r
    );
    register_command!(
        "budget",
        "Set budget (e.g. :budget food 300, :budget savings 500)",
        cmd_budget,
        r
    );
    register_command!(
        "period",
        "Report period (month, 3months, 6months, year)",
        cmd_period,
        r
    );
    register_command!(
        "range",
        "Date filter (all, today, week, month, year)",
        cmd_range,
        r
    );
    register_command!("type", "Type filter (all, income, expense)", cmd_type, r);
    register_command!(
        "category",
        "Category filter (e.g. :category food, :category all)",
        cmd_category,
        r
    );
    register_command!(
        "search",
        "Search transactions (e.g. :search coffee)",
        cmd_search,
        r
    );
    register_command!("s", "Search transactions", cmd_search, r);
    register_command!(
        "currency",
        "Set currency symbol (e.g. :currency €)",
        cmd_currency,
        r
    );
    register_command!("theme", "Toggle light/dark theme", cmd_theme, r);
    register_command!("pin", "Set PIN lock (:pin 1234) or :pin off", cmd_pin, r);
    register_command!(
        "export",
        "Export visible transactions to CSV, or all data with :export json [path]",
        cmd_export,
        r
    );
    register_command!(
        "clear-all",
        "Delete all transactions, budgets and settings",
        cmd_clear_all,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let (cmd_name, args) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args = args.trim();
    app.sync_today();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

pub(crate) fn switch_screen(app: &mut App, db: &Database, screen: Screen) -> anyhow::Result<()> {
    app.screen = screen;
    app.refresh_all(db)?;
    app.set_status(format!("{screen}"));
    Ok(())
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Dashboard)
}

fn cmd_transactions(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Transactions)
}

fn cmd_budgets(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Budgets)
}

fn cmd_reports(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    switch_screen(app, db, Screen::Reports)
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let txn = match entry::parse_transaction(&tokens, app.today) {
        Ok(txn) => txn,
        Err(e) => {
            app.set_status(format!("{e}"));
            return Ok(());
        }
    };
    let id = db.insert_transaction(&txn)?;
    info!(id, kind = %txn.kind(), "transaction added from tui");
    app.refresh_all(db)?;
    app.set_status(format!(
        "Added {} '{}'",
        txn.kind().as_str(),
        txn.description
    ));
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions {
        app.set_status("Select a transaction on the Transactions screen first");
        return Ok(());
    }
    let Some(id) = app.selected_transaction().and_then(|t| t.id) else {
        app.set_status("No transaction selected");
        return Ok(());
    };
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let txn = match entry::parse_transaction(&tokens, app.today) {
        Ok(txn) => txn,
        Err(e) => {
            app.set_status(format!("{e}"));
            return Ok(());
        }
    };
    if db.update_transaction(id, &txn)? {
        info!(id, "transaction replaced from tui");
        app.set_status(format!("Updated '{}'", txn.description));
    } else {
        app.set_status(format!("Transaction {id} no longer exists"));
    }
    app.refresh_all(db)?;
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match app.screen {
        Screen::Transactions => {
            let Some(txn) = app.selected_transaction() else {
                app.set_status("No transaction selected");
                return Ok(());
            };
            if let Some(id) = txn.id {
                let description = txn.description.clone();
                app.confirm_message = format!("Delete '{description}'?");
                app.pending_action = Some(PendingAction::DeleteTransaction { id, description });
                app.input_mode = InputMode::Confirm;
            }
        }
        Screen::Budgets => {
            let lines = app.budget_lines();
            let Some(line) = lines.get(app.budget_index) else {
                app.set_status("No budgets to delete");
                return Ok(());
            };
            if let Some(id) = line.budget.id {
                let name = line.budget.target.to_string();
                app.confirm_message = format!("Delete budget '{name}'?");
                app.pending_action = Some(PendingAction::DeleteBudget { id, name });
                app.input_mode = InputMode::Confirm;
            }
        }
        _ => app.set_status("Nothing to delete on this screen"),
    }
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Usage: :budget {}", entry::BUDGET_USAGE));
        return Ok(());
    }
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let budget = match entry::parse_budget(&tokens, app.today) {
        Ok(b) => b,
        Err(e) => {
            app.set_status(format!("{e}"));
            return Ok(());
        }
    };
    let id = db.set_budget(&budget)?;
    info!(id, target = %budget.target, month = %budget.month, "budget set from tui");
    app.screen = Screen::Budgets;
    app.refresh_all(db)?;
    app.set_status(format!(
        "Budget set: {} = {} for {}",
        budget.target,
        crate::ui::util::format_amount(budget.amount, app.currency()),
        budget.month
    ));
    Ok(())
}

fn cmd_period(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let period = if args.is_empty() {
        Some(app.report_period.next())
    } else {
        ReportPeriod::parse(args)
    };
    match period {
        Some(p) => {
            app.report_period = p;
            app.screen = Screen::Reports;
            app.set_status(format!("Report period: {p}"));
        }
        None => app.set_status("Period must be month, 3months, 6months or year"),
    }
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    match DateRange::parse(args) {
        Some(range) => {
            app.filter.range = range;
            app.screen = Screen::Transactions;
            app.apply_filters();
            app.set_status(format!("Showing: {range}"));
        }
        None => app.set_status("Range must be all, today, week, month or year"),
    }
    Ok(())
}

fn cmd_type(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let kind = if args.is_empty() || args.eq_ignore_ascii_case("all") {
        None
    } else if let Some(kind) = TransactionType::parse(args) {
        Some(kind)
    } else {
        app.set_status("Type must be all, income or expense");
        return Ok(());
    };
    app.filter.kind = kind;
    app.screen = Screen::Transactions;
    app.apply_filters();
    app.set_status(match kind {
        Some(k) => format!("Type: {k}"),
        None => "Type: all".into(),
    });
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let category = if args.is_empty() || args.eq_ignore_ascii_case("all") {
        None
    } else if let Some(c) = Category::parse(args) {
        Some(c)
    } else {
        app.set_status(format!("Unknown category '{args}'"));
        return Ok(());
    };
    app.filter.category = category;
    app.screen = Screen::Transactions;
    app.apply_filters();
    app.set_status(match category {
        Some(c) => format!("Category: {c}"),
        None => "Category: all".into(),
    });
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.apply_filters();

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }
    Ok(())
}

fn cmd_currency(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Currency is '{}'", app.currency()));
        return Ok(());
    }
    let mut settings = app.settings.clone();
    settings.currency = args.to_string();
    db.save_settings(&settings)?;
    app.refresh_all(db)?;
    app.set_status(format!("Currency set to '{args}'"));
    Ok(())
}

fn cmd_theme(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let theme = if args.is_empty() {
        app.settings.theme.toggled()
    } else {
        Theme::parse(args)
    };
    let mut settings = app.settings.clone();
    settings.theme = theme;
    db.save_settings(&settings)?;
    app.refresh_all(db)?;
    app.set_status(format!("Theme: {}", theme.as_str()));
    Ok(())
}

fn cmd_pin(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut settings = app.settings.clone();
    if args.eq_ignore_ascii_case("off") {
        settings.pin_enabled = false;
        db.save_settings(&settings)?;
        app.refresh_all(db)?;
        app.set_status("PIN lock disabled");
        return Ok(());
    }
    if !crate::db::is_valid_pin(args) {
        app.set_status("PIN must be exactly 4 digits");
        return Ok(());
    }
    db.set_pin(args)?;
    settings.pin_enabled = true;
    db.save_settings(&settings)?;
    app.refresh_all(db)?;
    app.set_status("PIN lock enabled");
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let (first, rest) = args.split_once(' ').unwrap_or((args, ""));
    if first.eq_ignore_ascii_case("json") {
        return export_json(rest.trim(), app, db);
    }
    let path = if args.is_empty() {
        export::default_path(app.today)
    } else {
        std::path::PathBuf::from(crate::run::shellexpand(args))
    };
    match export::export_to_path(&path, &app.visible_transactions) {
        Ok(0) => app.set_status("No transactions to export"),
        Ok(n) => app.set_status(format!("Exported {n} transactions to {}", path.display())),
        Err(e) => app.set_status(format!("Export failed: {e}")),
    }
    Ok(())
}

fn export_json(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        backup::default_path(app.today)
    } else {
        std::path::PathBuf::from(crate::run::shellexpand(args))
    };
    match backup::backup_to_path(&path, db) {
        Ok(written) => app.set_status(format!(
            "Backed up {} transactions and {} budgets to {}",
            written.transactions.len(),
            written.budgets.len(),
            path.display()
        )),
        Err(e) => app.set_status(format!("Backup failed: {e}")),
    }
    Ok(())
}

fn cmd_clear_all(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.confirm_message = "Delete ALL transactions, budgets and settings?".into();
    app.pending_action = Some(PendingAction::ClearAllData);
    app.input_mode = InputMode::Confirm;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
