use anyhow::Result;
use chrono::NaiveDate;

use crate::aggregate::{self, DateRange, TransactionFilter};
use crate::budgets::{BudgetEngine, BudgetLine};
use crate::db::Database;
use crate::models::*;
use crate::report::{ReportBuilder, ReportPeriod};
use crate::ui::theme::{self, Palette};
use crate::ui::util::clamp_cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Budgets,
    Reports,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Budgets,
            Self::Reports,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Budgets => write!(f, "Budgets"),
            Self::Reports => write!(f, "Reports"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
    Locked,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
            Self::Locked => write!(f, "LOCKED"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
    DeleteBudget { id: i64, name: String },
    ClearAllData,
}

/// Source of the current local date.
pub(crate) type Clock = fn() -> NaiveDate;

pub(crate) fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,
    clock: Clock,
    pub(crate) settings: Settings,

    // Lock screen
    pub(crate) pin_input: String,

    // Store snapshot, insertion order
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) budgets: Vec<Budget>,

    // Transactions screen
    pub(crate) filter: TransactionFilter,
    pub(crate) visible_transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Budgets screen
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Reports screen
    pub(crate) report_period: ReportPeriod,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(clock: Clock, settings: Settings) -> Self {
        let input_mode = if settings.pin_enabled {
            InputMode::Locked
        } else {
            InputMode::Normal
        };
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today: clock(),
            clock,
            settings,

            pin_input: String::new(),

            transactions: Vec::new(),
            budgets: Vec::new(),

            filter: TransactionFilter::default(),
            visible_transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,

            budget_index: 0,
            budget_scroll: 0,

            report_period: ReportPeriod::Month,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.input_mode == InputMode::Locked
    }

    pub(crate) fn palette(&self) -> &'static Palette {
        theme::palette(self.settings.theme)
    }

    pub(crate) fn currency(&self) -> &str {
        &self.settings.currency
    }

    /// Re-reads the clock and re-applies the date-dependent filters when the
    /// day has changed. Returns whether it did.
    pub(crate) fn sync_today(&mut self) -> bool {
        let now = (self.clock)();
        if now == self.today {
            return false;
        }
        self.today = now;
        self.apply_filters();
        let budget_count = self.budget_lines().len();
        clamp_cursor(&mut self.budget_index, &mut self.budget_scroll, budget_count);
        true
    }

    /// Reload every collection from the store. Called after each mutation.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.today = (self.clock)();
        self.settings = db.get_settings()?;
        self.transactions = db.list_transactions()?;
        self.budgets = db.list_budgets()?;
        self.apply_filters();
        let budget_count = self.budget_lines().len();
        clamp_cursor(&mut self.budget_index, &mut self.budget_scroll, budget_count);
        Ok(())
    }

    /// Recompute the transaction list from the filter state, newest first.
    pub(crate) fn apply_filters(&mut self) {
        self.filter.query = self.search_input.clone();
        let filtered = self.filter.apply(&self.transactions, self.today);
        self.visible_transactions = aggregate::sorted_by_date_desc(&filtered);
        clamp_cursor(
            &mut self.transaction_index,
            &mut self.transaction_scroll,
            self.visible_transactions.len(),
        );
    }

    pub(crate) fn cycle_date_range(&mut self) {
        let ranges = DateRange::all();
        let idx = ranges.iter().position(|r| *r == self.filter.range).unwrap_or(0);
        self.filter.range = ranges[(idx + 1) % ranges.len()];
        self.apply_filters();
    }

    pub(crate) fn cycle_type_filter(&mut self) {
        self.filter.kind = match self.filter.kind {
            None => Some(TransactionType::Income),
            Some(TransactionType::Income) => Some(TransactionType::Expense),
            Some(TransactionType::Expense) => None,
        };
        // Keep the category filter inside the new type's vocabulary
        if let (Some(kind), Some(category)) = (self.filter.kind, self.filter.category) {
            if !category.allowed_for(kind) {
                self.filter.category = None;
            }
        }
        self.apply_filters();
    }

    pub(crate) fn cycle_category_filter(&mut self) {
        let choices: &[Category] = match self.filter.kind {
            Some(kind) => Category::for_type(kind),
            None => Category::all(),
        };
        self.filter.category = match self.filter.category {
            None => choices.first().copied(),
            Some(current) => choices
                .iter()
                .position(|c| *c == current)
                .and_then(|i| choices.get(i + 1))
                .copied(),
        };
        self.apply_filters();
    }

    pub(crate) fn budget_engine(&self) -> BudgetEngine<'_> {
        BudgetEngine::new(&self.transactions, &self.budgets, self.today)
    }

    pub(crate) fn budget_lines(&self) -> Vec<BudgetLine> {
        self.budget_engine().overview()
    }

    pub(crate) fn report(&self) -> ReportBuilder<'_> {
        ReportBuilder::new(&self.transactions, self.report_period, self.today)
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.visible_transactions.get(self.transaction_index)
    }

    pub(crate) fn transaction_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn budget_page(&self) -> usize {
        self.visible_rows.saturating_sub(2).max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
