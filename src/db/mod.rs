mod schema;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::models::*;

static MONTH_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").ok());
static PIN_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").ok());

const DATE_FORMAT: &str = "%Y-%m-%d";
const TXN_COLUMNS: &str = "id, description, amount, category, date, timestamp";

/// `YYYY-MM` with a real month number.
pub(crate) fn is_valid_month(month: &str) -> bool {
    MONTH_RE.as_ref().is_some_and(|re| re.is_match(month))
}

/// Four ASCII digits.
pub(crate) fn is_valid_pin(pin: &str) -> bool {
    PIN_RE.as_ref().is_some_and(|re| re.is_match(pin))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}

/// A user-entered magnitude such as `1,250.00` or `$42`. Must be positive;
/// the transaction type supplies the sign.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    let amount = Decimal::from_str(&cleaned)
        .with_context(|| format!("Invalid amount '{s}'"))?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be greater than zero");
    }
    Ok(amount)
}

pub(crate) struct Database {
    conn: Connection,
}

struct TransactionRow {
    id: i64,
    description: String,
    amount: String,
    category: String,
    date: String,
    timestamp: String,
}

impl TransactionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            description: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            date: row.get(4)?,
            timestamp: row.get(5)?,
        })
    }

    fn into_model(self) -> Result<Transaction> {
        let id = self.id;
        let amount = Decimal::from_str(&self.amount)
            .with_context(|| format!("Transaction {id}: invalid amount '{}'", self.amount))?;
        let category = Category::parse(&self.category)
            .ok_or_else(|| anyhow!("Transaction {id}: unknown category '{}'", self.category))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .with_context(|| format!("Transaction {id}: invalid date '{}'", self.date))?;
        Ok(Transaction {
            id: Some(id),
            description: self.description,
            amount,
            category,
            date,
            timestamp: self.timestamp,
        })
    }
}

struct BudgetRow {
    id: i64,
    kind: String,
    category: String,
    amount: String,
    month: String,
}

impl BudgetRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            category: row.get(2)?,
            amount: row.get(3)?,
            month: row.get(4)?,
        })
    }

    fn into_model(self) -> Result<Budget> {
        let id = self.id;
        let target = BudgetTarget::from_columns(&self.kind, &self.category).ok_or_else(|| {
            anyhow!(
                "Budget {id}: unknown target '{}'/'{}'",
                self.kind,
                self.category
            )
        })?;
        let amount = Decimal::from_str(&self.amount)
            .with_context(|| format!("Budget {id}: invalid amount '{}'", self.amount))?;
        let budget = Budget {
            id: Some(id),
            target,
            amount,
            month: self.month,
        };
        validate_budget(&budget).with_context(|| format!("Budget {id}"))?;
        Ok(budget)
    }
}

fn validate_transaction(txn: &Transaction) -> Result<()> {
    if txn.description.trim().is_empty() {
        bail!("Transaction description must not be empty");
    }
    Ok(())
}

fn validate_budget(budget: &Budget) -> Result<()> {
    if budget.amount <= Decimal::ZERO {
        bail!("Budget amount must be positive, got {}", budget.amount);
    }
    if !is_valid_month(&budget.month) {
        bail!("Invalid budget month '{}', expected YYYY-MM", budget.month);
    }
    Ok(())
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            debug!(version = schema::CURRENT_VERSION, "schema created");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(
                from = current,
                to = schema::CURRENT_VERSION,
                "schema migrated"
            );
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        validate_transaction(txn)?;
        self.conn.execute(
            "INSERT INTO transactions (description, amount, category, date, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.description.trim(),
                txn.amount.to_string(),
                txn.category.as_str(),
                txn.date.format(DATE_FORMAT).to_string(),
                txn.timestamp,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, amount = %txn.amount, category = txn.category.as_str(), "transaction added");
        Ok(id)
    }

    /// Replaces every field except the id and stamps a fresh timestamp.
    /// Returns false when no transaction has that id.
    pub(crate) fn update_transaction(&self, id: i64, txn: &Transaction) -> Result<bool> {
        validate_transaction(txn)?;
        let changed = self.conn.execute(
            "UPDATE transactions
             SET description = ?1, amount = ?2, category = ?3, date = ?4, timestamp = ?5
             WHERE id = ?6",
            params![
                txn.description.trim(),
                txn.amount.to_string(),
                txn.category.as_str(),
                txn.date.format(DATE_FORMAT).to_string(),
                chrono::Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if changed > 0 {
            info!(id, "transaction updated");
        }
        Ok(changed > 0)
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(id, "transaction deleted");
        }
        Ok(changed > 0)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id = ?1", TXN_COLUMNS),
                params![id],
                TransactionRow::from_row,
            )
            .optional()?;
        row.map(TransactionRow::into_model).transpose()
    }

    /// All transactions in insertion order.
    pub(crate) fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM transactions ORDER BY id", TXN_COLUMNS))?;
        let rows = stmt.query_map([], TransactionRow::from_row)?;
        rows.map(|r| {
            r.map_err(anyhow::Error::from)
                .and_then(TransactionRow::into_model)
        })
        .collect()
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        validate_budget(budget)?;
        self.conn.execute(
            "INSERT INTO budgets (type, category, amount, month) VALUES (?1, ?2, ?3, ?4)",
            params![
                budget.target.type_str(),
                budget.target.category_str(),
                budget.amount.to_string(),
                budget.month,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, target = budget.target.category_str(), month = %budget.month, "budget added");
        Ok(id)
    }

    /// Replaces the effective (first) budget for the same target and month,
    /// or inserts one when none exists. Returns the row id.
    pub(crate) fn set_budget(&self, budget: &Budget) -> Result<i64> {
        let existing = self
            .list_budgets()?
            .into_iter()
            .find(|b| b.target == budget.target && b.month == budget.month)
            .and_then(|b| b.id);
        match existing {
            Some(id) => {
                self.update_budget(id, budget)?;
                Ok(id)
            }
            None => self.insert_budget(budget),
        }
    }

    pub(crate) fn update_budget(&self, id: i64, budget: &Budget) -> Result<bool> {
        validate_budget(budget)?;
        let changed = self.conn.execute(
            "UPDATE budgets SET type = ?1, category = ?2, amount = ?3, month = ?4 WHERE id = ?5",
            params![
                budget.target.type_str(),
                budget.target.category_str(),
                budget.amount.to_string(),
                budget.month,
                id,
            ],
        )?;
        if changed > 0 {
            info!(id, "budget updated");
        }
        Ok(changed > 0)
    }

    pub(crate) fn delete_budget(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(id, "budget deleted");
        }
        Ok(changed > 0)
    }

    /// All budgets in insertion order.
    pub(crate) fn list_budgets(&self) -> Result<Vec<Budget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, type, category, amount, month FROM budgets ORDER BY id")?;
        let rows = stmt.query_map([], BudgetRow::from_row)?;
        rows.map(|r| r.map_err(anyhow::Error::from).and_then(BudgetRow::into_model))
            .collect()
    }

    // ── Settings ──────────────────────────────────────────────

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    pub(crate) fn get_settings(&self) -> Result<Settings> {
        let defaults = Settings::default();
        Ok(Settings {
            currency: self.get_setting("currency")?.unwrap_or(defaults.currency),
            theme: self
                .get_setting("theme")?
                .map(|t| Theme::parse(&t))
                .unwrap_or(defaults.theme),
            pin_enabled: self
                .get_setting("pin_enabled")?
                .map(|v| v == "1")
                .unwrap_or(defaults.pin_enabled),
        })
    }

    pub(crate) fn save_settings(&self, settings: &Settings) -> Result<()> {
        if settings.currency.trim().is_empty() {
            bail!("Currency symbol must not be empty");
        }
        if settings.pin_enabled && self.get_pin()?.is_none() {
            bail!("Set a PIN before enabling the PIN lock");
        }
        self.set_setting("currency", settings.currency.trim())?;
        self.set_setting("theme", settings.theme.as_str())?;
        self.set_setting("pin_enabled", if settings.pin_enabled { "1" } else { "0" })?;
        debug!(?settings, "settings saved");
        Ok(())
    }

    pub(crate) fn set_pin(&self, pin: &str) -> Result<()> {
        if !is_valid_pin(pin) {
            bail!("PIN must be exactly 4 digits");
        }
        self.set_setting("pin", pin)?;
        info!("pin changed");
        Ok(())
    }

    pub(crate) fn get_pin(&self) -> Result<Option<String>> {
        self.get_setting("pin")
    }

    pub(crate) fn verify_pin(&self, candidate: &str) -> Result<bool> {
        let ok = self.get_pin()?.is_some_and(|pin| pin == candidate);
        if !ok {
            warn!("pin verification failed");
        }
        Ok(ok)
    }

    /// Removes transactions, budgets, settings and the PIN.
    pub(crate) fn clear_all_data(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transactions", [])?;
        tx.execute("DELETE FROM budgets", [])?;
        tx.execute("DELETE FROM settings", [])?;
        tx.commit()?;
        warn!("all data cleared");
        Ok(())
    }
}
