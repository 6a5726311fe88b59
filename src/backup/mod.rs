use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::db::Database;
use crate::models::{Budget, Settings, Transaction};

const TMP_SUFFIX: &str = "tmp";

/// Full-data snapshot: every transaction, every budget and the settings.
/// The PIN is never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Backup {
    pub transactions: Vec<TransactionRecord>,
    pub budgets: Vec<BudgetRecord>,
    pub settings: SettingsRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TransactionRecord {
    pub id: Option<i64>,
    pub description: String,
    /// Signed decimal string, e.g. `"-42.50"`.
    pub amount: String,
    pub category: String,
    pub date: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BudgetRecord {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub amount: String,
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SettingsRecord {
    pub currency: String,
    pub theme: String,
    pub pin_enabled: bool,
}

impl From<&Transaction> for TransactionRecord {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: txn.id,
            description: txn.description.clone(),
            amount: txn.amount.to_string(),
            category: txn.category.as_str().to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            timestamp: txn.timestamp.clone(),
        }
    }
}

impl From<&Budget> for BudgetRecord {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id,
            kind: budget.target.type_str().to_string(),
            category: budget.target.category_str().to_string(),
            amount: budget.amount.to_string(),
            month: budget.month.clone(),
        }
    }
}

impl From<&Settings> for SettingsRecord {
    fn from(settings: &Settings) -> Self {
        Self {
            currency: settings.currency.clone(),
            theme: settings.theme.as_str().to_string(),
            pin_enabled: settings.pin_enabled,
        }
    }
}

impl Backup {
    pub(crate) fn new(transactions: &[Transaction], budgets: &[Budget], settings: &Settings) -> Self {
        Self {
            transactions: transactions.iter().map(TransactionRecord::from).collect(),
            budgets: budgets.iter().map(BudgetRecord::from).collect(),
            settings: SettingsRecord::from(settings),
        }
    }

    pub(crate) fn collect(db: &Database) -> Result<Self> {
        Ok(Self::new(
            &db.list_transactions()?,
            &db.list_budgets()?,
            &db.get_settings()?,
        ))
    }
}

/// `finsavvy-data-YYYY-MM-DD.json` in the current directory.
pub(crate) fn default_path(today: NaiveDate) -> PathBuf {
    PathBuf::from(format!("finsavvy-data-{}.json", today.format("%Y-%m-%d")))
}

/// Pretty-printed JSON with a trailing newline.
pub(crate) fn write_json<W: Write>(mut writer: W, backup: &Backup) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, backup).context("Failed to serialize backup")?;
    writer.write_all(b"\n").context("Failed to write backup")?;
    writer.flush().context("Failed to flush backup")?;
    Ok(())
}

/// Writes the full snapshot of `db` to a temporary sibling of `path`,
/// then renames it into place.
pub(crate) fn backup_to_path(path: &Path, db: &Database) -> Result<Backup> {
    let backup = Backup::collect(db)?;
    let tmp = tmp_path(path);
    let file =
        fs::File::create(&tmp).with_context(|| format!("Failed to create {}", tmp.display()))?;
    write_json(file, &backup)?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        path = %path.display(),
        transactions = backup.transactions.len(),
        budgets = backup.budgets.len(),
        "wrote data backup"
    );
    Ok(backup)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(TMP_SUFFIX);
    path.with_file_name(name)
}
