use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::Transaction;

const HEADER: [&str; 5] = ["Date", "Description", "Category", "Type", "Amount"];

/// `finsavvy-export-YYYY-MM-DD.csv` in the current directory.
pub(crate) fn default_path(today: NaiveDate) -> PathBuf {
    PathBuf::from(format!("finsavvy-export-{}.csv", today.format("%Y-%m-%d")))
}

/// Writes header and rows, returning the row count. Amounts are
/// magnitudes; the sign is carried by the `Type` column.
pub(crate) fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER).context("Failed to write CSV header")?;
    for txn in transactions {
        wtr.write_record([
            txn.date.format("%Y-%m-%d").to_string(),
            txn.description.clone(),
            txn.category.as_str().to_string(),
            txn.kind().to_string(),
            format!("{:.2}", txn.abs_amount()),
        ])
        .context("Failed to write CSV record")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(transactions.len())
}

/// Exports to `path`. An empty list creates no file.
pub(crate) fn export_to_path(path: &Path, transactions: &[Transaction]) -> Result<usize> {
    if transactions.is_empty() {
        info!(path = %path.display(), "nothing to export");
        return Ok(0);
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let rows = write_csv(file, transactions)?;
    info!(path = %path.display(), rows, "exported transactions");
    Ok(rows)
}

#[cfg(test)]
mod tests;
