// 📂 Snapshot Loading - Canonical transaction records from disk
// Reads this crate's own record layout (JSON array or CSV with matching
// headers). Rows that fail to deserialize are skipped and counted.

use crate::error::{Error, Result};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,

    /// Rows that could not be read
    pub skipped: usize,
}

/// Load by file extension (`.json` or `.csv`)
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let snapshot = match extension.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        _ => return Err(Error::UnsupportedSnapshot(path.display().to_string())),
    };

    info!(
        path = %path.display(),
        loaded = snapshot.transactions.len(),
        skipped = snapshot.skipped,
        "loaded transaction snapshot"
    );

    Ok(snapshot)
}

pub fn load_csv(path: &Path) -> Result<Snapshot> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut snapshot = Snapshot::default();

    for (line, result) in rdr.deserialize::<Transaction>().enumerate() {
        match result {
            Ok(tx) => snapshot.transactions.push(tx),
            Err(err) => {
                // +2: header row and 1-based lines
                warn!(line = line + 2, error = %err, "skipping unreadable CSV row");
                snapshot.skipped += 1;
            }
        }
    }

    fill_missing_ids(&mut snapshot.transactions);
    Ok(snapshot)
}

pub fn load_json(path: &Path) -> Result<Snapshot> {
    let content = fs::read_to_string(path)?;
    let rows: Vec<serde_json::Value> = serde_json::from_str(&content)?;
    let mut snapshot = Snapshot::default();

    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<Transaction>(row) {
            Ok(tx) => snapshot.transactions.push(tx),
            Err(err) => {
                warn!(index, error = %err, "skipping unreadable JSON record");
                snapshot.skipped += 1;
            }
        }
    }

    fill_missing_ids(&mut snapshot.transactions);
    Ok(snapshot)
}

/// CSV cells come through as empty strings rather than missing fields
fn fill_missing_ids(transactions: &mut [Transaction]) {
    for tx in transactions.iter_mut().filter(|tx| tx.id.trim().is_empty()) {
        tx.id = uuid::Uuid::new_v4().to_string();
    }
}

// ============================================================================
// TESTS
// ============================================================================
