// 🧾 Transaction - Canonical record consumed by every engine
// Records are read-only snapshots; storage and import live outside this crate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION TYPE
// ============================================================================

/// Classification of a transaction, independent of the sign of its amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Transfer => "transfer",
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// A single ledger row.
///
/// `amount` follows the sign convention of its `source` (see
/// [`crate::sources::SourcePolicy`]); nothing here normalizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable identity, never reused after deletion
    #[serde(default = "default_id")]
    pub id: String,

    /// ISO date, `YYYY-MM-DD`
    pub date: String,

    #[serde(default)]
    pub description: String,

    pub amount: f64,

    #[serde(default)]
    pub category: String,

    /// Informational only
    #[serde(default)]
    pub merchant: String,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Origin system (e.g. "AMEX", "WS", "Manual")
    #[serde(default)]
    pub source: String,
}

fn default_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Transaction {
    pub fn new(
        id: &str,
        date: &str,
        description: &str,
        amount: f64,
        category: &str,
        kind: TransactionType,
        source: &str,
    ) -> Self {
        Transaction {
            id: id.to_string(),
            date: date.to_string(),
            description: description.to_string(),
            amount,
            category: category.to_string(),
            merchant: String::new(),
            kind,
            source: source.to_string(),
        }
    }

    /// Builder-style merchant setter
    pub fn with_merchant(mut self, merchant: &str) -> Self {
        self.merchant = merchant.to_string();
        self
    }

    /// Month key (`YYYY-MM`), or `None` if the date is too short
    pub fn month(&self) -> Option<&str> {
        self.date.get(0..7)
    }

    /// Year key (`YYYY`)
    pub fn year(&self) -> Option<&str> {
        self.date.get(0..4)
    }

    /// Parse the leading `YYYY-MM-DD` of the date field
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let day = self.date.get(0..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Usable for aggregation: parsable date and a finite amount.
    /// Malformed rows are skipped by the engines instead of failing the run.
    pub fn is_well_formed(&self) -> bool {
        self.amount.is_finite() && self.parsed_date().is_some()
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

// ============================================================================
// TESTS
// ============================================================================
