// 🏦 Source Policy - Sign conventions and refund pairing per origin system
//
// Ledgers disagree on signs:
// - "expense negative" sources (bank style): purchases < 0, refunds > 0
// - "expense positive" sources (card statements): charges > 0, refunds < 0
// Only some sources record a refund as a separate row matching its charge.

use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// SIGN CONVENTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    /// Expenses are stored as negative amounts
    ExpenseNegative,

    /// Expenses are stored as positive amounts
    ExpensePositive,
}

impl SignConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignConvention::ExpenseNegative => "expense_negative",
            SignConvention::ExpensePositive => "expense_positive",
        }
    }
}

// ============================================================================
// SOURCE POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePolicy {
    /// Sources known to emit charge/refund pairs
    pub pairable: BTreeSet<String>,

    /// Sign convention per source; unknown sources are expense-positive
    pub conventions: BTreeMap<String, SignConvention>,
}

impl SourcePolicy {
    /// Policy with the known sources of the ledger
    pub fn new() -> Self {
        let pairable = ["AMEX", "WS"].iter().map(|s| s.to_string()).collect();

        let mut conventions = BTreeMap::new();
        conventions.insert("AMEX".to_string(), SignConvention::ExpensePositive);
        conventions.insert("WS".to_string(), SignConvention::ExpenseNegative);
        conventions.insert("Manual".to_string(), SignConvention::ExpenseNegative);

        SourcePolicy { pairable, conventions }
    }

    /// Policy with no known sources at all
    pub fn empty() -> Self {
        SourcePolicy {
            pairable: BTreeSet::new(),
            conventions: BTreeMap::new(),
        }
    }

    pub fn with_pairable(mut self, source: &str) -> Self {
        self.pairable.insert(source.to_string());
        self
    }

    pub fn with_convention(mut self, source: &str, convention: SignConvention) -> Self {
        self.conventions.insert(source.to_string(), convention);
        self
    }

    pub fn is_pairable(&self, source: &str) -> bool {
        self.pairable.contains(source)
    }

    pub fn convention(&self, source: &str) -> SignConvention {
        self.conventions
            .get(source)
            .copied()
            .unwrap_or(SignConvention::ExpensePositive)
    }

    /// Positive "spent" magnitude of an expense, whatever the source's sign.
    /// A refund recorded under the expense type comes out negative.
    pub fn spent_magnitude(&self, tx: &Transaction) -> f64 {
        match self.convention(&tx.source) {
            SignConvention::ExpensePositive => tx.amount,
            SignConvention::ExpenseNegative => -tx.amount,
        }
    }
}

impl Default for SourcePolicy {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
