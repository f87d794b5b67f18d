// 🎓 Special Category Calculator - Tuition and large gifts, reported apart
// The mass that trend and yearly figures leave out is surfaced here.

use crate::exclusion::SpecialExclusion;
use crate::matcher::MatchedIds;
use crate::transaction::Transaction;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SpecialTotals<'a> {
    /// Σ |amount| of tuition-category rows
    pub tuition_total: f64,

    /// Σ amount of income rows at/above the gift threshold
    pub gifts_total: f64,

    /// Newest first
    pub tuition_transactions: Vec<&'a Transaction>,

    /// Newest first
    pub gift_transactions: Vec<&'a Transaction>,
}

#[derive(Debug, Clone)]
pub struct SpecialCategoryCalculator {
    pub rules: SpecialExclusion,
}

impl SpecialCategoryCalculator {
    pub fn new(tuition_category: &str, large_gift_threshold: f64) -> Self {
        SpecialCategoryCalculator {
            rules: SpecialExclusion::new(tuition_category, large_gift_threshold),
        }
    }

    pub fn totals<'a>(&self, transactions: &'a [Transaction], matched: &MatchedIds) -> SpecialTotals<'a> {
        let mut tuition_transactions = Vec::new();
        let mut gift_transactions = Vec::new();

        for tx in transactions
            .iter()
            .filter(|tx| tx.is_well_formed() && !matched.contains(&tx.id))
        {
            if self.rules.is_tuition(tx) {
                tuition_transactions.push(tx);
            }

            if self.rules.is_large_gift(tx) {
                gift_transactions.push(tx);
            }
        }

        // ISO dates sort lexicographically; stable for same-day rows
        tuition_transactions.sort_by(|a, b| b.date.cmp(&a.date));
        gift_transactions.sort_by(|a, b| b.date.cmp(&a.date));

        SpecialTotals {
            tuition_total: tuition_transactions.iter().map(|tx| tx.amount.abs()).sum(),
            gifts_total: gift_transactions.iter().map(|tx| tx.amount).sum(),
            tuition_transactions,
            gift_transactions,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
