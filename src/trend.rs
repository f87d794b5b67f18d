// 📈 Trend Aggregator - Net cash flow per calendar month
//
// Net is the plain sum of raw amounts as stored. Mixed-source ledgers are
// allowed to partially cancel; the amounts are NOT renormalized here.

use crate::exclusion::ExclusionPredicate;
use crate::matcher::MatchedIds;
use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyNet {
    /// `YYYY-MM`
    pub month: String,
    pub net: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TrendAggregator {
    /// Categories removed from the trend entirely
    pub excluded_categories: BTreeSet<String>,
}

impl TrendAggregator {
    pub fn new(excluded_categories: BTreeSet<String>) -> Self {
        TrendAggregator { excluded_categories }
    }

    /// One entry per month present, oldest first
    pub fn monthly_net<P: ExclusionPredicate>(
        &self,
        transactions: &[Transaction],
        matched: &MatchedIds,
        special: &P,
    ) -> Vec<MonthlyNet> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

        for tx in transactions {
            if !self.qualifies(tx, matched, special) {
                continue;
            }

            if let Some(month) = tx.month() {
                *totals.entry(month).or_insert(0.0) += tx.amount;
            }
        }

        // BTreeMap order on YYYY-MM is chronological
        totals
            .into_iter()
            .map(|(month, net)| MonthlyNet {
                month: month.to_string(),
                net,
            })
            .collect()
    }

    /// Rows behind one month of [`Self::monthly_net`]; their amounts sum to its net
    pub fn transactions_for_month<'a, P: ExclusionPredicate>(
        &self,
        transactions: &'a [Transaction],
        matched: &MatchedIds,
        special: &P,
        month: &str,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|tx| tx.month() == Some(month) && self.qualifies(tx, matched, special))
            .collect()
    }

    fn qualifies<P: ExclusionPredicate>(&self, tx: &Transaction, matched: &MatchedIds, special: &P) -> bool {
        tx.is_well_formed()
            && !matched.contains(&tx.id)
            && !self.excluded_categories.contains(&tx.category)
            && !special.excludes(tx)
    }
}

// ============================================================================
// MONTH HELPERS
// ============================================================================

/// Distinct months present in the snapshot, newest first, optionally capped
pub fn available_months(transactions: &[Transaction], limit: Option<usize>) -> Vec<String> {
    let months: BTreeSet<&str> = transactions
        .iter()
        .filter(|tx| tx.is_well_formed())
        .filter_map(|tx| tx.month())
        .collect();

    months
        .into_iter()
        .rev()
        .take(limit.unwrap_or(usize::MAX))
        .map(str::to_string)
        .collect()
}

/// `"2024-03"` → `"March 2024"`
pub fn format_month(month: &str) -> Option<String> {
    let first_day = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()?;
    Some(first_day.format("%B %Y").to_string())
}

// ============================================================================
// TESTS
// ============================================================================
