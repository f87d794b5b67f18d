// 🥧 Category Aggregator - Monthly spend per category
//
// For one month: expense rows that are neither matched nor in an excluded
// category, normalized to a positive spent magnitude per source convention,
// summed per category. Small categories fold into "Others".

use crate::matcher::MatchedIds;
use crate::sources::SourcePolicy;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label of the synthetic bucket holding folded categories
pub const OTHERS_CATEGORY: &str = "Others";

/// Number of categories shown individually by default
pub const DEFAULT_TOP_CATEGORY_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,

    /// Spent magnitude
    pub amount: f64,

    /// Share of the month's total, one decimal place, within [0, 100]
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct CategoryAggregator {
    /// Categories shown before folding the rest into "Others"
    pub top_category_count: usize,

    pub sources: SourcePolicy,
}

impl CategoryAggregator {
    pub fn new(sources: SourcePolicy) -> Self {
        CategoryAggregator {
            top_category_count: DEFAULT_TOP_CATEGORY_COUNT,
            sources,
        }
    }

    pub fn with_top_count(sources: SourcePolicy, top_category_count: usize) -> Self {
        CategoryAggregator {
            top_category_count,
            sources,
        }
    }

    /// Category breakdown for `month` (`YYYY-MM`), largest first, "Others" last
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        month: &str,
        matched: &MatchedIds,
        excluded: &BTreeSet<String>,
    ) -> Vec<CategoryShare> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

        for tx in transactions
            .iter()
            .filter(|tx| self.qualifies(tx, month, matched, excluded))
        {
            *totals.entry(tx.category.as_str()).or_insert(0.0) += self.sources.spent_magnitude(tx);
        }

        let total: f64 = totals.values().sum();

        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|(category, amount)| CategoryShare {
                category: category.to_string(),
                amount,
                percentage: percentage_of(amount, total),
            })
            .collect();

        // Ties broken by name so the order never depends on hashing
        shares.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });

        if shares.len() > self.top_category_count {
            let folded = shares.split_off(self.top_category_count);
            let others_amount: f64 = folded.iter().map(|share| share.amount).sum();

            shares.push(CategoryShare {
                category: OTHERS_CATEGORY.to_string(),
                amount: others_amount,
                percentage: percentage_of(others_amount, total),
            });
        }

        shares
    }

    /// Rows behind one entry of [`Self::aggregate`]. For "Others" these are
    /// the qualifying rows whose category is not shown individually.
    pub fn transactions_for<'a>(
        &self,
        transactions: &'a [Transaction],
        month: &str,
        matched: &MatchedIds,
        excluded: &BTreeSet<String>,
        category: &str,
    ) -> Vec<&'a Transaction> {
        let qualifying = transactions
            .iter()
            .filter(|tx| self.qualifies(tx, month, matched, excluded));

        if category != OTHERS_CATEGORY {
            return qualifying.filter(|tx| tx.category == category).collect();
        }

        let shares = self.aggregate(transactions, month, matched, excluded);
        let shown: BTreeSet<&str> = shares
            .iter()
            .filter(|share| share.category != OTHERS_CATEGORY)
            .map(|share| share.category.as_str())
            .collect();

        // Nothing was folded
        if shares.len() <= self.top_category_count {
            return Vec::new();
        }

        qualifying
            .filter(|tx| !shown.contains(tx.category.as_str()))
            .collect()
    }

    fn qualifies(
        &self,
        tx: &Transaction,
        month: &str,
        matched: &MatchedIds,
        excluded: &BTreeSet<String>,
    ) -> bool {
        tx.is_expense()
            && tx.is_well_formed()
            && tx.month() == Some(month)
            && !excluded.contains(&tx.category)
            && !matched.contains(&tx.id)
    }
}

impl Default for CategoryAggregator {
    fn default() -> Self {
        Self::new(SourcePolicy::default())
    }
}

/// `amount / total` as a percentage rounded to one decimal, clamped to
/// [0, 100]. A zero or non-finite total yields 0.
pub fn percentage_of(amount: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() || !amount.is_finite() {
        return 0.0;
    }

    let percentage = (amount / total * 1000.0).round() / 10.0;
    percentage.clamp(0.0, 100.0)
}

// ============================================================================
// TESTS
// ============================================================================
