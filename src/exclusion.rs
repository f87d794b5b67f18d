// 🚧 Exclusion Rules - Which rows stay out of trend and yearly figures
// One predicate value drives both a summary and its drill-down, so the two
// can never filter differently.

use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Decides whether a row is left out of an aggregate
pub trait ExclusionPredicate {
    fn excludes(&self, tx: &Transaction) -> bool;
}

impl<F> ExclusionPredicate for F
where
    F: Fn(&Transaction) -> bool,
{
    fn excludes(&self, tx: &Transaction) -> bool {
        self(tx)
    }
}

/// Excludes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusion;

impl ExclusionPredicate for NoExclusion {
    fn excludes(&self, _tx: &Transaction) -> bool {
        false
    }
}

// ============================================================================
// SPECIAL EXCLUSION
// ============================================================================

/// Tuition-like rows and large one-off gifts. These are surfaced by
/// [`crate::special::SpecialCategoryCalculator`] instead of being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialExclusion {
    pub tuition_category: Option<String>,

    /// Inclusive lower bound for a large gift
    pub large_gift_threshold: f64,
}

impl SpecialExclusion {
    pub fn new(tuition_category: &str, large_gift_threshold: f64) -> Self {
        SpecialExclusion {
            tuition_category: Some(tuition_category.to_string()),
            large_gift_threshold,
        }
    }

    /// Only the gift threshold, no tuition category
    pub fn gifts_only(large_gift_threshold: f64) -> Self {
        SpecialExclusion {
            tuition_category: None,
            large_gift_threshold,
        }
    }

    pub fn is_tuition(&self, tx: &Transaction) -> bool {
        self.tuition_category
            .as_deref()
            .is_some_and(|category| tx.category == category)
    }

    pub fn is_large_gift(&self, tx: &Transaction) -> bool {
        tx.is_income() && tx.amount >= self.large_gift_threshold
    }
}

impl ExclusionPredicate for SpecialExclusion {
    fn excludes(&self, tx: &Transaction) -> bool {
        self.is_tuition(tx) || self.is_large_gift(tx)
    }
}

// ============================================================================
// TESTS
// ============================================================================
