// 🔍 Transaction Matcher - Detect charge/refund pairs
// A purchase and its later refund show up as two rows with the same
// description and the same absolute amount but opposite signs. Both rows are
// suppressed from spend totals and stay visible in raw listings.

use crate::sources::SourcePolicy;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ============================================================================
// MATCH KEY
// ============================================================================

/// `(abs(amount), lowercase-trimmed description)`.
/// Same description and amount on different dates is the refund signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchKey {
    magnitude_bits: u64,
    pub description: String,
}

impl MatchKey {
    pub fn for_transaction(tx: &Transaction) -> Self {
        MatchKey {
            // abs() folds -0.0 into 0.0, so equal magnitudes share bits
            magnitude_bits: tx.amount.abs().to_bits(),
            description: tx.description.trim().to_lowercase(),
        }
    }

    pub fn magnitude(&self) -> f64 {
        f64::from_bits(self.magnitude_bits)
    }
}

// ============================================================================
// MATCH POLICY
// ============================================================================

/// How rows sharing a key inside one sign bucket are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// The latest row in input order wins its bucket. With three rows on one
    /// key only a single pair is matched and the others stay unmatched.
    LastWriteWins,
}

// ============================================================================
// MATCH RESULTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPair {
    /// Positive-amount row
    pub charge_id: String,

    /// Negative-amount row
    pub refund_id: String,

    pub key: MatchKey,

    /// Human-readable reason
    pub reason: String,
}

/// Ids suppressed from spend totals. Always a subset of the input ids, and
/// every id arrives together with its partner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedIds(HashSet<String>);

impl MatchedIds {
    pub fn new() -> Self {
        MatchedIds(HashSet::new())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Ids in sorted order, for stable output
    pub fn sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.0.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn insert_pair(&mut self, pair: &RefundPair) {
        self.0.insert(pair.charge_id.clone());
        self.0.insert(pair.refund_id.clone());
    }
}

impl FromIterator<String> for MatchedIds {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        MatchedIds(iter.into_iter().collect())
    }
}

// ============================================================================
// TRANSACTION MATCHER
// ============================================================================

#[derive(Debug, Clone)]
pub struct TransactionMatcher {
    /// Which sources are scanned for pairs
    pub sources: SourcePolicy,

    pub policy: MatchPolicy,
}

impl TransactionMatcher {
    pub fn new(sources: SourcePolicy) -> Self {
        TransactionMatcher {
            sources,
            policy: MatchPolicy::LastWriteWins,
        }
    }

    /// Find all charge/refund pairs, ordered by the charge's input position
    pub fn find_pairs(&self, transactions: &[Transaction]) -> Vec<RefundPair> {
        let mut charges: HashMap<MatchKey, (usize, &Transaction)> = HashMap::new();
        let mut refunds: HashMap<MatchKey, &Transaction> = HashMap::new();

        for (index, tx) in transactions.iter().enumerate() {
            if !self.sources.is_pairable(&tx.source) {
                continue;
            }

            // Zero and non-finite amounts have no opposite-signed partner
            if !tx.amount.is_finite() || tx.amount == 0.0 {
                continue;
            }

            let key = MatchKey::for_transaction(tx);
            if tx.amount > 0.0 {
                charges.insert(key, (index, tx));
            } else {
                refunds.insert(key, tx);
            }
        }

        let mut matched: Vec<(usize, RefundPair)> = charges
            .into_iter()
            .filter_map(|(key, (index, charge))| {
                let refund = refunds.get(&key)?;
                Some((index, self.pair(key, charge, refund)))
            })
            .collect();

        matched.sort_by_key(|(index, _)| *index);
        matched.into_iter().map(|(_, pair)| pair).collect()
    }

    /// Ids of every row that belongs to a pair
    pub fn match_ids(&self, transactions: &[Transaction]) -> MatchedIds {
        let mut matched = MatchedIds::new();

        for pair in self.find_pairs(transactions) {
            debug!(
                charge = %pair.charge_id,
                refund = %pair.refund_id,
                "{}",
                pair.reason
            );
            matched.insert_pair(&pair);
        }

        matched
    }

    fn pair(&self, key: MatchKey, charge: &Transaction, refund: &Transaction) -> RefundPair {
        let reason = format!(
            "Refund pair: {} | ${:.2} ({}) ↔ ${:.2} ({})",
            key.description, charge.amount, charge.date, refund.amount, refund.date
        );

        RefundPair {
            charge_id: charge.id.clone(),
            refund_id: refund.id.clone(),
            key,
            reason,
        }
    }
}

impl Default for TransactionMatcher {
    fn default() -> Self {
        Self::new(SourcePolicy::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
