// 🗃️ Match Cache - Memoized matched-id sets keyed by snapshot content
//
// The key is a SHA-256 fingerprint of everything the matcher reads, in input
// order, so a changed snapshot can never be served a stale set.
// `invalidate()` drops the entry explicitly when the caller knows the
// snapshot is gone.

use crate::matcher::{MatchedIds, TransactionMatcher};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone)]
struct CachedMatch {
    fingerprint: String,
    matched: MatchedIds,
}

#[derive(Debug, Clone, Default)]
pub struct MatchCache {
    entry: Option<CachedMatch>,
    stats: CacheStats,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matched ids for this snapshot, computed only when the fingerprint changed
    pub fn get_or_compute(
        &mut self,
        matcher: &TransactionMatcher,
        transactions: &[Transaction],
    ) -> &MatchedIds {
        let fingerprint = snapshot_fingerprint(matcher, transactions);
        let fresh = matches!(&self.entry, Some(cached) if cached.fingerprint == fingerprint);

        if fresh {
            self.stats.hits += 1;
            debug!(fingerprint = %short(&fingerprint), "match cache hit");
        } else {
            self.stats.misses += 1;
            debug!(
                fingerprint = %short(&fingerprint),
                rows = transactions.len(),
                "match cache miss, recomputing"
            );
            self.entry = None;
        }

        let entry = self.entry.get_or_insert_with(|| CachedMatch {
            matched: matcher.match_ids(transactions),
            fingerprint,
        });

        &entry.matched
    }

    /// Forget the cached set
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("match cache invalidated");
        }
    }

    pub fn is_warm(&self) -> bool {
        self.entry.is_some()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Content fingerprint of a snapshot as seen by `matcher`
pub fn snapshot_fingerprint(matcher: &TransactionMatcher, transactions: &[Transaction]) -> String {
    let mut hasher = Sha256::new();

    for source in &matcher.sources.pairable {
        hasher.update(source.as_bytes());
        hasher.update(b"\x1f");
    }
    hasher.update(b"\x1e");

    for tx in transactions {
        hasher.update(tx.id.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(tx.amount.to_bits().to_le_bytes());
        hasher.update(tx.description.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(tx.source.as_bytes());
        hasher.update(b"\x1e");
    }

    format!("{:x}", hasher.finalize())
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(0..12).unwrap_or(fingerprint)
}

// ============================================================================
// TESTS
// ============================================================================
