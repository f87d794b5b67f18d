// Spend Insight - Core Library
// Refund matching and spending aggregation over a transaction snapshot

pub mod transaction;
pub mod sources;     // Sign conventions and pairable sources
pub mod matcher;     // Charge/refund pair detection
pub mod cache;       // Matched-id memoization by content fingerprint
pub mod exclusion;   // Tuition / large-gift predicates
pub mod category;    // Monthly category breakdown
pub mod trend;       // Monthly net trend
pub mod yearly;      // Yearly income/expense/net
pub mod special;     // Tuition and large-gift totals
pub mod labels;      // Category → symbol lookup
pub mod config;
pub mod engine;
pub mod error;
pub mod snapshot;

// Re-export commonly used types
pub use transaction::{Transaction, TransactionType};
pub use sources::{SignConvention, SourcePolicy};
pub use matcher::{MatchKey, MatchPolicy, MatchedIds, RefundPair, TransactionMatcher};
pub use cache::{snapshot_fingerprint, CacheStats, MatchCache};
pub use exclusion::{ExclusionPredicate, NoExclusion, SpecialExclusion};
pub use category::{percentage_of, CategoryAggregator, CategoryShare, OTHERS_CATEGORY};
pub use trend::{available_months, format_month, MonthlyNet, TrendAggregator};
pub use yearly::{YearDrillDown, YearMetric, YearRow, YearTotals, YearlyAggregator, YearlySummary};
pub use special::{SpecialCategoryCalculator, SpecialTotals};
pub use labels::CategoryLabels;
pub use config::EngineConfig;
pub use engine::InsightEngine;
pub use error::{Error, Result};
pub use snapshot::{load_snapshot, Snapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
