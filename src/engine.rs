// 🧮 Insight Engine - One entry point over a transaction snapshot
// Holds the configuration, the matcher and its cache. Every report is a pure
// function of (snapshot, matched ids, configuration).

use crate::cache::{CacheStats, MatchCache};
use crate::category::{CategoryAggregator, CategoryShare};
use crate::config::EngineConfig;
use crate::matcher::{MatchedIds, RefundPair, TransactionMatcher};
use crate::special::{SpecialCategoryCalculator, SpecialTotals};
use crate::transaction::Transaction;
use crate::trend::{available_months, MonthlyNet, TrendAggregator};
use crate::yearly::{YearDrillDown, YearMetric, YearlyAggregator, YearlySummary};
use tracing::debug;

/// Reports over a snapshot, sharing one memoized matched-id set
///
/// Example:
/// ```
/// use spend_insight::{InsightEngine, Transaction, TransactionType};
///
/// let transactions = vec![
///     Transaction::new("a", "2024-03-01", "Coffee Shop", 5.0, "Food", TransactionType::Expense, "AMEX"),
///     Transaction::new("b", "2024-03-09", "Coffee Shop", -5.0, "Food", TransactionType::Expense, "AMEX"),
///     Transaction::new("c", "2024-03-10", "Grocer", -40.0, "Food", TransactionType::Expense, "WS"),
/// ];
///
/// let mut engine = InsightEngine::default();
/// assert_eq!(engine.matched_ids(&transactions).len(), 2);
///
/// let shares = engine.category_breakdown(&transactions, "2024-03");
/// assert_eq!(shares[0].amount, 40.0);
/// ```
pub struct InsightEngine {
    config: EngineConfig,
    matcher: TransactionMatcher,
    cache: MatchCache,
    categories: CategoryAggregator,
    trend: TrendAggregator,
    yearly: YearlyAggregator,
    special: SpecialCategoryCalculator,
}

impl InsightEngine {
    pub fn new(config: EngineConfig) -> Self {
        let special_exclusion = config.special_exclusion();

        let mut yearly =
            YearlyAggregator::with_special(config.excluded_categories.clone(), special_exclusion);
        yearly.max_bar_width_percent = config.max_bar_width_percent;

        InsightEngine {
            matcher: TransactionMatcher::new(config.sources.clone()),
            cache: MatchCache::new(),
            categories: CategoryAggregator::with_top_count(config.sources.clone(), config.top_category_count),
            trend: TrendAggregator::new(config.excluded_categories.clone()),
            yearly,
            special: SpecialCategoryCalculator::new(&config.tuition_category, config.large_gift_threshold),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Matched ids for this snapshot (memoized by content)
    pub fn matched_ids(&mut self, transactions: &[Transaction]) -> &MatchedIds {
        self.cache.get_or_compute(&self.matcher, transactions)
    }

    /// The pairs themselves, for display. Not cached.
    pub fn refund_pairs(&self, transactions: &[Transaction]) -> Vec<RefundPair> {
        self.matcher.find_pairs(transactions)
    }

    /// Call whenever the underlying snapshot is replaced
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Months for the month picker, newest first
    pub fn months(&self, transactions: &[Transaction]) -> Vec<String> {
        available_months(transactions, Some(self.config.recent_month_limit))
    }

    pub fn category_breakdown(&mut self, transactions: &[Transaction], month: &str) -> Vec<CategoryShare> {
        let matched = self.cache.get_or_compute(&self.matcher, transactions);
        let shares = self.categories.aggregate(
            transactions,
            month,
            matched,
            &self.config.breakdown_excluded_categories,
        );

        debug!(month, categories = shares.len(), "category breakdown");
        shares
    }

    pub fn category_transactions<'a>(
        &mut self,
        transactions: &'a [Transaction],
        month: &str,
        category: &str,
    ) -> Vec<&'a Transaction> {
        let matched = self.cache.get_or_compute(&self.matcher, transactions);
        self.categories.transactions_for(
            transactions,
            month,
            matched,
            &self.config.breakdown_excluded_categories,
            category,
        )
    }

    pub fn monthly_trend(&mut self, transactions: &[Transaction]) -> Vec<MonthlyNet> {
        let matched = self.cache.get_or_compute(&self.matcher, transactions);
        let special = self.config.special_exclusion();
        self.trend.monthly_net(transactions, matched, &special)
    }

    pub fn month_transactions<'a>(&mut self, transactions: &'a [Transaction], month: &str) -> Vec<&'a Transaction> {
        let matched = self.cache.get_or_compute(&self.matcher, transactions);
        let special = self.config.special_exclusion();
        self.trend.transactions_for_month(transactions, matched, &special, month)
    }

    pub fn yearly_summary(&mut self, transactions: &[Transaction]) -> YearlySummary {
        let matched = self.cache.get_or_compute(&self.matcher, transactions);
        self.yearly.summarize(transactions, matched)
    }

    pub fn year_transactions<'a>(
        &mut self,
        transactions: &'a [Transaction],
        year: &str,
        metric: YearMetric,
    ) -> YearDrillDown<'a> {
        let matched = self.cache.get_or_compute(&self.matcher, transactions);
        self.yearly.transactions_for(transactions, matched, year, metric)
    }

    pub fn special_totals<'a>(&mut self, transactions: &'a [Transaction]) -> SpecialTotals<'a> {
        let matched = self.cache.get_or_compute(&self.matcher, transactions);
        self.special.totals(transactions, matched)
    }

    pub fn label_for(&self, category: &str) -> &str {
        self.config.category_labels.label_for(category)
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
