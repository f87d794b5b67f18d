// 📅 Yearly Aggregator - Income, expense and net per year
//
// Formula per year:
//   income  = Σ amount  of income rows with amount > 0
//   expense = Σ -amount of expense rows (stored as a positive magnitude)
//   net     = income - expense
//
// Bar widths scale each metric against its largest year. Drill-downs reuse
// the exact row filter, so a cell always equals the sum over its rows.

use crate::exclusion::{ExclusionPredicate, SpecialExclusion};
use crate::matcher::MatchedIds;
use crate::transaction::{Transaction, TransactionType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Widest bar, as a percentage of the available width
pub const DEFAULT_MAX_BAR_WIDTH_PERCENT: f64 = 90.0;

// ============================================================================
// METRIC
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearMetric {
    Income,
    Expense,
    Net,
}

impl YearMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            YearMetric::Income => "income",
            YearMetric::Expense => "expense",
            YearMetric::Net => "net",
        }
    }

    /// Does this row feed the metric?
    pub fn includes(&self, tx: &Transaction) -> bool {
        let positive_income = tx.is_income() && tx.amount > 0.0;

        match self {
            YearMetric::Income => positive_income,
            YearMetric::Expense => tx.is_expense(),
            YearMetric::Net => positive_income || tx.is_expense(),
        }
    }

    /// Signed amount this row adds to the metric's cell
    pub fn contribution(&self, tx: &Transaction) -> f64 {
        match self {
            YearMetric::Expense => -tx.amount,
            YearMetric::Income | YearMetric::Net => tx.amount,
        }
    }
}

impl fmt::Display for YearMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(YearMetric::Income),
            "expense" | "expenses" => Ok(YearMetric::Expense),
            "net" => Ok(YearMetric::Net),
            other => Err(format!("Unknown metric: {} (expected income, expense or net)", other)),
        }
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    /// `YYYY`
    pub year: String,
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub income_percent: f64,
    pub expense_percent: f64,
    pub net_percent: f64,
}

/// Column-wise sums across all years
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct YearTotals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    /// Newest year first
    pub rows: Vec<YearRow>,
    pub totals: YearTotals,
}

impl YearlySummary {
    pub fn row(&self, year: &str) -> Option<&YearRow> {
        self.rows.iter().find(|row| row.year == year)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearDrillDown<'a> {
    pub year: String,
    pub metric: YearMetric,
    pub transactions: Vec<&'a Transaction>,

    /// Sum of the metric contributions; equals the summary cell
    pub total: f64,
}

// ============================================================================
// YEARLY AGGREGATOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct YearlyAggregator {
    pub excluded_categories: BTreeSet<String>,

    /// Tuition and large gifts
    pub special: SpecialExclusion,

    pub max_bar_width_percent: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct YearAccumulator {
    income: f64,
    expense: f64,
}

impl YearlyAggregator {
    /// Excludes `excluded_categories` and income at/above `large_gift_threshold`
    pub fn new(excluded_categories: BTreeSet<String>, large_gift_threshold: f64) -> Self {
        YearlyAggregator {
            excluded_categories,
            special: SpecialExclusion::gifts_only(large_gift_threshold),
            max_bar_width_percent: DEFAULT_MAX_BAR_WIDTH_PERCENT,
        }
    }

    pub fn with_special(excluded_categories: BTreeSet<String>, special: SpecialExclusion) -> Self {
        YearlyAggregator {
            excluded_categories,
            special,
            max_bar_width_percent: DEFAULT_MAX_BAR_WIDTH_PERCENT,
        }
    }

    pub fn summarize(&self, transactions: &[Transaction], matched: &MatchedIds) -> YearlySummary {
        let mut years: BTreeMap<&str, YearAccumulator> = BTreeMap::new();

        for tx in transactions.iter().filter(|tx| self.qualifies(tx, matched)) {
            let Some(year) = tx.year() else { continue };
            let acc = years.entry(year).or_default();

            match tx.kind {
                TransactionType::Income => {
                    if tx.amount > 0.0 {
                        acc.income += tx.amount;
                    }
                }
                TransactionType::Expense => acc.expense -= tx.amount,
                TransactionType::Transfer => {}
            }
        }

        let max_income = years.values().map(|acc| acc.income).fold(1.0, f64::max);
        let max_expense = years.values().map(|acc| acc.expense).fold(1.0, f64::max);
        let max_abs_net = years
            .values()
            .map(|acc| (acc.income - acc.expense).abs())
            .fold(1.0, f64::max);

        let mut totals = YearTotals::default();

        let rows: Vec<YearRow> = years
            .into_iter()
            .rev()
            .map(|(year, acc)| {
                let net = acc.income - acc.expense;

                totals.income += acc.income;
                totals.expense += acc.expense;
                totals.net += net;

                YearRow {
                    year: year.to_string(),
                    income: acc.income,
                    expense: acc.expense,
                    net,
                    income_percent: self.bar_width(acc.income, max_income),
                    expense_percent: self.bar_width(acc.expense, max_expense),
                    net_percent: self.bar_width(net.abs(), max_abs_net),
                }
            })
            .collect();

        YearlySummary { rows, totals }
    }

    /// Rows behind one summary cell
    pub fn transactions_for<'a>(
        &self,
        transactions: &'a [Transaction],
        matched: &MatchedIds,
        year: &str,
        metric: YearMetric,
    ) -> YearDrillDown<'a> {
        let rows: Vec<&'a Transaction> = transactions
            .iter()
            .filter(|tx| tx.year() == Some(year) && self.qualifies(tx, matched) && metric.includes(tx))
            .collect();

        let total = rows.iter().map(|tx| metric.contribution(tx)).sum();

        YearDrillDown {
            year: year.to_string(),
            metric,
            transactions: rows,
            total,
        }
    }

    fn qualifies(&self, tx: &Transaction, matched: &MatchedIds) -> bool {
        tx.is_well_formed()
            && !matched.contains(&tx.id)
            && !self.excluded_categories.contains(&tx.category)
            && !self.special.excludes(tx)
    }

    fn bar_width(&self, value: f64, max: f64) -> f64 {
        let width = value / max * self.max_bar_width_percent;
        if width.is_finite() {
            width.clamp(0.0, self.max_bar_width_percent)
        } else {
            0.0
        }
    }
}

impl Default for YearlyAggregator {
    fn default() -> Self {
        Self::new(BTreeSet::new(), f64::INFINITY)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_transaction(id: &str, date: &str, amount: f64, category: &str, kind: TransactionType) -> Transaction {
        Transaction::new(id, date, "Test", amount, category, kind, "WS")
    }

    fn excluded() -> BTreeSet<String> {
        ["Credit Card Payment", "Transfers", "Tuition", "Gifts"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            create_test_transaction("s23", "2023-06-01", 2000.0, "Income", TransactionType::Income),
            create_test_transaction("r23", "2023-06-03", -1500.0, "Housing", TransactionType::Expense),
            create_test_transaction("s24", "2024-01-01", 3000.0, "Income", TransactionType::Income),
            create_test_transaction("gift", "2024-02-01", 5000.0, "Income", TransactionType::Income),
            create_test_transaction("neg-income", "2024-02-02", -100.0, "Income", TransactionType::Income),
            create_test_transaction("r24", "2024-01-03", -1000.0, "Housing", TransactionType::Expense),
            create_test_transaction("refund", "2024-01-09", 200.0, "Shopping", TransactionType::Expense),
            create_test_transaction("tuition", "2024-08-01", -9000.0, "Tuition", TransactionType::Expense),
            create_test_transaction("move", "2024-03-01", -300.0, "Savings", TransactionType::Transfer),
        ]
    }

    #[test]
    fn test_yearly_totals_per_year() {
        let aggregator = YearlyAggregator::new(excluded(), 4000.0);
        let summary = aggregator.summarize(&sample(), &MatchedIds::new());

        let years: Vec<&str> = summary.rows.iter().map(|row| row.year.as_str()).collect();
        assert_eq!(years, vec!["2024", "2023"]);

        let y2024 = summary.row("2024").unwrap();
        assert_eq!(y2024.income, 3000.0);
        assert_eq!(y2024.expense, 800.0);
        assert_eq!(y2024.net, 2200.0);

        let y2023 = summary.row("2023").unwrap();
        assert_eq!(y2023.income, 2000.0);
        assert_eq!(y2023.expense, 1500.0);
        assert_eq!(y2023.net, 500.0);
    }

    #[test]
    fn test_bar_widths_scaled_to_max() {
        let aggregator = YearlyAggregator::new(excluded(), 4000.0);
        let summary = aggregator.summarize(&sample(), &MatchedIds::new());

        let y2024 = summary.row("2024").unwrap();
        let y2023 = summary.row("2023").unwrap();

        assert_eq!(y2024.income_percent, 90.0);
        assert!((y2023.income_percent - 60.0).abs() < 1e-9);
        assert_eq!(y2023.expense_percent, 90.0);
        assert!((y2024.expense_percent - 48.0).abs() < 1e-9);
        assert_eq!(y2024.net_percent, 90.0);
        assert!((y2023.net_percent - 500.0 / 2200.0 * 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_row_is_column_sum() {
        let aggregator = YearlyAggregator::new(excluded(), 4000.0);
        let summary = aggregator.summarize(&sample(), &MatchedIds::new());

        assert_eq!(
            summary.totals,
            YearTotals {
                income: 5000.0,
                expense: 2300.0,
                net: 2700.0,
            }
        );
    }

    #[test]
    fn test_all_zero_years_have_zero_widths() {
        let aggregator = YearlyAggregator::default();
        let transactions = vec![create_test_transaction("t", "2022-01-01", -50.0, "X", TransactionType::Transfer)];

        let summary = aggregator.summarize(&transactions, &MatchedIds::new());

        assert_eq!(summary.rows.len(), 1);
        let row = &summary.rows[0];
        assert_eq!((row.income, row.expense, row.net), (0.0, 0.0, 0.0));
        assert_eq!((row.income_percent, row.expense_percent, row.net_percent), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_refund_heavy_year_keeps_widths_in_range() {
        let aggregator = YearlyAggregator::default();
        let transactions = vec![create_test_transaction("r", "2022-01-01", 75.0, "Shopping", TransactionType::Expense)];

        let summary = aggregator.summarize(&transactions, &MatchedIds::new());
        let row = &summary.rows[0];

        assert_eq!(row.expense, -75.0);
        assert_eq!(row.expense_percent, 0.0);
        assert!(row.net_percent >= 0.0 && row.net_percent <= 100.0);
    }

    #[test]
    fn test_drill_down_equals_cells() {
        let aggregator = YearlyAggregator::new(excluded(), 4000.0);
        let transactions = sample();
        let matched: MatchedIds = vec!["r23".to_string()].into_iter().collect();
        let summary = aggregator.summarize(&transactions, &matched);

        for row in &summary.rows {
            for (metric, cell) in [
                (YearMetric::Income, row.income),
                (YearMetric::Expense, row.expense),
                (YearMetric::Net, row.net),
            ] {
                let drill = aggregator.transactions_for(&transactions, &matched, &row.year, metric);
                assert!((drill.total - cell).abs() < 1e-9, "{} {}", row.year, metric);
            }
        }

        let income = aggregator.transactions_for(&transactions, &matched, "2024", YearMetric::Income);
        let ids: Vec<&str> = income.transactions.iter().map(|tx| tx.id.as_str()).collect();
        assert_eq!(ids, vec!["s24"]);

        let expense = aggregator.transactions_for(&transactions, &matched, "2023", YearMetric::Expense);
        assert!(expense.transactions.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let aggregator = YearlyAggregator::new(excluded(), 4000.0);
        let summary = aggregator.summarize(&[], &MatchedIds::new());

        assert!(summary.is_empty());
        assert_eq!(summary.totals, YearTotals::default());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("Income".parse::<YearMetric>(), Ok(YearMetric::Income));
        assert_eq!("expenses".parse::<YearMetric>(), Ok(YearMetric::Expense));
        assert_eq!("net".parse::<YearMetric>(), Ok(YearMetric::Net));
        assert!("profit".parse::<YearMetric>().is_err());
    }
}
