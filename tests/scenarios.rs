//! End-to-end checks of the reconciliation and aggregation engines through
//! the public API.

use spend_insight::{
    CategoryAggregator, EngineConfig, InsightEngine, MatchKey, MatchedIds, SourcePolicy,
    SpecialCategoryCalculator, SpecialExclusion, Transaction, TransactionMatcher, TransactionType,
    TrendAggregator, YearMetric, YearlyAggregator, OTHERS_CATEGORY,
};
use std::collections::BTreeSet;

fn tx(id: &str, date: &str, description: &str, amount: f64, category: &str, kind: TransactionType, source: &str) -> Transaction {
    Transaction::new(id, date, description, amount, category, kind, source)
}

fn excluded() -> BTreeSet<String> {
    EngineConfig::default().excluded_categories
}

/// A year of mixed-source activity with refunds, gifts, tuition and noise
fn mixed_ledger() -> Vec<Transaction> {
    use TransactionType::*;

    vec![
        tx("1", "2024-01-02", "Salary", 3200.0, "Income", Income, "WS"),
        tx("2", "2024-01-05", "Rent", -1400.0, "Housing", Expense, "WS"),
        tx("3", "2024-01-09", "Shoe Store", 120.0, "Shopping & Retail", Expense, "AMEX"),
        tx("4", "2024-01-20", "shoe store ", -120.0, "Shopping & Retail", Expense, "AMEX"),
        tx("5", "2024-01-21", "Coffee Shop", -4.5, "Food & Drinks", Expense, "WS"),
        tx("6", "2024-02-02", "Salary", 3200.0, "Income", Income, "WS"),
        tx("7", "2024-02-03", "Grandparents", 6000.0, "Income", Income, "WS"),
        tx("8", "2024-02-04", "University", -9500.0, "Tuition", Expense, "WS"),
        tx("9", "2024-02-10", "Card payment", -800.0, "Credit Card Payment", Transfer, "WS"),
        tx("10", "2024-02-11", "Airline", 450.0, "Travel", Expense, "AMEX"),
        tx("11", "2024-02-12", "Gas Station", 40.0, "Gas", Expense, "AMEX"),
        tx("12", "2024-02-13", "Vet", -75.0, "Pet", Expense, "Manual"),
        tx("13", "2023-12-24", "Toy Store", 60.0, "Shopping & Retail", Expense, "AMEX"),
        tx("14", "2023-12-01", "Salary", 3100.0, "Income", Income, "WS"),
        tx("15", "2023-12-02", "Broken row", f64::NAN, "Food & Drinks", Expense, "WS"),
        tx("16", "12/05/2023", "Bad date", -10.0, "Food & Drinks", Expense, "WS"),
        tx("17", "2023-12-28", "Gym", 30.0, "Gym", Expense, "Mystery Bank"),
    ]
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn matched_ids_are_symmetric_pairs() {
    let matcher = TransactionMatcher::default();
    let transactions = mixed_ledger();
    let matched = matcher.match_ids(&transactions);

    assert_eq!(matched.sorted(), vec!["3", "4"]);

    for id in matched.iter() {
        let a = transactions.iter().find(|t| &t.id == id).unwrap();
        let partner = transactions.iter().find(|b| {
            b.id != a.id
                && matched.contains(&b.id)
                && MatchKey::for_transaction(b) == MatchKey::for_transaction(a)
                && b.amount.signum() == -a.amount.signum()
        });
        assert!(partner.is_some(), "{} has no partner", id);
    }
}

#[test]
fn matching_is_idempotent() {
    let matcher = TransactionMatcher::default();
    let transactions = mixed_ledger();

    assert_eq!(matcher.match_ids(&transactions), matcher.match_ids(&transactions));
}

#[test]
fn category_totals_conserve_spend() {
    let sources = SourcePolicy::default();
    let aggregator = CategoryAggregator::new(sources.clone());
    let transactions = mixed_ledger();
    let matched = TransactionMatcher::default().match_ids(&transactions);
    let excluded = EngineConfig::default().breakdown_excluded_categories;

    for month in ["2023-12", "2024-01", "2024-02"] {
        let shares = aggregator.aggregate(&transactions, month, &matched, &excluded);
        let summed: f64 = shares.iter().map(|s| s.amount).sum();

        let expected: f64 = transactions
            .iter()
            .filter(|t| {
                t.is_expense()
                    && t.is_well_formed()
                    && t.month() == Some(month)
                    && !excluded.contains(&t.category)
                    && !matched.contains(&t.id)
            })
            .map(|t| sources.spent_magnitude(t))
            .sum();

        assert!((summed - expected).abs() < 1e-6, "{}", month);
    }
}

#[test]
fn percentages_are_finite_and_bounded() {
    let mut engine = InsightEngine::default();
    let transactions = mixed_ledger();

    for month in engine.months(&transactions) {
        for share in engine.category_breakdown(&transactions, &month) {
            assert!(share.percentage.is_finite());
            assert!((0.0..=100.0).contains(&share.percentage));
        }
    }

    for row in engine.yearly_summary(&transactions).rows {
        for pct in [row.income_percent, row.expense_percent, row.net_percent] {
            assert!(pct.is_finite());
            assert!((0.0..=100.0).contains(&pct));
        }
    }
}

#[test]
fn drill_downs_sum_to_displayed_cells() {
    let mut engine = InsightEngine::default();
    let transactions = mixed_ledger();

    for entry in engine.monthly_trend(&transactions) {
        let rows = engine.month_transactions(&transactions, &entry.month);
        let sum: f64 = rows.iter().map(|t| t.amount).sum();
        assert!((sum - entry.net).abs() < 1e-6, "{}", entry.month);
    }

    let summary = engine.yearly_summary(&transactions);
    for row in &summary.rows {
        for (metric, cell) in [
            (YearMetric::Income, row.income),
            (YearMetric::Expense, row.expense),
            (YearMetric::Net, row.net),
        ] {
            let drill = engine.year_transactions(&transactions, &row.year, metric);
            assert!((drill.total - cell).abs() < 1e-6, "{} {}", row.year, metric);

            let raw: f64 = drill.transactions.iter().map(|t| t.amount).sum();
            let expected_raw = if metric == YearMetric::Expense { -cell } else { cell };
            assert!((raw - expected_raw).abs() < 1e-6);
        }
    }
}

#[test]
fn excluded_mass_is_surfaced_not_dropped() {
    let mut engine = InsightEngine::default();
    let transactions = mixed_ledger();

    let february = engine.month_transactions(&transactions, "2024-02");
    assert!(february.iter().all(|t| t.id != "7" && t.id != "8"));

    let special = engine.special_totals(&transactions);
    assert_eq!(special.gifts_total, 6000.0);
    assert_eq!(special.tuition_total, 9500.0);
}

// ============================================================================
// CONCRETE SCENARIOS
// ============================================================================

#[test]
fn scenario_refund_pair_is_removed_from_category_totals() {
    let transactions = vec![
        tx("a", "2024-03-01", "Coffee Shop", 5.0, "Food", TransactionType::Expense, "AMEX"),
        tx("b", "2024-03-15", "Coffee Shop", -5.0, "Food", TransactionType::Expense, "AMEX"),
    ];

    let matched = TransactionMatcher::default().match_ids(&transactions);
    assert!(matched.contains("a") && matched.contains("b"));

    let shares = CategoryAggregator::default().aggregate(&transactions, "2024-03", &matched, &BTreeSet::new());
    let food: f64 = shares.iter().filter(|s| s.category == "Food").map(|s| s.amount).sum();
    assert_eq!(food, 0.0);
}

#[test]
fn scenario_single_expense_takes_full_share() {
    let transactions = vec![tx("s", "2024-03-20", "Mall", -42.50, "Shopping", TransactionType::Expense, "Manual")];

    let matched = TransactionMatcher::default().match_ids(&transactions);
    assert!(matched.is_empty());

    let shares = CategoryAggregator::default().aggregate(&transactions, "2024-03", &matched, &BTreeSet::new());
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].category, "Shopping");
    assert_eq!(shares[0].amount, 42.50);
    assert_eq!(shares[0].percentage, 100.0);
}

#[test]
fn scenario_large_gift_reported_separately() {
    let transactions = vec![
        tx("gift", "2024-04-02", "Gift", 5000.0, "Income", TransactionType::Income, "WS"),
        tx("rent", "2024-04-03", "Rent", -1000.0, "Housing", TransactionType::Expense, "WS"),
    ];
    let matched = MatchedIds::new();

    let trend = TrendAggregator::new(excluded()).monthly_net(
        &transactions,
        &matched,
        &SpecialExclusion::gifts_only(4000.0),
    );
    assert_eq!(trend.len(), 1);
    assert_eq!(trend[0].net, -1000.0);

    let yearly = YearlyAggregator::new(excluded(), 4000.0).summarize(&transactions, &matched);
    assert_eq!(yearly.rows[0].income, 0.0);

    let special = SpecialCategoryCalculator::new("Tuition", 4000.0).totals(&transactions, &matched);
    assert_eq!(special.gifts_total, 5000.0);
}

#[test]
fn scenario_eight_categories_fold_into_others() {
    let totals = [100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0];
    let transactions: Vec<Transaction> = totals
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            tx(
                &format!("t{}", i),
                "2024-06-01",
                "Store",
                -amount,
                &format!("Category {}", i),
                TransactionType::Expense,
                "WS",
            )
        })
        .collect();

    let shares = CategoryAggregator::default().aggregate(&transactions, "2024-06", &MatchedIds::new(), &BTreeSet::new());

    assert_eq!(shares.len(), 7);
    assert!(shares[..6].iter().all(|s| s.category != OTHERS_CATEGORY));
    assert_eq!(shares[6].category, OTHERS_CATEGORY);
    assert_eq!(shares[6].amount, 70.0);
    assert_eq!(shares[6].percentage, 13.5);
}

#[test]
fn scenario_empty_input_everywhere() {
    let mut engine = InsightEngine::default();
    let empty: Vec<Transaction> = Vec::new();

    assert!(engine.matched_ids(&empty).is_empty());
    assert!(engine.category_breakdown(&empty, "2024-01").is_empty());
    assert!(engine.monthly_trend(&empty).is_empty());
    assert!(engine.yearly_summary(&empty).rows.is_empty());
    assert!(engine.months(&empty).is_empty());

    let special = engine.special_totals(&empty);
    assert!(special.tuition_transactions.is_empty());
    assert!(special.gift_transactions.is_empty());
}

#[test]
fn stale_cache_is_never_served_after_edit() {
    let mut engine = InsightEngine::default();
    let mut transactions = mixed_ledger();

    let before = engine.category_breakdown(&transactions, "2024-01");
    assert!(before.iter().all(|s| s.category != "Shopping & Retail"));

    // The refund row is deleted upstream; the charge must count again
    transactions.retain(|t| t.id != "4");
    let after = engine.category_breakdown(&transactions, "2024-01");
    let shopping = after.iter().find(|s| s.category == "Shopping & Retail").unwrap();
    assert_eq!(shopping.amount, 120.0);

    engine.invalidate_cache();
    assert_eq!(engine.category_breakdown(&transactions, "2024-01"), after);
}
