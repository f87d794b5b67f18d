//! Spend Insight CLI - Refund-aware spending reports
//!
//! Usage:
//!   spend-insight matches ledger.json
//!   spend-insight categories ledger.json --month 2024-03
//!   spend-insight trend ledger.csv --month 2024-03
//!   spend-insight yearly ledger.json --year 2024 --metric expense
//!   spend-insight special ledger.json

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use spend_insight::{
    format_month, load_snapshot, EngineConfig, InsightEngine, Transaction, YearMetric,
};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut engine = InsightEngine::new(config);

    match &cli.command {
        Commands::Matches { file } => {
            let transactions = load(file)?;
            let pairs = engine.refund_pairs(&transactions);

            if cli.json {
                return print_json(&pairs);
            }

            println!("🔍 {} refund pair(s) excluded from spend totals", pairs.len());
            for pair in &pairs {
                println!("  {} ↔ {}  {}", pair.charge_id, pair.refund_id, pair.reason);
            }
        }

        Commands::Months { file } => {
            let transactions = load(file)?;
            let months = engine.months(&transactions);

            if cli.json {
                return print_json(&months);
            }

            for month in &months {
                println!("{}  {}", month, format_month(month).unwrap_or_default());
            }
        }

        Commands::Categories { file, month, category } => {
            let transactions = load(file)?;
            let month = match month {
                Some(month) => month.clone(),
                None => engine
                    .months(&transactions)
                    .into_iter()
                    .next()
                    .context("Snapshot has no dated transactions")?,
            };

            if let Some(category) = category {
                let rows = engine.category_transactions(&transactions, &month, category);
                return print_rows(cli.json, &format!("{} · {}", category, month), &rows);
            }

            let shares = engine.category_breakdown(&transactions, &month);
            if cli.json {
                return print_json(&shares);
            }

            println!("🥧 {}", format_month(&month).unwrap_or_else(|| month.clone()));
            for share in &shares {
                println!(
                    "  {} {:<24} {:>5.1}%  ${:>10.2}",
                    engine.label_for(&share.category),
                    share.category,
                    share.percentage,
                    share.amount
                );
            }
        }

        Commands::Trend { file, month } => {
            let transactions = load(file)?;

            if let Some(month) = month {
                let rows = engine.month_transactions(&transactions, month);
                return print_rows(cli.json, &format!("Net for {}", month), &rows);
            }

            let trend = engine.monthly_trend(&transactions);
            if cli.json {
                return print_json(&trend);
            }

            println!("📈 Monthly net");
            for entry in &trend {
                println!("  {}  ${:>12.2}", entry.month, entry.net);
            }
        }

        Commands::Yearly { file, year, metric } => {
            let transactions = load(file)?;

            if let (Some(year), Some(metric)) = (year, metric) {
                let drill = engine.year_transactions(&transactions, year, *metric);
                if cli.json {
                    return print_json(&drill);
                }
                print_rows(false, &format!("{} {}", title_for(*metric), year), &drill.transactions)?;
                println!("  Total: ${:.2}", drill.total);
                return Ok(());
            }

            let summary = engine.yearly_summary(&transactions);
            if cli.json {
                return print_json(&summary);
            }

            println!("📅 {:<6} {:>12} {:>12} {:>12}", "Year", "Income", "Expenses", "Net");
            for row in &summary.rows {
                println!(
                    "   {:<6} {:>12.2} {:>12.2} {:>12.2}",
                    row.year, row.income, row.expense, row.net
                );
            }
            println!(
                "   {:<6} {:>12.2} {:>12.2} {:>12.2}",
                "Total", summary.totals.income, summary.totals.expense, summary.totals.net
            );
        }

        Commands::Special { file } => {
            let transactions = load(file)?;
            let totals = engine.special_totals(&transactions);

            if cli.json {
                return print_json(&totals);
            }

            println!(
                "🎓 Tuition: ${:.2} ({} transactions)",
                totals.tuition_total,
                totals.tuition_transactions.len()
            );
            println!(
                "🎁 Large gifts: ${:.2} ({} transactions)",
                totals.gifts_total,
                totals.gift_transactions.len()
            );
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Vec<Transaction>> {
    let snapshot = load_snapshot(path)
        .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
    Ok(snapshot.transactions)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_rows(json: bool, title: &str, rows: &[&Transaction]) -> Result<()> {
    if json {
        return print_json(rows);
    }

    println!("{} ({} transactions)", title, rows.len());
    for tx in rows {
        println!(
            "  {}  {:<32} {:>10.2}  {}",
            tx.date, tx.description, tx.amount, tx.category
        );
    }
    Ok(())
}

fn title_for(metric: YearMetric) -> &'static str {
    match metric {
        YearMetric::Income => "Income for",
        YearMetric::Expense => "Expenses for",
        YearMetric::Net => "All transactions for",
    }
}
