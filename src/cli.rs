//! CLI definitions using clap

use clap::{Parser, Subcommand};
use spend_insight::YearMetric;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spend-insight")]
#[command(about = "Refund-aware spending reports over a transaction snapshot")]
#[command(version)]
pub struct Cli {
    /// Engine config (TOML); defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List charge/refund pairs that are left out of spend totals
    Matches {
        /// Snapshot file (.json or .csv)
        file: PathBuf,
    },

    /// List months present in the snapshot, newest first
    Months {
        file: PathBuf,
    },

    /// Spending per category for one month
    Categories {
        file: PathBuf,

        /// Month (YYYY-MM); defaults to the newest month in the snapshot
        #[arg(short, long)]
        month: Option<String>,

        /// Show the rows behind one category (or "Others")
        #[arg(long)]
        category: Option<String>,
    },

    /// Net cash flow per month
    Trend {
        file: PathBuf,

        /// Show the rows behind one month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Income, expense and net per year
    Yearly {
        file: PathBuf,

        /// Show the rows behind one year (requires --metric)
        #[arg(short, long, requires = "metric")]
        year: Option<String>,

        /// income, expense or net
        #[arg(long)]
        metric: Option<YearMetric>,
    },

    /// Tuition and large-gift totals reported apart from the trends
    Special {
        file: PathBuf,
    },
}
