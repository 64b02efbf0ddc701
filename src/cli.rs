use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yieldcast",
    version,
    about = "Crop yield and production forecasting"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Year confidence decay is measured from (defaults to the current year)
    #[arg(long, global = true)]
    pub reference_year: Option<i32>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict yield, production and productivity for one year
    Predict {
        #[arg(long)]
        crop: String,
        #[arg(long)]
        season: String,
        /// Cultivated area in hectares
        #[arg(long)]
        area: f64,
        #[arg(long)]
        year: i32,
    },
    /// Predict several years for comparison
    Series {
        #[arg(long)]
        crop: String,
        #[arg(long)]
        season: String,
        #[arg(long)]
        area: f64,
        /// Comma-separated years, e.g. 2024,2025,2026
        #[arg(long, value_delimiter = ',', required = true)]
        years: Vec<i32>,
    },
    /// List the crops and seasons the model knows
    Options,
    /// Historical per-year trend for a crop
    Trend {
        #[arg(long)]
        crop: String,
        /// yield, production or area
        #[arg(long, default_value = "yield")]
        metric: String,
    },
    /// Compare crop averages within a season
    Compare {
        #[arg(long)]
        season: String,
    },
    /// Validate config and report collaborator status
    Check,
}
