mod basemodel;
mod cli;
mod config;
mod error;
mod logic;
mod models;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use logic::{analytics, PredictionEngine};
use models::{ConfidenceLevel, Metric, PredictionResult, TrendIndicator};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Single prediction plus the indicators the dashboard shows next to it
#[derive(Serialize)]
struct PredictReport {
    #[serde(flatten)]
    result: PredictionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence_level: Option<ConfidenceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vs_historical_yield: Option<TrendIndicator>,
}

#[derive(Serialize)]
struct CheckReport {
    config_found: bool,
    model_file: String,
    model_loaded: bool,
    historical_data: String,
    historical_records: usize,
    reference_year: i32,
    exogenous_baseline_year: i32,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config_found = Config::exists(cli.config.as_ref());
    let config =
        Config::load_or_default(cli.config.clone()).context("Failed to load configuration")?;
    let reference_year = config.reference_year(cli.reference_year);

    let engine = PredictionEngine::from_config(&config, reference_year);

    match cli.command {
        Commands::Predict {
            crop,
            season,
            area,
            year,
        } => {
            let result = engine.predict(&crop, &season, area, year);
            let confidence_level = result.prediction().map(|p| p.confidence_level());
            let vs_historical_yield = result.prediction().and_then(|p| {
                let avg =
                    analytics::historical_average(engine.history(), &crop, &season, Metric::Yield)?;
                TrendIndicator::compare(p.predicted_yield, avg)
            });

            print_json(&PredictReport {
                result,
                confidence_level,
                vs_historical_yield,
            })?;
        }
        Commands::Series {
            crop,
            season,
            area,
            years,
        } => {
            print_json(&engine.prediction_summary(&crop, &season, area, &years))?;
        }
        Commands::Options => {
            print_json(&engine.available_options())?;
        }
        Commands::Trend { crop, metric } => {
            let Some(metric) = Metric::from_str(&metric) else {
                bail!("Unknown metric '{}': expected yield, production or area", metric);
            };
            print_json(&analytics::yearly_trend(engine.history(), &crop, metric))?;
        }
        Commands::Compare { season } => {
            print_json(&analytics::season_comparison(engine.history(), &season))?;
        }
        Commands::Check => {
            print_json(&CheckReport {
                config_found,
                model_file: config.model.model_file.display().to_string(),
                model_loaded: engine.model().is_loaded(),
                historical_data: config.historical_data_path().display().to_string(),
                historical_records: engine.history().len(),
                reference_year,
                exogenous_baseline_year: config.adjustment.exogenous_baseline_year,
            })?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
