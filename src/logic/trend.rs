use super::calculations::{mean, ols_slope};
use crate::models::{HistoricalData, HistoricalRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Multiplicative correction from the historical growth rate.
/// Always within `[TrendFactor::MIN, TrendFactor::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct TrendFactor(f64);

impl TrendFactor {
    pub const MIN: f64 = 0.5;
    pub const MAX: f64 = 2.0;
    pub const NEUTRAL: TrendFactor = TrendFactor(1.0);

    /// Clamp into range; non-finite input collapses to neutral.
    pub fn clamped(value: f64) -> Self {
        if value.is_finite() {
            TrendFactor(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self::NEUTRAL
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for TrendFactor {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Minimum matching records needed to fit a trend
pub const MIN_TREND_RECORDS: usize = 3;

/// Damping applied to slopes projected past the last observed year
const FUTURE_DAMPING: f64 = 0.5;
const PAST_DAMPING: f64 = 1.0;

/// Projects a per-(crop, season) linear growth trend to a target year.
///
/// Any numeric trouble (too few points, a degenerate fit, non-finite
/// values) yields the neutral factor rather than an error: callers always
/// get a usable multiplier.
#[derive(Debug, Clone)]
pub struct HistoricalTrendEstimator {
    history: Arc<HistoricalData>,
}

impl HistoricalTrendEstimator {
    pub fn new(history: Arc<HistoricalData>) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &HistoricalData {
        &self.history
    }

    pub fn estimate(&self, crop: &str, season: &str, target_year: i32) -> TrendFactor {
        let mut series: Vec<&HistoricalRecord> =
            self.history.for_crop_season(crop, season).collect();

        if series.len() < MIN_TREND_RECORDS {
            debug!(
                crop,
                season,
                records = series.len(),
                "Not enough history for a trend, using neutral factor"
            );
            return TrendFactor::NEUTRAL;
        }

        series.sort_by_key(|r| r.year);

        match project(&series, target_year) {
            Some(factor) => TrendFactor::clamped(factor),
            None => {
                debug!(crop, season, target_year, "Trend fit degenerate, using neutral factor");
                TrendFactor::NEUTRAL
            }
        }
    }
}

/// Unclamped growth factor for a year-sorted series
fn project(series: &[&HistoricalRecord], target_year: i32) -> Option<f64> {
    let years: Vec<f64> = series.iter().map(|r| r.year as f64).collect();
    let yields: Vec<f64> = series.iter().map(|r| r.crop_yield).collect();
    let productions: Vec<f64> = series.iter().map(|r| r.production).collect();

    let yield_slope = ols_slope(&years, &yields)?;
    let production_slope = ols_slope(&years, &productions)?;

    let latest_year = series.last()?.year;
    let years_ahead = (target_year - latest_year) as f64;

    let damping = if years_ahead > 0.0 {
        FUTURE_DAMPING
    } else {
        PAST_DAMPING
    };

    let yield_growth = growth_factor(yield_slope, years_ahead, damping, &yields);
    let production_growth = growth_factor(production_slope, years_ahead, damping, &productions);

    let factor = (yield_growth + production_growth) / 2.0;
    factor.is_finite().then_some(factor)
}

fn growth_factor(slope: f64, years_ahead: f64, damping: f64, values: &[f64]) -> f64 {
    match mean(values) {
        Some(avg) if avg > 0.0 => 1.0 + (slope * years_ahead * damping) / avg,
        _ => 1.0,
    }
}
