//! Historical summaries behind the trend and comparison views.

use super::calculations::{centered_moving_average, compound_annual_growth, mean};
use crate::models::{HistoricalData, HistoricalRecord, Metric};
use serde::Serialize;
use std::collections::BTreeMap;

const MOVING_AVERAGE_WINDOW: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyTrend {
    pub crop: String,
    pub metric: Metric,
    pub points: Vec<TrendPoint>,
    /// Average annual compound growth, percent
    pub annual_growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropComparison {
    pub crop: String,
    pub mean_yield: f64,
    pub mean_production: f64,
    pub mean_area: Option<f64>,
}

/// Per-year mean of `metric` for a crop across all its seasons
pub fn yearly_trend(data: &HistoricalData, crop: &str, metric: Metric) -> YearlyTrend {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in data.for_crop(crop) {
        if let Some(value) = record.metric(metric) {
            by_year.entry(record.year).or_default().push(value);
        }
    }

    let yearly: Vec<(i32, f64)> = by_year
        .into_iter()
        .filter_map(|(year, values)| mean(&values).map(|m| (year, m)))
        .collect();

    let values: Vec<f64> = yearly.iter().map(|(_, v)| *v).collect();
    let smoothed = centered_moving_average(&values, MOVING_AVERAGE_WINDOW);

    let points = yearly
        .iter()
        .zip(smoothed)
        .map(|(&(year, value), moving_average)| TrendPoint {
            year,
            value,
            moving_average,
        })
        .collect();

    let annual_growth_pct = match (yearly.first(), yearly.last()) {
        (Some(&(first_year, first)), Some(&(last_year, last))) if yearly.len() >= 2 => {
            compound_annual_growth(first, last, last_year - first_year)
        }
        _ => None,
    };

    YearlyTrend {
        crop: crop.to_string(),
        metric,
        points,
        annual_growth_pct,
    }
}

/// Per-crop means for one season, sorted ascending by mean yield
pub fn season_comparison(data: &HistoricalData, season: &str) -> Vec<CropComparison> {
    let mut by_crop: BTreeMap<&str, Vec<&HistoricalRecord>> = BTreeMap::new();
    for record in data.for_season(season) {
        by_crop.entry(record.crop.as_str()).or_default().push(record);
    }

    let mut rows: Vec<CropComparison> = by_crop
        .into_iter()
        .filter_map(|(crop, records)| {
            let yields: Vec<f64> = records.iter().map(|r| r.crop_yield).collect();
            let productions: Vec<f64> = records.iter().map(|r| r.production).collect();
            let areas: Vec<f64> = records.iter().filter_map(|r| r.area).collect();

            Some(CropComparison {
                crop: crop.to_string(),
                mean_yield: mean(&yields)?,
                mean_production: mean(&productions)?,
                mean_area: mean(&areas),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.mean_yield
            .partial_cmp(&b.mean_yield)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

pub fn historical_average(
    data: &HistoricalData,
    crop: &str,
    season: &str,
    metric: Metric,
) -> Option<f64> {
    let values: Vec<f64> = data
        .for_crop_season(crop, season)
        .filter_map(|r| r.metric(metric))
        .collect();
    mean(&values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HistoricalData {
        HistoricalData::new(vec![
            HistoricalRecord::new(2020, "Rice", "Kharif", 2000.0, 100.0).with_area(50.0),
            HistoricalRecord::new(2020, "Rice", "Rabi", 2400.0, 60.0).with_area(25.0),
            HistoricalRecord::new(2021, "Rice", "Kharif", 2100.0, 105.0),
            HistoricalRecord::new(2022, "Rice", "Kharif", 2420.0, 110.0),
            HistoricalRecord::new(2021, "Wheat", "Rabi", 3100.0, 80.0).with_area(40.0),
            HistoricalRecord::new(2022, "Wheat", "Rabi", 3300.0, 90.0).with_area(60.0),
            HistoricalRecord::new(2022, "Maize", "Kharif", 1500.0, 30.0),
        ])
    }

    #[test]
    fn yearly_trend_averages_seasons() {
        let trend = yearly_trend(&sample(), "Rice", Metric::Yield);
        let years: Vec<i32> = trend.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
        assert_eq!(trend.points[0].value, 2200.0);
        assert_eq!(trend.points[0].moving_average, None);
        let ma = trend.points[1].moving_average.unwrap();
        assert!((ma - (2200.0 + 2100.0 + 2420.0) / 3.0).abs() < 1e-9);
        assert_eq!(trend.points[2].moving_average, None);
    }

    #[test]
    fn yearly_trend_growth_rate() {
        let trend = yearly_trend(&sample(), "Rice", Metric::Yield);
        // 2200 -> 2420 over two years is 10% total, ~4.88%/year
        let expected = ((2420.0f64 / 2200.0).powf(0.5) - 1.0) * 100.0;
        assert!((trend.annual_growth_pct.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn yearly_trend_skips_missing_area() {
        let trend = yearly_trend(&sample(), "Rice", Metric::Area);
        assert_eq!(trend.points.len(), 1);
        assert_eq!(trend.points[0].value, 37.5);
        assert_eq!(trend.annual_growth_pct, None);
    }

    #[test]
    fn yearly_trend_unknown_crop_is_empty() {
        let trend = yearly_trend(&sample(), "Cotton", Metric::Production);
        assert!(trend.points.is_empty());
        assert_eq!(trend.annual_growth_pct, None);
    }

    #[test]
    fn season_comparison_sorted_by_yield() {
        let rows = season_comparison(&sample(), "Kharif");
        let crops: Vec<&str> = rows.iter().map(|r| r.crop.as_str()).collect();
        assert_eq!(crops, vec!["Maize", "Rice"]);
        assert!((rows[1].mean_yield - 6520.0 / 3.0).abs() < 1e-9);
        assert_eq!(rows[1].mean_area, Some(50.0));
        assert_eq!(rows[0].mean_area, None);
    }

    #[test]
    fn season_comparison_rabi() {
        let rows = season_comparison(&sample(), "Rabi");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].crop, "Wheat");
        assert_eq!(rows[1].mean_production, 85.0);
    }

    #[test]
    fn historical_average_for_crop_season() {
        let avg = historical_average(&sample(), "Wheat", "Rabi", Metric::Yield);
        assert_eq!(avg, Some(3200.0));
        assert_eq!(historical_average(&sample(), "Wheat", "Kharif", Metric::Yield), None);
    }
}
