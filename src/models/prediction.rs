use crate::error::YieldCastError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub crop: String,
    pub season: String,
    /// Cultivated area in hectares
    pub area: f64,
    pub year: i32,
}

impl PredictionRequest {
    pub fn new(crop: &str, season: &str, area: f64, year: i32) -> Self {
        Self {
            crop: crop.to_string(),
            season: season.to_string(),
            area,
            year,
        }
    }
}

/// A calibrated prediction, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub crop: String,
    pub season: String,
    pub area: f64,
    pub year: i32,
    pub predicted_yield: f64,
    pub predicted_production: f64,
    pub productivity: f64,
    pub confidence: f64,
    pub trend_factor: f64,
    pub years_projected: u32,
}

impl Prediction {
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }
}

/// Outcome of a single prediction call. Serializes either as the full
/// record or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Success(Prediction),
    Failure { error: String },
}

impl PredictionResult {
    pub fn is_error(&self) -> bool {
        matches!(self, PredictionResult::Failure { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PredictionResult::Failure { error } => Some(error),
            PredictionResult::Success(_) => None,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            PredictionResult::Success(p) => Some(p),
            PredictionResult::Failure { .. } => None,
        }
    }

    pub fn into_prediction(self) -> Option<Prediction> {
        match self {
            PredictionResult::Success(p) => Some(p),
            PredictionResult::Failure { .. } => None,
        }
    }
}

impl From<std::result::Result<Prediction, YieldCastError>> for PredictionResult {
    fn from(result: std::result::Result<Prediction, YieldCastError>) -> Self {
        match result {
            Ok(p) => PredictionResult::Success(p),
            Err(e) => PredictionResult::Failure {
                error: e.prediction_message(),
            },
        }
    }
}

/// Compact per-year row used by multi-year comparison views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub year: i32,
    #[serde(rename = "yield")]
    pub crop_yield: f64,
    pub production: f64,
    pub productivity: f64,
    pub confidence: f64,
}

impl From<&Prediction> for SummaryRow {
    fn from(p: &Prediction) -> Self {
        Self {
            year: p.year,
            crop_yield: p.predicted_yield,
            production: p.predicted_production,
            productivity: p.productivity,
            confidence: p.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableOptions {
    pub crops: Vec<String>,
    pub seasons: Vec<String>,
}

impl AvailableOptions {
    pub const DEFAULT_CROPS: [&'static str; 5] = ["Rice", "Wheat", "Cotton", "Sugarcane", "Maize"];
    pub const DEFAULT_SEASONS: [&'static str; 4] = ["Kharif", "Rabi", "Summer", "Annual"];
}

impl Default for AvailableOptions {
    fn default() -> Self {
        Self {
            crops: Self::DEFAULT_CROPS.iter().map(|s| s.to_string()).collect(),
            seasons: Self::DEFAULT_SEASONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        let percent = score * 100.0;
        if percent >= 90.0 {
            ConfidenceLevel::VeryHigh
        } else if percent >= 80.0 {
            ConfidenceLevel::High
        } else if percent >= 70.0 {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryHigh => "Very High Confidence",
            ConfidenceLevel::High => "High Confidence",
            ConfidenceLevel::Moderate => "Moderate Confidence",
            ConfidenceLevel::Low => "Low Confidence",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Position of a predicted value relative to the historical average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "direction", content = "percent", rename_all = "lowercase")]
pub enum TrendIndicator {
    Similar,
    Above(f64),
    Below(f64),
}

impl TrendIndicator {
    /// Returns `None` when either value is zero or not finite.
    pub fn compare(current: f64, historical_avg: f64) -> Option<Self> {
        if current == 0.0 || historical_avg == 0.0 {
            return None;
        }
        if !current.is_finite() || !historical_avg.is_finite() {
            return None;
        }

        let difference = (current - historical_avg) / historical_avg * 100.0;

        Some(if difference.abs() < 1.0 {
            TrendIndicator::Similar
        } else if difference > 0.0 {
            TrendIndicator::Above(difference)
        } else {
            TrendIndicator::Below(difference.abs())
        })
    }

    pub fn describe(&self) -> String {
        match self {
            TrendIndicator::Similar => "Similar to average".to_string(),
            TrendIndicator::Above(pct) => format!("{:+.1}% above average", pct),
            TrendIndicator::Below(pct) => format!("{:.1}% below average", pct),
        }
    }
}

impl std::fmt::Display for TrendIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prediction() -> Prediction {
        Prediction {
            crop: "Rice".into(),
            season: "Kharif".into(),
            area: 100.0,
            year: 2026,
            predicted_yield: 3150.5,
            predicted_production: 157.25,
            productivity: 1.57,
            confidence: 0.808,
            trend_factor: 1.045,
            years_projected: 1,
        }
    }

    #[test]
    fn failure_serializes_as_error_object() {
        let result: PredictionResult = Err(YieldCastError::UnknownCrop("Quinoa".into())).into();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Unknown crop: Quinoa" }));
        assert!(result.is_error());
        assert!(result.prediction().is_none());
    }

    #[test]
    fn success_serializes_flat_record() {
        let result = PredictionResult::Success(sample_prediction());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["predicted_yield"], 3150.5);
        assert_eq!(json["years_projected"], 1);
        assert!(json.get("error").is_none());
        assert_eq!(result.error(), None);
    }

    #[test]
    fn summary_row_uses_yield_key() {
        let row = SummaryRow::from(&sample_prediction());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["yield"], 3150.5);
        assert_eq!(json["production"], 157.25);
    }

    #[test]
    fn confidence_levels() {
        assert_eq!(ConfidenceLevel::from_score(0.95), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_score(0.85), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.72), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_score(0.51), ConfidenceLevel::Low);
        assert_eq!(sample_prediction().confidence_level(), ConfidenceLevel::High);
    }

    #[test]
    fn trend_indicator_thresholds() {
        assert_eq!(TrendIndicator::compare(100.5, 100.0), Some(TrendIndicator::Similar));
        assert_eq!(TrendIndicator::compare(0.0, 100.0), None);
        assert_eq!(TrendIndicator::compare(100.0, 0.0), None);

        match TrendIndicator::compare(110.0, 100.0) {
            Some(TrendIndicator::Above(pct)) => assert!((pct - 10.0).abs() < 1e-9),
            other => panic!("expected Above, got {:?}", other),
        }
        match TrendIndicator::compare(75.0, 100.0) {
            Some(TrendIndicator::Below(pct)) => assert!((pct - 25.0).abs() < 1e-9),
            other => panic!("expected Below, got {:?}", other),
        }
    }

    #[test]
    fn trend_indicator_describe() {
        assert_eq!(TrendIndicator::Above(12.34).describe(), "+12.3% above average");
        assert_eq!(TrendIndicator::Below(4.0).describe(), "4.0% below average");
        assert_eq!(TrendIndicator::Similar.describe(), "Similar to average");
    }

    #[test]
    fn default_options() {
        let options = AvailableOptions::default();
        assert_eq!(options.crops.len(), 5);
        assert!(options.seasons.contains(&"Annual".to_string()));
    }
}
