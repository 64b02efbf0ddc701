use super::{BaseModel, FeatureVector, Target, FEATURE_COUNT};
use crate::error::{Result, YieldCastError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maps category labels to their index in `classes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<S: AsRef<str>>(classes: &[S]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}

/// Standardizes features as `(x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    pub fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, x) in features.iter().enumerate() {
            // Constant features were fitted with zero variance
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            scaled[i] = (x - self.mean[i]) / scale;
        }
        scaled
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(YieldCastError::InvalidData(format!(
                "{} expects {} features, got mean={} scale={}",
                name,
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn predict(&self, scaled: &FeatureVector) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(scaled.iter())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(YieldCastError::InvalidData(format!(
                "{} expects {} coefficients, got {}",
                name,
                FEATURE_COUNT,
                self.coefficients.len()
            )));
        }
        Ok(())
    }
}

fn default_baseline_year() -> i32 {
    2015
}

/// Serialized base model: encoders, per-target scalers and regressors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub crop_encoder: LabelEncoder,
    pub season_encoder: LabelEncoder,
    pub yield_scaler: StandardScaler,
    pub production_scaler: StandardScaler,
    pub yield_model: LinearRegressor,
    pub production_model: LinearRegressor,
    #[serde(default = "default_baseline_year")]
    pub baseline_year: i32,
}

impl ModelBundle {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let bundle: ModelBundle = serde_json::from_str(content)?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<()> {
        self.yield_scaler.validate("yield_scaler")?;
        self.production_scaler.validate("production_scaler")?;
        self.yield_model.validate("yield_model")?;
        self.production_model.validate("production_model")?;

        if self.crop_encoder.classes.is_empty() || self.season_encoder.classes.is_empty() {
            return Err(YieldCastError::InvalidData(
                "model bundle has an empty crop or season vocabulary".into(),
            ));
        }
        Ok(())
    }

    fn scaler(&self, target: Target) -> &StandardScaler {
        match target {
            Target::Yield => &self.yield_scaler,
            Target::Production => &self.production_scaler,
        }
    }

    fn regressor(&self, target: Target) -> &LinearRegressor {
        match target {
            Target::Yield => &self.yield_model,
            Target::Production => &self.production_model,
        }
    }
}

impl BaseModel for ModelBundle {
    fn crop_classes(&self) -> &[String] {
        &self.crop_encoder.classes
    }

    fn season_classes(&self) -> &[String] {
        &self.season_encoder.classes
    }

    fn encode_crop(&self, crop: &str) -> Result<f64> {
        self.crop_encoder
            .transform(crop)
            .map(|code| code as f64)
            .ok_or_else(|| YieldCastError::UnknownCrop(crop.to_string()))
    }

    fn encode_season(&self, season: &str) -> Result<f64> {
        self.season_encoder
            .transform(season)
            .map(|code| code as f64)
            .ok_or_else(|| YieldCastError::UnknownSeason(season.to_string()))
    }

    fn baseline_year(&self) -> i32 {
        self.baseline_year
    }

    fn scale(&self, target: Target, features: &FeatureVector) -> Result<FeatureVector> {
        Ok(self.scaler(target).transform(features))
    }

    fn regress(&self, target: Target, scaled: &FeatureVector) -> Result<f64> {
        let value = self.regressor(target).predict(scaled);
        if !value.is_finite() {
            return Err(YieldCastError::PredictionFailed(format!(
                "{} model produced a non-finite value",
                target.as_str()
            )));
        }
        Ok(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Constant-output bundle: yield 3000, production 150 regardless of input
    pub(crate) fn fixture_bundle() -> ModelBundle {
        ModelBundle {
            crop_encoder: LabelEncoder::new(&["Maize", "Rice", "Wheat"]),
            season_encoder: LabelEncoder::new(&["Kharif", "Rabi"]),
            yield_scaler: StandardScaler::identity(),
            production_scaler: StandardScaler::identity(),
            yield_model: LinearRegressor::new(vec![0.0; FEATURE_COUNT], 3000.0),
            production_model: LinearRegressor::new(vec![0.0; FEATURE_COUNT], 150.0),
            baseline_year: 2015,
        }
    }

    const BUNDLE_JSON: &str = r#"{
        "crop_encoder": { "classes": ["Rice", "Wheat"] },
        "season_encoder": { "classes": ["Kharif", "Rabi"] },
        "yield_scaler": { "mean": [0.5, 0.5, 100.0, 5.0], "scale": [0.5, 0.5, 50.0, 0.0] },
        "production_scaler": { "mean": [0, 0, 0, 0], "scale": [1, 1, 1, 1] },
        "yield_model": { "coefficients": [10.0, 20.0, 30.0, 40.0], "intercept": 2500.0 },
        "production_model": { "coefficients": [0.0, 0.0, 1.5, 0.0], "intercept": 0.0 }
    }"#;

    #[test]
    fn parses_bundle_with_default_baseline() {
        let bundle = ModelBundle::from_json(BUNDLE_JSON).unwrap();
        assert_eq!(bundle.baseline_year(), 2015);
        assert_eq!(bundle.crop_classes(), ["Rice", "Wheat"]);
    }

    #[test]
    fn encodes_by_class_index() {
        let bundle = fixture_bundle();
        assert_eq!(bundle.encode_crop("Rice").unwrap(), 1.0);
        assert_eq!(bundle.encode_season("Rabi").unwrap(), 1.0);
        assert!(matches!(
            bundle.encode_crop("Quinoa"),
            Err(YieldCastError::UnknownCrop(c)) if c == "Quinoa"
        ));
        assert!(matches!(
            bundle.encode_season("Monsoon"),
            Err(YieldCastError::UnknownSeason(s)) if s == "Monsoon"
        ));
    }

    #[test]
    fn scales_then_regresses_per_target() {
        let bundle = ModelBundle::from_json(BUNDLE_JSON).unwrap();
        let features = [1.0, 0.0, 150.0, 7.0];

        let scaled = bundle.scale(Target::Yield, &features).unwrap();
        // Zero scale on the year column leaves it centered but unscaled
        assert_eq!(scaled, [1.0, -1.0, 1.0, 2.0]);
        let y = bundle.regress(Target::Yield, &scaled).unwrap();
        assert!((y - (2500.0 + 10.0 - 20.0 + 30.0 + 80.0)).abs() < 1e-9);

        let scaled = bundle.scale(Target::Production, &features).unwrap();
        let p = bundle.regress(Target::Production, &scaled).unwrap();
        assert!((p - 225.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_wrong_feature_width() {
        let json = BUNDLE_JSON.replace("[10.0, 20.0, 30.0, 40.0]", "[10.0, 20.0]");
        assert!(matches!(
            ModelBundle::from_json(&json),
            Err(YieldCastError::InvalidData(_))
        ));
    }

    #[test]
    fn rejects_empty_vocabulary() {
        let json = BUNDLE_JSON.replace(r#"["Rice", "Wheat"]"#, "[]");
        assert!(ModelBundle::from_json(&json).is_err());
    }

    #[test]
    fn non_finite_output_is_prediction_failure() {
        let bundle = fixture_bundle();
        let scaled = [0.0, 0.0, f64::NAN, 0.0];
        // Zero coefficients still propagate NaN through the product
        assert!(matches!(
            bundle.regress(Target::Yield, &scaled),
            Err(YieldCastError::PredictionFailed(_))
        ));
    }

    #[test]
    fn load_round_trips_through_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_string(&fixture_bundle()).unwrap()).unwrap();

        let bundle = ModelBundle::load(file.path()).unwrap();
        assert_eq!(bundle.season_classes(), ["Kharif", "Rabi"]);
    }
}
