pub mod bundle;

pub use bundle::ModelBundle;

use crate::error::{Result, YieldCastError};
use std::path::Path;
use std::sync::Arc;

/// Number of features fed to the base regressors:
/// `[crop_code, season_code, area, year_normalized]`
pub const FEATURE_COUNT: usize = 4;

pub type FeatureVector = [f64; FEATURE_COUNT];

/// Which regressor (and scaler) a feature vector is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Yield,
    Production,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Yield => "yield",
            Target::Production => "production",
        }
    }
}

/// Opaque statistical model the engine corrects: encode, scale, regress.
pub trait BaseModel: Send + Sync {
    fn crop_classes(&self) -> &[String];

    fn season_classes(&self) -> &[String];

    /// Fails with `UnknownCrop` for categories outside the vocabulary
    fn encode_crop(&self, crop: &str) -> Result<f64>;

    /// Fails with `UnknownSeason` for categories outside the vocabulary
    fn encode_season(&self, season: &str) -> Result<f64>;

    /// Year the model's year feature was normalized against during training
    fn baseline_year(&self) -> i32;

    fn scale(&self, target: Target, features: &FeatureVector) -> Result<FeatureVector>;

    fn regress(&self, target: Target, scaled: &FeatureVector) -> Result<f64>;
}

/// Base model capability: either loaded and ready for inference, or absent.
#[derive(Clone)]
pub enum BaseModelHandle {
    Loaded(Arc<dyn BaseModel>),
    Unavailable,
}

impl BaseModelHandle {
    pub fn loaded<M: BaseModel + 'static>(model: M) -> Self {
        BaseModelHandle::Loaded(Arc::new(model))
    }

    /// Load a JSON model bundle. Absence or a broken bundle leaves the
    /// handle unavailable rather than failing startup.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "No saved models found - predictions unavailable until a model bundle is provided"
            );
            return BaseModelHandle::Unavailable;
        }

        match ModelBundle::load(path) {
            Ok(bundle) => {
                tracing::info!(
                    path = %path.display(),
                    crops = bundle.crop_classes().len(),
                    seasons = bundle.season_classes().len(),
                    "Models loaded"
                );
                Self::loaded(bundle)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Error loading models: {}", e);
                BaseModelHandle::Unavailable
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, BaseModelHandle::Loaded(_))
    }

    pub fn model(&self) -> Result<&dyn BaseModel> {
        match self {
            BaseModelHandle::Loaded(model) => Ok(model.as_ref()),
            BaseModelHandle::Unavailable => Err(YieldCastError::ModelUnavailable),
        }
    }
}

impl std::fmt::Debug for BaseModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseModelHandle::Loaded(model) => f
                .debug_struct("Loaded")
                .field("crops", &model.crop_classes().len())
                .field("seasons", &model.season_classes().len())
                .field("baseline_year", &model.baseline_year())
                .finish(),
            BaseModelHandle::Unavailable => write!(f, "Unavailable"),
        }
    }
}
