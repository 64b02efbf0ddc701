use thiserror::Error;

#[derive(Error, Debug)]
pub enum YieldCastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Models not loaded. Please train models first.")]
    ModelUnavailable,

    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),
}

impl YieldCastError {
    /// Message shown to callers of the prediction boundary.
    ///
    /// Anything outside the engine taxonomy is reported as a generic
    /// prediction failure carrying the underlying detail.
    pub fn prediction_message(&self) -> String {
        match self {
            YieldCastError::ModelUnavailable
            | YieldCastError::UnknownCrop(_)
            | YieldCastError::UnknownSeason(_)
            | YieldCastError::PredictionFailed(_) => self.to_string(),
            other => format!("Prediction failed: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, YieldCastError>;
