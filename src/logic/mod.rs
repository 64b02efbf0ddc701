pub mod analytics;
pub mod calculations;
pub mod confidence;
pub mod engine;
pub mod exogenous;
pub mod trend;

pub use confidence::ConfidenceEstimator;
pub use engine::PredictionEngine;
pub use exogenous::ExogenousAdjuster;
pub use trend::HistoricalTrendEstimator;
