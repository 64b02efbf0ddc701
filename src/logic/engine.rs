use super::calculations::round_to;
use super::{ConfidenceEstimator, ExogenousAdjuster, HistoricalTrendEstimator};
use crate::basemodel::{BaseModel, BaseModelHandle, FeatureVector, Target};
use crate::config::Config;
use crate::error::{Result, YieldCastError};
use crate::models::{
    AvailableOptions, HistoricalData, Prediction, PredictionRequest, PredictionResult, SummaryRow,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Decimal places for yield, production and productivity
const VALUE_PRECISION: u32 = 2;
/// Decimal places for confidence and trend factor
const FACTOR_PRECISION: u32 = 3;

/// Raw base-model output before any correction
#[derive(Debug, Clone, Copy)]
struct BaseOutput {
    crop_yield: f64,
    production: f64,
}

/// Corrects base-model output with historical trend and exogenous factors.
///
/// All state is read-only after construction, so one engine can be shared
/// across callers.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    model: BaseModelHandle,
    trend: HistoricalTrendEstimator,
    exogenous: ExogenousAdjuster,
    confidence: ConfidenceEstimator,
}

impl PredictionEngine {
    pub fn new(
        model: BaseModelHandle,
        history: Arc<HistoricalData>,
        exogenous: ExogenousAdjuster,
        confidence: ConfidenceEstimator,
    ) -> Self {
        Self {
            model,
            trend: HistoricalTrendEstimator::new(history),
            exogenous,
            confidence,
        }
    }

    /// Build from configuration, loading the model bundle and historical
    /// dataset. Neither file is required; missing ones degrade the engine.
    pub fn from_config(config: &Config, reference_year: i32) -> Self {
        let model = BaseModelHandle::load(&config.model.model_file);

        let history = match HistoricalData::load(&config.historical_data_path()) {
            Ok(data) => data,
            Err(e) => {
                warn!("Error loading historical data: {}", e);
                HistoricalData::empty()
            }
        };

        Self::new(
            model,
            Arc::new(history),
            ExogenousAdjuster::new(config.adjustment.exogenous_baseline_year),
            ConfidenceEstimator::new(reference_year),
        )
    }

    pub fn model(&self) -> &BaseModelHandle {
        &self.model
    }

    pub fn history(&self) -> &HistoricalData {
        self.trend.history()
    }

    pub fn reference_year(&self) -> i32 {
        self.confidence.reference_year()
    }

    /// Predict for one (crop, season, area, year). Never fails: errors come
    /// back as `PredictionResult::Failure`.
    pub fn predict(&self, crop: &str, season: &str, area: f64, year: i32) -> PredictionResult {
        self.predict_request(&PredictionRequest::new(crop, season, area, year))
    }

    pub fn predict_request(&self, request: &PredictionRequest) -> PredictionResult {
        let result = self.try_predict(request);
        if let Err(ref e) = result {
            debug!(
                crop = %request.crop,
                season = %request.season,
                year = request.year,
                "Prediction rejected: {}",
                e
            );
        }
        result.into()
    }

    pub fn try_predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        let model = self.model.model()?;

        let base = self.base_output(model, request)?;

        let trend_factor = self
            .trend
            .estimate(&request.crop, &request.season, request.year)
            .value();

        let adjusted_yield = self
            .exogenous
            .apply(request.year, base.crop_yield * trend_factor);
        let adjusted_production = self
            .exogenous
            .apply(request.year, base.production * trend_factor);

        // Negative agricultural output is not physical
        let predicted_yield = adjusted_yield.max(0.0);
        let predicted_production = adjusted_production.max(0.0);

        if !predicted_yield.is_finite() || !predicted_production.is_finite() {
            return Err(YieldCastError::PredictionFailed(
                "adjusted prediction is not finite".into(),
            ));
        }

        let productivity = if request.area > 0.0 {
            predicted_production / request.area
        } else {
            0.0
        };

        let confidence = self.confidence.estimate(request.year);

        debug!(
            crop = %request.crop,
            season = %request.season,
            year = request.year,
            base_yield = base.crop_yield,
            base_production = base.production,
            trend_factor,
            "Prediction computed"
        );

        Ok(Prediction {
            crop: request.crop.clone(),
            season: request.season.clone(),
            area: request.area,
            year: request.year,
            predicted_yield: round_to(predicted_yield, VALUE_PRECISION),
            predicted_production: round_to(predicted_production, VALUE_PRECISION),
            productivity: round_to(productivity, VALUE_PRECISION),
            confidence: round_to(confidence, FACTOR_PRECISION),
            trend_factor: round_to(trend_factor, FACTOR_PRECISION),
            years_projected: self.confidence.years_from_reference(request.year),
        })
    }

    fn base_output(&self, model: &dyn BaseModel, request: &PredictionRequest) -> Result<BaseOutput> {
        let crop_code = model.encode_crop(&request.crop)?;
        let season_code = model.encode_season(&request.season)?;
        let year_normalized = (request.year - model.baseline_year()) as f64;

        let features: FeatureVector = [crop_code, season_code, request.area, year_normalized];

        let yield_scaled = model.scale(Target::Yield, &features)?;
        let production_scaled = model.scale(Target::Production, &features)?;

        Ok(BaseOutput {
            crop_yield: model.regress(Target::Yield, &yield_scaled)?,
            production: model.regress(Target::Production, &production_scaled)?,
        })
    }

    /// Predict each year in order, dropping years that fail
    pub fn predict_series(
        &self,
        crop: &str,
        season: &str,
        area: f64,
        years: &[i32],
    ) -> Vec<Prediction> {
        years
            .iter()
            .filter_map(|&year| self.predict(crop, season, area, year).into_prediction())
            .collect()
    }

    pub fn prediction_summary(
        &self,
        crop: &str,
        season: &str,
        area: f64,
        years: &[i32],
    ) -> Vec<SummaryRow> {
        self.predict_series(crop, season, area, years)
            .iter()
            .map(SummaryRow::from)
            .collect()
    }

    /// Crops and seasons the model knows, or the default lists without a model
    pub fn available_options(&self) -> AvailableOptions {
        match self.model.model() {
            Ok(model) => AvailableOptions {
                crops: model.crop_classes().to_vec(),
                seasons: model.season_classes().to_vec(),
            },
            Err(_) => AvailableOptions::default(),
        }
    }
}
