use crate::config::DEFAULT_EXOGENOUS_BASELINE_YEAR;
use serde::Serialize;

/// Yield pressure from climate change, per year past the baseline
const CLIMATE_DECAY_PER_YEAR: f64 = 0.002;
/// Technology and agronomy gains, per year past the baseline
const TECH_GAIN_PER_YEAR: f64 = 0.008;

/// Combined climate/technology multiplier.
/// Always within `[ExogenousFactor::MIN, ExogenousFactor::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct ExogenousFactor(f64);

impl ExogenousFactor {
    pub const MIN: f64 = 0.8;
    pub const MAX: f64 = 1.3;

    pub fn clamped(value: f64) -> Self {
        ExogenousFactor(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Deterministic year-distance correction for external forces
#[derive(Debug, Clone, Copy)]
pub struct ExogenousAdjuster {
    baseline_year: i32,
}

impl ExogenousAdjuster {
    pub fn new(baseline_year: i32) -> Self {
        Self { baseline_year }
    }

    pub fn baseline_year(&self) -> i32 {
        self.baseline_year
    }

    pub fn factor(&self, year: i32) -> ExogenousFactor {
        let years_diff = (year - self.baseline_year) as f64;
        let climate_factor = 1.0 - years_diff * CLIMATE_DECAY_PER_YEAR;
        let tech_factor = 1.0 + years_diff * TECH_GAIN_PER_YEAR;
        ExogenousFactor::clamped(climate_factor * tech_factor)
    }

    pub fn apply(&self, year: i32, base_value: f64) -> f64 {
        base_value * self.factor(year).value()
    }
}

impl Default for ExogenousAdjuster {
    fn default() -> Self {
        Self::new(DEFAULT_EXOGENOUS_BASELINE_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_year_is_exactly_neutral() {
        let adjuster = ExogenousAdjuster::default();
        assert_eq!(adjuster.factor(2020).value(), 1.0);
        assert_eq!(adjuster.apply(2020, 1234.5), 1234.5);
    }

    #[test]
    fn near_future_net_gain() {
        let adjuster = ExogenousAdjuster::default();
        // 5 years: (1 - 0.01) * (1 + 0.04)
        let expected = 0.99 * 1.04;
        assert!((adjuster.factor(2025).value() - expected).abs() < 1e-12);
        assert!((adjuster.apply(2025, 100.0) - 100.0 * expected).abs() < 1e-9);
    }

    #[test]
    fn past_years_are_discounted() {
        let adjuster = ExogenousAdjuster::default();
        // 10 years back: (1 + 0.02) * (1 - 0.08)
        let expected = 1.02 * 0.92;
        assert!((adjuster.factor(2010).value() - expected).abs() < 1e-12);
    }

    #[test]
    fn factor_is_clamped() {
        let adjuster = ExogenousAdjuster::default();
        assert_eq!(adjuster.factor(2100).value(), ExogenousFactor::MAX);
        assert_eq!(adjuster.factor(1950).value(), ExogenousFactor::MIN);
        for year in (1900..2200).step_by(7) {
            let f = adjuster.factor(year).value();
            assert!((ExogenousFactor::MIN..=ExogenousFactor::MAX).contains(&f));
        }
    }

    #[test]
    fn custom_baseline() {
        let adjuster = ExogenousAdjuster::new(2015);
        assert_eq!(adjuster.baseline_year(), 2015);
        assert_eq!(adjuster.factor(2015).value(), 1.0);
    }
}
