pub const BASE_CONFIDENCE: f64 = 0.85;
const DECAY_PER_YEAR: f64 = 0.05;
const MIN_MULTIPLIER: f64 = 0.6;

/// Confidence that decays linearly with distance from the reference year,
/// floored at `BASE_CONFIDENCE * 0.6`.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceEstimator {
    reference_year: i32,
}

impl ConfidenceEstimator {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn years_from_reference(&self, target_year: i32) -> u32 {
        target_year.abs_diff(self.reference_year)
    }

    pub fn estimate(&self, target_year: i32) -> f64 {
        let years_ahead = self.years_from_reference(target_year) as f64;
        BASE_CONFIDENCE * (1.0 - years_ahead * DECAY_PER_YEAR).max(MIN_MULTIPLIER)
    }

    pub fn floor() -> f64 {
        BASE_CONFIDENCE * MIN_MULTIPLIER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_year_has_base_confidence() {
        let est = ConfidenceEstimator::new(2025);
        assert_eq!(est.estimate(2025), BASE_CONFIDENCE);
    }

    #[test]
    fn decays_symmetrically() {
        let est = ConfidenceEstimator::new(2025);
        assert!((est.estimate(2027) - 0.85 * 0.9).abs() < 1e-12);
        assert!((est.estimate(2023) - 0.85 * 0.9).abs() < 1e-12);
    }

    #[test]
    fn monotone_and_floored() {
        let est = ConfidenceEstimator::new(2025);
        let mut previous = f64::INFINITY;
        for distance in 0..40 {
            let c = est.estimate(2025 + distance);
            assert!(c <= previous);
            assert!(c >= ConfidenceEstimator::floor() - 1e-12);
            previous = c;
        }
        assert!((est.estimate(2100) - 0.51).abs() < 1e-12);
    }

    #[test]
    fn distance_is_absolute() {
        let est = ConfidenceEstimator::new(2025);
        assert_eq!(est.years_from_reference(2020), 5);
        assert_eq!(est.years_from_reference(2030), 5);
        assert_eq!(est.reference_year(), 2025);
    }
}
