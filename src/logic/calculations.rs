/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Ordinary least squares slope of `ys` against `xs`.
///
/// Returns `None` when the inputs differ in length, have fewer than two
/// points, all share the same x, or produce a non-finite slope.
pub fn ols_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let x_mean = mean(xs)?;
    let y_mean = mean(ys)?;

    let (covariance, variance) =
        xs.iter()
            .zip(ys.iter())
            .fold((0.0, 0.0), |(cov, var), (x, y)| {
                let dx = x - x_mean;
                (cov + dx * (y - y_mean), var + dx * dx)
            });

    if variance == 0.0 {
        return None;
    }

    let slope = covariance / variance;
    slope.is_finite().then_some(slope)
}

/// Round half away from zero to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Centered moving average. Positions without a full window are `None`.
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let half = window / 2;
    (0..values.len())
        .map(|i| {
            if i < half || i + (window - half) > values.len() {
                None
            } else {
                mean(&values[i - half..i - half + window])
            }
        })
        .collect()
}

/// Average annual compound growth rate in percent between two observations
pub fn compound_annual_growth(first: f64, last: f64, years: i32) -> Option<f64> {
    if years <= 0 || first <= 0.0 {
        return None;
    }

    let rate = ((last / first).powf(1.0 / years as f64) - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}
