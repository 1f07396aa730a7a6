//! Numeric helpers shared by the scorer and the sector aggregator.
//!
//! Scores are reported with four decimal places everywhere.

/// Number of decimal places kept on every reported score.
pub const SCORE_DECIMALS: i32 = 4;

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Weighted mean of `values` using `weights` (paired by index).
///
/// Returns `None` when the slices are empty, have different lengths, or the
/// weights do not sum to a positive number. Callers pick their own fallback.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
    if values.is_empty() || values.len() != weights.len() {
        return None;
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return None;
    }
    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Some(weighted_sum / total_weight)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round to the reporting precision of a sentiment score.
pub fn round_score(value: f64) -> f64 {
    round_to(value, SCORE_DECIMALS)
}

/// Clamp into the sentiment range [-1, 1]. NaN maps to neutral.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-1.0, 1.0)
}
