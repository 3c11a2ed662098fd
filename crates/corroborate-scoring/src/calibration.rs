//! Quantile calibration of raw confidence scores into 1-5 ratings

/// Decimal places at which two scores count as tied for the flat case
const TIE_DECIMALS: i32 = 8;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Map a position in [0, 1] onto the 1-5 scale
fn rating(position: f64) -> u8 {
    let position = if position.is_nan() { 0.0 } else { position };
    (1.0 + position * 4.0).clamp(1.0, 5.0).round() as u8
}

/// Convert a population of scores into ordinal ratings
///
/// When every score rounds to the same value the whole batch gets one
/// rating: the first score placed on the absolute scale. Otherwise each score is
/// ranked (stable ascending sort, so equal scores keep input order) and
/// rated by its rank percentile `rank / (n - 1)`.
///
/// The output is aligned with the input.
///
/// # Examples
///
/// ```
/// use corroborate_scoring::calibrate;
///
/// assert_eq!(calibrate(&[0.5, 0.5, 0.5]), vec![3, 3, 3]);
/// assert_eq!(calibrate(&[0.9, 0.1, 0.3]), vec![5, 1, 3]);
/// ```
pub fn calibrate(scores: &[f64]) -> Vec<u8> {
    let Some(first) = scores.first() else {
        return Vec::new();
    };

    let rounded = round_to(*first, TIE_DECIMALS);
    if scores.iter().all(|s| round_to(*s, TIE_DECIMALS) == rounded) {
        let baseline = rating(*first);
        return vec![baseline; scores.len()];
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let span = (scores.len() - 1) as f64;
    let mut ratings = vec![0u8; scores.len()];
    for (rank, index) in order.into_iter().enumerate() {
        ratings[index] = rating(rank as f64 / span);
    }
    ratings
}
