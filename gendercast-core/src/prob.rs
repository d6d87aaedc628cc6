use crate::{Float, Vector};

/// Computes `ln(Σ exp(x_i))` without overflowing.
///
/// Naive Bayes scores are sums of log-probabilities and are routinely far
/// below `-700`, where `exp` underflows to zero. Shifting by the maximum
/// keeps the largest term at `exp(0) = 1`:
///
/// ```text
/// lse(x) = m + ln Σ_i exp(x_i − m),   m = max_i x_i
/// ```
///
/// # Returns
///
/// - `Float::NEG_INFINITY` if `scores` is empty or every entry is `-∞`
///   (a distribution with zero total mass).
///
/// # Examples
///
/// ```rust
/// use gendercast_core::{prob::log_sum_exp, Vector};
///
/// let scores = Vector::from_vec(vec![(0.25f64).ln(), (0.75f64).ln()]);
/// assert!(log_sum_exp(&scores).abs() < 1e-12);
/// ```
pub fn log_sum_exp(scores: &Vector) -> Float {
    if scores.is_empty() {
        return Float::NEG_INFINITY;
    }

    let m = scores.max();
    if m == Float::NEG_INFINITY {
        return Float::NEG_INFINITY;
    }

    let sum: Float = scores.iter().map(|&s| (s - m).exp()).sum();
    m + sum.ln()
}

/// Turns log-scores into probabilities that sum to one.
///
/// Returns `None` when the scores carry no mass at all.
pub fn normalize_log_scores(scores: &Vector) -> Option<Vector> {
    let total = log_sum_exp(scores);
    if total == Float::NEG_INFINITY || total.is_nan() {
        return None;
    }

    Some(scores.map(|s| (s - total).exp()))
}

/// Index of the largest score.
///
/// On an exact tie `wins_tie(candidate, current)` decides whether the later
/// index replaces the one held so far.
pub fn argmax_by<F>(scores: &Vector, wins_tie: F) -> Option<usize>
where
    F: Fn(usize, usize) -> bool,
{
    let mut best: Option<(usize, Float)> = None;

    for (i, &s) in scores.iter().enumerate() {
        match best {
            Some((j, b)) if s < b || (s == b && !wins_tie(i, j)) => {}
            _ => best = Some((i, s)),
        }
    }

    best.map(|(i, _)| i)
}
