//! Target selection by walking the cumulative target distribution.

use rand::Rng;
use tracing::warn;

use crate::slot::NUM_SLOTS;

/// Pick the slot whose cumulative probability first exceeds `r`.
///
/// `r` is expected in `[0, 1)`. When the weights sum to slightly less than
/// one and `r` lands above the cumulative total, the scan falls back to the
/// last slot carrying any weight (or the last slot if every weight is zero).
pub fn choose_target(distribution: &[f64; NUM_SLOTS], r: f64) -> usize {
    let mut cumulative = 0.0;
    for (idx, weight) in distribution.iter().enumerate() {
        cumulative += weight;
        if cumulative > r {
            return idx;
        }
    }

    let fallback = distribution
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(NUM_SLOTS - 1);
    warn!(
        r,
        cumulative, fallback, "random draw exceeded cumulative distribution"
    );
    fallback
}

/// Draw a uniform value from `rng` and select the matching slot
pub fn draw_target<R: Rng + ?Sized>(distribution: &[f64; NUM_SLOTS], rng: &mut R) -> usize {
    let r: f64 = rng.gen();
    choose_target(distribution, r)
}
