//! Score derived from survival time and coins

use super::state::GameState;
use crate::consts::{SCORE_PER_COIN, SCORE_PER_SECOND};

/// `floor(elapsed * 10 + coins * 50)`, with negative time treated as zero
pub fn compute(elapsed_secs: f64, coins: u32) -> u64 {
    let elapsed = elapsed_secs.max(0.0);
    (elapsed * SCORE_PER_SECOND + coins as f64 * SCORE_PER_COIN).floor() as u64
}

/// Recompute and store the run's score
pub fn update(state: &mut GameState) -> u64 {
    let score = compute(state.elapsed_secs(), state.run.coins);
    state.run.score = score;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_scores() {
        assert_eq!(compute(1.0, 0), 10);
        assert_eq!(compute(1.0, 1), 60);
        assert_eq!(compute(0.0, 0), 0);
        assert_eq!(compute(2.55, 3), 175);
    }

    #[test]
    fn test_negative_elapsed_clamped() {
        assert_eq!(compute(-4.0, 2), 100);
    }

    proptest! {
        #[test]
        fn prop_score_monotone(t in 0.0f64..36_000.0, dt in 0.0f64..100.0, c in 0u32..10_000, dc in 0u32..100) {
            let base = compute(t, c);
            prop_assert!(compute(t + dt, c) >= base);
            prop_assert!(compute(t, c + dc) >= base);
            prop_assert_eq!(base, (10.0 * t + 50.0 * c as f64).floor() as u64);
        }
    }
}
