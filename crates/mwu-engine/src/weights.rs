//! Weight vector operations.
//!
//! Small helpers over plain `[f64]` weight vectors, used by the [`update`](crate::update)
//! drivers and by [`WeightMap`](crate::WeightMap):
//!
//! - **Initialization**: [`uniform`] builds the multi-round starting state
//! - **Distribution**: [`total`] and [`probabilities`] view weights as a sampling distribution
//! - **Update rule**: [`multiplicative_factor`] is the factor applied to a rewarded weight
//!
//! All distribution helpers use [`selection_mass`], so negative or NaN weights count as zero and
//! `+inf` weights dominate.

use crate::sample::{self, selection_mass};

/// Creates a weight vector with every entry set to `1.0`.
///
/// # Examples
///
/// ```
/// use mwu_engine::weights;
///
/// assert_eq!(weights::uniform(3), vec![1.0, 1.0, 1.0]);
/// assert!(weights::uniform(0).is_empty());
/// ```
#[must_use]
pub fn uniform(len: usize) -> Vec<f64> {
    vec![1.0; len]
}

/// Returns the total selection mass of `weights`.
///
/// The update drivers treat a zero total as a degenerate distribution and skip the update. The
/// total is `+inf` if any weight is, or if the masses overflow when summed.
#[must_use]
pub fn total(weights: &[f64]) -> f64 {
    weights.iter().copied().map(selection_mass).sum()
}

/// Returns the sampling distribution induced by `weights`.
///
/// Each entry is `mass(i) / total`, matching the odds of [`choose_index`](sample::choose_index).
/// While some weights are `+inf`, they share the whole distribution equally. Returns `None` if
/// the total is zero (including the empty case), since no distribution exists then.
///
/// # Examples
///
/// ```
/// use mwu_engine::weights;
///
/// assert_eq!(weights::probabilities(&[1.0, 3.0]), Some(vec![0.25, 0.75]));
/// assert_eq!(weights::probabilities(&[f64::INFINITY, 3.0]), Some(vec![1.0, 0.0]));
/// assert_eq!(weights::probabilities(&[0.0, 0.0]), None);
/// ```
#[must_use]
pub fn probabilities(weights: &[f64]) -> Option<Vec<f64>> {
    let masses = sample::finite_masses(weights)?;
    let total = masses.iter().sum::<f64>();
    Some(masses.iter().map(|m| m / total).collect())
}

/// Returns the factor `1 + eta * reward` applied to a rewarded weight.
///
/// The result is not clamped: with `eta * reward < -1` it is negative.
///
/// # Examples
///
/// ```
/// use mwu_engine::weights;
///
/// assert_eq!(weights::multiplicative_factor(0.5, 1.0), 1.5);
/// assert_eq!(weights::multiplicative_factor(0.5, 0.0), 1.0);
/// ```
#[must_use]
pub fn multiplicative_factor(eta: f64, reward: f64) -> f64 {
    1.0 + eta * reward
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_ignores_degenerate_weights() {
        assert_eq!(total(&[]), 0.0);
        assert_eq!(total(&[1.0, -2.0, f64::NAN, 0.5]), 1.5);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let probs = probabilities(&[2.0, 0.0, 6.0]).unwrap();
        assert_eq!(probs, vec![0.25, 0.0, 0.75]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_of_empty_is_none() {
        assert_eq!(probabilities(&[]), None);
    }

    #[test]
    fn test_probabilities_with_infinite_weights() {
        assert_eq!(
            probabilities(&[f64::INFINITY, 1.0, f64::INFINITY]),
            Some(vec![0.5, 0.0, 0.5])
        );
        assert_eq!(total(&[f64::INFINITY, 1.0]), f64::INFINITY);
    }

    #[test]
    fn test_probabilities_of_overflowing_total() {
        assert_eq!(probabilities(&[f64::MAX, f64::MAX]), Some(vec![0.5, 0.5]));
    }

    #[test]
    fn test_negative_factor_is_not_clamped() {
        assert_eq!(multiplicative_factor(2.0, -1.0), -1.0);
    }
}
