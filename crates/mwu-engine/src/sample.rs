//! Weighted sampling shared by every update operation.
//!
//! [`choose_index`] draws one index with probability proportional to its weight. Weights that
//! are negative or NaN contribute zero [`selection_mass`], so they are never chosen while another
//! entry has positive mass, yet they stay in the population. A weight that overflowed to `+inf`
//! dominates: while any entry is infinite, only infinite entries are drawn, uniformly.
//!
//! The [`WeightedChoice`] trait is the seam used by the engine. Any [`Rng`] implements it via
//! [`choose_index`]; tests can implement it on a scripted type to force specific draws.

use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
};

/// A source of weighted random choices.
pub trait WeightedChoice {
    /// Returns an index into `weights`, chosen with probability proportional to its
    /// [`selection_mass`], or `None` if no entry has positive mass.
    fn choose_index(&mut self, weights: &[f64]) -> Option<usize>;
}

impl<R> WeightedChoice for R
where
    R: Rng + ?Sized,
{
    fn choose_index(&mut self, weights: &[f64]) -> Option<usize> {
        choose_index(weights, self)
    }
}

/// Returns the mass `weight` contributes to sampling.
///
/// Positive weights, including `+inf`, count as-is; everything else counts as zero.
///
/// # Examples
///
/// ```
/// use mwu_engine::sample::selection_mass;
///
/// assert_eq!(selection_mass(2.5), 2.5);
/// assert_eq!(selection_mass(f64::INFINITY), f64::INFINITY);
/// assert_eq!(selection_mass(-1.0), 0.0);
/// assert_eq!(selection_mass(f64::NAN), 0.0);
/// ```
#[must_use]
pub fn selection_mass(weight: f64) -> f64 {
    if weight > 0.0 { weight } else { 0.0 }
}

/// Returns the selection masses of `weights`, scaled so that their sum is finite.
///
/// If any mass is infinite, infinite entries get `1.0` and all others `0.0`. If the masses are
/// finite but their sum overflows, they are divided by the largest one. Returns `None` if no
/// entry has positive mass.
pub(crate) fn finite_masses(weights: &[f64]) -> Option<Vec<f64>> {
    let masses = weights
        .iter()
        .copied()
        .map(selection_mass)
        .collect::<Vec<_>>();
    let total = masses.iter().sum::<f64>();
    if total <= 0.0 {
        return None;
    }
    if total.is_finite() {
        return Some(masses);
    }

    if masses.iter().any(|m| m.is_infinite()) {
        return Some(
            masses
                .iter()
                .map(|m| if m.is_infinite() { 1.0 } else { 0.0 })
                .collect(),
        );
    }
    let max = masses.iter().copied().fold(0.0, f64::max);
    Some(masses.iter().map(|m| m / max).collect())
}

/// Draws one index with probability `mass(i) / total`.
///
/// Returns `None` if `weights` is empty or the total selection mass is zero.
///
/// If some weights are `+inf`, one of them is drawn uniformly. If the masses are individually
/// finite but their sum overflows, they are rescaled by the largest mass before sampling.
/// Proportions are unchanged.
///
/// # Arguments
///
/// * `weights` - Weights of the population, one per entry
/// * `rng` - Random number generator
pub fn choose_index<R>(weights: &[f64], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let masses = finite_masses(weights)?;
    let dist = WeightedIndex::<f64>::new(&masses).ok()?;
    Some(dist.sample(rng))
}
