//! Caller-supplied strategies consulted by the update drivers.
//!
//! The engine never decides what an outcome is or how favorable it was. Those decisions are
//! injected through three small traits:
//!
//! - [`Event`] - evaluates the outcome of the chosen object
//! - [`Reward`] - scores an outcome for the chosen object ([`run`](crate::update::run) and
//!   [`step`](crate::update::step))
//! - [`GlobalReward`] - scores an outcome for every object
//!   ([`step_all`](crate::update::step_all))
//!
//! Every trait is fallible with a caller-chosen error type `E`, which the `try_` drivers
//! propagate unchanged. Closures returning `Result` implement the traits directly; stateful
//! strategies can implement them on a struct instead:
//!
//! ```
//! use std::convert::Infallible;
//!
//! use mwu_engine::{Event, update};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//!
//! /// Counts how often each object was evaluated.
//! struct Tally(Vec<usize>);
//!
//! impl Event<usize, usize, Infallible> for Tally {
//!     fn outcome(&mut self, object: &usize) -> Result<usize, Infallible> {
//!         self.0[*object] += 1;
//!         Ok(*object)
//!     }
//! }
//!
//! let mut tally = Tally(vec![0; 3]);
//! let mut rng = Pcg64::seed_from_u64(0);
//! let weights = update::try_run(
//!     &[0, 1, 2],
//!     &mut tally,
//!     &mut |_: &usize| Ok(0.0),
//!     5,
//!     0.1,
//!     &mut rng,
//! )
//! .unwrap();
//!
//! assert_eq!(weights, vec![1.0; 3]);
//! assert_eq!(tally.0.iter().sum::<usize>(), 5);
//! ```

/// Evaluates the outcome of a chosen object.
pub trait Event<T, O, E> {
    /// Returns the outcome observed for `object`.
    fn outcome(&mut self, object: &T) -> Result<O, E>;
}

impl<T, O, E, F> Event<T, O, E> for F
where
    F: FnMut(&T) -> Result<O, E>,
{
    fn outcome(&mut self, object: &T) -> Result<O, E> {
        self(object)
    }
}

/// Scores an outcome for the object that produced it.
///
/// Positive rewards increase the weight, negative rewards decrease it and zero leaves it
/// unchanged.
pub trait Reward<O, E> {
    /// Returns the signed reward for `outcome`.
    fn reward(&mut self, outcome: &O) -> Result<f64, E>;
}

impl<O, E, F> Reward<O, E> for F
where
    F: FnMut(&O) -> Result<f64, E>,
{
    fn reward(&mut self, outcome: &O) -> Result<f64, E> {
        self(outcome)
    }
}

/// Scores a single realized outcome for every object in the population.
///
/// Used by [`step_all`](crate::update::step_all), e.g. to reward the objects that predicted
/// the outcome and penalize the others.
pub trait GlobalReward<T, O, E> {
    /// Returns the signed reward for `object` given the round's `outcome`.
    fn reward(&mut self, object: &T, outcome: &O) -> Result<f64, E>;
}

impl<T, O, E, F> GlobalReward<T, O, E> for F
where
    F: FnMut(&T, &O) -> Result<f64, E>,
{
    fn reward(&mut self, object: &T, outcome: &O) -> Result<f64, E> {
        self(object, outcome)
    }
}
