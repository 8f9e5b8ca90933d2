//! Multiplicative weights update drivers.
//!
//! Three operations share the [`WeightedChoice`] sampling seam and differ in which weights they
//! rescale and by how much:
//!
//! | Operation       | Weights            | Rescaled objects | Factor           |
//! |-----------------|--------------------|------------------|------------------|
//! | [`run`]         | uniform `1.0` init | chosen only      | `1 + eta * r`    |
//! | [`step`]        | caller's map       | chosen only      | `1 + r`          |
//! | [`step_all`]    | caller's map       | every object     | `1 + r(object)`  |
//!
//! # Degenerate Inputs
//!
//! None of the drivers fail on degenerate input:
//!
//! - An empty population yields empty output.
//! - A zero total selection mass skips the update: [`run`] stops early and returns the current
//!   weights, [`step`] and [`step_all`] return a copy of their input. No strategy is called.
//! - `rounds == 0` makes [`run`] return uniform weights without calling any strategy.
//!
//! # Failures and Atomicity
//!
//! The `try_` variants propagate the first strategy error unchanged. Weights are only touched
//! once every strategy call of the round has succeeded, so a failed round leaves no partial
//! update. The single-round drivers borrow the caller's map and always return a new one.
//!
//! # Panics
//!
//! All drivers panic if the [`WeightedChoice`] returns an index outside the population, or no
//! index although the total selection mass is positive.

use std::convert::Infallible;

use tracing::{debug, trace};

use crate::{
    sample::WeightedChoice,
    strategy::{Event, GlobalReward, Reward},
    weight_map::WeightMap,
    weights,
};

/// Runs `rounds` multiplicative weights updates over `objects`.
///
/// Weights start at `1.0`. Each round draws one object proportionally to its weight, evaluates
/// `event` on it and `reward` on the outcome, and multiplies only the chosen weight by
/// `1 + eta * r`. Duplicate objects are independent entries.
///
/// # Arguments
///
/// * `objects` - Population; the result is aligned with it
/// * `event` - Evaluates the outcome of the chosen object
/// * `reward` - Scores the outcome
/// * `rounds` - Number of rounds to run
/// * `eta` - Learning rate (typically small, e.g. `0.1`)
/// * `chooser` - Source of weighted choices
///
/// # Returns
///
/// The final weights, or the first error returned by a strategy.
pub fn try_run<T, O, E, Ev, Rw, C>(
    objects: &[T],
    event: &mut Ev,
    reward: &mut Rw,
    rounds: usize,
    eta: f64,
    chooser: &mut C,
) -> Result<Vec<f64>, E>
where
    Ev: Event<T, O, E> + ?Sized,
    Rw: Reward<O, E> + ?Sized,
    C: WeightedChoice + ?Sized,
{
    let mut weights = weights::uniform(objects.len());
    for round in 0..rounds {
        let Some(index) = draw(&weights, chooser) else {
            debug!(round, rounds, "total weight is zero, stopping early");
            break;
        };
        let outcome = event.outcome(&objects[index])?;
        let r = reward.reward(&outcome)?;
        weights[index] *= weights::multiplicative_factor(eta, r);
        trace!(round, index, reward = r, weight = weights[index], "updated chosen weight");
    }
    Ok(weights)
}

/// Infallible version of [`try_run`] taking plain closures.
///
/// # Examples
///
/// ```
/// use mwu_engine::update;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg64;
///
/// let mut rng = Pcg64::seed_from_u64(0);
/// let weights = update::run(
///     &[0, 1, 2],
///     |x: &i32| *x,
///     |x: &i32| if *x == 0 { 1.0 } else { -1.0 },
///     10,
///     0.2,
///     &mut rng,
/// );
///
/// assert_eq!(weights.len(), 3);
/// assert!(weights[0] >= 1.0);
/// assert!(weights[1] <= 1.0 && weights[2] <= 1.0);
/// ```
pub fn run<T, O, EvF, RwF, C>(
    objects: &[T],
    mut event: EvF,
    mut reward: RwF,
    rounds: usize,
    eta: f64,
    chooser: &mut C,
) -> Vec<f64>
where
    EvF: FnMut(&T) -> O,
    RwF: FnMut(&O) -> f64,
    C: WeightedChoice + ?Sized,
{
    try_run(
        objects,
        &mut |object: &T| Ok::<_, Infallible>(event(object)),
        &mut |outcome: &O| Ok(reward(outcome)),
        rounds,
        eta,
        chooser,
    )
    .unwrap_or_else(|never| match never {})
}

/// Performs one self-reward update on a weight map.
///
/// Draws one object proportionally to its weight, evaluates `event` on it and `reward` on the
/// outcome, and multiplies only the chosen weight by `1 + r`. There is no learning rate; scale
/// the reward instead.
///
/// # Returns
///
/// A new map with the same keys in the same order, or the first error returned by a strategy.
pub fn try_step<T, O, E, Ev, Rw, C>(
    event: &mut Ev,
    reward: &mut Rw,
    objects: &WeightMap<T>,
    chooser: &mut C,
) -> Result<WeightMap<T>, E>
where
    T: Clone,
    Ev: Event<T, O, E> + ?Sized,
    Rw: Reward<O, E> + ?Sized,
    C: WeightedChoice + ?Sized,
{
    let Some(index) = draw(objects.weights(), chooser) else {
        debug!(len = objects.len(), "total weight is zero, skipping update");
        return Ok(objects.clone());
    };
    let outcome = event.outcome(&objects.keys()[index])?;
    let r = reward.reward(&outcome)?;

    let mut updated = objects.clone();
    let weight = &mut updated.weights_mut()[index];
    *weight *= weights::multiplicative_factor(1.0, r);
    trace!(index, reward = r, weight = *weight, "updated chosen weight");
    Ok(updated)
}

/// Infallible version of [`try_step`] taking plain closures.
///
/// # Examples
///
/// ```
/// use mwu_engine::{WeightMap, update};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg64;
///
/// let mut rng = Pcg64::seed_from_u64(0);
/// let weights = WeightMap::uniform(["only"], 2.0);
/// let updated = update::step(|x: &&str| *x, |_: &&str| 0.5, &weights, &mut rng);
///
/// assert_eq!(updated.get(&"only"), Some(3.0));
/// assert_eq!(weights.get(&"only"), Some(2.0));
/// ```
pub fn step<T, O, EvF, RwF, C>(
    mut event: EvF,
    mut reward: RwF,
    objects: &WeightMap<T>,
    chooser: &mut C,
) -> WeightMap<T>
where
    T: Clone,
    EvF: FnMut(&T) -> O,
    RwF: FnMut(&O) -> f64,
    C: WeightedChoice + ?Sized,
{
    try_step(
        &mut |object: &T| Ok::<_, Infallible>(event(object)),
        &mut |outcome: &O| Ok(reward(outcome)),
        objects,
        chooser,
    )
    .unwrap_or_else(|never| match never {})
}

/// Performs one global-reward update on a weight map.
///
/// Draws one object proportionally to its weight and evaluates `outcome` on it. Then every
/// object `o`, in map order and including the chosen one, is scored with `reward(o, result)`
/// and its weight multiplied by `1 + r`. All rewards are computed before any weight changes.
///
/// # Returns
///
/// A new map with the same keys in the same order, or the first error returned by a strategy.
pub fn try_step_all<T, O, E, Ev, Rw, C>(
    outcome: &mut Ev,
    reward: &mut Rw,
    objects: &WeightMap<T>,
    chooser: &mut C,
) -> Result<WeightMap<T>, E>
where
    T: Clone,
    Ev: Event<T, O, E> + ?Sized,
    Rw: GlobalReward<T, O, E> + ?Sized,
    C: WeightedChoice + ?Sized,
{
    let Some(index) = draw(objects.weights(), chooser) else {
        debug!(len = objects.len(), "total weight is zero, skipping update");
        return Ok(objects.clone());
    };
    let result = outcome.outcome(&objects.keys()[index])?;
    let factors = objects
        .keys()
        .iter()
        .map(|object| {
            reward
                .reward(object, &result)
                .map(|r| weights::multiplicative_factor(1.0, r))
        })
        .collect::<Result<Vec<_>, E>>()?;

    let mut updated = objects.clone();
    for (weight, factor) in updated.weights_mut().iter_mut().zip(factors) {
        *weight *= factor;
    }
    trace!(index, weights = ?updated.weights(), "updated all weights");
    Ok(updated)
}

/// Infallible version of [`try_step_all`] taking plain closures.
pub fn step_all<T, O, EvF, RwF, C>(
    mut outcome: EvF,
    mut reward: RwF,
    objects: &WeightMap<T>,
    chooser: &mut C,
) -> WeightMap<T>
where
    T: Clone,
    EvF: FnMut(&T) -> O,
    RwF: FnMut(&T, &O) -> f64,
    C: WeightedChoice + ?Sized,
{
    try_step_all(
        &mut |object: &T| Ok::<_, Infallible>(outcome(object)),
        &mut |object: &T, result: &O| Ok(reward(object, result)),
        objects,
        chooser,
    )
    .unwrap_or_else(|never| match never {})
}

/// Draws an index, or returns `None` if the distribution is degenerate.
///
/// The zero-total check happens before the chooser is consulted, so a scripted chooser cannot
/// force a draw from an all-zero population.
fn draw<C>(weights: &[f64], chooser: &mut C) -> Option<usize>
where
    C: WeightedChoice + ?Sized,
{
    let total = weights::total(weights);
    if total <= 0.0 {
        return None;
    }
    let Some(index) = chooser.choose_index(weights) else {
        panic!("weighted choice returned no index for a total selection mass of {total}");
    };
    assert!(
        index < weights.len(),
        "weighted choice returned index {index} for a population of {}",
        weights.len()
    );
    Some(index)
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, collections::VecDeque};

    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    /// Replays a fixed sequence of indices.
    struct Scripted(VecDeque<usize>);

    impl Scripted {
        fn new<I>(indices: I) -> Self
        where
            I: IntoIterator<Item = usize>,
        {
            Self(indices.into_iter().collect())
        }
    }

    impl WeightedChoice for Scripted {
        fn choose_index(&mut self, _weights: &[f64]) -> Option<usize> {
            self.0.pop_front()
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Boom;

    fn ab(a: f64, b: f64) -> WeightMap<&'static str> {
        [("a", a), ("b", b)].into_iter().collect()
    }

    #[test]
    fn test_run_zero_rounds_is_uniform_without_calls() {
        let calls = Cell::new(0);
        let weights = run(
            &["x", "y", "x"],
            |o: &&str| {
                calls.set(calls.get() + 1);
                *o
            },
            |_: &&str| 1.0,
            0,
            0.1,
            &mut Pcg64::seed_from_u64(0),
        );
        assert_eq!(weights, vec![1.0, 1.0, 1.0]);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_run_empty_objects() {
        let calls = Cell::new(0);
        let weights = run(
            &[] as &[u8],
            |o: &u8| {
                calls.set(calls.get() + 1);
                *o
            },
            |_: &u8| 1.0,
            10,
            0.1,
            &mut Pcg64::seed_from_u64(0),
        );
        assert!(weights.is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_run_updates_only_chosen_weight() {
        let weights = run(
            &["a", "b", "c"],
            |o: &&str| *o,
            |o: &&str| if *o == "b" { 1.0 } else { -1.0 },
            3,
            0.5,
            &mut Scripted::new([1, 1, 2]),
        );
        assert_eq!(weights, vec![1.0, 2.25, 0.5]);
    }

    #[test]
    fn test_run_stops_when_total_becomes_zero() {
        let calls = Cell::new(0);
        let weights = run(
            &["a"],
            |o: &&str| {
                calls.set(calls.get() + 1);
                *o
            },
            |_: &&str| -1.0,
            5,
            1.0,
            &mut Pcg64::seed_from_u64(0),
        );
        assert_eq!(weights, vec![0.0]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_run_duplicates_are_independent_entries() {
        let weights = run(
            &["a", "a"],
            |o: &&str| *o,
            |_: &&str| 1.0,
            1,
            1.0,
            &mut Scripted::new([1]),
        );
        assert_eq!(weights, vec![1.0, 2.0]);
    }

    #[test]
    fn test_run_negative_weights_are_kept() {
        let weights = run(
            &["a", "b"],
            |o: &&str| *o,
            |_: &&str| -1.0,
            1,
            3.0,
            &mut Scripted::new([0]),
        );
        assert_eq!(weights, vec![-2.0, 1.0]);
    }

    #[test]
    fn test_try_run_propagates_error_without_partial_update() {
        let mut rewards = 0;
        let result = try_run(
            &['a', 'b'],
            &mut |o: &char| Ok(*o),
            &mut |o: &char| {
                rewards += 1;
                if *o == 'b' { Err(Boom) } else { Ok(1.0) }
            },
            10,
            1.0,
            &mut Scripted::new([0, 1, 0]),
        );
        assert_eq!(result, Err(Boom));
        assert_eq!(rewards, 2);
    }

    #[test]
    fn test_step_zero_reward_is_identity() {
        let mut rng = Pcg64::seed_from_u64(9);
        let mut weights = ab(0.3, 2.0);
        for _ in 0..20 {
            weights = step(|o: &&str| *o, |_: &&str| 0.0, &weights, &mut rng);
        }
        assert_eq!(weights, ab(0.3, 2.0));
    }

    #[test]
    fn test_step_updates_only_chosen_entry() {
        let input = ab(1.0, 1.0);
        let updated = step(
            |o: &&str| o.len(),
            |len: &usize| if *len == 1 { 0.5 } else { 0.0 },
            &input,
            &mut Scripted::new([1]),
        );
        assert_eq!(updated, ab(1.0, 1.5));
        assert_eq!(input, ab(1.0, 1.0));
    }

    #[test]
    fn test_step_degenerate_inputs_make_no_calls() {
        let calls = Cell::new(0);
        let mut rng = Pcg64::seed_from_u64(0);
        for input in [WeightMap::new(), ab(0.0, 0.0)] {
            let updated = step(
                |o: &&str| {
                    calls.set(calls.get() + 1);
                    *o
                },
                |_: &&str| 1.0,
                &input,
                &mut rng,
            );
            assert_eq!(updated, input);
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_try_step_error_leaves_no_update() {
        let input: WeightMap<char> = [('a', 1.0), ('b', 1.0)].into_iter().collect();
        let result = try_step(
            &mut |o: &char| Ok(*o),
            &mut |_: &char| Err::<f64, _>(Boom),
            &input,
            &mut Scripted::new([0]),
        );
        assert_eq!(result, Err(Boom));
        assert_eq!(input.weights(), [1.0, 1.0]);
    }

    #[test]
    fn test_step_all_rewards_every_object() {
        let reward = |o: &&str, r: &&str| if o == r { 0.1 } else { -0.1 };

        let picked_b = step_all(|o: &&str| *o, reward, &ab(1.0, 1.0), &mut Scripted::new([1]));
        assert_eq!(picked_b, ab(0.9, 1.1));

        let picked_a = step_all(|o: &&str| *o, reward, &ab(1.0, 1.0), &mut Scripted::new([0]));
        assert_eq!(picked_a, ab(1.1, 0.9));
    }

    #[test]
    fn test_step_all_visits_objects_in_map_order() {
        let mut seen = vec![];
        let input: WeightMap<_> = [(3, 1.0), (1, 1.0), (2, 0.0)].into_iter().collect();
        let updated = step_all(
            |o: &i32| *o,
            |o: &i32, _: &i32| {
                seen.push(*o);
                1.0
            },
            &input,
            &mut Scripted::new([0]),
        );
        assert_eq!(seen, [3, 1, 2]);
        assert_eq!(updated.keys(), [3, 1, 2]);
        assert_eq!(updated.weights(), [2.0, 2.0, 0.0]);
    }

    #[test]
    fn test_try_step_all_error_leaves_no_update() {
        let input: WeightMap<char> = [('a', 1.0), ('b', 1.0)].into_iter().collect();
        let result = try_step_all(
            &mut |o: &char| Ok(*o),
            &mut |o: &char, _: &char| if *o == 'b' { Err(Boom) } else { Ok(1.0) },
            &input,
            &mut Scripted::new([0]),
        );
        assert_eq!(result, Err(Boom));
        assert_eq!(input.weights(), [1.0, 1.0]);
    }

    #[test]
    fn test_step_all_degenerate_inputs_make_no_calls() {
        let calls = Cell::new(0);
        let mut rng = Pcg64::seed_from_u64(0);
        for input in [WeightMap::new(), ab(0.0, 0.0)] {
            let updated = step_all(
                |o: &&str| {
                    calls.set(calls.get() + 1);
                    *o
                },
                |_: &&str, _: &&str| 1.0,
                &input,
                &mut rng,
            );
            assert_eq!(updated, input);
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_single_object_is_always_chosen() {
        let mut rng = Pcg64::seed_from_u64(11);
        let input = WeightMap::uniform(["solo"], 1.0);
        for reward in [0.5, -0.5] {
            let updated = step(|o: &&str| *o, |_: &&str| reward, &input, &mut rng);
            assert_eq!(updated.get(&"solo"), Some(1.0 + reward));
        }
    }

    #[test]
    fn test_single_object_is_always_chosen_by_step_all() {
        let calls = Cell::new(0);
        let mut rng = Pcg64::seed_from_u64(12);
        let input = WeightMap::uniform(["solo"], 1.0);
        for reward in [0.5, -0.5] {
            let updated = step_all(
                |o: &&str| {
                    calls.set(calls.get() + 1);
                    *o == "solo"
                },
                |_: &&str, matched: &bool| if *matched { reward } else { 0.0 },
                &input,
                &mut rng,
            );
            assert_eq!(updated.get(&"solo"), Some(1.0 + reward));
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_run_single_object_is_chosen_every_round() {
        let calls = Cell::new(0);
        let weights = run(
            &["solo"],
            |o: &&str| {
                calls.set(calls.get() + 1);
                *o
            },
            |_: &&str| 1.0,
            4,
            1.0,
            &mut Pcg64::seed_from_u64(13),
        );
        assert_eq!(weights, vec![16.0]);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_run_keeps_choosing_overflowed_weight() {
        let calls = Cell::new(0);
        let weights = run(
            &["a"],
            |o: &&str| {
                calls.set(calls.get() + 1);
                *o
            },
            |_: &&str| 1.0,
            1100,
            1.0,
            &mut Pcg64::seed_from_u64(14),
        );
        assert_eq!(weights, vec![f64::INFINITY]);
        assert_eq!(calls.get(), 1100);
    }

    #[test]
    fn test_step_prefers_infinite_weight() {
        let input: WeightMap<usize> = [(0, 1.0), (1, f64::INFINITY)].into_iter().collect();
        for seed in 0..200 {
            let mut chosen = None;
            let _ = step(
                |o: &usize| chosen = Some(*o),
                |_: &()| 0.0,
                &input,
                &mut Pcg64::seed_from_u64(seed),
            );
            assert_eq!(chosen, Some(1));
        }
    }

    #[test]
    #[should_panic(expected = "weighted choice returned no index")]
    fn test_missing_choice_with_positive_mass_panics() {
        let _ = step(|o: &&str| *o, |_: &&str| 0.0, &ab(1.0, 1.0), &mut Scripted::new([]));
    }

    #[test]
    #[should_panic(expected = "weighted choice returned index 5")]
    fn test_out_of_range_choice_panics() {
        let _ = step(|o: &&str| *o, |_: &&str| 0.0, &ab(1.0, 1.0), &mut Scripted::new([5]));
    }
}
