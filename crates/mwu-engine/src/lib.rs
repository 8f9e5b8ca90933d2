//! Multiplicative Weights Update (MWU) engine.
//!
//! This crate maintains a non-negative weight per candidate object, samples an object with
//! probability proportional to its weight, observes an outcome for it, and rescales weights
//! multiplicatively according to a reward signal. Over many updates the weight mass
//! concentrates on the objects that perform well against the observed outcomes.
//!
//! # How an Update Works
//!
//! 1. **Sample** - Draw one object with probability `weight / total`
//! 2. **Observe** - Evaluate the caller's [`Event`] strategy on the chosen object
//! 3. **Reward** - Turn the outcome into a signed scalar `r` with a [`Reward`] (or
//!    [`GlobalReward`]) strategy
//! 4. **Rescale** - Multiply the affected weight(s) by `1 + r` (or `1 + eta * r`)
//!
//! # Operations
//!
//! The [`update`] module exposes three operations that share one sampling primitive:
//!
//! - [`update::run`] - Multi-round driver. Starts from uniform `1.0` weights and updates only
//!   the chosen object each round, scaled by the learning rate `eta`.
//! - [`update::step`] - Single round on a [`WeightMap`]. Rewards only the chosen object.
//! - [`update::step_all`] - Single round on a [`WeightMap`]. Rewards every object relative to
//!   the outcome realized by the chosen one.
//!
//! Each operation has a `try_` counterpart accepting fallible strategies; errors are
//! propagated unchanged and leave no partial update behind.
//!
//! # Randomness
//!
//! The engine keeps no global state. Every operation takes a [`WeightedChoice`] source, which
//! every [`rand::Rng`] implements. Pass a seeded generator (e.g. `rand_pcg::Pcg64`) for
//! reproducible results, or `rand::rng()` otherwise.
//!
//! # Example
//!
//! ```
//! use mwu_engine::{WeightMap, update};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg64;
//!
//! let mut rng = Pcg64::seed_from_u64(7);
//! let weights: WeightMap<&str> = [("a", 1.0), ("b", 1.0)].into_iter().collect();
//!
//! let updated = update::step_all(
//!     |chosen: &&str| *chosen,
//!     |object: &&str, result: &&str| if object == result { 0.1 } else { -0.1 },
//!     &weights,
//!     &mut rng,
//! );
//!
//! let mut values = updated.weights().to_vec();
//! values.sort_by(f64::total_cmp);
//! assert_eq!(values, [0.9, 1.1]);
//! ```
//!
//! # Current Limitations
//!
//! - **No clamping**: Rewards with `eta * r < -1` produce negative weights. They are left as-is
//!   and simply carry zero selection mass in later draws.
//! - **No persistence**: Weights live only as long as the caller keeps them.

pub mod params;
pub mod sample;
pub mod strategy;
pub mod update;
pub mod weight_map;
pub mod weights;

pub use params::RunParams;
pub use sample::WeightedChoice;
pub use strategy::{Event, GlobalReward, Reward};
pub use weight_map::{ParseWeightMapError, WeightMap};
