//! Parameters of the multi-round driver.

use serde::{Deserialize, Serialize};

use crate::{
    sample::WeightedChoice,
    strategy::{Event, Reward},
    update,
};

/// Controls a multi-round update run.
///
/// Missing fields fall back to their defaults when deserializing, so a config file may set
/// only the values it cares about.
///
/// # Examples
///
/// ```
/// use mwu_engine::RunParams;
///
/// let params: RunParams = serde_json::from_str(r#"{ "rounds": 25 }"#).unwrap();
/// assert_eq!(params.rounds, 25);
/// assert_eq!(params.eta, RunParams::default().eta);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunParams {
    /// Number of rounds to run
    pub rounds: usize,
    /// Learning rate applied to each reward (not validated; keep `eta * r >= -1`)
    pub eta: f64,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            rounds: 100,
            eta: 0.1,
        }
    }
}

impl RunParams {
    /// Runs [`update::try_run`] with these parameters.
    pub fn try_run<T, O, E, Ev, Rw, C>(
        &self,
        objects: &[T],
        event: &mut Ev,
        reward: &mut Rw,
        chooser: &mut C,
    ) -> Result<Vec<f64>, E>
    where
        Ev: Event<T, O, E> + ?Sized,
        Rw: Reward<O, E> + ?Sized,
        C: WeightedChoice + ?Sized,
    {
        update::try_run(objects, event, reward, self.rounds, self.eta, chooser)
    }

    /// Runs [`update::run`] with these parameters.
    pub fn run<T, O, EvF, RwF, C>(
        &self,
        objects: &[T],
        event: EvF,
        reward: RwF,
        chooser: &mut C,
    ) -> Vec<f64>
    where
        EvF: FnMut(&T) -> O,
        RwF: FnMut(&O) -> f64,
        C: WeightedChoice + ?Sized,
    {
        update::run(objects, event, reward, self.rounds, self.eta, chooser)
    }
}
