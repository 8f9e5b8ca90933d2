use chrono::{DateTime, Utc};
use mwu_engine::{RunParams, WeightMap};
use serde::{Deserialize, Serialize};

/// Result of `mwu run`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunReport {
    pub params: RunParams,
    pub seed: u64,
    pub ran_at: DateTime<Utc>,
    pub arms: Vec<ArmReport>,
    /// Selection probabilities after the last round (absent if every weight is zero)
    pub probabilities: Option<Vec<f64>>,
    /// Index of the arm with the largest final weight
    pub best_arm: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArmReport {
    pub mean: f64,
    pub weight: f64,
}

/// Result of `mwu step`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StepReport {
    pub seed: u64,
    /// Key drawn this round (absent if the update was skipped)
    pub drawn: Option<String>,
    pub weights: WeightMap<String>,
}
