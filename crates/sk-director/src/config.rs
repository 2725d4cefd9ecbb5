//! Configuration for the roll director.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sk_mechanics::PlannerTuning;
use sk_mechanics::resolution::percentile::AUTO_CRITICAL_FAILURE_MIN;

use crate::error::{DirectorError, DirectorResult};
use crate::host::RollMode;

/// Configuration for a director.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// RNG seed for reproducible planning and distribution; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Formula rolled for a forced test.
    pub formula: String,
    /// Visibility of the resulting chat message.
    pub roll_mode: RollMode,
    /// Magic-related tests at or above this total are miscasts.
    pub miscast_threshold: i64,
    /// Planner probabilities.
    pub tuning: PlannerTuning,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            formula: "1d100".to_string(),
            roll_mode: RollMode::default(),
            miscast_threshold: AUTO_CRITICAL_FAILURE_MIN,
            tuning: PlannerTuning::default(),
        }
    }
}

impl DirectorConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the roll formula.
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    /// Set the default roll mode.
    pub fn with_roll_mode(mut self, mode: RollMode) -> Self {
        self.roll_mode = mode;
        self
    }

    /// Set the miscast threshold (clamped to 1-100).
    pub fn with_miscast_threshold(mut self, threshold: i64) -> Self {
        self.miscast_threshold = threshold.clamp(1, 100);
        self
    }

    /// Set the planner tuning.
    pub fn with_tuning(mut self, tuning: PlannerTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> DirectorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| DirectorError::Config(e.to_string()))?;
        let threshold = config.miscast_threshold;
        Ok(config.with_miscast_threshold(threshold))
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> DirectorResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DirectorError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}
