//! Extended-test progress.
//!
//! An extended test accumulates success levels over several rolls until a
//! target is reached. The authoritative counter lives with the host; this
//! module only computes the next value.

use serde::{Deserialize, Serialize};

use crate::resolution::{format_success_level, success_level};

/// Current and target success levels of an extended test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtendedTestProgress {
    /// Success levels gathered so far.
    pub current_sl: i64,
    /// Success levels needed to complete the test.
    pub target_sl: i64,
}

impl ExtendedTestProgress {
    /// Create a progress record.
    pub fn new(current_sl: i64, target_sl: i64) -> Self {
        Self {
            current_sl,
            target_sl,
        }
    }

    /// Returns true if the target has been reached or exceeded.
    pub fn is_complete(&self) -> bool {
        self.current_sl >= self.target_sl
    }
}

impl std::fmt::Display for ExtendedTestProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} SL", self.current_sl, self.target_sl)
    }
}

/// The result of applying one roll to an extended test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedTestUpdate {
    /// Success levels added by this roll.
    pub delta: i64,
    /// The counter after adding `delta`.
    pub new_current: i64,
    /// The target, carried for reporting.
    pub target_sl: i64,
    /// Whether `new_current` has reached the target.
    pub reached_target: bool,
}

impl ExtendedTestUpdate {
    /// A one-line progress message for the game master.
    pub fn summary(&self) -> String {
        if self.reached_target {
            format!(
                "Goal reached! ({}/{} SL)",
                self.new_current, self.target_sl
            )
        } else {
            format!(
                "Progress: {}/{} SL ({} this round)",
                self.new_current,
                self.target_sl,
                format_success_level(self.delta)
            )
        }
    }
}

/// Add `delta` to the progress counter and report whether the target is met.
pub fn apply_extended_test_delta(progress: ExtendedTestProgress, delta: i64) -> ExtendedTestUpdate {
    let new_current = progress.current_sl + delta;
    ExtendedTestUpdate {
        delta,
        new_current,
        target_sl: progress.target_sl,
        reached_target: new_current >= progress.target_sl,
    }
}

/// Apply a roll of `result` against `skill` to an extended test.
pub fn apply_extended_test_roll(
    progress: ExtendedTestProgress,
    result: i64,
    skill: i64,
) -> ExtendedTestUpdate {
    apply_extended_test_delta(progress, success_level(result, skill))
}
