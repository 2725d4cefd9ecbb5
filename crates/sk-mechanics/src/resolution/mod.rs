//! Percentile test resolution.
//!
//! A test is a d100 rolled against an effective skill value. The result
//! falls into one of four [`OutcomeCategory`] tiers, and its quality is
//! measured in success levels (see [`percentile`]).

pub mod percentile;

pub use percentile::{
    RollOutcome, classify, format_success_level, is_doubles, success_level, tens_digit,
};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MechError;

/// Qualitative outcome tier of a percentile test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeCategory {
    /// A double at or under the skill, or a very low roll.
    CriticalSuccess,
    /// At or under the skill.
    Success,
    /// Over the skill.
    Failure,
    /// A double over the skill, or a very high roll.
    CriticalFailure,
}

impl OutcomeCategory {
    /// All categories from best to worst.
    pub const ALL: [Self; 4] = [
        Self::CriticalSuccess,
        Self::Success,
        Self::Failure,
        Self::CriticalFailure,
    ];

    /// Parse a category from a user-supplied string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "critical-success" | "crit-success" | "crit" => Some(Self::CriticalSuccess),
            "success" => Some(Self::Success),
            "failure" | "fail" => Some(Self::Failure),
            "critical-failure" | "crit-fail" | "fumble" => Some(Self::CriticalFailure),
            _ => None,
        }
    }

    /// Stable identifier, as used in configuration and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Self::CriticalSuccess => "critical-success",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::CriticalFailure => "critical-failure",
        }
    }

    /// Returns true for the two successful tiers.
    pub fn is_success(self) -> bool {
        matches!(self, Self::CriticalSuccess | Self::Success)
    }
}

impl FromStr for OutcomeCategory {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| MechError::UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalSuccess => write!(f, "Critical Success"),
            Self::Success => write!(f, "Success"),
            Self::Failure => write!(f, "Failure"),
            Self::CriticalFailure => write!(f, "Critical Failure"),
        }
    }
}
