//! Roll-under percentile arithmetic.
//!
//! Success levels compare tens digits: a skill of 45 against a roll of 23
//! is `4 - 2 = +2`. Doubles (11, 22, ..., 99) are special: at or below the
//! skill they are critical successes, above it critical failures.

use serde::{Deserialize, Serialize};

use super::OutcomeCategory;

/// Highest value a percentile roll can show.
pub const PERCENTILE_MAX: i64 = 100;

/// Rolls at or below this are critical successes regardless of doubles.
pub const AUTO_CRITICAL_SUCCESS_MAX: i64 = 5;

/// Rolls at or above this are critical failures regardless of doubles.
pub const AUTO_CRITICAL_FAILURE_MIN: i64 = 96;

/// Tens digit of a percentile value, capped at 100.
pub fn tens_digit(n: i64) -> i64 {
    n.min(PERCENTILE_MAX).div_euclid(10)
}

/// Success levels of `result` against `skill`. Positive favours the tester.
pub fn success_level(result: i64, skill: i64) -> i64 {
    tens_digit(skill) - tens_digit(result)
}

/// Format a success level with an explicit sign (`+2`, `+0`, `-3`).
pub fn format_success_level(sl: i64) -> String {
    if sl >= 0 {
        format!("+{sl}")
    } else {
        sl.to_string()
    }
}

/// Check if a d100 roll shows doubles (11, 22, 33, ..., 99, or 100 as "00").
pub fn is_doubles(value: i64) -> bool {
    if value == PERCENTILE_MAX {
        return true;
    }
    if !(1..PERCENTILE_MAX).contains(&value) {
        return false;
    }
    value / 10 == value % 10
}

/// Classify a percentile total against a skill value.
///
/// Doubles decide first (a double at or under the skill is critical, one
/// above it is a fumble, 100 always fumbles). Otherwise the very low and
/// very high bands are critical, and the rest is a plain roll-under.
pub fn classify(total: i64, skill: i64) -> OutcomeCategory {
    let threshold = skill.min(PERCENTILE_MAX);
    if is_doubles(total) {
        return if total <= threshold && total != PERCENTILE_MAX {
            OutcomeCategory::CriticalSuccess
        } else {
            OutcomeCategory::CriticalFailure
        };
    }
    if total <= AUTO_CRITICAL_SUCCESS_MAX {
        OutcomeCategory::CriticalSuccess
    } else if total >= AUTO_CRITICAL_FAILURE_MIN {
        OutcomeCategory::CriticalFailure
    } else if total <= skill {
        OutcomeCategory::Success
    } else {
        OutcomeCategory::Failure
    }
}

/// A resolved percentile result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// The (possibly forced) roll total.
    pub total: i64,
    /// Success levels against the tested skill; not clamped.
    pub success_level: i64,
    /// Qualitative tier of the result.
    pub category: OutcomeCategory,
}

impl RollOutcome {
    /// Resolve `total` against `skill`.
    pub fn new(total: i64, skill: i64) -> Self {
        Self {
            total,
            success_level: success_level(total, skill),
            category: classify(total, skill),
        }
    }
}

impl std::fmt::Display for RollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, SL {})",
            self.total,
            self.category,
            format_success_level(self.success_level)
        )
    }
}
