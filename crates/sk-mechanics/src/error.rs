//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
///
/// Planning and redistribution never fail; only formula handling does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MechError {
    /// The roll formula could not be parsed.
    #[error("invalid formula \"{formula}\": {reason}")]
    InvalidFormula {
        /// The formula as supplied.
        formula: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An outcome category name was not recognised.
    #[error("unknown outcome category: {0}")]
    UnknownCategory(String),
}

impl MechError {
    pub(crate) fn formula(formula: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormula {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
