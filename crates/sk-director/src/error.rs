//! Error types for the roll director.

use thiserror::Error;

use crate::host::HostError;

/// Result type for director operations.
pub type DirectorResult<T> = Result<T, DirectorError>;

/// Errors that end a single forced-roll action.
///
/// None of them are retried; the game master re-invokes the action.
#[derive(Debug, Error)]
pub enum DirectorError {
    /// No character or no test subject was chosen.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The host's test-resolution or persistence call failed.
    #[error("host pipeline failure: {0}")]
    HostPipelineFailure(#[from] HostError),

    /// Mechanics error (e.g. an unparsable formula).
    #[error(transparent)]
    Mechanics(#[from] sk_mechanics::MechError),

    /// Configuration could not be read.
    #[error("invalid config: {0}")]
    Config(String),
}
