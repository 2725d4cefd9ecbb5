//! Covert roll director for percentile tests.
//!
//! Lets a game master pick the result a test should show, then rolls, rewrites
//! the dice to that result, and hands the roll to the host tabletop so it is
//! narrated and resolved like any other. Includes the selection context and
//! dialog state, the host collaborator traits with a one-shot interception
//! guard, and an in-memory host.

pub mod actor;
pub mod config;
pub mod dialog;
pub mod director;
pub mod error;
pub mod host;
pub mod memory;
pub mod opposed;
pub mod selection;

pub use actor::ActorSnapshot;
pub use config::DirectorConfig;
pub use dialog::{DialogPreview, RollDialog};
pub use director::{Director, ExtendedTestReport, ForcedRollReport, ForcedRollRequest};
pub use error::{DirectorError, DirectorResult};
pub use host::{
    ActorSource, HostError, HostPipeline, Interception, InterceptionId, Notice, NoticeLevel,
    RollMessage, RollMode, TestResolution,
};
pub use memory::MemoryHost;
pub use opposed::{Opposition, Standing};
pub use selection::{SelectionContext, SubjectKind, TestSubject};
