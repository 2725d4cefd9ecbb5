//! Collaborator interfaces to the host virtual tabletop.
//!
//! The director never talks to a tabletop directly. It reads actors through
//! an [`ActorSource`] and hands forced results to a [`HostPipeline`], which
//! narrates them, runs its own bookkeeping, and persists extended-test
//! progress.

use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sk_mechanics::Roll;
use thiserror::Error;
use uuid::Uuid;

use crate::actor::ActorSnapshot;

/// Errors reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The actor no longer exists.
    #[error("actor not found: {0}")]
    ActorNotFound(String),

    /// The item (e.g. an extended test) no longer exists.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The host refused or failed the request.
    #[error("{0}")]
    Rejected(String),
}

/// Who gets to see a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    /// Everyone sees the roll.
    #[default]
    PublicRoll,
    /// Only game masters see the result.
    GmRoll,
    /// Hidden even from the roller.
    BlindRoll,
    /// Only the roller sees it.
    SelfRoll,
}

impl RollMode {
    /// Host identifier of the mode.
    pub fn id(self) -> &'static str {
        match self {
            Self::PublicRoll => "publicroll",
            Self::GmRoll => "gmroll",
            Self::BlindRoll => "blindroll",
            Self::SelfRoll => "selfroll",
        }
    }

    /// Parse a mode, accepting the host id or a short form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "publicroll" | "public" => Some(Self::PublicRoll),
            "gmroll" | "gm" | "private" => Some(Self::GmRoll),
            "blindroll" | "blind" => Some(Self::BlindRoll),
            "selfroll" | "self" => Some(Self::SelfRoll),
            _ => None,
        }
    }
}

impl FromStr for RollMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown roll mode: {s}"))
    }
}

impl std::fmt::Display for RollMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A forced roll handed to the host for narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollMessage {
    /// Name of the speaking actor, if any.
    pub speaker: Option<String>,
    /// Flavor text, including the SL suffix when a skill is known.
    pub flavor: Option<String>,
    /// Visibility.
    pub roll_mode: RollMode,
    /// The roll with its faces already rewritten.
    pub roll: Roll,
}

/// What the host made of a submitted roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResolution {
    /// The total the host resolved the test with.
    pub total: i64,
    /// Whether a pending interception supplied the total.
    pub intercepted: bool,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something the user should fix.
    Warning,
    /// The action failed.
    Error,
}

/// A notification shown to the game master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub text: String,
}

impl Notice {
    /// An informational notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// A warning notice.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    /// An error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "{level}: {}", self.text)
    }
}

/// Identifier of a registered one-shot interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterceptionId(pub Uuid);

impl InterceptionId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InterceptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InterceptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read access to the host's actors.
pub trait ActorSource: Send + Sync {
    /// The actor the game master currently controls.
    fn controlled_actor(&self) -> Option<ActorSnapshot>;

    /// The actor currently targeted, for opposed-test comparison.
    fn target_actor(&self) -> Option<ActorSnapshot>;

    /// A fresh snapshot of an actor by id.
    fn actor(&self, id: &str) -> Option<ActorSnapshot>;
}

/// The host's test-resolution, messaging and persistence pipeline.
#[async_trait]
pub trait HostPipeline: Send + Sync {
    /// Resolve and narrate a test. A pending interception, if any, fires
    /// here and supplies the total.
    async fn resolve_test(&self, message: RollMessage) -> Result<TestResolution, HostError>;

    /// Persist a new success-level counter for an extended test.
    async fn update_extended_test(
        &self,
        actor_id: &str,
        test_id: &str,
        new_current: i64,
    ) -> Result<(), HostError>;

    /// Show a notice to the game master.
    fn notify(&self, notice: Notice);

    /// Register a one-shot interception forcing the next resolved test to
    /// `forced_total`.
    fn register_interception(&self, forced_total: i64) -> InterceptionId;

    /// Remove an interception. Returns true if it was still pending.
    fn deregister_interception(&self, id: InterceptionId) -> bool;
}

/// A registered one-shot interception that is always cleaned up.
///
/// Dropping the guard deregisters the interception if the host has not
/// consumed it, so a failed submission cannot leak a forced total into an
/// unrelated later test.
pub struct Interception<'h> {
    host: &'h dyn HostPipeline,
    id: Option<InterceptionId>,
}

impl<'h> Interception<'h> {
    /// Register an interception with the host.
    pub fn register(host: &'h dyn HostPipeline, forced_total: i64) -> Self {
        let id = host.register_interception(forced_total);
        tracing::debug!(%id, forced_total, "registered interception");
        Self { host, id: Some(id) }
    }

    /// The interception id, until the guard is finished.
    pub fn id(&self) -> Option<InterceptionId> {
        self.id
    }

    /// End the subscription. Returns true if the host consumed it.
    pub fn finish(mut self) -> bool {
        match self.id.take() {
            Some(id) => !self.host.deregister_interception(id),
            None => true,
        }
    }
}

impl Drop for Interception<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take()
            && self.host.deregister_interception(id)
        {
            tracing::debug!(%id, "rolled back unused interception");
        }
    }
}
