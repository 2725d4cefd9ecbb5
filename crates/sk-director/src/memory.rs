//! An in-memory host for tests and the command line.
//!
//! Holds actor snapshots, records every narrated roll and notice, and
//! honours pending interceptions in registration order.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::actor::ActorSnapshot;
use crate::host::{
    ActorSource, HostError, HostPipeline, InterceptionId, Notice, RollMessage, TestResolution,
};

/// A narrated roll as recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    /// The submitted message.
    pub message: RollMessage,
    /// The total the test was resolved with.
    pub resolved_total: i64,
    /// Whether an interception supplied that total.
    pub intercepted: bool,
}

#[derive(Debug, Default)]
struct HostState {
    actors: Vec<ActorSnapshot>,
    controlled: Option<String>,
    target: Option<String>,
    messages: Vec<ChatRecord>,
    notices: Vec<Notice>,
    pending: VecDeque<(InterceptionId, i64)>,
    fail_resolution: Option<String>,
    fail_update: Option<String>,
}

/// In-memory implementation of [`ActorSource`] and [`HostPipeline`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an actor.
    pub fn with_actor(mut self, actor: ActorSnapshot) -> Self {
        self.state_mut().actors.push(actor);
        self
    }

    /// Make the actor with `id` the controlled one.
    pub fn controlling(mut self, id: impl Into<String>) -> Self {
        self.state_mut().controlled = Some(id.into());
        self
    }

    /// Make the actor with `id` the target.
    pub fn targeting(mut self, id: impl Into<String>) -> Self {
        self.state_mut().target = Some(id.into());
        self
    }

    /// Make the next test resolution fail.
    pub fn fail_next_resolution(&self, reason: impl Into<String>) {
        self.state().fail_resolution = Some(reason.into());
    }

    /// Make the next extended-test update fail.
    pub fn fail_next_update(&self, reason: impl Into<String>) {
        self.state().fail_update = Some(reason.into());
    }

    /// All narrated rolls.
    pub fn messages(&self) -> Vec<ChatRecord> {
        self.state().messages.clone()
    }

    /// All notices.
    pub fn notices(&self) -> Vec<Notice> {
        self.state().notices.clone()
    }

    /// All actors in their current state.
    pub fn actors(&self) -> Vec<ActorSnapshot> {
        self.state().actors.clone()
    }

    /// Number of registered interceptions that have not fired.
    pub fn pending_interceptions(&self) -> usize {
        self.state().pending.len()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut HostState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ActorSource for MemoryHost {
    fn controlled_actor(&self) -> Option<ActorSnapshot> {
        let state = self.state();
        let id = state.controlled.as_deref()?;
        state.actors.iter().find(|a| a.id == id).cloned()
    }

    fn target_actor(&self) -> Option<ActorSnapshot> {
        let state = self.state();
        let id = state.target.as_deref()?;
        state.actors.iter().find(|a| a.id == id).cloned()
    }

    fn actor(&self, id: &str) -> Option<ActorSnapshot> {
        self.state().actors.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl HostPipeline for MemoryHost {
    async fn resolve_test(&self, message: RollMessage) -> Result<TestResolution, HostError> {
        let mut state = self.state();
        if let Some(reason) = state.fail_resolution.take() {
            return Err(HostError::Rejected(reason));
        }
        let resolution = match state.pending.pop_front() {
            Some((_, forced)) => TestResolution {
                total: forced,
                intercepted: true,
            },
            None => TestResolution {
                total: message.roll.total(),
                intercepted: false,
            },
        };
        state.messages.push(ChatRecord {
            message,
            resolved_total: resolution.total,
            intercepted: resolution.intercepted,
        });
        Ok(resolution)
    }

    async fn update_extended_test(
        &self,
        actor_id: &str,
        test_id: &str,
        new_current: i64,
    ) -> Result<(), HostError> {
        let mut state = self.state();
        if let Some(reason) = state.fail_update.take() {
            return Err(HostError::Rejected(reason));
        }
        let actor = state
            .actors
            .iter_mut()
            .find(|a| a.id == actor_id)
            .ok_or_else(|| HostError::ActorNotFound(actor_id.to_string()))?;
        let test = actor
            .extended_test_mut(test_id)
            .ok_or_else(|| HostError::ItemNotFound(test_id.to_string()))?;
        test.progress.current_sl = new_current;
        Ok(())
    }

    fn notify(&self, notice: Notice) {
        self.state().notices.push(notice);
    }

    fn register_interception(&self, forced_total: i64) -> InterceptionId {
        let id = InterceptionId::new();
        self.state().pending.push_back((id, forced_total));
        id
    }

    fn deregister_interception(&self, id: InterceptionId) -> bool {
        let mut state = self.state();
        match state.pending.iter().position(|(p, _)| *p == id) {
            Some(index) => {
                state.pending.remove(index);
                true
            }
            None => false,
        }
    }
}
