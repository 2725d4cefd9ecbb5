//! The forced-roll director.
//!
//! Rolls a formula, rewrites its dice to the chosen total, and hands the
//! roll to the host with a one-shot interception registered so the host's
//! test resolution reports the same total. Extended-test progress is
//! applied afterwards.

use chrono::Local;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use sk_mechanics::resolution::format_success_level;
use sk_mechanics::{ExtendedTestUpdate, Formula, Roll, RollOutcome, apply_extended_test_roll};

use crate::config::DirectorConfig;
use crate::dialog::RollDialog;
use crate::error::{DirectorError, DirectorResult};
use crate::host::{ActorSource, HostPipeline, Interception, Notice, RollMessage, RollMode};
use crate::selection::SelectionContext;

/// Everything needed to perform one forced roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedRollRequest {
    /// Formula to roll, e.g. `1d100`.
    pub formula: String,
    /// The total the roll must show.
    pub desired_total: i64,
    /// Visibility of the chat message.
    pub roll_mode: RollMode,
    /// Player-visible flavor text.
    pub flavor: Option<String>,
    /// Private note, logged only.
    pub gm_note: Option<String>,
    /// Actor the roll is made for; falls back to the controlled actor.
    pub actor_id: Option<String>,
    /// Extended test receiving the success levels.
    pub extended_test_id: Option<String>,
    /// Effective skill the roll is tested against.
    pub skill_value: Option<i64>,
    /// Whether the tested skill can miscast.
    pub is_magic: bool,
}

impl ForcedRollRequest {
    /// A public roll of `formula` forced to `desired_total`.
    pub fn new(formula: impl Into<String>, desired_total: i64) -> Self {
        Self {
            formula: formula.into(),
            desired_total,
            roll_mode: RollMode::default(),
            flavor: None,
            gm_note: None,
            actor_id: None,
            extended_test_id: None,
            skill_value: None,
            is_magic: false,
        }
    }

    /// Set the roll mode.
    pub fn with_roll_mode(mut self, mode: RollMode) -> Self {
        self.roll_mode = mode;
        self
    }

    /// Set the flavor text. Blank text clears it.
    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = non_blank(flavor.into());
        self
    }

    /// Set the GM note. Blank text clears it.
    pub fn with_gm_note(mut self, note: impl Into<String>) -> Self {
        self.gm_note = non_blank(note.into());
        self
    }

    /// Set the actor.
    pub fn with_actor(mut self, id: impl Into<String>) -> Self {
        self.actor_id = Some(id.into());
        self
    }

    /// Set the extended test.
    pub fn with_extended_test(mut self, id: impl Into<String>) -> Self {
        self.extended_test_id = Some(id.into());
        self
    }

    /// Set the tested skill value and whether it is magic related.
    pub fn with_skill(mut self, value: i64, is_magic: bool) -> Self {
        self.skill_value = Some(value);
        self.is_magic = is_magic;
        self
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Extended-test progress applied by a forced roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedTestReport {
    /// Extended test id.
    pub test_id: String,
    /// Extended test name.
    pub name: String,
    /// The applied update.
    pub update: ExtendedTestUpdate,
}

/// What a forced roll produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedRollReport {
    /// The roll with rewritten faces.
    pub roll: Roll,
    /// Flavor text as sent, with the SL suffix.
    pub flavor: Option<String>,
    /// Outcome of the forced total against the skill.
    pub outcome: RollOutcome,
    /// Total the host resolved the test with.
    pub resolved_total: i64,
    /// Whether the interception supplied the host's total.
    pub intercepted: bool,
    /// Whether the roll is a miscast.
    pub miscast: bool,
    /// Extended-test progress, if one was updated.
    pub extended: Option<ExtendedTestReport>,
}

/// Performs forced rolls against a host.
pub struct Director {
    config: DirectorConfig,
    rng: StdRng,
}

impl Director {
    /// Create a director. Seeds the RNG from the config, or from the OS.
    pub fn new(config: DirectorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    /// The configuration.
    pub fn config(&self) -> &DirectorConfig {
        &self.config
    }

    /// The random source used for planning and distribution.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Build the selection context from the host's current actors.
    pub fn selection(&self, source: &dyn ActorSource) -> SelectionContext {
        let actor = source.controlled_actor();
        let target = source.target_actor();
        SelectionContext::build(actor.as_ref(), target.as_ref())
    }

    /// Open the dialog for the host's current actors.
    pub fn open_dialog(&mut self, source: &dyn ActorSource) -> RollDialog {
        let selection = self.selection(source);
        RollDialog::open(selection, &self.config, &mut self.rng)
    }

    /// A request with the configured formula and roll mode.
    pub fn request(&self, desired_total: i64) -> ForcedRollRequest {
        ForcedRollRequest::new(self.config.formula.clone(), desired_total)
            .with_roll_mode(self.config.roll_mode)
    }

    /// Perform a forced roll.
    pub async fn perform(
        &mut self,
        source: &dyn ActorSource,
        host: &dyn HostPipeline,
        request: ForcedRollRequest,
    ) -> DirectorResult<ForcedRollReport> {
        let formula = match Formula::parse(&request.formula) {
            Ok(formula) => formula,
            Err(e) => {
                tracing::error!(formula = %request.formula, error = %e, "invalid formula");
                host.notify(Notice::error(format!(
                    "Invalid formula: \"{}\"",
                    request.formula
                )));
                return Err(e.into());
            }
        };

        let actor = request
            .actor_id
            .as_deref()
            .and_then(|id| source.actor(id))
            .or_else(|| source.controlled_actor());
        let Some(actor) = actor else {
            return Err(invalid_selection(host, "no character selected"));
        };
        let Some(skill) = request.skill_value else {
            return Err(invalid_selection(host, "no test subject selected"));
        };

        let desired = request.desired_total;
        let mut roll = formula.roll(&mut self.rng);
        roll.force_total(desired, &mut self.rng);

        let outcome = RollOutcome::new(desired, skill);
        let sl = format_success_level(outcome.success_level);
        let flavor = Some(match &request.flavor {
            Some(flavor) => format!("{flavor} (SL: {sl})"),
            None => format!("SL: {sl}"),
        });

        let label = request.flavor.as_deref().unwrap_or("-");
        let miscast = request.is_magic && desired >= self.config.miscast_threshold;
        if miscast {
            tracing::warn!(flavor = label, total = desired, "miscast");
        }
        if let Some(note) = &request.gm_note {
            let time = Local::now().format("%H:%M:%S");
            tracing::info!(%time, flavor = label, note = %note, "gm note");
        }

        tracing::info!(
            actor = %actor.name,
            formula = %request.formula,
            total = desired,
            mode = %request.roll_mode,
            "submitting forced roll"
        );
        let message = RollMessage {
            speaker: Some(actor.name.clone()),
            flavor: flavor.clone(),
            roll_mode: request.roll_mode,
            roll: roll.clone(),
        };

        let interception = Interception::register(host, desired);
        let resolution = match host.resolve_test(message).await {
            Ok(resolution) => resolution,
            Err(e) => {
                drop(interception);
                tracing::error!(error = %e, "host failed to resolve the test");
                host.notify(Notice::error(format!("Roll failed: {e}")));
                return Err(e.into());
            }
        };
        if !interception.finish() {
            tracing::warn!(total = desired, "interception never fired");
        }

        let mut extended = None;
        if let Some(test_id) = &request.extended_test_id {
            let fresh = source.actor(&actor.id);
            match fresh.as_ref().and_then(|a| a.extended_test(test_id)) {
                Some(item) => {
                    let update = apply_extended_test_roll(item.progress, desired, skill);
                    if let Err(e) = host
                        .update_extended_test(&actor.id, test_id, update.new_current)
                        .await
                    {
                        tracing::error!(test = %test_id, error = %e, "extended test update failed");
                        host.notify(Notice::error(format!("Extended test update failed: {e}")));
                        return Err(e.into());
                    }
                    let summary = update.summary();
                    tracing::info!(test = %item.name, %summary, "extended test updated");
                    host.notify(Notice::info(format!("{}: {summary}", item.name)));
                    extended = Some(ExtendedTestReport {
                        test_id: test_id.clone(),
                        name: item.name.clone(),
                        update,
                    });
                }
                None => tracing::warn!(test = %test_id, "extended test not found, skipping"),
            }
        }

        Ok(ForcedRollReport {
            roll,
            flavor,
            outcome,
            resolved_total: resolution.total,
            intercepted: resolution.intercepted,
            miscast,
            extended,
        })
    }
}

fn invalid_selection(host: &dyn HostPipeline, reason: &str) -> DirectorError {
    tracing::warn!(reason, "forced roll aborted");
    host.notify(Notice::warning(format!("Forced roll: {reason}")));
    DirectorError::InvalidSelection(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorSnapshot, Characteristic, ExtendedTestItem, SkillItem};
    use crate::host::NoticeLevel;
    use crate::memory::MemoryHost;
    use sk_mechanics::{ExtendedTestProgress, OutcomeCategory};

    fn greta() -> ActorSnapshot {
        let mut actor = ActorSnapshot::new("a1", "Greta");
        actor.characteristics.push(Characteristic {
            key: "ws".to_string(),
            value: 41,
        });
        actor.skills.push(SkillItem {
            name: "Channelling (Azyr)".to_string(),
            value: 50,
        });
        actor.extended_tests.push(ExtendedTestItem {
            id: "x1".to_string(),
            name: "Pick Lock".to_string(),
            progress: ExtendedTestProgress::new(3, 5),
        });
        actor
    }

    fn host() -> MemoryHost {
        MemoryHost::new().with_actor(greta()).controlling("a1")
    }

    fn director() -> Director {
        Director::new(DirectorConfig::default().with_seed(42))
    }

    #[tokio::test]
    async fn forced_roll_reaches_the_host() {
        let host = host();
        let mut director = director();
        let request = director
            .request(23)
            .with_flavor("Melee")
            .with_skill(45, false);

        let report = director.perform(&host, &host, request).await.unwrap();
        assert_eq!(report.roll.total(), 23);
        assert_eq!(report.roll.dice_total(), 23);
        assert_eq!(report.resolved_total, 23);
        assert!(report.intercepted);
        assert_eq!(report.flavor.as_deref(), Some("Melee (SL: +2)"));
        assert_eq!(report.outcome.category, OutcomeCategory::Success);
        assert_eq!(host.pending_interceptions(), 0);

        let messages = host.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message.speaker.as_deref(), Some("Greta"));
        assert_eq!(messages[0].resolved_total, 23);
    }

    #[tokio::test]
    async fn dialog_override_above_range_rolls_one_hundred() {
        let host = host();
        let mut director = director();
        let mut dialog = director.open_dialog(&host);
        dialog.set_result(250);
        let request = dialog.submit();

        let report = director.perform(&host, &host, request).await.unwrap();
        assert_eq!(report.roll.total(), 100);
        assert_eq!(report.roll.dice_total(), 100);
        assert_eq!(report.resolved_total, 100);
        assert_eq!(report.outcome.category, OutcomeCategory::CriticalFailure);
    }

    #[tokio::test]
    async fn sl_suffix_without_flavor() {
        let host = host();
        let mut director = director();
        let request = director.request(55).with_skill(45, false);
        let report = director.perform(&host, &host, request).await.unwrap();
        assert_eq!(report.flavor.as_deref(), Some("SL: -1"));
    }

    #[tokio::test]
    async fn constants_are_absorbed() {
        let host = host();
        let mut director = Director::new(
            DirectorConfig::default()
                .with_seed(3)
                .with_formula("2d10+5"),
        );
        let request = director.request(12).with_skill(40, false);
        let report = director.perform(&host, &host, request).await.unwrap();
        assert_eq!(report.roll.total(), 12);
        assert_eq!(report.roll.dice_total(), 7);
    }

    #[tokio::test]
    async fn missing_actor_is_invalid_selection() {
        let host = MemoryHost::new();
        let mut director = director();
        let request = director.request(30).with_skill(45, false);
        let err = director.perform(&host, &host, request).await.unwrap_err();
        assert!(matches!(err, DirectorError::InvalidSelection(_)));
        assert!(host.messages().is_empty());
        assert_eq!(host.notices()[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn missing_skill_is_invalid_selection() {
        let host = host();
        let mut director = director();
        let request = director.request(30);
        let err = director.perform(&host, &host, request).await.unwrap_err();
        assert!(matches!(err, DirectorError::InvalidSelection(_)));
        assert_eq!(host.pending_interceptions(), 0);
    }

    #[tokio::test]
    async fn invalid_formula_is_reported() {
        let host = host();
        let mut director = Director::new(DirectorConfig::default().with_formula("d0"));
        let request = director.request(30).with_skill(45, false);
        let err = director.perform(&host, &host, request).await.unwrap_err();
        assert!(matches!(err, DirectorError::Mechanics(_)));
        let notices = host.notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].text, "Invalid formula: \"d0\"");
    }

    #[tokio::test]
    async fn host_failure_rolls_back_interception() {
        let host = host();
        host.fail_next_resolution("table offline");
        let mut director = director();
        let request = director.request(30).with_skill(45, false);
        let err = director.perform(&host, &host, request).await.unwrap_err();
        assert!(matches!(err, DirectorError::HostPipelineFailure(_)));
        assert_eq!(host.pending_interceptions(), 0);
        assert!(host.notices().iter().any(|n| n.level == NoticeLevel::Error));

        // a later unrelated roll is not hijacked
        let request = director.request(80).with_skill(45, false);
        let report = director.perform(&host, &host, request).await.unwrap();
        assert_eq!(report.resolved_total, 80);
    }

    #[tokio::test]
    async fn extended_test_progress() {
        let host = host();
        let mut director = director();
        let request = director
            .request(23)
            .with_actor("a1")
            .with_skill(45, false)
            .with_extended_test("x1");
        let report = director.perform(&host, &host, request).await.unwrap();

        let extended = report.extended.unwrap();
        assert_eq!(extended.update.new_current, 5);
        assert!(extended.update.reached_target);
        let stored = host.actor("a1").unwrap();
        assert_eq!(stored.extended_test("x1").unwrap().progress.current_sl, 5);
        let last = host.notices().pop().unwrap();
        assert_eq!(last.level, NoticeLevel::Info);
        assert_eq!(last.text, "Pick Lock: Goal reached! (5/5 SL)");
    }

    #[tokio::test]
    async fn extended_test_update_failure() {
        let host = host();
        host.fail_next_update("locked");
        let mut director = director();
        let request = director
            .request(23)
            .with_skill(45, false)
            .with_extended_test("x1");
        let err = director.perform(&host, &host, request).await.unwrap_err();
        assert!(matches!(err, DirectorError::HostPipelineFailure(_)));
        // the roll itself was still narrated
        assert_eq!(host.messages().len(), 1);
    }

    #[tokio::test]
    async fn unknown_extended_test_is_skipped() {
        let host = host();
        let mut director = director();
        let request = director
            .request(23)
            .with_skill(45, false)
            .with_extended_test("gone");
        let report = director.perform(&host, &host, request).await.unwrap();
        assert!(report.extended.is_none());
    }

    #[tokio::test]
    async fn miscast_is_flagged() {
        let host = host();
        let mut director = director();
        let request = director
            .request(97)
            .with_skill(50, true)
            .with_gm_note("the winds howl");
        let report = director.perform(&host, &host, request).await.unwrap();
        assert!(report.miscast);
        assert_eq!(report.outcome.category, OutcomeCategory::CriticalFailure);
    }

    #[test]
    fn blank_text_is_dropped() {
        let request = ForcedRollRequest::new("1d100", 10)
            .with_flavor("   ")
            .with_gm_note(" note ");
        assert_eq!(request.flavor, None);
        assert_eq!(request.gm_note.as_deref(), Some("note"));
    }

    #[test]
    fn dialog_uses_controlled_actor() {
        let host = host();
        let mut director = director();
        let dialog = director.open_dialog(&host);
        assert_eq!(dialog.selection().actor_name.as_deref(), Some("Greta"));
        assert_eq!(dialog.submit().actor_id.as_deref(), Some("a1"));
    }
}
