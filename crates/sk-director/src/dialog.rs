//! State of the forced-roll dialog.
//!
//! The dialog keeps the selected subject, the active preset and the result
//! value. Changing subject or preset re-plans the result; setting a value
//! directly overrides it until the next change.

use rand::rngs::StdRng;
use sk_mechanics::planner::NEUTRAL_TARGET;
use sk_mechanics::resolution::format_success_level;
use sk_mechanics::resolution::percentile::PERCENTILE_MAX;
use sk_mechanics::{OutcomeCategory, Planner, success_level};

use crate::config::DirectorConfig;
use crate::director::ForcedRollRequest;
use crate::host::RollMode;
use crate::selection::{DEFAULT_SKILL_VALUE, SelectionContext, TestSubject};

/// Live preview of the current result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogPreview {
    /// Success level of the result against the selected skill.
    pub success_level: i64,
    /// Whether the success level is zero or better.
    pub favorable: bool,
    /// Whether the result would be a miscast.
    pub miscast: bool,
}

impl std::fmt::Display for DialogPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SL: {}", format_success_level(self.success_level))?;
        if self.miscast {
            write!(f, " (miscast!)")?;
        }
        Ok(())
    }
}

/// The forced-roll dialog.
#[derive(Debug, Clone)]
pub struct RollDialog {
    selection: SelectionContext,
    selected: Option<usize>,
    preset: OutcomeCategory,
    result: i64,
    extended_test: Option<String>,
    roll_mode: RollMode,
    formula: String,
    miscast_threshold: i64,
    planner: Planner,
}

impl RollDialog {
    /// Open the dialog with the first subject selected and a planned success.
    pub fn open(selection: SelectionContext, config: &DirectorConfig, rng: &mut StdRng) -> Self {
        let selected = (!selection.subjects.is_empty()).then_some(0);
        let mut dialog = Self {
            selection,
            selected,
            preset: OutcomeCategory::Success,
            result: i64::from(NEUTRAL_TARGET),
            extended_test: None,
            roll_mode: config.roll_mode,
            formula: config.formula.clone(),
            miscast_threshold: config.miscast_threshold,
            planner: Planner::new(config.tuning),
        };
        dialog.replan(rng);
        dialog
    }

    /// The selection context the dialog was opened with.
    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    /// The selected subject, if any.
    pub fn selected(&self) -> Option<&TestSubject> {
        self.selected.and_then(|i| self.selection.subject(i))
    }

    /// The active preset.
    pub fn preset(&self) -> OutcomeCategory {
        self.preset
    }

    /// The current result value.
    pub fn result(&self) -> i64 {
        self.result
    }

    /// The chosen extended test, if any.
    pub fn extended_test(&self) -> Option<&str> {
        self.extended_test.as_deref()
    }

    /// The chosen roll mode.
    pub fn roll_mode(&self) -> RollMode {
        self.roll_mode
    }

    /// Effective value of the selected subject, or the default of 45.
    pub fn skill_value(&self) -> i64 {
        self.selected()
            .map_or(DEFAULT_SKILL_VALUE, TestSubject::effective_value)
    }

    /// Select a subject by index and re-plan. Returns false if out of range.
    pub fn select_subject(&mut self, index: usize, rng: &mut StdRng) -> bool {
        if index >= self.selection.subjects.len() {
            return false;
        }
        self.selected = Some(index);
        self.replan(rng);
        true
    }

    /// Make `category` the active preset and re-plan.
    pub fn choose_preset(&mut self, category: OutcomeCategory, rng: &mut StdRng) {
        self.preset = category;
        self.replan(rng);
    }

    /// Choose a preset by name. An unknown name keeps the preset and shows
    /// the neutral value.
    pub fn choose_mode(&mut self, mode: &str, rng: &mut StdRng) {
        match OutcomeCategory::parse(mode) {
            Some(category) => self.choose_preset(category, rng),
            None => self.result = i64::from(NEUTRAL_TARGET),
        }
    }

    /// Override the result with a typed value, clamped to 1..=100.
    pub fn set_result(&mut self, value: i64) {
        self.result = value.clamp(1, PERCENTILE_MAX);
    }

    /// Choose an extended test to receive the result. Returns false if the
    /// actor has no such test.
    pub fn select_extended_test(&mut self, id: Option<&str>) -> bool {
        match id {
            None => {
                self.extended_test = None;
                true
            }
            Some(id) if self.selection.extended_test(id).is_some() => {
                self.extended_test = Some(id.to_string());
                true
            }
            Some(_) => false,
        }
    }

    /// Set the roll mode.
    pub fn set_roll_mode(&mut self, mode: RollMode) {
        self.roll_mode = mode;
    }

    /// SL and miscast preview for the current state.
    pub fn preview(&self) -> DialogPreview {
        let sl = success_level(self.result, self.skill_value());
        let magic = self
            .selected()
            .is_some_and(|s| s.context.is_magic_related);
        DialogPreview {
            success_level: sl,
            favorable: sl >= 0,
            miscast: magic && self.result >= self.miscast_threshold,
        }
    }

    /// Build the request for the current state.
    pub fn submit(&self) -> ForcedRollRequest {
        let mut request = ForcedRollRequest::new(self.formula.clone(), self.result)
            .with_roll_mode(self.roll_mode);
        if let Some(id) = &self.selection.actor_id {
            request = request.with_actor(id.clone());
        }
        if let Some(subject) = self.selected() {
            request = request.with_skill(subject.effective_value(), subject.context.is_magic_related);
        }
        if let Some(test) = &self.extended_test {
            request = request.with_extended_test(test.clone());
        }
        request
    }

    fn replan(&mut self, rng: &mut StdRng) {
        let planned = self.planner.plan(self.preset, self.skill_value(), rng);
        self.result = i64::from(planned);
    }
}
