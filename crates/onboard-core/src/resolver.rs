//! Stage resolver: pure translation of a raw stage value into the facts the
//! presentation layer renders (step content, status, illustration, buttons).
//!
//! Nothing here fails. Values outside the known set resolve to the first step
//! with status `not-requested` so that legacy or corrupt records still render.

use crate::types::{ActionKind, Stage, Status, StepKey};
use serde::Serialize;

const SELF_ONLY: &[ActionKind] = &[ActionKind::SelfService];
const SELF_AND_ASSISTED: &[ActionKind] = &[ActionKind::SelfService, ActionKind::Assisted];
const NO_ACTIONS: &[ActionKind] = &[];

/// Everything the UI needs to draw a stage, resolved in one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageView {
    pub stage_value: f64,
    /// False when the value is outside the known set and defaults were used.
    pub recognized: bool,
    pub step: StepKey,
    pub step_label: &'static str,
    pub status: Status,
    pub image_index: u8,
    pub actions: &'static [ActionKind],
    /// Buttons are shown but disabled unless the stage is waiting on the user.
    pub actions_enabled: bool,
}

pub fn resolve_step(value: f64) -> StepKey {
    let Some(stage) = Stage::from_value(value) else {
        return StepKey::First;
    };
    match stage.step() {
        0 | 1 => StepKey::First,
        2 => StepKey::Second,
        3 => StepKey::Third,
        4 => StepKey::Fourth,
        5 => StepKey::Fifth,
        6 => StepKey::Sixth,
        _ => StepKey::Final,
    }
}

pub fn resolve_status(value: f64) -> Status {
    match Stage::from_value(value) {
        Some(stage) if stage.is_awaiting_approval() => Status::OnHold,
        Some(stage) if stage.is_terminal() => Status::Done,
        _ => Status::NotRequested,
    }
}

/// Illustration index for a step. The final step reuses the sixth image.
pub fn resolve_image_index(step: StepKey) -> u8 {
    match step {
        StepKey::First => 0,
        StepKey::Second => 1,
        StepKey::Third => 2,
        StepKey::Fourth => 3,
        StepKey::Fifth => 4,
        StepKey::Sixth | StepKey::Final => 5,
    }
}

/// Actions the UI may offer for a value. Stages 2 and 3 (and their approval
/// halves) also offer the assisted path; the terminal stage offers nothing.
pub fn allowed_actions(value: f64) -> &'static [ActionKind] {
    match Stage::from_value(value) {
        Some(stage) if stage.is_terminal() => NO_ACTIONS,
        Some(stage) if matches!(stage.step(), 2 | 3) => SELF_AND_ASSISTED,
        _ => SELF_ONLY,
    }
}

pub fn resolve(value: f64) -> StageView {
    let step = resolve_step(value);
    let status = resolve_status(value);
    StageView {
        stage_value: value,
        recognized: Stage::from_value(value).is_some(),
        step,
        step_label: step.label(),
        status,
        image_index: resolve_image_index(step),
        actions: allowed_actions(value),
        actions_enabled: status == Status::NotRequested,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
