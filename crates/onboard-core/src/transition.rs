use crate::error::{OnboardError, Result};
use crate::resolver;
use crate::types::{ActionKind, Stage};

fn reject(from: Stage, action: &str, reason: impl Into<String>) -> OnboardError {
    OnboardError::InvalidTransition {
        from: from.to_string(),
        action: action.to_string(),
        reason: reason.into(),
    }
}

/// Apply a homebuyer action to `current`.
///
/// Stage 1 moves straight to 2. Stages 2 through 6 park on `N.5` until an
/// administrator approves them.
pub fn advance(current: Stage, action: ActionKind) -> Result<Stage> {
    let name = action.as_str();
    if current.is_admin() {
        return Err(reject(current, name, "administrators do not onboard"));
    }
    if current.is_terminal() {
        return Err(reject(current, name, "onboarding is already complete"));
    }
    if current.is_awaiting_approval() {
        return Err(reject(current, name, "waiting for administrator approval"));
    }
    if !resolver::allowed_actions(current.value()).contains(&action) {
        return Err(reject(current, name, "action not offered at this stage"));
    }

    let next = if current.step() < Stage::FIRST_APPROVAL_STEP {
        Stage::at(current.step() + 1)
    } else {
        Stage::awaiting(current.step())
    };
    next.ok_or_else(|| reject(current, name, "no following stage"))
}

/// Release a stage that is waiting for approval onto the next working stage.
pub fn approve(current: Stage) -> Result<Stage> {
    if !current.is_awaiting_approval() {
        return Err(reject(current, "approve", "stage is not awaiting approval"));
    }
    Stage::at(current.step() + 1).ok_or_else(|| reject(current, "approve", "no following stage"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
