use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// A known position in the onboarding pipeline.
///
/// The external system stores a single number where `N.5` means "step N is
/// waiting for an administrator". `Stage` keeps those two facts apart; use
/// [`Stage::from_value`] to parse a raw number and [`Stage::value`] to get it
/// back for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Stage {
    step: u8,
    awaiting_approval: bool,
}

impl Stage {
    /// Administrators sit on stage 0 and never onboard.
    pub const ADMIN: Stage = Stage::working(0);
    /// Entry stage for every new homebuyer.
    pub const START: Stage = Stage::working(1);
    pub const DONE: Stage = Stage::working(7);

    pub const FIRST_APPROVAL_STEP: u8 = 2;

    const fn working(step: u8) -> Self {
        Self {
            step,
            awaiting_approval: false,
        }
    }

    /// Every value the external system is known to store, in pipeline order.
    pub fn all() -> Vec<Stage> {
        (0u8..=14).filter_map(Self::from_half_steps).collect()
    }

    /// Parse a raw stage number. Returns `None` for anything outside the
    /// known set, including fractions other than `.5`.
    pub fn from_value(value: f64) -> Option<Stage> {
        if !value.is_finite() {
            return None;
        }
        // Doubling turns every known value into an exact small integer, so
        // the comparison below never depends on float rounding.
        let doubled = value * 2.0;
        if doubled.fract() != 0.0 || !(0.0..=14.0).contains(&doubled) {
            return None;
        }
        Self::from_half_steps(doubled as u8)
    }

    fn from_half_steps(half_steps: u8) -> Option<Stage> {
        let step = half_steps / 2;
        let awaiting_approval = half_steps % 2 == 1;
        let known = match (step, awaiting_approval) {
            (0 | 1 | 7, false) => true,
            (2..=6, _) => true,
            _ => false,
        };
        known.then_some(Stage {
            step,
            awaiting_approval,
        })
    }

    /// The half-stage that parks `step` until an administrator approves it.
    pub fn awaiting(step: u8) -> Option<Stage> {
        Self::from_half_steps(step.checked_mul(2)?.checked_add(1)?)
    }

    /// The working (integer) stage for `step`.
    pub fn at(step: u8) -> Option<Stage> {
        Self::from_half_steps(step.checked_mul(2)?)
    }

    pub fn step(self) -> u8 {
        self.step
    }

    pub fn is_awaiting_approval(self) -> bool {
        self.awaiting_approval
    }

    pub fn is_admin(self) -> bool {
        self == Self::ADMIN
    }

    pub fn is_terminal(self) -> bool {
        self == Self::DONE
    }

    pub fn value(self) -> f64 {
        let base = f64::from(self.step);
        if self.awaiting_approval {
            base + 0.5
        } else {
            base
        }
    }
}

impl TryFrom<f64> for Stage {
    type Error = crate::error::OnboardError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Stage::from_value(value)
            .ok_or_else(|| crate::error::OnboardError::InvalidStageValue(value.to_string()))
    }
}

impl From<Stage> for f64 {
    fn from(stage: Stage) -> f64 {
        stage.value()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.awaiting_approval {
            write!(f, "{}.5", self.step)
        } else {
            write!(f, "{}", self.step)
        }
    }
}

impl std::str::FromStr for Stage {
    type Err = crate::error::OnboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| crate::error::OnboardError::InvalidStageValue(s.to_string()))?;
        Stage::try_from(value)
    }
}

// ---------------------------------------------------------------------------
// StepKey
// ---------------------------------------------------------------------------

/// Content bucket shown for a stage. `N` and `N.5` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKey {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Final,
}

impl StepKey {
    pub fn all() -> &'static [StepKey] {
        &[
            StepKey::First,
            StepKey::Second,
            StepKey::Third,
            StepKey::Fourth,
            StepKey::Fifth,
            StepKey::Sixth,
            StepKey::Final,
        ]
    }

    /// 1-based position; matches the `order` of the stage definition that
    /// carries this step's content.
    pub fn order(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_order(order: u32) -> Option<StepKey> {
        let index = usize::try_from(order.checked_sub(1)?).ok()?;
        Self::all().get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            StepKey::First => "First step",
            StepKey::Second => "Second step",
            StepKey::Third => "Third step",
            StepKey::Fourth => "Fourth step",
            StepKey::Fifth => "Fifth step",
            StepKey::Sixth => "Sixth step",
            StepKey::Final => "Final step",
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    NotRequested,
    OnHold,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::NotRequested => "not-requested",
            Status::OnHold => "on-hold",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// How a homebuyer chose to complete the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// "Do it yourself".
    #[serde(rename = "self")]
    SelfService,
    /// "Let us handle it".
    #[serde(rename = "assisted")]
    Assisted,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::SelfService => "self",
            ActionKind::Assisted => "assisted",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = crate::error::OnboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(ActionKind::SelfService),
            "assisted" => Ok(ActionKind::Assisted),
            _ => Err(crate::error::OnboardError::InvalidAction(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Homebuyer,
}

impl Role {
    /// Stage 0 marks an administrator account; every other value is a homebuyer.
    pub fn for_stage_value(value: f64) -> Role {
        match Stage::from_value(value) {
            Some(stage) if stage.is_admin() => Role::Admin,
            _ => Role::Homebuyer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Homebuyer => "homebuyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::OnboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "homebuyer" => Ok(Role::Homebuyer),
            _ => Err(crate::error::OnboardError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn known_stage_values() {
        let values: Vec<f64> = Stage::all().into_iter().map(Stage::value).collect();
        assert_eq!(
            values,
            vec![0.0, 1.0, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.0]
        );
    }

    #[test]
    fn unknown_stage_values_are_rejected() {
        for v in [-1.0, 0.5, 1.5, 3.25, 7.5, 8.0, f64::NAN, f64::INFINITY] {
            assert!(Stage::from_value(v).is_none(), "expected unknown: {v}");
        }
    }

    #[test]
    fn negative_zero_is_the_admin_stage() {
        assert_eq!(Stage::from_value(-0.0), Some(Stage::ADMIN));
        assert!(Stage::ADMIN.is_admin());
        assert_eq!(Role::for_stage_value(-0.0), Role::Admin);
    }

    #[test]
    fn stage_axes_are_separate() {
        let s = Stage::from_value(4.5).unwrap();
        assert_eq!(s.step(), 4);
        assert!(s.is_awaiting_approval());
        assert_eq!(Stage::awaiting(4), Some(s));
        assert_eq!(Stage::awaiting(1), None);
        assert_eq!(Stage::at(8), None);
    }

    #[test]
    fn stage_ordering_follows_pipeline() {
        let two = Stage::at(2).unwrap();
        let two_half = Stage::awaiting(2).unwrap();
        let three = Stage::at(3).unwrap();
        assert!(two < two_half);
        assert!(two_half < three);
        assert!(Stage::DONE > three);
    }

    #[test]
    fn stage_display_and_parse() {
        assert_eq!(Stage::awaiting(3).unwrap().to_string(), "3.5");
        assert_eq!(Stage::DONE.to_string(), "7");
        assert_eq!(Stage::from_str("2.5").unwrap(), Stage::awaiting(2).unwrap());
        assert!(Stage::from_str("two").is_err());
        assert!(Stage::from_str("9").is_err());
    }

    #[test]
    fn stage_serializes_as_number() {
        let json = serde_json::to_string(&Stage::awaiting(5).unwrap()).unwrap();
        assert_eq!(json, "5.5");
        let parsed: Stage = serde_json::from_str("6").unwrap();
        assert_eq!(parsed, Stage::at(6).unwrap());
        assert!(serde_json::from_str::<Stage>("6.25").is_err());
    }

    #[test]
    fn step_key_orders() {
        for (i, key) in StepKey::all().iter().enumerate() {
            assert_eq!(key.order() as usize, i + 1);
            assert_eq!(StepKey::from_order(key.order()), Some(*key));
        }
        assert_eq!(StepKey::from_order(0), None);
        assert_eq!(StepKey::from_order(8), None);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&Status::NotRequested).unwrap();
        assert_eq!(json, "\"not-requested\"");
    }

    #[test]
    fn action_kind_wire_tags() {
        assert_eq!(
            serde_json::to_string(&ActionKind::SelfService).unwrap(),
            "\"self\""
        );
        assert_eq!(ActionKind::from_str("assisted").unwrap(), ActionKind::Assisted);
        assert!(ActionKind::from_str("bogus").is_err());
    }

    #[test]
    fn role_from_stage_value() {
        assert_eq!(Role::for_stage_value(0.0), Role::Admin);
        assert_eq!(Role::for_stage_value(2.5), Role::Homebuyer);
        assert_eq!(Role::for_stage_value(-3.0), Role::Homebuyer);
    }
}
