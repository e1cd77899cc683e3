use crate::config::{ConfigWarning, WarnLevel};
use crate::error::{OnboardError, Result};
use crate::paths;
use crate::types::{Status, StepKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const MAX_BUTTONS: usize = 2;

// ---------------------------------------------------------------------------
// StageButton
// ---------------------------------------------------------------------------

/// A call-to-action on a stage page. Clicking opens `popup` as a dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageButton {
    pub text: String,
    #[serde(default)]
    pub popup: String,
    /// Status the button is shown against.
    #[serde(default = "default_button_status")]
    pub status: Status,
}

fn default_button_status() -> Status {
    Status::NotRequested
}

// ---------------------------------------------------------------------------
// StageDefinition
// ---------------------------------------------------------------------------

/// Admin-authored content for one onboarding step, keyed by `order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDefinition {
    pub order: u32,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<StageButton>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StagePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub buttons: Option<Vec<StageButton>>,
    #[serde(default)]
    pub image: Option<String>,
}

impl StageDefinition {
    pub fn new(order: u32, name: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            order,
            name: name.into(),
            title: title.into(),
            subtitle: String::new(),
            description: String::new(),
            buttons: Vec::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn step_key(&self) -> Option<StepKey> {
        StepKey::from_order(self.order)
    }

    fn check_buttons(buttons: &[StageButton]) -> Result<()> {
        if buttons.len() > MAX_BUTTONS {
            return Err(OnboardError::TooManyButtons(buttons.len()));
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, def: StageDefinition) -> Result<Self> {
        Self::check_buttons(&def.buttons)?;
        let data = serde_yaml::to_string(&def)?;
        if !crate::io::write_new(&paths::stage_file(root, def.order), data.as_bytes())? {
            return Err(OnboardError::StageExists(def.order));
        }
        Ok(def)
    }

    pub fn load(root: &Path, order: u32) -> Result<Self> {
        let path = paths::stage_file(root, order);
        if !path.exists() {
            return Err(OnboardError::StageNotFound(order));
        }
        let data = std::fs::read_to_string(&path)?;
        let def: StageDefinition = serde_yaml::from_str(&data)?;
        Ok(def)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::stage_file(root, self.order);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn update(root: &Path, order: u32, patch: StagePatch) -> Result<Self> {
        let mut def = Self::load(root, order)?;
        if let Some(buttons) = patch.buttons {
            Self::check_buttons(&buttons)?;
            def.buttons = buttons;
        }
        if let Some(name) = patch.name {
            def.name = name;
        }
        if let Some(title) = patch.title {
            def.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            def.subtitle = subtitle;
        }
        if let Some(description) = patch.description {
            def.description = description;
        }
        if let Some(image) = patch.image {
            def.image = if image.is_empty() { None } else { Some(image) };
        }
        def.updated_at = Utc::now();
        def.save(root)?;
        Ok(def)
    }

    pub fn delete(root: &Path, order: u32) -> Result<()> {
        if !crate::io::remove_if_exists(&paths::stage_file(root, order))? {
            return Err(OnboardError::StageNotFound(order));
        }
        Ok(())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut defs: Vec<Self> = crate::io::read_yaml_dir(&paths::stages_dir(root))?;
        defs.sort_by_key(|d| d.order);
        Ok(defs)
    }

    /// The definition carrying content for `step`, if one is authored.
    pub fn for_step(root: &Path, step: StepKey) -> Result<Option<Self>> {
        match Self::load(root, step.order()) {
            Ok(def) => Ok(Some(def)),
            Err(OnboardError::StageNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Consistency with the step-key table
// ---------------------------------------------------------------------------

/// Compare authored definitions against the fixed step keys. Missing content
/// is a warning; a definition no step key can reach is an error.
pub fn check_consistency(defs: &[StageDefinition]) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    let orders: BTreeSet<u32> = defs.iter().map(|d| d.order).collect();

    for key in StepKey::all() {
        if !orders.contains(&key.order()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "no stage definition with order {} for '{}'",
                    key.order(),
                    key.label()
                ),
            });
        }
    }

    for def in defs {
        if def.step_key().is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "stage definition '{}' has order {} which no step displays",
                    def.name, def.order
                ),
            });
        }
        if def.buttons.len() > MAX_BUTTONS {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "stage definition '{}' has {} buttons (max {MAX_BUTTONS})",
                    def.name,
                    def.buttons.len()
                ),
            });
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
