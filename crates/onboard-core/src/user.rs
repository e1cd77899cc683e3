use crate::error::{OnboardError, Result};
use crate::paths;
use crate::resolver::{self, StageView};
use crate::transition;
use crate::types::{ActionKind, Role, Stage, Status, StepKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

/// Serializes the duplicate-email check with the write that follows it.
static CREATE_LOCK: Mutex<()> = Mutex::new(());

// ---------------------------------------------------------------------------
// StageTransition
// ---------------------------------------------------------------------------

/// How a stage change happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    Action(ActionKind),
    Approval,
    Override,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: f64,
    pub to: f64,
    pub cause: TransitionCause,
    pub at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Listing row for a user: identity plus where they are in the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub stage: f64,
    pub role: Role,
    pub step: StepKey,
    pub status: Status,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Raw value as the external system stores it; may be a legacy value
    /// outside the known set.
    pub stage: f64,
    #[serde(default)]
    pub stage_history: Vec<StageTransition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, stage: Stage) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            stage: stage.value(),
            stage_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role(&self) -> Role {
        Role::for_stage_value(self.stage)
    }

    pub fn view(&self) -> StageView {
        resolver::resolve(self.stage)
    }

    pub fn summary(&self) -> UserSummary {
        let view = self.view();
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            stage: self.stage,
            role: self.role(),
            step: view.step,
            status: view.status,
            updated_at: self.updated_at,
        }
    }

    fn current_stage(&self) -> Result<Stage> {
        Stage::try_from(self.stage)
    }

    fn record(&mut self, to: Stage, cause: TransitionCause) {
        let now = Utc::now();
        self.stage_history.push(StageTransition {
            from: self.stage,
            to: to.value(),
            cause,
            at: now,
        });
        self.stage = to.value();
        self.updated_at = now;
    }

    // ---------------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------------

    pub fn advance(&mut self, action: ActionKind) -> Result<Stage> {
        let next = transition::advance(self.current_stage()?, action)?;
        self.record(next, TransitionCause::Action(action));
        Ok(next)
    }

    pub fn approve(&mut self) -> Result<Stage> {
        let next = transition::approve(self.current_stage()?)?;
        self.record(next, TransitionCause::Approval);
        Ok(next)
    }

    /// Administrator override. Also the only way out of an unknown value.
    pub fn set_stage(&mut self, stage: Stage) {
        self.record(stage, TransitionCause::Override);
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(
        root: &Path,
        name: impl Into<String>,
        email: impl Into<String>,
        stage: Stage,
    ) -> Result<Self> {
        let email: String = email.into();
        let email = email.trim().to_ascii_lowercase();
        paths::validate_email(&email)?;
        let _guard = CREATE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        if Self::list(root)?.iter().any(|u| u.email == email) {
            return Err(OnboardError::UserExists(email));
        }
        let user = Self::new(name, email, stage);
        user.save(root)?;
        Ok(user)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        paths::validate_user_id(id)?;
        let path = paths::user_file(root, id);
        if !path.exists() {
            return Err(OnboardError::UserNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        let user: User = serde_yaml::from_str(&data)?;
        Ok(user)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::user_file(root, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        paths::validate_user_id(id)?;
        if !crate::io::remove_if_exists(&paths::user_file(root, id))? {
            return Err(OnboardError::UserNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut users: Vec<Self> = crate::io::read_yaml_dir(&paths::users_dir(root))?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
