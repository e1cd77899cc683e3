use crate::error::{OnboardError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const ONBOARD_DIR: &str = ".onboard";
pub const USERS_DIR: &str = ".onboard/users";
pub const STAGES_DIR: &str = ".onboard/stages";

pub const CONFIG_FILE: &str = ".onboard/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn users_dir(root: &Path) -> PathBuf {
    root.join(USERS_DIR)
}

pub fn user_file(root: &Path, id: &str) -> PathBuf {
    users_dir(root).join(format!("{id}.yaml"))
}

pub fn stages_dir(root: &Path) -> PathBuf {
    root.join(STAGES_DIR)
}

pub fn stage_file(root: &Path, order: u32) -> PathBuf {
    stages_dir(root).join(format!("{order}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Identifier validation
// ---------------------------------------------------------------------------

/// User ids double as file names, so only canonical UUIDs are accepted.
pub fn validate_user_id(id: &str) -> Result<()> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| OnboardError::InvalidUserId(id.to_string()))
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    })
}

pub fn validate_email(email: &str) -> Result<()> {
    if email.len() > 254 || !email_re().is_match(email) {
        return Err(OnboardError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
