use thiserror::Error;

#[derive(Debug, Error)]
pub enum OnboardError {
    #[error("not initialized: run 'onboard init'")]
    NotInitialized,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user already exists with email: {0}")]
    UserExists(String),

    #[error("stage definition not found: {0}")]
    StageNotFound(u32),

    #[error("stage definition already exists: {0}")]
    StageExists(u32),

    #[error("invalid user id '{0}': must be a UUID")]
    InvalidUserId(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("invalid stage value: {0}")]
    InvalidStageValue(String),

    #[error("invalid action '{0}': expected 'self' or 'assisted'")]
    InvalidAction(String),

    #[error("invalid transition from stage {from} via {action}: {reason}")]
    InvalidTransition {
        from: String,
        action: String,
        reason: String,
    },

    #[error("a stage may have at most 2 buttons, got {0}")]
    TooManyButtons(usize),

    #[error("invalid color for '{name}': {value}")]
    InvalidColor { name: String, value: String },

    #[error("invalid appearance: {0}")]
    InvalidAppearance(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OnboardError>;
