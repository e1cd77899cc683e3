use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use onboard_core::error::OnboardError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400s
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain without
/// adding a variant to `OnboardError`.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

fn status_for(e: &OnboardError) -> StatusCode {
    match e {
        OnboardError::NotInitialized => StatusCode::BAD_REQUEST,
        OnboardError::UserNotFound(_) | OnboardError::StageNotFound(_) => StatusCode::NOT_FOUND,
        OnboardError::UserExists(_) | OnboardError::StageExists(_) => StatusCode::CONFLICT,
        OnboardError::InvalidUserId(_)
        | OnboardError::InvalidEmail(_)
        | OnboardError::InvalidStageValue(_)
        | OnboardError::InvalidAction(_)
        | OnboardError::TooManyButtons(_)
        | OnboardError::InvalidColor { .. }
        | OnboardError::InvalidAppearance(_)
        | OnboardError::InvalidRole(_) => StatusCode::BAD_REQUEST,
        OnboardError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        OnboardError::Io(_) | OnboardError::Yaml(_) | OnboardError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = self
            .0
            .downcast_ref::<OnboardError>()
            .map(status_for)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
