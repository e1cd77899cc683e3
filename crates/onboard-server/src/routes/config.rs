use axum::extract::State;
use axum::Json;

use super::blocking;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: parsed `.onboard/config.yaml` plus validation warnings.
pub async fn get_config(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = blocking(move || {
        let config = onboard_core::config::Config::load(&root)?;
        let warnings = config.validate();
        Ok(serde_json::json!({
            "version": config.version,
            "app": config.app,
            "ui": config.ui,
            "warnings": warnings,
        }))
    })
    .await?;

    Ok(Json(result))
}
