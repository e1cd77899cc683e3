use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use onboard_core::stage_def::{self, StageButton, StageDefinition, StagePatch};

use super::blocking;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/stages: all stage definitions ordered by `order`.
pub async fn list_stages(
    State(app): State<AppState>,
) -> Result<Json<Vec<StageDefinition>>, AppError> {
    let root = app.root.clone();
    let defs = blocking(move || StageDefinition::list(&root)).await?;
    Ok(Json(defs))
}

#[derive(serde::Deserialize)]
pub struct CreateStageBody {
    pub order: u32,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub buttons: Vec<StageButton>,
    #[serde(default)]
    pub image: Option<String>,
}

/// POST /api/stages: author a new stage definition.
pub async fn create_stage(
    State(app): State<AppState>,
    Json(body): Json<CreateStageBody>,
) -> Result<(StatusCode, Json<StageDefinition>), AppError> {
    let root = app.root.clone();
    let _guard = app.write_lock.lock().await;
    let def = blocking(move || {
        let mut def = StageDefinition::new(body.order, body.name, body.title);
        def.subtitle = body.subtitle;
        def.description = body.description;
        def.buttons = body.buttons;
        def.image = body.image;
        StageDefinition::create(&root, def)
    })
    .await?;

    tracing::info!(order = def.order, name = %def.name, "stage definition created");
    app.notify();
    Ok((StatusCode::CREATED, Json(def)))
}

/// GET /api/stages/{order}
pub async fn get_stage(
    State(app): State<AppState>,
    Path(order): Path<u32>,
) -> Result<Json<StageDefinition>, AppError> {
    let root = app.root.clone();
    let def = blocking(move || StageDefinition::load(&root, order)).await?;
    Ok(Json(def))
}

/// PUT /api/stages/{order}: patch the editable fields.
pub async fn update_stage(
    State(app): State<AppState>,
    Path(order): Path<u32>,
    Json(patch): Json<StagePatch>,
) -> Result<Json<StageDefinition>, AppError> {
    let root = app.root.clone();
    let _guard = app.write_lock.lock().await;
    let def = blocking(move || StageDefinition::update(&root, order, patch)).await?;

    tracing::info!(order, "stage definition updated");
    app.notify();
    Ok(Json(def))
}

/// DELETE /api/stages/{order}
pub async fn delete_stage(
    State(app): State<AppState>,
    Path(order): Path<u32>,
) -> Result<StatusCode, AppError> {
    let root = app.root.clone();
    let _guard = app.write_lock.lock().await;
    blocking(move || StageDefinition::delete(&root, order)).await?;

    tracing::info!(order, "stage definition deleted");
    app.notify();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/stages/check: authored definitions vs. the fixed step keys.
pub async fn check_stages(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let warnings = blocking(move || {
        let defs = StageDefinition::list(&root)?;
        Ok(stage_def::check_consistency(&defs))
    })
    .await?;

    Ok(Json(serde_json::json!({ "warnings": warnings })))
}
