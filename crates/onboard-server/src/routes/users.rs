use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use onboard_core::stage_def::StageDefinition;
use onboard_core::types::{ActionKind, Stage};
use onboard_core::user::{User, UserSummary};

use super::blocking;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/users: list all users.
pub async fn list_users(
    State(app): State<AppState>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let root = app.root.clone();
    let result: Vec<UserSummary> = blocking(move || {
        let users = User::list(&root)?;
        Ok(users.iter().map(User::summary).collect())
    })
    .await?;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct CreateUserBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub stage: Option<f64>,
}

/// POST /api/users: create a user; new homebuyers start on stage 1.
pub async fn create_user(
    State(app): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let root = app.root.clone();
    let _guard = app.write_lock.lock().await;
    let user = blocking(move || {
        let stage = match body.stage {
            Some(v) => Stage::try_from(v)?,
            None => Stage::START,
        };
        User::create(&root, body.name, body.email, stage)
    })
    .await?;

    tracing::info!(user = %user.id, stage = user.stage, "user created");
    app.notify();
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{id}: full user record including stage history.
pub async fn get_user(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let root = app.root.clone();
    let user = blocking(move || User::load(&root, &id)).await?;
    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let root = app.root.clone();
    let deleted = id.clone();
    let _guard = app.write_lock.lock().await;
    blocking(move || User::delete(&root, &id)).await?;

    tracing::info!(user = %deleted, "user deleted");
    app.notify();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/{id}/view: what the onboarding page renders for this user.
pub async fn get_user_view(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = blocking(move || {
        let user = User::load(&root, &id)?;
        let view = user.view();
        let content = StageDefinition::for_step(&root, view.step)?;
        Ok(serde_json::json!({
            "user": user.summary(),
            "view": view,
            "content": content,
        }))
    })
    .await?;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct AdvanceBody {
    pub action: String,
}

/// POST /api/users/{id}/advance: the stage-transition endpoint.
pub async fn advance_user(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AdvanceBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let action: ActionKind = body.action.parse()?;
    let _guard = app.write_lock.lock().await;
    let (user, from) = blocking(move || {
        let mut user = User::load(&root, &id)?;
        let from = user.stage;
        user.advance(action)?;
        user.save(&root)?;
        Ok((user, from))
    })
    .await?;

    tracing::info!(user = %user.id, from, to = user.stage, %action, "stage advanced");
    app.notify();
    Ok(Json(serde_json::json!({
        "user": user.summary(),
        "view": user.view(),
    })))
}

/// POST /api/users/{id}/approve: administrator releases an on-hold stage.
pub async fn approve_user(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let _guard = app.write_lock.lock().await;
    let (user, from) = blocking(move || {
        let mut user = User::load(&root, &id)?;
        let from = user.stage;
        user.approve()?;
        user.save(&root)?;
        Ok((user, from))
    })
    .await?;

    tracing::info!(user = %user.id, from, to = user.stage, "stage approved");
    app.notify();
    Ok(Json(serde_json::json!({
        "user": user.summary(),
        "view": user.view(),
    })))
}

#[derive(serde::Deserialize)]
pub struct SetStageBody {
    pub stage: f64,
}

/// PUT /api/users/{id}/stage: administrator override to any known stage.
pub async fn set_user_stage(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetStageBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let stage = Stage::try_from(body.stage)?;
    let _guard = app.write_lock.lock().await;
    let user = blocking(move || {
        let mut user = User::load(&root, &id)?;
        user.set_stage(stage);
        user.save(&root)?;
        Ok(user)
    })
    .await?;

    tracing::info!(user = %user.id, to = user.stage, "stage overridden");
    app.notify();
    Ok(Json(serde_json::json!({
        "user": user.summary(),
        "view": user.view(),
    })))
}
