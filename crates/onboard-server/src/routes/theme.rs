use axum::extract::State;
use axum::Json;
use onboard_core::config::Config;
use onboard_core::theme::{Appearance, ThemePatch, UiSettings};

use super::blocking;
use crate::error::AppError;
use crate::state::AppState;

fn render(ui: &UiSettings) -> serde_json::Value {
    let css: serde_json::Map<String, serde_json::Value> = ui
        .theme
        .css_variables()
        .into_iter()
        .map(|(name, value)| (name, serde_json::Value::String(value)))
        .collect();
    serde_json::json!({
        "theme": ui.theme,
        "appearance": ui.appearance,
        "css_variables": css,
    })
}

/// GET /api/theme: current presentation settings from the shared state.
pub async fn get_theme(State(app): State<AppState>) -> Json<serde_json::Value> {
    let ui = app.ui.read().await;
    Json(render(&ui))
}

#[derive(serde::Deserialize)]
pub struct UpdateThemeBody {
    #[serde(default)]
    pub theme: Option<ThemePatch>,
    #[serde(default)]
    pub appearance: Option<Appearance>,
}

/// PUT /api/theme: patch colors and appearance, persist to config, then swap
/// the shared copy. Colors left out of the body are kept.
pub async fn put_theme(
    State(app): State<AppState>,
    Json(body): Json<UpdateThemeBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut ui = app.ui.write().await;
    let mut next = ui.clone();
    if let Some(patch) = body.theme {
        next.theme.apply(patch)?;
    }
    if let Some(appearance) = body.appearance {
        next.appearance = appearance;
    }

    let root = app.root.clone();
    let to_save = next.clone();
    blocking(move || {
        let mut config = Config::load(&root)?;
        config.ui = to_save;
        config.save(&root)
    })
    .await?;

    *ui = next;
    tracing::info!(appearance = %ui.appearance, "theme updated");
    app.notify();
    Ok(Json(render(&ui)))
}
