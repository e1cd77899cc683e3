pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // Resolver
        .route("/api/resolve/{value}", get(routes::resolve::resolve_value))
        // Users
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(routes::users::get_user).delete(routes::users::delete_user),
        )
        .route("/api/users/{id}/view", get(routes::users::get_user_view))
        .route(
            "/api/users/{id}/advance",
            post(routes::users::advance_user),
        )
        .route(
            "/api/users/{id}/approve",
            post(routes::users::approve_user),
        )
        .route("/api/users/{id}/stage", put(routes::users::set_user_stage))
        // Stage definitions
        .route(
            "/api/stages",
            get(routes::stages::list_stages).post(routes::stages::create_stage),
        )
        .route("/api/stages/check", get(routes::stages::check_stages))
        .route(
            "/api/stages/{order}",
            get(routes::stages::get_stage)
                .put(routes::stages::update_stage)
                .delete(routes::stages::delete_stage),
        )
        // Theme & navigation
        .route(
            "/api/theme",
            get(routes::theme::get_theme).put(routes::theme::put_theme),
        )
        .route("/api/nav", get(routes::nav::get_nav))
        // Config
        .route("/api/config", get(routes::config::get_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the onboarding API on a pre-bound listener.
///
/// Accepts a `TcpListener` that was already bound so the caller can read the
/// actual port before starting (useful when `port = 0` and the OS picks one).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("onboarding server listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/nav?role=admin");
        if let Err(e) = open::that(&url) {
            tracing::warn!("could not open browser: {e}");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
