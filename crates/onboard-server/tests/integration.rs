use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a minimal onboarding project inside the given temp directory.
fn init_project(dir: &TempDir) {
    let config = onboard_core::config::Config::new("test-homes");
    onboard_core::io::ensure_dir(&dir.path().join(".onboard/users")).unwrap();
    onboard_core::io::ensure_dir(&dir.path().join(".onboard/stages")).unwrap();
    config.save(dir.path()).unwrap();
}

async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

fn create_user(dir: &TempDir, email: &str, stage: f64) -> String {
    let stage = onboard_core::types::Stage::from_value(stage).unwrap();
    onboard_core::user::User::create(dir.path(), "Test Buyer", email, stage)
        .unwrap()
        .id
}

fn router(dir: &TempDir) -> axum::Router {
    onboard_server::build_router(dir.path().to_path_buf())
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_known_half_stage() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(router(&dir), "/api/resolve/2.5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step_label"], "Second step");
    assert_eq!(json["status"], "on-hold");
    assert_eq!(json["actions"], serde_json::json!(["self", "assisted"]));
    assert_eq!(json["actions_enabled"], false);
}

#[tokio::test]
async fn resolve_unknown_value_falls_back() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(router(&dir), "/api/resolve/3.25").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], "first");
    assert_eq!(json["status"], "not-requested");
    assert_eq!(json["recognized"], false);
}

#[tokio::test]
async fn resolve_rejects_text() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(router(&dir), "/api/resolve/seven").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("not a number"));
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn users_empty_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let (status, json) = get(router(&dir), "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn create_user_defaults_to_stage_one() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = post_json(
        router(&dir),
        "/api/users",
        serde_json::json!({ "name": "Jane", "email": "jane@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["stage"], 1.0);

    let (_, list) = get(router(&dir), "/api/users").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["role"], "homebuyer");
}

#[tokio::test]
async fn create_user_duplicate_email_conflicts() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    create_user(&dir, "jane@example.com", 1.0);

    let (status, _) = post_json(
        router(&dir),
        "/api/users",
        serde_json::json!({ "name": "Jane 2", "email": "jane@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_user_creates_with_one_email_admit_one() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = router(&dir);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = serde_json::json!({
                    "name": format!("Buyer {i}"),
                    "email": "same@example.com",
                });
                post_json(app, "/api/users", body).await.0
            })
        })
        .collect();
    let mut statuses = Vec::new();
    for h in handles {
        statuses.push(h.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 7);
    assert_eq!(onboard_core::user::User::list(dir.path()).unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_advances_keep_every_history_entry() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = create_user(&dir, "jane@example.com", 2.0);
    let app = router(&dir);

    let advance = {
        let app = app.clone();
        let uri = format!("/api/users/{id}/advance");
        tokio::spawn(async move {
            post_json(app, &uri, serde_json::json!({ "action": "self" })).await.0
        })
    };
    let set_stage = {
        let app = app.clone();
        let uri = format!("/api/users/{id}/stage");
        tokio::spawn(async move {
            send(app, "PUT", &uri, Some(serde_json::json!({ "stage": 5 }))).await.0
        })
    };
    assert_eq!(advance.await.unwrap(), StatusCode::OK);
    assert_eq!(set_stage.await.unwrap(), StatusCode::OK);

    let user = onboard_core::user::User::load(dir.path(), &id).unwrap();
    assert_eq!(user.stage_history.len(), 2);
}

#[tokio::test]
async fn create_user_unknown_stage_is_bad_request() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/users",
        serde_json::json!({ "name": "X", "email": "x@example.com", "stage": 1.5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_missing_user_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let (status, _) = get(
        router(&dir),
        "/api/users/6f1c1a4e-8a53-4c2b-9d51-3f7d8a7b9c10",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_user_removes_record() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = create_user(&dir, "gone@example.com", 1.0);

    let (status, _) = send(router(&dir), "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(router(&dir), &format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn assisted_advance_puts_user_on_hold_with_disabled_actions() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = create_user(&dir, "jane@example.com", 2.0);

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/users/{id}/advance"),
        serde_json::json!({ "action": "assisted" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["stage"], 2.5);

    let (status, json) = get(router(&dir), &format!("/api/users/{id}/view")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["view"]["step_label"], "Second step");
    assert_eq!(json["view"]["status"], "on-hold");
    assert_eq!(json["view"]["actions"], serde_json::json!(["self", "assisted"]));
    assert_eq!(json["view"]["actions_enabled"], false);
    assert!(json["content"].is_null());
}

#[tokio::test]
async fn advance_while_on_hold_is_422() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = create_user(&dir, "jane@example.com", 3.5);

    let (status, json) = post_json(
        router(&dir),
        &format!("/api/users/{id}/advance"),
        serde_json::json!({ "action": "self" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("approval"));
}

#[tokio::test]
async fn advance_with_unknown_action_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = create_user(&dir, "jane@example.com", 2.0);

    let (status, _) = post_json(
        router(&dir),
        &format!("/api/users/{id}/advance"),
        serde_json::json!({ "action": "teleport" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_releases_next_stage() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = create_user(&dir, "jane@example.com", 6.5);

    let (status, json) =
        post_json(router(&dir), &format!("/api/users/{id}/approve"), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["stage"], 7.0);
    assert_eq!(json["view"]["status"], "done");
    assert_eq!(json["view"]["actions"], serde_json::json!([]));
}

#[tokio::test]
async fn set_stage_override() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = create_user(&dir, "jane@example.com", 1.0);

    let (status, json) = send(
        router(&dir),
        "PUT",
        &format!("/api/users/{id}/stage"),
        Some(serde_json::json!({ "stage": 4.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["view"]["step"], "fourth");

    let (status, _) = send(
        router(&dir),
        "PUT",
        &format!("/api/users/{id}/stage"),
        Some(serde_json::json!({ "stage": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Stage definitions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stage_crud_and_view_content() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/stages",
        serde_json::json!({
            "order": 2,
            "name": "plumbing",
            "title": "Plumbing",
            "buttons": [
                { "text": "I'll do it", "popup": "<p>Upload your plan</p>" },
                { "text": "Handle it for me", "popup": "<p>We'll call you</p>" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(
        router(&dir),
        "PUT",
        "/api/stages/2",
        Some(serde_json::json!({ "subtitle": "Pipes and fixtures" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["subtitle"], "Pipes and fixtures");
    assert_eq!(json["buttons"][0]["status"], "not-requested");

    let id = create_user(&dir, "jane@example.com", 2.0);
    let (_, json) = get(router(&dir), &format!("/api/users/{id}/view")).await;
    assert_eq!(json["content"]["title"], "Plumbing");

    let (status, _) = send(router(&dir), "DELETE", "/api/stages/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(router(&dir), "/api/stages/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_stage_creates_of_one_order_admit_one() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = router(&dir);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = serde_json::json!({
                    "order": 2,
                    "name": format!("plumbing-{i}"),
                    "title": "Plumbing",
                });
                post_json(app, "/api/stages", body).await.0
            })
        })
        .collect();
    let mut created = 0;
    for h in handles {
        let status = h.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::CONFLICT);
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
async fn stage_with_three_buttons_rejected() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let button = serde_json::json!({ "text": "b" });
    let (status, _) = post_json(
        router(&dir),
        "/api/stages",
        serde_json::json!({
            "order": 3,
            "name": "lighting",
            "title": "Lighting",
            "buttons": [button, button, button]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stage_check_reports_missing_steps() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = get(router(&dir), "/api/stages/check").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["warnings"].as_array().unwrap().len(), 7);
}

// ---------------------------------------------------------------------------
// Theme, nav, config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn theme_update_persists_and_is_served() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = router(&dir);

    let (status, json) = send(
        app.clone(),
        "PUT",
        "/api/theme",
        Some(serde_json::json!({ "appearance": "dark" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["appearance"], "dark");
    assert!(json["css_variables"]["--color-primary"].is_string());

    let (_, json) = get(app, "/api/theme").await;
    assert_eq!(json["appearance"], "dark");

    let saved = onboard_core::config::Config::load(dir.path()).unwrap();
    assert_eq!(saved.ui.appearance, onboard_core::theme::Appearance::Dark);
}

#[tokio::test]
async fn theme_colors_set_separately_both_survive() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let app = router(&dir);

    let (status, _) = send(
        app.clone(),
        "PUT",
        "/api/theme",
        Some(serde_json::json!({ "theme": { "primary": "#112233" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(
        app.clone(),
        "PUT",
        "/api/theme",
        Some(serde_json::json!({ "theme": { "accent": "#A1B2C3" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["theme"]["primary"], "#112233");
    assert_eq!(json["theme"]["accent"], "#a1b2c3");
    assert_eq!(json["css_variables"]["--color-accent"], "#a1b2c3");

    let saved = onboard_core::config::Config::load(dir.path()).unwrap();
    assert_eq!(saved.ui.theme.primary, "#112233");
    assert_eq!(saved.ui.theme.accent, "#a1b2c3");
}

#[tokio::test]
async fn theme_rejects_invalid_color() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let app = router(&dir);
    let (status, _) = send(
        app.clone(),
        "PUT",
        "/api/theme",
        Some(serde_json::json!({ "theme": { "secondary": "#000000", "primary": "blue" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get(app, "/api/theme").await;
    assert_eq!(json["theme"]["secondary"], onboard_core::theme::Theme::default().secondary);
}

#[tokio::test]
async fn nav_items_are_tagged() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(router(&dir), "/api/nav?role=admin").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["kind"], "link");
    assert_eq!(json[0]["href"], "/admin");

    let (status, _) = get(router(&dir), "/api/nav?role=guest").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn config_requires_init() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(router(&dir), "/api/config").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    init_project(&dir);
    let (status, json) = get(router(&dir), "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["app"]["name"], "test-homes");
}
