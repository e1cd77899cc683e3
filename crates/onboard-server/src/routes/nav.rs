use axum::extract::Query;
use axum::Json;
use onboard_core::nav::{nav_for, NavItem};
use onboard_core::types::Role;

use crate::error::AppError;

#[derive(serde::Deserialize)]
pub struct NavQuery {
    #[serde(default)]
    pub role: Option<String>,
}

/// GET /api/nav?role=admin|homebuyer: navigation entries for a role.
pub async fn get_nav(Query(q): Query<NavQuery>) -> Result<Json<Vec<NavItem>>, AppError> {
    let role: Role = match q.role.as_deref() {
        None => Role::Homebuyer,
        Some(s) => s.parse()?,
    };
    Ok(Json(nav_for(role)))
}
