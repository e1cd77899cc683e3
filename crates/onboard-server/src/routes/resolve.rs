use axum::extract::Path;
use axum::Json;
use onboard_core::resolver::{self, StageView};

use crate::error::AppError;

/// GET /api/resolve/{value}: resolver output for a raw stage number.
///
/// Any number resolves (unknown values get the safe defaults); only text
/// that is not a number is rejected.
pub async fn resolve_value(Path(value): Path<String>) -> Result<Json<StageView>, AppError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("stage value '{value}' is not a number")))?;
    Ok(Json(resolver::resolve(parsed)))
}
