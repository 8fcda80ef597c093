//! HTTP API request handlers

use crate::app::AppState;
use crate::inspection::ScriptInspection;
use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptime_seconds": state.uptime_seconds(),
        })),
    ))
}

/// Validate the config script as it is on disk right now
pub async fn validate_config(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let path = state.config.site.config_script_path();

    let inspection = ScriptInspection::read_async(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read config script");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to read config script: {}", e) })),
        )
    })?;

    tracing::debug!(
        path = %path.display(),
        valid = inspection.valid,
        violations = inspection.violations.len(),
        "Config script validated"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "script": state.config.site.config_script,
            "valid": inspection.valid,
            "errors": inspection.errors,
            "violations": inspection.violations,
            "warnings": inspection.warnings,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    ))
}
