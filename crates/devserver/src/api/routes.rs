//! API route definitions

use crate::api::handlers;
use crate::app::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create the API router; static files are mounted by the server
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health endpoint
        .route("/healthz", get(handlers::health_check))

        // Config endpoints
        .route("/api/config/validate", get(handlers::validate_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use config::Config;
    use serde_json::Value;
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    fn create_test_state(root: &std::path::Path) -> Arc<AppState> {
        let mut config = Config::default();
        config.site.root = root.display().to_string();
        Arc::new(AppState::new(config))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempdir().unwrap();
        let app = create_routes().with_state(create_test_state(dir.path()));

        let (status, body) = get_json(app, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_validate_endpoint_without_script() {
        let dir = tempdir().unwrap();
        let app = create_routes().with_state(create_test_state(dir.path()));

        let (status, body) = get_json(app, "/api/config/validate").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"][0], "CONFIG 객체가 정의되지 않았습니다.");
        assert_eq!(body["violations"][0], "config_undefined");
    }

    #[tokio::test]
    async fn test_validate_endpoint_survives_deeply_nested_script() {
        let dir = tempdir().unwrap();
        let state = create_test_state(dir.path());
        std::fs::write(
            dir.path().join("config.js"),
            format!("window.CONFIG = {}1;", "[".repeat(200_000)),
        )
        .unwrap();

        let (status, body) = get_json(create_routes().with_state(state), "/api/config/validate").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["violations"], serde_json::json!(["config_undefined"]));
    }

    #[tokio::test]
    async fn test_validate_endpoint_reads_current_script() {
        let dir = tempdir().unwrap();
        let state = create_test_state(dir.path());
        let script = dir.path().join("config.js");

        std::fs::write(
            &script,
            "window.CONFIG = { CLIENT_SECRET: 's', SUPABASE: { URL: 'u' }, NAVER_MAP: { CENTER: [1, 2] } };",
        )
        .unwrap();
        let (_, body) = get_json(create_routes().with_state(state.clone()), "/api/config/validate").await;
        assert_eq!(
            body["errors"],
            serde_json::json!([
                "네이버 지도 CLIENT_ID가 설정되지 않았습니다.",
                "슈퍼베이스 설정이 완전하지 않습니다."
            ])
        );

        std::fs::write(
            &script,
            "window.CONFIG = { CLIENT_ID: 'abc123', CLIENT_SECRET: 's', SUPABASE: { URL: 'u', ANON_KEY: 'k' }, NAVER_MAP: { CENTER: [1, 2] } };",
        )
        .unwrap();
        let (_, body) = get_json(create_routes().with_state(state), "/api/config/validate").await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["errors"], serde_json::json!([]));
    }
}
