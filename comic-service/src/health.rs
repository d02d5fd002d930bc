//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness check
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check
///
/// Reports the row count of every table. The store lives in process, so
/// once the server answers it is ready.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let counts = state.store().counts().await;

    let mut dependencies = HashMap::new();
    dependencies.insert(
        "store".to_string(),
        DependencyStatus {
            healthy: true,
            message: Some(format!(
                "{} characters, {} series, {} comics",
                counts.characters, counts.series, counts.comics
            )),
        },
    );

    let response = ReadinessResponse {
        ready: true,
        service: state.config().service.name.clone(),
        dependencies,
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_reports_service_name() {
        let state = AppState::new(Config::default());
        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: HealthResponse = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, "comic-service");
    }

    #[tokio::test]
    async fn test_readiness_reports_store() {
        let state = AppState::new(Config::default());
        let response = readiness(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: ReadinessResponse = serde_json::from_slice(&bytes).expect("json");
        assert!(body.ready);
        let store = &body.dependencies["store"];
        assert!(store.healthy);
        assert_eq!(
            store.message.as_deref(),
            Some("0 characters, 0 series, 0 comics")
        );
    }
}
