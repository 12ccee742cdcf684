//! Health Check module for the GraphQL mock server
//!
//! Provides liveness and readiness checks so container orchestrators can tell
//! when the mock server is serving and when it has started draining.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Health status enumeration
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Health response structure
#[derive(Debug, Serialize)]
pub struct Health {
    status: HealthStatus,
}

/// Configuration options for the health check component.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Set to true to enable the health check
    pub enabled: bool,

    /// Optionally set a custom healthcheck path
    /// Defaults to /health
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "/health".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    config: HealthCheckConfig,
    ready: Arc<AtomicBool>,
}

impl HealthCheck {
    pub fn new(config: HealthCheckConfig) -> Self {
        Self {
            config,
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    /// Stop reporting ready; the process stays live until it exits
    pub fn mark_draining(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    pub fn get_health_state(&self, query: Option<&str>) -> (Health, StatusCode) {
        // Liveness stays UP for as long as the process answers
        let ready_check =
            query.is_some_and(|query| query.to_ascii_uppercase().starts_with("READY"));

        if ready_check && !self.ready.load(Ordering::SeqCst) {
            (
                Health {
                    status: HealthStatus::Down,
                },
                StatusCode::SERVICE_UNAVAILABLE,
            )
        } else {
            (
                Health {
                    status: HealthStatus::Up,
                },
                StatusCode::OK,
            )
        }
    }
}

/// Health check endpoint handler
pub(crate) async fn health_endpoint(
    State(health_check): State<HealthCheck>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Health>) {
    let query = params.keys().next().map(String::as_str);
    let (health, status_code) = health_check.get_health_state(query);

    trace!(?health, ?query, "health check");

    (status_code, Json(health))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_health_check_default_config() {
        let config = HealthCheckConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.path, "/health");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("ready"))]
    #[case(Some("live"))]
    #[case(Some("other"))]
    fn test_serving_is_up(#[case] query: Option<&str>) {
        let health_check = HealthCheck::new(HealthCheckConfig::default());

        let (health, status_code) = health_check.get_health_state(query);

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(status_code, StatusCode::OK);
    }

    #[test]
    fn test_draining_is_live_but_not_ready() {
        let health_check = HealthCheck::new(HealthCheckConfig::default());
        health_check.mark_draining();

        let (ready, ready_code) = health_check.get_health_state(Some("ready"));
        let (live, live_code) = health_check.get_health_state(Some("live"));

        assert_eq!(ready.status, HealthStatus::Down);
        assert_eq!(ready_code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(live.status, HealthStatus::Up);
        assert_eq!(live_code, StatusCode::OK);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("live"))]
    fn test_draining_stays_live(#[case] query: Option<&str>) {
        let health_check = HealthCheck::new(HealthCheckConfig::default());
        health_check.mark_draining();

        let (health, status_code) = health_check.get_health_state(query);

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(status_code, StatusCode::OK);
    }

    #[test]
    fn test_clones_share_state() {
        let health_check = HealthCheck::new(HealthCheckConfig::default());
        health_check.clone().mark_draining();

        assert_eq!(
            health_check.get_health_state(Some("READY")).0.status,
            HealthStatus::Down
        );
    }

    #[test]
    fn test_serializes_uppercase_status() {
        let (health, _) = HealthCheck::new(HealthCheckConfig::default()).get_health_state(None);

        insta::assert_snapshot!(serde_json::to_string(&health).unwrap(), @r#"{"status":"UP"}"#);
    }
}
