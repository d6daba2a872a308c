use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;
use utoipa::ToSchema;

/// Application health status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Upstream base URL requests are forwarded to
    pub upstream: String,
}

/// Proxy counters. Lock-free so request handlers never contend.
#[derive(Debug)]
pub struct AppMetrics {
    pub start_time: Instant,
    total_requests: AtomicU64,
    upstream_successes: AtomicU64,
    upstream_failures: AtomicU64,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: AtomicU64::new(0),
            upstream_successes: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
        }
    }

    pub fn increment_requests(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_success(&self) {
        self.upstream_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn snapshot(&self) -> MetricsResponse {
        let total = self.total_requests.load(Ordering::Relaxed);
        let success = self.upstream_successes.load(Ordering::Relaxed);
        let failed = self.upstream_failures.load(Ordering::Relaxed);

        let success_rate = if total > 0 {
            (success as f64 / total as f64) * 100.0
        } else {
            100.0
        };

        MetricsResponse {
            uptime_seconds: self.uptime_seconds(),
            total_requests: total,
            upstream_successes: success,
            upstream_failures: failed,
            success_rate,
        }
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub upstream_successes: u64,
    pub upstream_failures: u64,
    pub success_rate: f64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthStatus)),
    tag = "Operations"
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.metrics.uptime_seconds();

    let health = HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        upstream: state.client.base_url().to_string(),
    };

    info!(
        "Health check requested - status: healthy, uptime: {}s",
        uptime
    );
    (StatusCode::OK, Json(health))
}

#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Proxy counters", body = MetricsResponse)),
    tag = "Operations"
)]
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}

/// Initialize tracing subscriber for structured logging
pub fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "hubspot_property_proxy=info,tower_http=info".to_string());

    let filter_clone = filter.clone();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .json()
        .init();

    info!("Tracing initialized with filter: {}", filter_clone);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_success_rate() {
        let metrics = AppMetrics::new();
        assert_eq!(metrics.snapshot().success_rate, 100.0);

        for _ in 0..4 {
            metrics.increment_requests();
        }
        metrics.increment_success();
        metrics.increment_success();
        metrics.increment_success();
        metrics.increment_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests, 4);
        assert_eq!(snapshot.upstream_successes, 3);
        assert_eq!(snapshot.upstream_failures, 1);
        assert_eq!(snapshot.success_rate, 75.0);
    }
}
