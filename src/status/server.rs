//! Read-only status HTTP surface.
//!
//! # Endpoints
//! - `GET /`             full-detail plaintext view
//! - `GET /nodes`        terse `name: role` listing
//! - `GET /health`       one-line monitoring classification
//! - `GET /api/snapshot` JSON snapshot
//! - `GET /api/health`   JSON classification

use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::status::report::{render_detail, render_nodes, HealthReport};
use crate::status::snapshot::{ClusterSnapshot, SharedPublisher};

/// State injected into status handlers.
#[derive(Clone)]
pub struct StatusState {
    pub publisher: SharedPublisher,
    /// Normal polling interval, used for staleness.
    pub interval: Duration,
}

/// Build the status router.
pub fn status_router(state: StatusState) -> Router {
    Router::new()
        .route("/", get(detail_handler))
        .route("/nodes", get(nodes_handler))
        .route("/health", get(health_handler))
        .route("/api/snapshot", get(snapshot_json_handler))
        .route("/api/health", get(health_json_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the status endpoints until shutdown.
pub async fn serve(
    listener: TcpListener,
    state: StatusState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Status server starting");

    axum::serve(listener, status_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Status server stopped");
    Ok(())
}

async fn detail_handler(State(state): State<StatusState>) -> String {
    render_detail(&state.publisher.fetch(), Utc::now())
}

async fn nodes_handler(State(state): State<StatusState>) -> String {
    render_nodes(&state.publisher.fetch())
}

async fn health_handler(State(state): State<StatusState>) -> String {
    HealthReport::evaluate(&state.publisher.fetch(), Utc::now(), state.interval).line()
}

async fn snapshot_json_handler(State(state): State<StatusState>) -> Json<ClusterSnapshot> {
    Json(state.publisher.fetch().as_ref().clone())
}

async fn health_json_handler(State(state): State<StatusState>) -> Json<HealthReport> {
    Json(HealthReport::evaluate(
        &state.publisher.fetch(),
        Utc::now(),
        state.interval,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{Member, Role};
    use crate::status::snapshot::SnapshotPublisher;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state_with_round() -> StatusState {
        let publisher = Arc::new(SnapshotPublisher::new());
        let now = Utc::now();
        let mut members = vec![
            Member::new("a", ""),
            Member::new("b", ""),
        ];
        members[0].observe(Role::Standby, now);
        members[1].observe(Role::Primary, now);
        let mut proxy = Member::new("proxy", "");
        proxy.observe(Role::Primary, now);
        publisher.publish(ClusterSnapshot::capture(1, &members, &proxy));

        StatusState {
            publisher,
            interval: Duration::from_secs(30),
        }
    }

    async fn get_body(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_nodes_endpoint() {
        let (status, body) = get_body(status_router(state_with_round()), "/nodes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "a: standby\nb: primary\n");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (_, body) = get_body(status_router(state_with_round()), "/health").await;
        assert_eq!(body, "OK: 1 primary, 1 standbys active");
    }

    #[tokio::test]
    async fn test_snapshot_json() {
        let (status, body) = get_body(status_router(state_with_round()), "/api/snapshot").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["round"], 1);
        assert_eq!(json["members"][1]["name"], "b");
        assert_eq!(json["members"][1]["role"], "primary");
        assert_eq!(json["proxy_health"]["role"], "primary");
    }

    #[tokio::test]
    async fn test_health_before_first_round() {
        let state = StatusState {
            publisher: Arc::new(SnapshotPublisher::new()),
            interval: Duration::from_secs(30),
        };
        let (_, body) = get_body(status_router(state), "/api/health").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["level"], "CRITICAL");
    }
}
