//! HTTP listener exposing the Prometheus registry.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use runners_telemetry::{Metrics, ReportExt, build_sha};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Span, error, info};

use crate::error::{AppError, AppResult};

/// Liveness payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the listener is serving.
    pub status: &'static str,
}

/// Build the router serving `/metrics` and `/health`.
#[must_use]
pub fn router(metrics: Metrics) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                route = %request.uri().path(),
                build_sha = %build_sha(),
                status_code = tracing::field::Empty,
                latency_ms = tracing::field::Empty
            )
        })
        .on_request(|_request: &Request<_>, _span: &Span| {})
        .on_response(|response: &Response, latency: Duration, span: &Span| {
            span.record("status_code", response.status().as_u16());
            span.record(
                "latency_ms",
                u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            );
        });

    Router::new()
        .route("/metrics", get(render_metrics))
        .route("/health", get(health))
        .layer(trace_layer)
        .with_state(metrics)
}

/// Bind the listener on every interface.
///
/// # Errors
///
/// Returns [`AppError::Bind`] when the port is unavailable.
pub async fn bind(port: u16) -> AppResult<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })
}

/// Serve the router until the listener fails.
///
/// # Errors
///
/// Returns [`AppError::Serve`] if the server terminates with an IO error.
pub async fn serve(listener: TcpListener, metrics: Metrics) -> AppResult<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "metrics listener started");
    }
    axum::serve(listener, router(metrics).into_make_service())
        .await
        .map_err(|source| AppError::Serve { source })
}

async fn render_metrics(State(metrics): State<Metrics>) -> Response {
    match metrics.render() {
        Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, metrics.content_type())], body).into_response(),
        Err(err) => {
            error!(error = %err.report(), "failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render metrics").into_response()
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use runners_telemetry::RUNNER_UP;
    use runners_test_support::metrics::gauge_samples;
    use tower::ServiceExt;

    async fn get_path(router: Router, path: &str) -> anyhow::Result<(StatusCode, String, String)> {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty())?)
            .await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, content_type, String::from_utf8(body.to_vec())?))
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_runner_gauge() -> anyhow::Result<()> {
        let metrics = Metrics::new()?;
        metrics.set_runner_count("prod", "f1", 4);

        let (status, content_type, body) = get_path(router(metrics), "/metrics").await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/plain; version=0.0.4");
        assert_eq!(
            gauge_samples(&body, RUNNER_UP).get(&("prod".to_string(), "f1".to_string())),
            Some(&4)
        );
        Ok(())
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() -> anyhow::Result<()> {
        let (status, content_type, body) = get_path(router(Metrics::new()?), "/health").await?;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("application/json"));
        let payload: serde_json::Value = serde_json::from_str(&body)?;
        assert_eq!(payload["status"], "ok");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() -> anyhow::Result<()> {
        let (status, _, _) = get_path(router(Metrics::new()?), "/nope").await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn bind_reports_port_in_use() -> anyhow::Result<()> {
        let taken = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], 0))).await?;
        let port = taken.local_addr()?.port();

        let err = bind(port).await.expect_err("port should be taken");
        assert!(matches!(err, AppError::Bind { addr, .. } if addr.port() == port));
        Ok(())
    }
}
