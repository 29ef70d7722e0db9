//! HTTP server configuration and request routing.
//!
//! Requests flow through middleware in order:
//! 1. Request ID generation
//! 2. Request/response tracing
//! 3. Body size limit (413 before decoding)
//! 4. Handler execution
//!
//! The server shuts down gracefully on Ctrl+C / SIGTERM: it stops accepting
//! connections and lets in-flight requests finish.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use contracts::Publisher;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::pipeline::Gateway;
use crate::reply::{IngestReply, ReplyBody};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request identifier stored in request extensions
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Creates the Axum router.
///
/// - `POST /` ingestion endpoint
/// - `GET /health` liveness plus publish counters
pub fn create_router<P>(gateway: Arc<Gateway<P>>, max_body_bytes: usize) -> Router
where
    P: Publisher + Sync + 'static,
{
    Router::new()
        .route("/", post(ingest_handler::<P>))
        .route("/health", get(health_handler::<P>))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            let request_id = req
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.as_str())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %request_id,
            )
        }))
        .layer(middleware::from_fn(inject_request_id))
        .with_state(gateway)
}

async fn ingest_handler<P>(State(gateway): State<Arc<Gateway<P>>>, body: Bytes) -> IngestReply
where
    P: Publisher + Sync + 'static,
{
    gateway.ingest(&body).await
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub publisher: String,
    pub topic: String,
    pub published: u64,
    pub failed: u64,
    pub in_flight: usize,
}

async fn health_handler<P>(State(gateway): State<Arc<Gateway<P>>>) -> Json<HealthResponse>
where
    P: Publisher + Sync + 'static,
{
    let metrics = gateway.metrics();
    Json(HealthResponse {
        status: "alive",
        publisher: gateway.publisher_name().to_string(),
        topic: gateway.topic().to_string(),
        published: metrics.published_count,
        failed: metrics.failure_count,
        in_flight: metrics.in_flight,
    })
}

/// Reuses an incoming X-Request-Id or generates one, and echoes it on the response.
async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

impl IntoResponse for IngestReply {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match self.body {
            ReplyBody::Text(text) => (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                text,
            )
                .into_response(),
            ReplyBody::Json(value) => (status, Json(value)).into_response(),
        }
    }
}

/// Starts the HTTP server with graceful shutdown support.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound.
pub async fn start_server<P>(
    gateway: Arc<Gateway<P>>,
    addr: SocketAddr,
    max_body_bytes: usize,
) -> Result<(), std::io::Error>
where
    P: Publisher + Sync + 'static,
{
    let app = create_router(gateway, max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!(addr = %actual_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received CTRL+C, starting graceful shutdown"),
        () = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
