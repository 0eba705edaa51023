//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the per-instance Axum router (status route, diagnostics)
//! - Wire up middleware (tracing, request timeout)
//! - Run the accept/dispatch loop until the close trigger fires

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::any, Router};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::diagnostics::{self, DiagnosticsState};
use crate::http::response::StatusTemplate;

/// State injected into the status handler.
#[derive(Clone)]
pub struct StatusState {
    pub label: Arc<str>,
    pub template: Arc<dyn StatusTemplate>,
}

/// HTTP server for one liveness instance.
///
/// Owns its router; nothing is registered process-wide, so several servers
/// can live in one process.
#[derive(Clone)]
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server answering every path with the rendered status body.
    pub fn new(
        status: StatusState,
        diagnostics: Option<DiagnosticsState>,
        request_timeout: Duration,
    ) -> Self {
        let router = Self::build_router(status, diagnostics, request_timeout);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        status: StatusState,
        diagnostics: Option<DiagnosticsState>,
        request_timeout: Duration,
    ) -> Router {
        let mut router = Router::new()
            .route("/{*path}", any(status_handler))
            .route("/", any(status_handler))
            .with_state(status);

        if let Some(diagnostics) = diagnostics {
            router = router.merge(diagnostics::router(diagnostics));
        }

        router
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving it elsewhere or driving it in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the accept loop on `listener` until `shutdown` resolves.
    ///
    /// The listener is dropped as soon as `shutdown` resolves; the call
    /// returns once in-flight connections have finished.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }
}

/// Path- and method-independent status reply.
async fn status_handler(State(state): State<StatusState>) -> impl IntoResponse {
    (StatusCode::OK, state.template.render(&state.label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::PlainStatus;
    use crate::lifecycle::{OneShot, ServerState};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use std::sync::OnceLock;
    use std::time::Instant;
    use tokio::sync::watch;
    use tower::ServiceExt;

    fn status(label: &str) -> StatusState {
        StatusState {
            label: Arc::from(label),
            template: Arc::new(PlainStatus),
        }
    }

    async fn call(router: Router, method: Method, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_every_path_and_method_gets_label() {
        let server = HttpServer::new(status("green"), None, Duration::from_secs(5));

        for (method, path) in [
            (Method::GET, "/"),
            (Method::GET, "/anything"),
            (Method::POST, "/deeply/nested/path"),
            (Method::DELETE, "/x?y=z"),
            (Method::GET, "/debug/status"),
        ] {
            let (code, body) = call(server.router(), method, path).await;
            assert_eq!(code, StatusCode::OK, "path {path}");
            assert_eq!(body, "200 OK green\n", "path {path}");
        }
    }

    #[tokio::test]
    async fn test_custom_template() {
        struct Shouting;
        impl StatusTemplate for Shouting {
            fn render(&self, label: &str) -> String {
                format!("ALIVE {}", label.to_uppercase())
            }
        }

        let state = StatusState {
            label: Arc::from("blue"),
            template: Arc::new(Shouting),
        };
        let server = HttpServer::new(state, None, Duration::from_secs(5));
        let (code, body) = call(server.router(), Method::GET, "/").await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, "ALIVE BLUE");
    }

    #[tokio::test]
    async fn test_diagnostics_reports_state() {
        let (state_tx, state_rx) = watch::channel(ServerState::Created);
        let diagnostics = DiagnosticsState {
            label: Arc::from("blue"),
            address: Arc::from("0.0.0.0:7701"),
            local_addr: Arc::new(OnceLock::new()),
            state: state_rx,
            stop_requested: OneShot::new(),
            created_at: Instant::now(),
        };
        let server = HttpServer::new(status("blue"), Some(diagnostics), Duration::from_secs(5));

        state_tx.send_replace(ServerState::Listening);
        let (code, body) = call(server.router(), Method::GET, "/debug/status").await;
        assert_eq!(code, StatusCode::OK);

        let report: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(report["label"], "blue");
        assert_eq!(report["address"], "0.0.0.0:7701");
        assert_eq!(report["state"], "listening");
        assert_eq!(report["stop_requested"], false);
        assert!(report["local_addr"].is_null());

        // Other paths still get the status body.
        let (_, body) = call(server.router(), Method::GET, "/debug/other").await;
        assert_eq!(body, "200 OK blue\n");
    }
}
