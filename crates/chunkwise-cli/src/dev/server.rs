//! The development server: proxy rules behind an axum router.
//!
//! Requests matching a rule are forwarded; everything else gets a plain
//! `404`. The server runs on its own task and shuts down gracefully through
//! its [`ServerHandle`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::proxy::{Forwarder, ProxyRules};
use crate::error::{CliError, Result};

#[derive(Clone)]
struct AppState {
    rules: Arc<ProxyRules>,
    forwarder: Arc<Forwarder>,
}

pub struct DevServer {
    host: String,
    port: u16,
    cors: bool,
    state: AppState,
}

impl DevServer {
    pub fn new(host: impl Into<String>, port: u16, rules: ProxyRules, forwarder: Forwarder) -> Self {
        Self {
            host: host.into(),
            port,
            cors: true,
            state: AppState {
                rules: Arc::new(rules),
                forwarder: Arc::new(forwarder),
            },
        }
    }

    /// Answer CORS preflights and allow any origin. On by default.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    pub fn router(&self) -> Router {
        let router = Router::new()
            .fallback(handle_request)
            .with_state(self.state.clone())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    tracing::debug_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }),
            );

        if self.cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Bind the listener and start serving on a background task.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Server`] if the address cannot be bound.
    pub async fn start(self) -> Result<ServerHandle> {
        let app = self.router();
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|err| {
                CliError::Server(format!("failed to bind {}:{}: {err}", self.host, self.port))
            })?;
        let addr = listener.local_addr()?;
        tracing::debug!(%addr, "dev server listening");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(ServerHandle {
            addr,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// A running [`DevServer`].
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL to open in a browser. Wildcard addresses become `localhost`.
    pub fn url(&self) -> String {
        if self.addr.ip().is_unspecified() {
            format!("http://localhost:{}", self.addr.port())
        } else {
            format!("http://{}", self.addr)
        }
    }

    /// Resolves when the server stops on its own, which only happens on error.
    pub async fn stopped(&mut self) -> Result<()> {
        match (&mut self.task).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(CliError::Server(err.to_string())),
            Err(err) => Err(CliError::Server(format!("server task failed: {err}"))),
        }
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        match self.task.await {
            Ok(result) => result.map_err(|err| CliError::Server(err.to_string())),
            Err(err) => Err(CliError::Server(format!("server task failed: {err}"))),
        }
    }
}

async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    match state.rules.find(&path) {
        Some(rule) => state.forwarder.forward(rule, request).await,
        None => (
            StatusCode::NOT_FOUND,
            format!("No proxy rule matches {path}\n"),
        )
            .into_response(),
    }
}
