//! Development API proxy.
//!
//! Requests whose path starts with a configured prefix are rewritten and
//! forwarded to an upstream backend. Upstream failures become `502`/`504`
//! responses and never stop the server.
//!
//! - [`proxy`] - rules and the forwarder
//! - [`observer`] - where [`ProxyEvent`]s go
//! - [`server`] - the axum server around them

pub mod observer;
pub mod proxy;
pub mod server;

pub use observer::{ChannelObserver, ProxyObserver, TracingObserver};
pub use proxy::{DevelopmentOnly, Forwarder, ProxyRule, ProxyRules};
pub use server::{DevServer, ServerHandle};

use std::time::Duration;

use axum::http::{Method, StatusCode};
use url::Url;

/// What happened to a proxied request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyEvent {
    /// The request was rewritten and sent upstream.
    RequestForwarded {
        method: Method,
        path: String,
        upstream: Url,
    },

    /// The upstream answered. Any status counts, including 5xx.
    ResponseReceived {
        method: Method,
        path: String,
        status: StatusCode,
        latency: Duration,
    },

    /// No usable answer from the upstream.
    TransportError {
        method: Method,
        path: String,
        kind: TransportErrorKind,
        message: String,
    },
}

impl ProxyEvent {
    /// Inbound request path the event is about.
    pub fn path(&self) -> &str {
        match self {
            ProxyEvent::RequestForwarded { path, .. }
            | ProxyEvent::ResponseReceived { path, .. }
            | ProxyEvent::TransportError { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, DNS failure, TLS handshake failure.
    Connect,
    Timeout,
    /// The response was cut off or could not be read.
    Other,
}

impl TransportErrorKind {
    /// Status returned to the client.
    pub fn status(self) -> StatusCode {
        match self {
            TransportErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            TransportErrorKind::Connect | TransportErrorKind::Other => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Other => "other",
        }
    }
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
