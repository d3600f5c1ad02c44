//! Observers of proxy events.
//!
//! Observers are diagnostic only: they cannot change a response, and a slow
//! or closed observer never blocks forwarding.

use tokio::sync::mpsc;

use super::ProxyEvent;
use crate::ui::format_duration;

pub trait ProxyObserver: Send + Sync {
    fn on_event(&self, event: &ProxyEvent);
}

/// Logs every event with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProxyObserver for TracingObserver {
    fn on_event(&self, event: &ProxyEvent) {
        match event {
            ProxyEvent::RequestForwarded {
                method,
                path,
                upstream,
            } => {
                tracing::info!(%method, path, upstream = %upstream, "sending request to the target");
            }
            ProxyEvent::ResponseReceived {
                method,
                path,
                status,
                latency,
            } => {
                tracing::info!(
                    %method,
                    path,
                    status = status.as_u16(),
                    latency = %format_duration(*latency),
                    "received response from the target"
                );
            }
            ProxyEvent::TransportError {
                method,
                path,
                kind,
                message,
            } => {
                tracing::error!(%method, path, %kind, error = message.as_str(), "proxy error");
            }
        }
    }
}

/// Sends a copy of every event down an unbounded channel.
///
/// ```
/// use chunkwise_cli::dev::ChannelObserver;
///
/// let (observer, mut events) = ChannelObserver::new();
/// drop(observer);
/// assert!(events.try_recv().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ProxyEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProxyEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProxyObserver for ChannelObserver {
    fn on_event(&self, event: &ProxyEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(event.clone());
    }
}
