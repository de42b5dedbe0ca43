//! Shutdown coordination for the proxy.

use tokio::sync::broadcast;

/// What asked the proxy to stop. Logged when the server drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl+C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// Programmatic stop, e.g. an embedding test harness.
    Requested,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Interrupt => "interrupt",
            ShutdownReason::Terminate => "terminate",
            ShutdownReason::Requested => "requested",
        }
    }
}

/// Fans one stop request out to the server and any background task.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<ShutdownReason>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.tx.subscribe()
    }

    /// Stop with [`ShutdownReason::Requested`].
    pub fn trigger(&self) {
        self.trigger_with(ShutdownReason::Requested);
    }

    pub fn trigger_with(&self, reason: ShutdownReason) {
        if self.tx.send(reason).is_err() {
            tracing::debug!(reason = reason.as_str(), "Shutdown requested with no listeners");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once a stop is requested. A dropped coordinator counts as a request.
pub async fn stopped(mut rx: broadcast::Receiver<ShutdownReason>) -> ShutdownReason {
    rx.recv().await.unwrap_or(ShutdownReason::Requested)
}
