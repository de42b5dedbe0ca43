//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener from the validated configuration
//! - Fail fast: any startup error is fatal

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Bind the configured address.
pub async fn bind(config: &ListenerConfig) -> std::io::Result<TcpListener> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listener bound");
    Ok(listener)
}
