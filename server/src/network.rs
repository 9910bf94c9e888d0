//! Listener and accept loop for the relay

use crate::connection::handle_connection;
use crate::error::RelayError;
use crate::registry::Registry;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Accepts TCP connections and spawns one handler task per client
pub struct RelayServer {
    listener: TcpListener,
    registry: Arc<Registry>,
    path: Arc<str>,
}

impl RelayServer {
    pub async fn bind(addr: &str, path: &str) -> Result<Self, RelayError> {
        Self::with_registry(addr, path, Arc::new(Registry::new())).await
    }

    /// Binds using a caller-provided registry, e.g. to inspect it from tests.
    pub async fn with_registry(
        addr: &str,
        path: &str,
        registry: Arc<Registry>,
    ) -> Result<Self, RelayError> {
        let listener = TcpListener::bind(addr).await?;
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        info!("Server listening on {} (path {})", addr, path);

        Ok(Self {
            listener,
            registry,
            path: Arc::from(path),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Accepts connections forever. Accept errors are logged and retried.
    pub async fn run(self) -> Result<(), RelayError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Accepted connection from {}", addr);
                    tokio::spawn(handle_connection(
                        Arc::clone(&self.registry),
                        stream,
                        addr,
                        Arc::clone(&self.path),
                    ));
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }
}
