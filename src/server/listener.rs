use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::info;

use crate::config::Config;
use crate::files::FileStore;
use crate::http::connection::Connection;

/// Pause after a failed accept so persistent errors (e.g. EMFILE) don't spin.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Accept loop with a fixed ceiling on connections handled at once.
///
/// Each accepted socket needs a permit before its task is spawned. When
/// none is free the loop stops accepting until a task finishes; queued
/// sockets wait in the kernel backlog and are never dropped.
pub struct Server {
    listener: TcpListener,
    limit: Arc<Semaphore>,
    max_connections: usize,
    store: Arc<FileStore>,
}

impl Server {
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(cfg.bind_addr()).await?;
        info!(
            address = %listener.local_addr()?,
            max_connections = cfg.max_connections,
            root = %cfg.root.display(),
            "Listening"
        );

        Ok(Self {
            listener,
            limit: Arc::new(Semaphore::new(cfg.max_connections)),
            max_connections: cfg.max_connections,
            store: Arc::new(FileStore::new(cfg.root.clone(), cfg.max_upload_size)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Number of connections currently being handled.
    pub fn in_flight(&self) -> usize {
        self.max_connections - self.limit.available_permits()
    }

    /// Handle to the permit pool, for observing load from outside the loop.
    pub fn limiter(&self) -> Arc<Semaphore> {
        Arc::clone(&self.limit)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };

            // Blocks the loop while the ceiling is reached
            let permit = Arc::clone(&self.limit).acquire_owned().await?;

            tracing::debug!(
                peer = %peer,
                in_flight = self.in_flight(),
                "Accepted connection"
            );

            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                // Released when the task ends, whatever the outcome
                let _permit = permit;

                let mut conn = Connection::new(socket, store);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            });
        }
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    Server::bind(cfg).await?.run().await
}
