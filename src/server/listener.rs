//! Socket Listener
//!
//! Accept loop and per-connection request/reply loop over the Unix socket.
//!
//! Connections are persistent: a client can issue any number of
//! newline-framed requests before disconnecting. A semaphore bounds the
//! number of requests in flight across all connections so the accept loop
//! is never starved by request processing.

use std::io;
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::server::dispatch;
use crate::storage::StorageRouter;

/// Size of the dispatch pool: requests processed concurrently across all
/// connections.
pub const MAX_IN_FLIGHT: usize = 20;

/// Binds the Unix socket at `path`, removing a stale socket file first.
pub fn bind(path: &Path) -> io::Result<UnixListener> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    UnixListener::bind(path)
}

/// Runs the accept loop forever. Each connection is served by its own task;
/// a connection failing affects only that connection.
pub async fn serve(listener: UnixListener, router: Arc<StorageRouter>) -> io::Result<()> {
    let permits = Arc::new(Semaphore::new(MAX_IN_FLIGHT));

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                info!("client connected");
                let router = Arc::clone(&router);
                let permits = Arc::clone(&permits);
                tokio::spawn(async move {
                    if let Err(e) = handle_client(stream, router, permits).await {
                        warn!(error = %e, "client connection closed with error");
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "accept failed");
            }
        }
    }
}

/// Serves one connection until the client disconnects or an I/O error
/// occurs. Requests on a connection are processed in order; a reply that
/// cannot be written is discarded with the connection.
async fn handle_client(
    stream: UnixStream,
    router: Arc<StorageRouter>,
    permits: Arc<Semaphore>,
) -> io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = {
            let _permit = match permits.acquire().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            dispatch::handle_line(&router, &line).await
        };

        write_half.write_all(reply.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    info!("client disconnected");
    Ok(())
}
