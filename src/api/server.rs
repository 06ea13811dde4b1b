//! Listener lifecycle for the chat API.
//!
//! `start_server_on` binds the address, serves `api_router` from a spawned
//! task and hands back a [`ServerHandle`]. Dropping the handle leaves the
//! task running; call `shutdown` then `join` to drain in-flight requests.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::api_router;
use crate::core_state::CoreState;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("cannot bind chat API to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("cannot read bound address: {0}")]
    LocalAddr(#[source] io::Error),
}

/// Identity of one server run, logged at startup.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub instance_id: Uuid,
    /// Address actually bound; differs from the requested one for port 0.
    pub addr: SocketAddr,
    pub started_at: DateTime<Utc>,
}

pub struct ServerHandle {
    pub info: ServerInfo,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// Stop accepting connections. Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        let Some(tx) = self.stop_tx.take() else {
            return;
        };
        if tx.send(()).is_err() {
            tracing::warn!(addr = %self.info.addr, "Chat API already gone at shutdown");
        }
    }

    /// Wait until the serve task has drained and exited.
    pub async fn join(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = task.await {
            tracing::error!(addr = %self.info.addr, "Chat API task panicked: {e}");
        }
    }
}

/// Bind `addr` and serve the chat API in the background.
pub async fn start_server_on(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ServerHandle, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let bound = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let info = ServerInfo {
        instance_id: Uuid::new_v4(),
        addr: bound,
        started_at: Utc::now(),
    };
    let (stop_tx, stop_rx) = oneshot::channel();

    let app = api_router(core);
    let task = tokio::spawn(async move {
        let drained = axum::serve(listener, app).with_graceful_shutdown(async move {
            // A dropped sender counts as a stop request too
            let _ = stop_rx.await;
            tracing::info!(addr = %bound, "Chat API draining");
        });
        match drained.await {
            Ok(()) => tracing::info!(addr = %bound, "Chat API closed"),
            Err(e) => tracing::error!(addr = %bound, "Chat API failed: {e}"),
        }
    });

    Ok(ServerHandle {
        info,
        stop_tx: Some(stop_tx),
        task: Some(task),
    })
}
