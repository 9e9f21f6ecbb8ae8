use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use log::{error, info, warn};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tower::ServiceExt;

use axum::Router;
use axum::extract::ConnectInfo;

use crate::error::ServerError;
use crate::protocol::build_router;
use crate::server::config::ServerConfig;
use crate::storage::StorageRoot;

/// Shutdown state shared with the accept loop: `None` while running,
/// `Some(grace)` once `stop` has been requested.
type ShutdownSignal = Option<Duration>;

/// HTTP streaming file server.
///
/// Owns the listener and the Storage Root. Nothing is served until `start`
/// is called; `stop` shuts the listener down and drains in-flight requests.
/// Dropping a started server without `stop` shuts it down with no grace.
pub struct StreamingServer {
    storage: Arc<StorageRoot>,
    local_addr: SocketAddr,
    listener: Option<TcpListener>,
    shutdown_tx: watch::Sender<ShutdownSignal>,
    accept_task: Option<JoinHandle<()>>,
}

impl StreamingServer {
    /// Creates the Storage Root if needed and binds the listener.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let storage = StorageRoot::open(&config.storage_path())?;

        let socket = config.socket_addr();
        let mut resolved = tokio::net::lookup_host(socket.as_str()).await?;
        let requested: SocketAddr = match resolved.next() {
            Some(addr) => addr,
            None => return Err(ServerError::InvalidAddress(socket.clone())),
        };

        let listener = match TcpListener::bind(requested).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", requested, e);
                return Err(ServerError::BindFailed(requested, e));
            }
        };
        let local_addr = listener.local_addr()?;
        info!("Server bound to {}", local_addr);

        let (shutdown_tx, _) = watch::channel(None);

        Ok(Self {
            storage: Arc::new(storage),
            local_addr,
            listener: Some(listener),
            shutdown_tx,
            accept_task: None,
        })
    }

    /// The bound port; differs from the configured one when that was 0.
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn storage_root(&self) -> &Path {
        self.storage.path()
    }

    /// Spawns the accept loop. Calling it more than once has no effect.
    pub fn start(&mut self) {
        let Some(listener) = self.listener.take() else {
            warn!("Server on {} already started", self.local_addr);
            return;
        };

        let router = build_router(Arc::clone(&self.storage));
        let shutdown_rx = self.shutdown_tx.subscribe();
        self.accept_task = Some(tokio::spawn(accept_loop(listener, router, shutdown_rx)));

        info!(
            "HTTP streaming server started on http://localhost:{}",
            self.port()
        );
        info!("Storage directory: {}", self.storage.path().display());
    }

    /// Stops accepting connections and gives in-flight requests up to `grace`
    /// to finish before they are aborted.
    pub async fn stop(mut self, grace: Duration) {
        info!("Stopping server on {} (grace {:?})", self.local_addr, grace);
        let _ = self.shutdown_tx.send(Some(grace));

        if let Some(task) = self.accept_task.take() {
            if let Err(e) = task.await {
                error!("Accept loop ended abnormally: {}", e);
            }
        }

        info!("Server on {} stopped", self.local_addr);
    }
}

/// Accepts connections until shutdown, spawning one task per connection.
async fn accept_loop(
    listener: TcpListener,
    router: Router,
    mut shutdown_rx: watch::Receiver<ShutdownSignal>,
) {
    let mut connections = JoinSet::new();

    let grace = loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        connections.spawn(serve_connection(
                            stream,
                            addr,
                            router.clone(),
                            shutdown_rx.clone(),
                        ));
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                }
            }
            // reap finished connections so the set does not grow unbounded
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            changed = shutdown_rx.changed() => {
                match (changed, *shutdown_rx.borrow()) {
                    (Ok(()), Some(grace)) => break grace,
                    (Ok(()), None) => continue,
                    (Err(_), _) => break Duration::ZERO,
                }
            }
        }
    };

    drop(listener);

    if connections.is_empty() {
        return;
    }

    info!(
        "Waiting up to {:?} for {} open connection(s)",
        grace,
        connections.len()
    );
    let drained = tokio::time::timeout(grace, async {
        while connections.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        warn!(
            "Aborting {} connection(s) still open after grace period",
            connections.len()
        );
        connections.shutdown().await;
    }
}

/// Serves one HTTP/1.1 connection through the router.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    router: Router,
    mut shutdown_rx: watch::Receiver<ShutdownSignal>,
) {
    let io = TokioIo::new(stream);
    let svc = service_fn(move |mut req: Request<Incoming>| {
        req.extensions_mut().insert(ConnectInfo(peer_addr));
        router.clone().oneshot(req)
    });

    let conn = http1::Builder::new().serve_connection(io, svc);
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        _ = shutdown_requested(&mut shutdown_rx) => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    if let Err(e) = result {
        warn!("Connection error from {}: {}", peer_addr, e);
    }
}

/// Resolves once `stop` has been called or the server was dropped.
async fn shutdown_requested(shutdown_rx: &mut watch::Receiver<ShutdownSignal>) {
    let _ = shutdown_rx.wait_for(|signal| signal.is_some()).await;
}
