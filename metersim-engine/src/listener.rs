//! TCP listener host
//!
//! Owns the socket side of one meter server instance: binding the configured
//! port, accepting connections, and reporting connection lifecycle to the
//! meter's [`ServerEvents`] implementation. Each accepted connection is
//! handled in its own task so a slow or broken client never blocks the
//! accept loop. Inbound frames are drained and handed to the wire stack;
//! a transport error on one connection is logged and never tears down the
//! listener.

use crate::events::{ConnectionInfo, ServerEvents};
use bytes::BytesMut;
use metersim_core::{SimError, SimResult};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

const READ_BUFFER_CAPACITY: usize = 4096;

/// TCP listener host for one meter server instance
///
/// Bound on construction; [`TcpEngine::shutdown`] closes the listener
/// promptly and is idempotent. The engine is not rebindable after shutdown.
pub struct TcpEngine {
    local_addr: SocketAddr,
    shutdown: Arc<Notify>,
    accept_task: Mutex<Option<JoinHandle<()>>>,
}

impl TcpEngine {
    /// Bind the given port and start accepting connections
    ///
    /// Port 0 binds an ephemeral port; the effective address is available
    /// through [`TcpEngine::local_addr`].
    ///
    /// # Errors
    /// Returns [`SimError::Bind`] when the port is unavailable; the caller
    /// treats that as a per-instance failure, not a fleet-wide one.
    pub async fn bind(port: u16, events: Arc<dyn ServerEvents>) -> SimResult<Self> {
        let address = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| SimError::Bind { port, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| SimError::Bind { port, source })?;

        log::info!("Listening on {}", local_addr);

        let shutdown = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(listener, events, shutdown.clone()));

        Ok(Self {
            local_addr,
            shutdown,
            accept_task: Mutex::new(Some(accept_task)),
        })
    }

    /// Effective local address of the listener
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and release the port
    ///
    /// Returns promptly even if a connection is mid-request: connection
    /// tasks observe the shutdown signal at their next await point and the
    /// accept task is aborted rather than drained. Idempotent.
    pub async fn shutdown(&self) {
        self.shutdown.notify_waiters();
        if let Some(task) = self.accept_task.lock().await.take() {
            task.abort();
            // An aborted task resolves with a JoinError; nothing to report.
            let _ = task.await;
            log::info!("Listener on {} closed", self.local_addr);
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    events: Arc<dyn ServerEvents>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let events = events.clone();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            handle_connection(stream, peer, events, shutdown).await;
                        });
                    }
                    Err(e) => {
                        // Transient accept failures must not end the listener.
                        log::error!("Error accepting connection: {}", e);
                    }
                }
            }
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    events: Arc<dyn ServerEvents>,
    shutdown: Arc<Notify>,
) {
    let info = ConnectionInfo { peer };
    events.connected(&info).await;

    let mut buffer = BytesMut::with_capacity(READ_BUFFER_CAPACITY);
    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            read = stream.read_buf(&mut buffer) => {
                match read {
                    Ok(0) => break,
                    Ok(n) => {
                        // Frame parsing and reply transmission belong to the
                        // wire stack layered on top of this host.
                        log::trace!("{}: received {} bytes", peer, n);
                        buffer.clear();
                    }
                    Err(e) => {
                        log::error!("{}: transport error: {}", peer, e);
                        break;
                    }
                }
            }
        }
    }

    events.disconnected(&info).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AttributeRequest, AuthOutcome, ObjectRef};
    use async_trait::async_trait;
    use metersim_core::{AccessMode, AssociationLevel, AuthMechanism, MethodAccess, ObisCode, ObjectKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingEvents {
        connects: AtomicUsize,
        disconnects: AtomicUsize,
    }

    #[async_trait]
    impl ServerEvents for RecordingEvents {
        async fn find_object(
            &self,
            _kind: ObjectKind,
            _short_name: u16,
            _logical_name: Option<ObisCode>,
        ) -> Option<ObjectRef> {
            None
        }

        async fn pre_read(&self, _requests: &mut [AttributeRequest]) {}

        async fn pre_write(&self, _requests: &mut [AttributeRequest]) {}

        async fn validate_authentication(
            &self,
            _mechanism: AuthMechanism,
            _secret: &[u8],
        ) -> AuthOutcome {
            AuthOutcome::Accepted
        }

        async fn connected(&self, _info: &ConnectionInfo) {
            self.connects.fetch_add(1, Ordering::SeqCst);
        }

        async fn disconnected(&self, _info: &ConnectionInfo) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }

        fn is_target(&self, _server_address: u16, _client_address: u16) -> bool {
            true
        }

        fn attribute_access(
            &self,
            _kind: ObjectKind,
            _attribute: u8,
            _level: AssociationLevel,
        ) -> AccessMode {
            AccessMode::Read
        }

        fn method_access(&self, _kind: ObjectKind, _method: u8) -> MethodAccess {
            MethodAccess::Allowed
        }
    }

    #[tokio::test]
    async fn test_bind_accept_and_shutdown() {
        let events = Arc::new(RecordingEvents::default());
        let engine = TcpEngine::bind(0, events.clone()).await.unwrap();
        let addr = engine.local_addr();
        assert_ne!(addr.port(), 0);

        let client = TcpStream::connect(addr).await.unwrap();
        drop(client);

        // Give the listener a moment to run the connection task.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(events.connects.load(Ordering::SeqCst), 1);
        assert_eq!(events.disconnects.load(Ordering::SeqCst), 1);

        engine.shutdown().await;
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let events = Arc::new(RecordingEvents::default());
        let engine = TcpEngine::bind(0, events).await.unwrap();
        engine.shutdown().await;
        engine.shutdown().await;
    }

    #[tokio::test]
    async fn test_bind_conflict_reports_port() {
        let events = Arc::new(RecordingEvents::default());
        let first = TcpEngine::bind(0, events.clone()).await.unwrap();
        let port = first.local_addr().port();

        let second = TcpEngine::bind(port, events).await;
        match second {
            Err(SimError::Bind { port: reported, .. }) => assert_eq!(reported, port),
            other => panic!("expected bind error, got {:?}", other.map(|e| e.local_addr())),
        }
        first.shutdown().await;
    }
}
