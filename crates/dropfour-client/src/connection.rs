//! The connection: one transport, two independent lanes.
//!
//! [`Connection::start`] spawns a driver task that establishes the
//! transport and then runs:
//!
//! - the **receive lane** (the driver itself): blocks on inbound frames,
//!   decodes each through the protocol layer, and invokes the single
//!   registered callback per decoded event, in transport order;
//! - the **send lane** (a second task): drains the outbound queue into the
//!   socket, so a slow transport never blocks whoever enqueued the send.
//!
//! The caller's thread touches neither lane. [`Connection::send`] pushes
//! onto an unbounded queue, and [`Connection::is_connected`] reads a watch
//! cell - both safe to call from a render loop at any frame.
//!
//! Lifecycle:
//!
//! ```text
//! Disconnected ──start()──→ Connecting ──open──→ Connected
//!                               │                    │
//!                               └──── error ────┐    │ close / I/O error
//!                                               ▼    ▼
//!                                           Disconnected   (terminal - no auto-reconnect)
//! ```

use std::time::Duration;

use dropfour_protocol::{MessageDecoder, ProtocolError, ServerMessage};
use dropfour_transport::WsSink;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::ClientError;

// ---------------------------------------------------------------------------
// ConnectionStatus
// ---------------------------------------------------------------------------

/// Liveness of the transport link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No transport. The initial state, and the terminal one - there is no
    /// automatic transition back to `Connecting`.
    #[default]
    Disconnected,

    /// The transport handshake is in flight.
    Connecting,

    /// The link is live; sends will be written to the socket.
    Connected,
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// Handle to a running connection.
///
/// Cheap to keep around; all the work happens on the spawned lanes. Must be
/// created inside a Tokio runtime.
pub struct Connection {
    outbound: mpsc::UnboundedSender<String>,
    status: watch::Receiver<ConnectionStatus>,
    shutdown: watch::Sender<bool>,
    driver: JoinHandle<()>,
}

impl Connection {
    /// Establishes the transport asynchronously and starts both lanes.
    ///
    /// Returns immediately; success or failure of the connection attempt is
    /// observed later through [`status`](Self::status) and the events
    /// delivered to `on_event`.
    pub fn start<F>(
        url: impl Into<String>,
        decoder: MessageDecoder,
        on_event: F,
    ) -> Self
    where
        F: FnMut(ServerMessage) + Send + 'static,
    {
        let url = url.into();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) =
            watch::channel(ConnectionStatus::Disconnected);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let driver = tokio::spawn(drive(
            url,
            decoder,
            on_event,
            status_tx,
            outbound_rx,
            shutdown_rx,
        ));

        Self {
            outbound: outbound_tx,
            status: status_rx,
            shutdown: shutdown_tx,
            driver,
        }
    }

    /// Current link status. Never blocks.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Whether the link is currently live. Never blocks.
    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Enqueues a payload for transmission.
    ///
    /// # Errors
    /// Returns [`ClientError::TransportUnavailable`] (and logs) when there
    /// is no live link - the payload is not queued for a connection that
    /// may never exist.
    pub fn send(&self, payload: String) -> Result<(), ClientError> {
        if !self.is_connected() {
            tracing::warn!("not connected, dropping outbound message");
            return Err(ClientError::TransportUnavailable);
        }
        self.outbound.send(payload).map_err(|_| {
            tracing::warn!("outbound lane gone, dropping outbound message");
            ClientError::TransportUnavailable
        })
    }

    /// Signals both lanes to stop. The send lane drains what is already
    /// queued, then closes the socket. Fire-and-forget.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Waits for the driver to finish, but never longer than `limit` -
    /// application shutdown must not hang on a stuck socket.
    pub async fn join(mut self, limit: Duration) {
        if tokio::time::timeout(limit, &mut self.driver).await.is_err() {
            tracing::warn!("connection lanes did not stop in time, aborting");
            self.driver.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Driver: connect, then run the receive lane
// ---------------------------------------------------------------------------

async fn drive<F>(
    url: String,
    decoder: MessageDecoder,
    mut on_event: F,
    status: watch::Sender<ConnectionStatus>,
    outbound: mpsc::UnboundedReceiver<String>,
    mut shutdown: watch::Receiver<bool>,
) where
    F: FnMut(ServerMessage) + Send + 'static,
{
    status.send_replace(ConnectionStatus::Connecting);

    let conn = tokio::select! {
        result = dropfour_transport::connect(&url) => match result {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, %url, "failed to establish transport");
                status.send_replace(ConnectionStatus::Disconnected);
                return;
            }
        },
        _ = shutdown.changed() => {
            status.send_replace(ConnectionStatus::Disconnected);
            return;
        }
    };

    status.send_replace(ConnectionStatus::Connected);
    tracing::info!(%url, "connected");

    let (sink, mut source) = conn.split();
    let send_task = tokio::spawn(send_lane(sink, outbound, shutdown.clone()));

    // Receive lane: frames arrive in transport order, each decoded event is
    // dispatched exactly once. A bad message is isolated and dropped at the
    // decode boundary; the lane keeps running.
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            received = source.next_text() => match received {
                Ok(Some(raw)) => match decoder.decode(&raw) {
                    Ok(message) => on_event(message),
                    Err(ProtocolError::ServerError(reason)) => {
                        tracing::warn!(%reason, "server reported error, event dropped");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "inbound event dropped");
                    }
                },
                Ok(None) => {
                    tracing::info!("connection closed by server");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "transport receive failed");
                    break;
                }
            },
        }
    }

    status.send_replace(ConnectionStatus::Disconnected);

    if *shutdown.borrow() {
        // Orderly teardown: let the send lane drain its queue and run the
        // closing handshake.
        let _ = send_task.await;
    } else {
        // The link died under us; the send lane may be parked on an empty
        // queue with nobody left to wake it.
        send_task.abort();
        let _ = send_task.await;
    }
}

// ---------------------------------------------------------------------------
// Send lane
// ---------------------------------------------------------------------------

async fn send_lane(
    mut sink: WsSink,
    mut outbound: mpsc::UnboundedReceiver<String>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            // Prefer flushing queued payloads over reacting to shutdown, so
            // a best-effort `close` command enqueued just before the signal
            // still reaches the wire.
            biased;

            queued = outbound.recv() => match queued {
                Some(payload) => {
                    if let Err(e) = sink.send(payload).await {
                        tracing::warn!(error = %e, "transport send failed");
                        break;
                    }
                }
                None => break,
            },
            _ = shutdown.changed() => {
                while let Ok(payload) = outbound.try_recv() {
                    if sink.send(payload).await.is_err() {
                        break;
                    }
                }
                break;
            }
        }
    }

    let _ = sink.close().await;
}
