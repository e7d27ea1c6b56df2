//! WebSocket bridge between isolated frame runtimes and the bus.
//!
//! Embedded widget frames run third-party scripts in their own execution
//! contexts; the gateway is the cross-boundary messaging primitive they
//! reach the host through. Every frame connects to the same localhost
//! port and everything received is funneled onto ONE shared
//! [`MessageBus`], deliberately without per-connection routing, because
//! subscription filters are the only isolation mechanism between widget
//! instances.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               FrameGateway               │
//! │               (single port)              │
//! │  ┌────────────────────────────────────┐  │
//! │  │ conn 1 ─┐                          │  │
//! │  │ conn 2 ─┼──▶ bus.publish(raw)      │  │
//! │  │ conn 3 ─┘                          │  │
//! │  │ conn * ◀── broadcast of post()     │  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Notify, broadcast};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::bus::MessageBus;
use crate::error::{Error, Result};
use crate::protocol::RawMessage;

// ============================================================================
// Constants
// ============================================================================

/// Default bind address for the gateway (localhost).
const DEFAULT_BIND_IP: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Accept-loop poll interval for the shutdown flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Buffered outbound commands per connection before lagging.
const OUTBOUND_BUFFER: usize = 64;

// ============================================================================
// FrameGateway
// ============================================================================

/// WebSocket server bridging widget frames onto the shared bus.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(MessageBus::new());
/// let gateway = FrameGateway::bind(Arc::clone(&bus)).await?;
/// println!("frames connect to {}", gateway.ws_url());
/// ```
pub struct FrameGateway {
    /// Bound server port.
    port: u16,

    /// The shared bus everything inbound lands on.
    bus: Arc<MessageBus>,

    /// Fan-out channel for outbound command frames.
    outbound_tx: broadcast::Sender<String>,

    /// Live connections by connection number (diagnostics only, never
    /// used for routing).
    connections: RwLock<FxHashMap<u64, SocketAddr>>,

    /// Connection number allocator.
    next_connection: AtomicU64,

    /// Shutdown flag.
    shutdown: AtomicBool,

    /// Wakes connection tasks on shutdown.
    shutdown_notify: Notify,
}

// ============================================================================
// FrameGateway - Constructor
// ============================================================================

impl FrameGateway {
    /// Binds the gateway on `localhost:0` (random available port) and
    /// starts the accept loop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn bind(bus: Arc<MessageBus>) -> Result<Arc<Self>> {
        Self::with_ip_port(DEFAULT_BIND_IP, 0, bus).await
    }

    /// Binds the gateway to a specific IP and port.
    ///
    /// # Arguments
    ///
    /// * `ip` - IP address to bind to
    /// * `port` - Port to bind to (0 for random)
    /// * `bus` - The shared bus to publish inbound messages on
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if binding fails.
    pub async fn with_ip_port(ip: IpAddr, port: u16, bus: Arc<MessageBus>) -> Result<Arc<Self>> {
        let addr = SocketAddr::new(ip, port);
        let listener = TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        let (outbound_tx, _) = broadcast::channel(OUTBOUND_BUFFER);

        debug!(port = actual_port, "FrameGateway bound");

        let gateway = Arc::new(Self {
            port: actual_port,
            bus,
            outbound_tx,
            connections: RwLock::new(FxHashMap::default()),
            next_connection: AtomicU64::new(1),
            shutdown: AtomicBool::new(false),
            shutdown_notify: Notify::new(),
        });

        // Wire the bus's outbound direction through this transport.
        {
            let tx = gateway.outbound_tx.clone();
            gateway.bus.attach_sink(Box::new(move |text| {
                // No receivers just means no frames are connected.
                let _ = tx.send(text.to_string());
            }));
        }

        // Spawn accept loop
        let gateway_clone = Arc::clone(&gateway);
        tokio::spawn(async move {
            gateway_clone.accept_loop(listener).await;
        });

        info!(port = actual_port, "FrameGateway started");

        Ok(gateway)
    }
}

// ============================================================================
// FrameGateway - Public API
// ============================================================================

impl FrameGateway {
    /// Returns the WebSocket URL frames connect to.
    ///
    /// Format: `ws://127.0.0.1:{port}`
    #[inline]
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}", self.port)
    }

    /// Returns the port the gateway is bound to.
    #[inline]
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the number of connected frames.
    #[inline]
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.read().len()
    }

    /// Returns the shared bus this gateway publishes on.
    #[inline]
    #[must_use]
    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    /// Shuts down the gateway and disconnects all frames.
    pub fn shutdown(&self) {
        info!("FrameGateway shutting down");
        self.shutdown.store(true, Ordering::SeqCst);
        self.shutdown_notify.notify_waiters();
    }
}

// ============================================================================
// FrameGateway - Accept Loop
// ============================================================================

impl FrameGateway {
    /// Background task that accepts new frame connections.
    async fn accept_loop(self: Arc<Self>, listener: TcpListener) {
        debug!("Accept loop started");

        loop {
            // Check shutdown flag
            if self.shutdown.load(Ordering::SeqCst) {
                debug!("Accept loop shutting down");
                break;
            }

            // Accept with timeout to allow checking the shutdown flag
            match timeout(ACCEPT_POLL_INTERVAL, listener.accept()).await {
                Ok(Ok((stream, addr))) => {
                    let gateway = Arc::clone(&self);
                    tokio::spawn(async move {
                        if let Err(e) = gateway.handle_connection(stream, addr).await {
                            warn!(error = %e, ?addr, "Frame connection handling failed");
                        }
                    });
                }
                Ok(Err(e)) => {
                    error!(error = %e, "Accept failed");
                }
                Err(_) => {
                    // Timeout - just continue to check shutdown flag
                    continue;
                }
            }
        }

        debug!("Accept loop terminated");
    }

    /// Handles a single frame connection for its lifetime.
    async fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) -> Result<()> {
        debug!(?addr, "New frame TCP connection");

        let ws_stream = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| Error::transport(format!("WebSocket upgrade failed: {e}")))?;

        let connection_id = self.next_connection.fetch_add(1, Ordering::SeqCst);
        let origin = format!("ws://{addr}");

        // Subscribe to outbound fan-out before announcing the connection,
        // so a post() observed after connection_count() sees this frame.
        let mut outbound_rx = self.outbound_tx.subscribe();
        self.connections.write().insert(connection_id, addr);

        info!(connection_id, ?addr, "Frame connected");

        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                let _ = ws_write.close().await;
                break;
            }

            tokio::select! {
                // Inbound messages from the frame
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<Value>(&text) {
                                Ok(payload) => {
                                    self.bus.publish(RawMessage::with_origin(origin.clone(), payload));
                                }
                                Err(e) => {
                                    warn!(connection_id, error = %e, "Malformed frame message dropped");
                                }
                            }
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!(connection_id, "Frame closed connection");
                            break;
                        }

                        Some(Err(e)) => {
                            warn!(connection_id, error = %e, "Frame connection error");
                            break;
                        }

                        None => {
                            debug!(connection_id, "Frame stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Outbound commands from the host
                command = outbound_rx.recv() => {
                    match command {
                        Ok(text) => {
                            if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                                warn!(connection_id, error = %e, "Failed to forward outbound command");
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(connection_id, skipped, "Frame fell behind on outbound commands");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            break;
                        }
                    }
                }

                // Host-initiated shutdown
                () = self.shutdown_notify.notified() => {
                    debug!(connection_id, "Closing frame connection on shutdown");
                    let _ = ws_write.close().await;
                    break;
                }
            }
        }

        self.connections.write().remove(&connection_id);
        debug!(connection_id, "Frame disconnected");

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use serde_json::json;
    use tokio::time::sleep;

    use crate::bus::SubscriptionFilter;
    use crate::protocol::{OutboundCommand, WidgetEvent};
    use crate::widget::WidgetKind;

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within 2s");
    }

    #[tokio::test]
    async fn test_gateway_bind() {
        let bus = Arc::new(MessageBus::new());
        let gateway = FrameGateway::bind(bus).await.expect("gateway bind");

        assert!(gateway.port() > 0);
        assert!(gateway.ws_url().starts_with("ws://127.0.0.1:"));
        assert_eq!(gateway.connection_count(), 0);

        gateway.shutdown();
    }

    #[tokio::test]
    async fn test_inbound_message_reaches_bus() {
        let bus = Arc::new(MessageBus::new());
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = Arc::clone(&events);
        bus.subscribe(
            SubscriptionFilter::for_kind(WidgetKind::Barcode),
            Box::new(move |event| events_clone.lock().push(event.clone())),
        );

        let gateway = FrameGateway::bind(Arc::clone(&bus))
            .await
            .expect("gateway bind");

        let (mut client, _) = tokio_tungstenite::connect_async(gateway.ws_url())
            .await
            .expect("client connect");

        let frame = json!({ "type": "BARCODE_RESULT", "data": { "text": "hi" } }).to_string();
        client
            .send(Message::Text(frame.into()))
            .await
            .expect("client send");

        wait_until(|| !events.lock().is_empty()).await;

        match &events.lock()[0] {
            WidgetEvent::BarcodeResult { data } => {
                assert_eq!(data.get("text").and_then(|v| v.as_str()), Some("hi"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        gateway.shutdown();
    }

    #[tokio::test]
    async fn test_malformed_frames_are_dropped() {
        let bus = Arc::new(MessageBus::new());
        let events = Arc::new(Mutex::new(Vec::new()));

        let events_clone = Arc::clone(&events);
        bus.subscribe(
            SubscriptionFilter::for_kind(WidgetKind::Mrz),
            Box::new(move |event| events_clone.lock().push(event.clone())),
        );

        let gateway = FrameGateway::bind(Arc::clone(&bus))
            .await
            .expect("gateway bind");

        let (mut client, _) = tokio_tungstenite::connect_async(gateway.ws_url())
            .await
            .expect("client connect");

        // Not JSON, then JSON without a recognized tag, then a real event.
        for frame in ["not json at all", "{}", r#"{"type":"MRZ_INITIALIZED"}"#] {
            client
                .send(Message::Text(frame.to_string().into()))
                .await
                .expect("client send");
        }

        wait_until(|| !events.lock().is_empty()).await;
        assert_eq!(events.lock().as_slice(), [WidgetEvent::MrzInitialized]);

        gateway.shutdown();
    }

    #[tokio::test]
    async fn test_outbound_command_reaches_frame() {
        let bus = Arc::new(MessageBus::new());
        let gateway = FrameGateway::bind(Arc::clone(&bus))
            .await
            .expect("gateway bind");

        let (mut client, _) = tokio_tungstenite::connect_async(gateway.ws_url())
            .await
            .expect("client connect");

        wait_until(|| gateway.connection_count() == 1).await;

        bus.post(&OutboundCommand::Terminate).expect("post");

        let received = timeout(Duration::from_secs(2), client.next())
            .await
            .expect("frame received nothing")
            .expect("stream ended")
            .expect("ws error");

        match received {
            Message::Text(text) => assert!(text.contains("HOST_TERMINATE")),
            other => panic!("unexpected message: {other:?}"),
        }

        gateway.shutdown();
    }

    #[tokio::test]
    async fn test_connection_count_tracks_disconnect() {
        let bus = Arc::new(MessageBus::new());
        let gateway = FrameGateway::bind(bus).await.expect("gateway bind");

        let (mut client, _) = tokio_tungstenite::connect_async(gateway.ws_url())
            .await
            .expect("client connect");
        wait_until(|| gateway.connection_count() == 1).await;

        client.close(None).await.expect("client close");
        wait_until(|| gateway.connection_count() == 0).await;

        gateway.shutdown();
    }
}
