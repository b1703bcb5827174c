//! WebSocket transport: one WebSocket message per frame.
//!
//! Text messages are frames as-is. Binary messages are accepted when they
//! hold UTF-8, since some clients send everything as binary. Control
//! messages (ping, pong) are answered by tungstenite and never surface.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{watch, Mutex};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::WebSocketStream;

use crate::{Connection, ConnectionId, Transport, TransportError};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

// ---------------------------------------------------------------------------
// WebSocketTransport
// ---------------------------------------------------------------------------

/// Listens for WebSocket upgrades on a TCP port.
///
/// After [`shutdown`](Transport::shutdown) the listener is dropped on the
/// next `accept`, which frees the port, and every later `accept` fails
/// with [`TransportError::Shutdown`].
pub struct WebSocketTransport {
    listener: Option<TcpListener>,
    stop: Arc<watch::Sender<bool>>,
}

/// Stops a [`WebSocketTransport`] from another task, e.g. a signal
/// handler, while the owner is parked in `accept`.
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }
}

impl WebSocketTransport {
    /// Binds to `addr`. Port `0` picks a free port; see
    /// [`local_addr`](Self::local_addr).
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::Listener)?;
        tracing::info!(addr, "websocket transport listening");
        Ok(Self {
            listener: Some(listener),
            stop: Arc::new(watch::Sender::new(false)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.listener
            .as_ref()
            .ok_or(TransportError::Shutdown)?
            .local_addr()
            .map_err(TransportError::Listener)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.stop))
    }

    fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }
}

/// Resolves once the stop flag is set.
async fn stopped(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            // Sender gone: nobody can stop us any more.
            std::future::pending::<()>().await;
        }
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;

    async fn accept(&mut self) -> Result<Self::Connection, TransportError> {
        if self.is_stopped() {
            self.listener = None;
            return Err(TransportError::Shutdown);
        }
        let listener = self.listener.as_ref().ok_or(TransportError::Shutdown)?;
        let mut stop = self.stop.subscribe();

        let accepted = tokio::select! {
            res = listener.accept() => Some(res),
            () = stopped(&mut stop) => None,
        };
        let Some(accepted) = accepted else {
            self.listener = None;
            tracing::info!("websocket transport stopped");
            return Err(TransportError::Shutdown);
        };

        let (tcp, peer) = accepted.map_err(TransportError::Listener)?;
        let ws = tokio_tungstenite::accept_async(tcp).await?;

        let id = ConnectionId::new(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(conn = %id, %peer, "websocket upgraded");
        Ok(WebSocketConnection::new(id, ws))
    }

    async fn shutdown(&self) -> Result<(), TransportError> {
        self.stop.send_replace(true);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// WebSocketConnection
// ---------------------------------------------------------------------------

/// One upgraded WebSocket.
///
/// The socket is split into its writing and reading halves, each behind
/// its own lock: a task blocked in `recv_frame` holds only the reading
/// half, so `send_frame` and `close` go straight through.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<SplitStream<WsStream>>,
}

impl WebSocketConnection {
    fn new(id: ConnectionId, ws: WsStream) -> Self {
        let (sink, stream) = ws.split();
        Self {
            id,
            sink: Mutex::new(sink),
            stream: Mutex::new(stream),
        }
    }
}

impl Connection for WebSocketConnection {
    async fn send_frame(&self, frame: &str) -> Result<(), TransportError> {
        self.sink
            .lock()
            .await
            .send(Message::text(frame.to_owned()))
            .await?;
        Ok(())
    }

    async fn recv_frame(&self) -> Result<Option<String>, TransportError> {
        let mut stream = self.stream.lock().await;
        loop {
            let frame = match stream.next().await {
                Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
                Some(Ok(Message::Binary(data))) => String::from_utf8(data.to_vec())?,
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(tungstenite::Error::ConnectionClosed)) => return Ok(None),
                Some(Err(e)) => return Err(e.into()),
            };
            return Ok(Some(frame));
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        match self.sink.lock().await.close().await {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
