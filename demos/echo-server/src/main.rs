//! Echo server for trying Sockwire from a browser or `websocat`.
//!
//! ```text
//! RUST_LOG=debug cargo run -p echo-server -- 127.0.0.1:9000
//! ```
//!
//! Each client gets an `Open` frame with a fresh session id, then:
//! pings are answered with pongs, ack requests are acknowledged with
//! their own args, and events are sent straight back.

use std::time::Duration;

use rand::{distr::Alphanumeric, Rng};
use sockwire::prelude::*;

const DEFAULT_ADDR: &str = "127.0.0.1:8080";
const PING_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.into());
    let mut transport = WebSocketTransport::bind(&addr).await?;
    tracing::info!(addr = %transport.local_addr()?, "echo server ready");

    let stop = transport.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.shutdown();
        }
    });

    let config = FramingConfig {
        recv_timeout: Some(PING_TIMEOUT),
        ..FramingConfig::default()
    };

    loop {
        let conn = match transport.accept().await {
            Ok(conn) => conn,
            Err(TransportError::Shutdown) => break,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };
        let framed = FramedConnection::new(conn, TextCodec, config.clone());
        tokio::spawn(async move {
            let id = framed.id();
            if let Err(e) = serve(&framed).await {
                tracing::debug!(conn = %id, error = %e, "connection ended with error");
            }
            tracing::info!(conn = %id, "connection finished");
        });
    }

    tracing::info!("echo server stopped");
    Ok(())
}

async fn serve(
    conn: &FramedConnection<WebSocketConnection>,
) -> Result<(), SockwireError> {
    conn.send(&Message::open(handshake(&session_id()).to_string()))
        .await?;

    while let Some(msg) = conn.recv().await? {
        tracing::debug!(conn = %conn.id(), kind = %msg.kind, method = %msg.method, "received");
        if msg.kind == MessageKind::Close {
            conn.close().await?;
            break;
        }
        if let Some(reply) = reply_to(msg) {
            conn.send(&reply).await?;
        }
    }
    Ok(())
}

/// Payload of the `Open` frame.
fn handshake(sid: &str) -> serde_json::Value {
    let ping_timeout_ms = u64::try_from(PING_TIMEOUT.as_millis()).unwrap_or(u64::MAX);
    serde_json::json!({
        "sid": sid,
        "pingTimeout": ping_timeout_ms,
    })
}

/// The echo behaviour, kept free of I/O.
fn reply_to(msg: Message) -> Option<Message> {
    let namespace = msg.namespace;
    let reply = match msg.kind {
        MessageKind::Ping => Message::pong(),
        MessageKind::Emit => Message::emit(msg.method, msg.args),
        MessageKind::AckRequest => {
            Message::ack_response(msg.ack_id.unwrap_or_default(), msg.args)
        }
        MessageKind::Open
        | MessageKind::Close
        | MessageKind::Pong
        | MessageKind::Empty
        | MessageKind::AckResponse => return None,
    };
    Some(reply.with_namespace(namespace))
}

/// A random 20-character alphanumeric session id.
fn session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}
