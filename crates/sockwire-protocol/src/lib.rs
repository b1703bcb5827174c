//! Text frame codec for Sockwire.
//!
//! This crate turns structured [`Message`]s into the compact text frames
//! that travel over a duplex transport, and back:
//!
//! ```text
//! 0{"sid":"a1"}          open, with handshake payload
//! 2                      ping
//! 42/chat,["say","hi"]   event "say" in namespace /chat
//! 427["get",1]           event "get" expecting ack 7
//! 437["value"]           ack 7
//! ```
//!
//! - **Kinds** ([`MessageKind`]) — the eight message kinds and their
//!   wire prefixes.
//! - **Message** ([`Message`]) — the structured form of a frame.
//! - **Codec** ([`encode`], [`decode`], [`FrameCodec`], [`TextCodec`]) —
//!   the translation itself.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! Both directions are pure functions: no state, no I/O, no blocking.
//! They can be called from any number of threads at once. Transport,
//! connection state and event dispatch belong to the layers above.
//!
//! Message args are opaque JSON text. The codec slices and concatenates
//! them but never parses them, so callers are responsible for their
//! validity.

mod codec;
mod decode;
mod encode;
mod error;
mod kind;
mod message;

pub use codec::{FrameCodec, TextCodec};
pub use decode::decode;
pub use encode::{encode, must_encode};
pub use error::ProtocolError;
pub use kind::MessageKind;
pub use message::Message;
