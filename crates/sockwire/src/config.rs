//! Connection-level configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a [`FramedConnection`](crate::FramedConnection) does with a
/// frame that fails to decode.
///
/// Decoding is deterministic, so retrying the same frame is pointless.
/// The only choices are to skip it or to end the connection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Log the frame and keep reading.
    #[default]
    Discard,

    /// Close the connection and report
    /// [`SockwireError::MalformedFrame`](crate::SockwireError::MalformedFrame).
    Close,
}

/// Configuration for a framed connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// How long `recv` waits for the next frame. `None` waits forever.
    pub recv_timeout: Option<Duration>,

    pub on_malformed: MalformedPolicy,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            recv_timeout: None,
            on_malformed: MalformedPolicy::Discard,
        }
    }
}
