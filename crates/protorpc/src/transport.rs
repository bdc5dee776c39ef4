//! # Transport Abstraction
//!
//! Two seams sit below the proxy.
//!
//! - `TransportClient` is envelope-oriented. It receives a built
//!   `RequestEnvelope` and the `ConnectionId` to route it to, and answers
//!   with a `ResponseEnvelope`.
//! - `Transport` is byte-oriented. It moves one opaque request buffer and
//!   returns one opaque reply buffer. `FramedClient` turns any `Transport`
//!   into a `TransportClient`.
//!
//! ## Invariants
//!
//! - **Undecoded Responses**: a client never decodes the response payload; only
//!   the proxy knows which message type to expect.
//! - **Caller Ownership**: the proxy owns its client and stops it exactly once.

use std::sync::Arc;
use std::time::Duration;

use protowire::RequestEnvelope;
use protowire::ResponseEnvelope;

use crate::config::Config;
use crate::connection::ConnectionId;

/// Errors raised below the proxy, while moving frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The peer is unreachable or the connection was dropped.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    /// No reply arrived within the connection's timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The frame exceeds the configured maximum message size.
    #[error("payload of {len} bytes exceeds limit of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("I/O error: {0}")]
    Io(String),
    /// The client was stopped and no longer accepts calls.
    #[error("transport client stopped")]
    Stopped,
    /// A frame could not be written or read.
    #[error("framing error: {0}")]
    Wire(#[from] protowire::Error),
    /// The peer sent something that is not a single well-formed frame.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Serialization family of a request, sent ahead of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RpcKind {
    Builtin = 0,
    Writable = 1,
    ProtocolBuffer = 2,
}

impl RpcKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Builtin),
            1 => Some(Self::Writable),
            2 => Some(Self::ProtocolBuffer),
            _ => None,
        }
    }
}

/// A mechanism to send a byte buffer and receive a reply.
///
/// Designed to be object-safe (`Arc<dyn Transport>`).
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a request and waits for its reply.
    ///
    /// Must not interpret the bytes it carries.
    async fn call(&self, request: &[u8]) -> Result<Vec<u8>>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(&self, request: &[u8]) -> Result<Vec<u8>> {
        (**self).call(request).await
    }
}

/// Delivers request envelopes to a remote endpoint.
#[async_trait::async_trait]
pub trait TransportClient: Send + Sync + 'static {
    /// Performs one round trip.
    ///
    /// The response payload is either `Payload::Decoded` raw bytes, as read off
    /// the wire, or `Payload::Encoded` holding a value of the method's
    /// registered response type, for clients that answer in process. An
    /// encoded value of any other type fails the call with
    /// `CallError::ResponseTypeResolution`, and an `Empty` payload fails it
    /// with `CallError::ResponseDecode`.
    async fn call(
        &self,
        kind: RpcKind,
        request: RequestEnvelope,
        remote: &ConnectionId,
    ) -> Result<ResponseEnvelope>;

    /// Releases the client. Calls made afterwards fail with `Stopped`.
    fn stop(&self);
}

/// Produces a transport client for a given configuration.
///
/// Any `Fn(&Config) -> Result<Arc<dyn TransportClient>>` closure is a factory.
pub trait ConnectionFactory {
    fn connect(&self, config: &Config) -> Result<Arc<dyn TransportClient>>;
}

impl<F> ConnectionFactory for F
where
    F: Fn(&Config) -> Result<Arc<dyn TransportClient>>,
{
    fn connect(&self, config: &Config) -> Result<Arc<dyn TransportClient>> {
        self(config)
    }
}
