//! # Framed Client
//!
//! Adapts a byte-oriented `Transport` into a `TransportClient`.
//!
//! Outgoing layout is one `RpcKind` byte followed by the request envelope.
//! The reply must be exactly one response envelope.
//!
//! ## Invariants
//!
//! - **Bounded Frames**: requests larger than `max_message_size` never reach the
//!   transport, and replies are read under the same limit.
//! - **Single Frame Replies**: bytes left over after the response envelope are a
//!   protocol violation.
//! - **Deadline**: every round trip is bounded by the connection's `rpc_timeout`.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use bytes::BufMut;
use bytes::BytesMut;
use protowire::Envelope;
use protowire::Limits;
use protowire::RequestEnvelope;
use protowire::ResponseEnvelope;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::config::Config;
use crate::connection::ConnectionId;
use crate::transport::Result;
use crate::transport::RpcKind;
use crate::transport::Transport;
use crate::transport::TransportClient;
use crate::transport::TransportError;

pub struct FramedClient<T> {
    transport: T,
    limits: Limits,
    stopped: AtomicBool,
}

impl<T: Transport> FramedClient<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            limits: config.limits(),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn encode(&self, kind: RpcKind, request: &RequestEnvelope) -> Result<BytesMut> {
        let len = 1 + request.length()?;
        if len > self.limits.max_segment_len {
            return Err(TransportError::PayloadTooLarge {
                len,
                max: self.limits.max_segment_len,
            });
        }
        let mut buf = BytesMut::with_capacity(len);
        buf.put_u8(kind.as_u8());
        request.write_to(&mut buf)?;
        Ok(buf)
    }

    fn decode(&self, reply: &[u8]) -> Result<ResponseEnvelope> {
        let mut cursor = reply;
        let response = ResponseEnvelope::read_from(&mut cursor, &self.limits)?;
        if !cursor.is_empty() {
            return Err(TransportError::ProtocolViolation(format!(
                "{} trailing bytes after response frame",
                cursor.len()
            )));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl<T: Transport> TransportClient for FramedClient<T> {
    async fn call(
        &self,
        kind: RpcKind,
        request: RequestEnvelope,
        remote: &ConnectionId,
    ) -> Result<ResponseEnvelope> {
        if self.is_stopped() {
            return Err(TransportError::Stopped);
        }

        let frame = self.encode(kind, &request)?;
        trace!(%remote, %request, bytes = frame.len(), "sending frame");

        let deadline = remote.rpc_timeout();
        let reply = match tokio::time::timeout(deadline, self.transport.call(&frame)).await {
            Ok(reply) => reply?,
            Err(_) => {
                warn!(%remote, %request, ?deadline, "call timed out");
                return Err(TransportError::Timeout(deadline));
            }
        };

        trace!(%remote, bytes = reply.len(), "received frame");
        self.decode(&reply)
    }

    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            debug!("framed client stopped");
        }
    }
}
