//! Mock transports for testing.
//!
//! These are used internally by the test suite and are not part of the public API.

use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use protowire::Envelope;
use protowire::Limits;
use protowire::RequestEnvelope;
use protowire::RequestHeader;
use protowire::ResponseEnvelope;

use crate::connection::ConnectionId;
use crate::observer::CallEvent;
use crate::observer::CallObserver;
use crate::observer::Outcome;
use crate::transport;
use crate::transport::RpcKind;
use crate::transport::Transport;
use crate::transport::TransportClient;
use crate::transport::TransportError;

type Handler = Box<dyn Fn(&RequestEnvelope) -> transport::Result<ResponseEnvelope> + Send + Sync>;

/// A transport client that answers every call through a handler and records
/// what it saw.
pub struct ScriptedClient {
    handler: Handler,
    calls: AtomicUsize,
    stops: AtomicUsize,
    seen: Mutex<Vec<(RpcKind, RequestHeader)>>,
}

impl ScriptedClient {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RequestEnvelope) -> transport::Result<ResponseEnvelope> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Replies with the request message's own bytes.
    pub fn echo() -> Self {
        Self::new(|request| {
            let bytes = request.payload().message()?.to_wire_bytes().map_err(protowire::Error::from)?;
            Ok(ResponseEnvelope::from_bytes(bytes))
        })
    }

    /// Fails every call with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Replies with fixed raw bytes.
    pub fn replying(bytes: &'static [u8]) -> Self {
        Self::new(move |_| Ok(ResponseEnvelope::from_bytes(bytes)))
    }

    /// Echoes, dropping the last byte of the response body.
    pub fn truncating() -> Self {
        Self::new(|request| {
            let bytes = request.payload().message()?.to_wire_bytes().map_err(protowire::Error::from)?;
            let cut = bytes.len().saturating_sub(1);
            Ok(ResponseEnvelope::from_bytes(bytes.slice(..cut)))
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(RpcKind, RequestHeader)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TransportClient for ScriptedClient {
    async fn call(
        &self,
        kind: RpcKind,
        request: RequestEnvelope,
        _remote: &ConnectionId,
    ) -> transport::Result<ResponseEnvelope> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((kind, request.header().clone()));
        (self.handler)(&request)
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// A byte-level transport that parses the request like a server would and
/// echoes its payload back as a response frame.
#[derive(Default)]
pub struct EchoTransport {
    kinds: Mutex<Vec<u8>>,
}

impl EchoTransport {
    pub fn kinds(&self) -> Vec<u8> {
        self.kinds.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for EchoTransport {
    async fn call(&self, request: &[u8]) -> transport::Result<Vec<u8>> {
        let (kind, mut frame) = request
            .split_first()
            .ok_or_else(|| TransportError::Io("empty request".into()))?;
        self.kinds.lock().unwrap().push(*kind);
        let request = RequestEnvelope::read_from(&mut frame, &Limits::default())?;
        let (_, payload) = request.into_parts();
        let response = ResponseEnvelope::from_bytes(payload.into_raw()?);
        Ok(response.to_bytes()?.to_vec())
    }
}

/// A byte-level transport that returns fixed bytes, however long it takes.
pub struct FixedTransport {
    pub reply: Vec<u8>,
    pub delay: std::time::Duration,
}

#[async_trait::async_trait]
impl Transport for FixedTransport {
    async fn call(&self, _request: &[u8]) -> transport::Result<Vec<u8>> {
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }
}

/// Records every call event it observes.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(String, Outcome)>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<(String, Outcome)> {
        self.events.lock().unwrap().clone()
    }
}

impl CallObserver for RecordingObserver {
    fn on_call(&self, event: &CallEvent<'_>) {
        self.events
            .lock()
            .unwrap()
            .push((event.method.to_string(), event.outcome));
    }
}
