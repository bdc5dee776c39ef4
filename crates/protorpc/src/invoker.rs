//! # Invoker
//!
//! The client-side proxy for one protocol at one remote address.
//!
//! ## Call Path
//!
//! 1. Check the argument shape (dynamic entry point only).
//! 2. Build a `RequestHeader` from the method name and protocol descriptor.
//! 3. Hand the `RequestEnvelope` to the transport client.
//! 4. Resolve the response type from the `MethodTable`.
//! 5. Decode a fresh value of that type from the raw response bytes. A client
//!    that answers in process with an already-built message must use the
//!    resolved type; any other type is a resolution failure.
//!
//! Any failure past step 1 is reported as a `ServiceError` wrapping its cause.
//!
//! ## Invariants
//!
//! - **Fail Fast**: arity and null checks happen before the transport is touched.
//! - **No Partial Values**: a decode failure is an error even when the round trip
//!   succeeded.
//! - **Stop Once**: `close` stops the transport client exactly once.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Instant;

use prost::Message;
use protowire::DynMessage;
use protowire::Payload;
use protowire::RequestEnvelope;
use protowire::RequestHeader;
use protowire::ResponseEnvelope;
use tracing::debug;
use tracing::trace;

use crate::builder::InvokerBuilder;
use crate::connection::ConnectionId;
use crate::context::Arg;
use crate::context::CallContext;
use crate::error::CallError;
use crate::error::ServiceError;
use crate::methods::Method;
use crate::methods::MethodSignature;
use crate::methods::MethodTable;
use crate::observer::CallEvent;
use crate::observer::CallObserver;
use crate::observer::Outcome;
use crate::protocol::Protocol;
use crate::protocol::ProtocolDescriptor;
use crate::transport::RpcKind;
use crate::transport::TransportClient;

/// Number of arguments every proxied method takes: (context, request).
pub const CALL_ARITY: usize = 2;

pub struct Invoker {
    protocol: ProtocolDescriptor,
    methods: MethodTable,
    remote: ConnectionId,
    client: Arc<dyn TransportClient>,
    observer: Arc<dyn CallObserver>,
    closed: AtomicBool,
}

impl Invoker {
    pub fn builder<P: Protocol>() -> InvokerBuilder {
        InvokerBuilder::new::<P>()
    }

    pub(crate) fn from_parts(
        protocol: ProtocolDescriptor,
        methods: MethodTable,
        remote: ConnectionId,
        client: Arc<dyn TransportClient>,
        observer: Arc<dyn CallObserver>,
    ) -> Self {
        Self {
            protocol,
            methods,
            remote,
            client,
            observer,
            closed: AtomicBool::new(false),
        }
    }

    pub fn protocol(&self) -> &ProtocolDescriptor {
        &self.protocol
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn remote(&self) -> &ConnectionId {
        &self.remote
    }

    /// Invokes `method` with a positional argument list.
    ///
    /// `args` must be exactly `[context, request]`. The response comes back as
    /// the method's registered response type, boxed.
    pub async fn invoke(
        &self,
        method: &str,
        args: Vec<Arg>,
    ) -> Result<Box<dyn DynMessage>, ServiceError> {
        let (context, request) = check_args(args).map_err(|cause| ServiceError::new(method, cause))?;
        self.invoke_checked(method, &context, request)
            .await
            .map_err(|cause| ServiceError::new(method, cause))
    }

    /// Invokes a typed method, as generated stubs do.
    pub async fn call<Req, Resp>(
        &self,
        method: &Method<Req, Resp>,
        context: &CallContext,
        request: Req,
    ) -> Result<Resp, ServiceError>
    where
        Req: Message + Default + 'static,
        Resp: Message + Default + 'static,
    {
        self.call_typed(method.name(), context, request)
            .await
            .map_err(|cause| ServiceError::new(method.name(), cause))
    }

    /// Like `call`, for callers whose request may be absent.
    pub async fn call_opt<Req, Resp>(
        &self,
        method: &Method<Req, Resp>,
        context: &CallContext,
        request: Option<Req>,
    ) -> Result<Resp, ServiceError>
    where
        Req: Message + Default + 'static,
        Resp: Message + Default + 'static,
    {
        match request {
            Some(request) => self.call(method, context, request).await,
            None => Err(ServiceError::new(method.name(), CallError::NullArgument)),
        }
    }

    /// Stops the transport client. Later calls fail with `Closed`.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(remote = %self.remote, "closing invoker");
            self.client.stop();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn invoke_checked(
        &self,
        method: &str,
        context: &CallContext,
        request: Box<dyn DynMessage>,
    ) -> Result<Box<dyn DynMessage>, CallError> {
        let response = self.round_trip(method, context, request).await?;
        let signature = self.resolve(method)?;
        match response.into_payload() {
            Payload::Decoded(raw) => signature.response.decode(raw).map_err(CallError::ResponseDecode),
            Payload::Encoded(message) if signature.response.matches(message.as_ref()) => Ok(message),
            Payload::Encoded(message) => Err(mismatch(method, message.type_name(), signature.response.type_name())),
            Payload::Empty => Err(CallError::ResponseDecode(protowire::Error::Uninitialized)),
        }
    }

    async fn call_typed<Req, Resp>(
        &self,
        method: &str,
        context: &CallContext,
        request: Req,
    ) -> Result<Resp, CallError>
    where
        Req: Message + Default + 'static,
        Resp: Message + Default + 'static,
    {
        let response = self.round_trip(method, context, Box::new(request)).await?;
        let signature = self.resolve(method)?;
        if !signature.response.is::<Resp>() {
            return Err(CallError::ResponseTypeResolution(format!(
                "{method} returns {}, not {}",
                signature.response.type_name(),
                std::any::type_name::<Resp>()
            )));
        }
        match response.into_payload() {
            Payload::Decoded(raw) => Resp::decode(raw).map_err(|err| CallError::ResponseDecode(err.into())),
            Payload::Encoded(message) => {
                let found = message.type_name();
                message
                    .downcast::<Resp>()
                    .ok_or_else(|| mismatch(method, found, signature.response.type_name()))
            }
            Payload::Empty => Err(CallError::ResponseDecode(protowire::Error::Uninitialized)),
        }
    }

    fn resolve(&self, method: &str) -> Result<&MethodSignature, CallError> {
        self.methods.get(method).ok_or_else(|| {
            CallError::ResponseTypeResolution(format!(
                "{method} is not a method of {}",
                self.protocol
            ))
        })
    }

    async fn round_trip(
        &self,
        method: &str,
        context: &CallContext,
        request: Box<dyn DynMessage>,
    ) -> Result<ResponseEnvelope, CallError> {
        if self.is_closed() {
            return Err(CallError::Closed);
        }

        let header = RequestHeader::new(method, self.protocol.name(), self.protocol.version());
        let envelope = RequestEnvelope::from_boxed(header, request);
        trace!(
            remote = %self.remote,
            request = %envelope,
            label = context.label().unwrap_or_default(),
            "sending call"
        );

        let started = Instant::now();
        let result = self
            .client
            .call(RpcKind::ProtocolBuffer, envelope, &self.remote)
            .await;
        let outcome = if result.is_ok() {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        self.observer.on_call(&CallEvent {
            protocol: &self.protocol,
            method,
            elapsed: started.elapsed(),
            outcome,
        });

        Ok(result?)
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invoker")
            .field("remote", &self.remote)
            .field("methods", &self.methods.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Invoker {
    fn drop(&mut self) {
        self.close();
    }
}

fn mismatch(method: &str, found: &str, expected: &str) -> CallError {
    CallError::ResponseTypeResolution(format!("{method} returned {found}, expected {expected}"))
}

fn check_args(args: Vec<Arg>) -> Result<(CallContext, Box<dyn DynMessage>), CallError> {
    let actual = args.len();
    let Ok([context, request]) = <[Arg; CALL_ARITY]>::try_from(args) else {
        return Err(CallError::Arity {
            expected: CALL_ARITY,
            actual,
        });
    };
    let context = match context {
        Arg::Context(context) => context,
        _ => CallContext::default(),
    };
    match request {
        Arg::Message(request) => Ok((context, request)),
        Arg::Context(_) | Arg::Null => Err(CallError::NullArgument),
    }
}
