//! Errors surfaced by the proxy.
//!
//! Every failed call reaches the caller as a `ServiceError` naming the method
//! and carrying exactly one underlying `CallError`.

use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    /// The dynamic argument list was not exactly (context, request).
    #[error("expected {expected} arguments, got {actual}")]
    Arity { expected: usize, actual: usize },
    #[error("null request argument")]
    NullArgument,
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// No response type could be determined for the method.
    #[error("cannot resolve response type: {0}")]
    ResponseTypeResolution(String),
    #[error("cannot decode response: {0}")]
    ResponseDecode(#[source] protowire::Error),
    /// The proxy was closed before the call.
    #[error("proxy closed")]
    Closed,
}

/// The single error kind a proxied call fails with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("remote call failed: {method}: {cause}")]
pub struct ServiceError {
    method: String,
    #[source]
    cause: CallError,
}

impl ServiceError {
    pub fn new(method: impl Into<String>, cause: CallError) -> Self {
        Self {
            method: method.into(),
            cause,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn cause(&self) -> &CallError {
        &self.cause
    }

    pub fn into_cause(self) -> CallError {
        self.cause
    }
}

/// Errors raised while constructing an `Invoker`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no remote address given")]
    MissingAddress,
    #[error("no transport client given")]
    MissingTransport,
    #[error("protocol {0} registers no methods")]
    NoMethods(String),
    #[error("cannot connect: {0}")]
    Connect(#[from] TransportError),
}
