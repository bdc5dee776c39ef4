//! # Protorpc
//!
//! Call a method on a remote protobuf service as if it were local.
//!
//! An `Invoker` owns the protocol descriptor, the static method table, and a
//! transport client. Each call checks its arguments, builds a
//! `RequestHeader`, hands a `RequestEnvelope` to the transport, and decodes the
//! raw `ResponseEnvelope` into the method's registered response type.
//!
//! ## Invariants
//!
//! - Argument shape is checked before the transport is touched
//! - Every failure reaches the caller as a single `ServiceError` wrapping its cause
//! - A response that fails to decode is an error, never a partial value
//!
//! Sockets, correlation, retries, and server-side dispatch live behind the
//! `TransportClient` and `Transport` traits.

pub mod builder;
pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod framed;
pub mod invoker;
pub mod methods;
pub mod observer;
pub mod protocol;
pub mod transport;

pub use builder::InvokerBuilder;
pub use config::Config;
pub use connection::ConnectionId;
pub use context::Arg;
pub use context::CallContext;
pub use error::BuildError;
pub use error::CallError;
pub use error::ServiceError;
pub use framed::FramedClient;
pub use invoker::Invoker;
pub use methods::Method;
pub use methods::MethodTable;
pub use observer::CallObserver;
pub use observer::TracingObserver;
pub use protocol::Protocol;
pub use protocol::ProtocolDescriptor;
pub use transport::ConnectionFactory;
pub use transport::RpcKind;
pub use transport::Transport;
pub use transport::TransportClient;
pub use transport::TransportError;

#[cfg(test)]
mod mock_transport;
