//! # Protocols
//!
//! A protocol names a remote interface contract, fixes its version, and
//! registers the request/response types of each of its methods.

use std::fmt;

use crate::methods::MethodTable;

/// A remote interface a proxy can be built for.
///
/// ```ignore
/// struct PingService;
///
/// impl PingService {
///     const PING: Method<PingRequest, PingResponse> = Method::new("Ping");
/// }
///
/// impl Protocol for PingService {
///     const NAME: &'static str = "PingService";
///     const VERSION: i64 = 1;
///
///     fn register(methods: &mut MethodTable) {
///         methods.register(&Self::PING);
///     }
/// }
/// ```
pub trait Protocol: 'static {
    /// Wire name of the protocol, as carried in every request header.
    const NAME: &'static str;
    /// Version the client is built against.
    const VERSION: i64;

    /// Adds every method of the protocol to `methods`.
    fn register(methods: &mut MethodTable);
}

/// Identity of a remote contract: (name, version).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProtocolDescriptor {
    name: String,
    version: i64,
}

impl ProtocolDescriptor {
    pub fn new(name: impl Into<String>, version: i64) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn of<P: Protocol>() -> Self {
        Self::new(P::NAME, P::VERSION)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> i64 {
        self.version
    }
}

impl fmt::Display for ProtocolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}
