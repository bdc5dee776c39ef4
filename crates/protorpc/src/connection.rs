//! Identity of the remote endpoint a proxy talks to.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::ProtocolDescriptor;

/// (address, protocol, timeout): everything a transport client needs to
/// route one call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId {
    address: SocketAddr,
    protocol: ProtocolDescriptor,
    rpc_timeout: Duration,
}

impl ConnectionId {
    pub fn new(address: SocketAddr, protocol: ProtocolDescriptor, rpc_timeout: Duration) -> Self {
        Self {
            address,
            protocol,
            rpc_timeout,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn protocol(&self) -> &ProtocolDescriptor {
        &self.protocol
    }

    pub fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.protocol, self.address)
    }
}
