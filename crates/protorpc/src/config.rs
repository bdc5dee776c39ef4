//! # Client Configuration
//!
//! Settings consumed when a proxy and its transport client are created.

use std::time::Duration;

use protowire::Limits;

/// Default per-call timeout.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(60);

/// Default cap on a serialized request or response, 64 MiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = protowire::envelope::DEFAULT_MAX_SEGMENT_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long a single round trip may take before the transport gives up.
    pub rpc_timeout: Duration,
    /// Largest frame the client will send or accept.
    pub max_message_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl Config {
    pub fn with_rpc_timeout(mut self, rpc_timeout: Duration) -> Self {
        self.rpc_timeout = rpc_timeout;
        self
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Read bounds for incoming frames.
    pub fn limits(&self) -> Limits {
        Limits {
            max_segment_len: self.max_message_size,
        }
    }
}
