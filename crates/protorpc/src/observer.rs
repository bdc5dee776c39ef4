//! # Call Observation
//!
//! A hook receiving one event per call that reached the transport.
//! `TracingObserver` is installed unless the builder is given another one.

use std::time::Duration;

use tracing::debug;

use crate::protocol::ProtocolDescriptor;

/// How a round trip ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Timing of one completed round trip.
#[derive(Debug, Clone, Copy)]
pub struct CallEvent<'a> {
    pub protocol: &'a ProtocolDescriptor,
    pub method: &'a str,
    pub elapsed: Duration,
    pub outcome: Outcome,
}

pub trait CallObserver: Send + Sync + 'static {
    fn on_call(&self, event: &CallEvent<'_>);
}

/// Emits each call's duration as a debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_call(&self, event: &CallEvent<'_>) {
        debug!(
            protocol = %event.protocol,
            outcome = ?event.outcome,
            "Call: {} took {}ms",
            event.method,
            event.elapsed.as_millis()
        );
    }
}
