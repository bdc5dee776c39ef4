//! # Invoker Builder
//!
//! Fluent construction of an `Invoker`: pick the protocol, point it at an
//! address, then either connect through a `ConnectionFactory` or hand over a
//! ready transport client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::connection::ConnectionId;
use crate::error::BuildError;
use crate::invoker::Invoker;
use crate::methods::MethodTable;
use crate::observer::CallObserver;
use crate::observer::TracingObserver;
use crate::protocol::Protocol;
use crate::protocol::ProtocolDescriptor;
use crate::transport::ConnectionFactory;
use crate::transport::TransportClient;

pub struct InvokerBuilder {
    protocol: ProtocolDescriptor,
    methods: MethodTable,
    address: Option<SocketAddr>,
    config: Config,
    timeout: Option<Duration>,
    observer: Option<Arc<dyn CallObserver>>,
    client: Option<Arc<dyn TransportClient>>,
}

impl InvokerBuilder {
    pub fn new<P: Protocol>() -> Self {
        Self {
            protocol: ProtocolDescriptor::of::<P>(),
            methods: MethodTable::for_protocol::<P>(),
            address: None,
            config: Config::default(),
            timeout: None,
            observer: None,
            client: None,
        }
    }

    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = Some(address);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Overrides `Config::rpc_timeout` for this proxy only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn transport(mut self, client: Arc<dyn TransportClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Obtains a transport client from `factory` and builds the invoker.
    ///
    /// The factory is not consulted when the builder is already known to be
    /// incomplete.
    pub fn connect(mut self, factory: &impl ConnectionFactory) -> Result<Invoker, BuildError> {
        self.validate()?;
        let client = factory.connect(&self.config)?;
        self.client = Some(client);
        self.build()
    }

    pub fn build(self) -> Result<Invoker, BuildError> {
        self.validate()?;
        let address = self.address.ok_or(BuildError::MissingAddress)?;
        let client = self.client.ok_or(BuildError::MissingTransport)?;

        let rpc_timeout = self.timeout.unwrap_or(self.config.rpc_timeout);
        let remote = ConnectionId::new(address, self.protocol.clone(), rpc_timeout);
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(TracingObserver) as Arc<dyn CallObserver>);

        Ok(Invoker::from_parts(
            self.protocol,
            self.methods,
            remote,
            client,
            observer,
        ))
    }

    fn validate(&self) -> Result<(), BuildError> {
        if self.address.is_none() {
            return Err(BuildError::MissingAddress);
        }
        if self.methods.is_empty() {
            return Err(BuildError::NoMethods(self.protocol.to_string()));
        }
        Ok(())
    }
}
