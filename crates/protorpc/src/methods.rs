//! # Method Table
//!
//! The per-protocol registry of request and response message types, built
//! once when a proxy is created so that no call ever has to discover its
//! response type at runtime.
//!
//! ## Philosophy
//!
//! - **Static Registration**: `Protocol::register` fills the table; calls only read it.
//! - **Prototype Factories**: each entry can decode raw bytes into a boxed value
//!   of its type and recognize an already-built value of that type.

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use prost::Message;
use protowire::DynMessage;

use crate::protocol::Protocol;

/// A typed handle on one method of a protocol.
///
/// Constructed in `const` context so stubs can declare their methods as
/// associated constants.
pub struct Method<Req, Resp> {
    name: &'static str,
    _types: PhantomData<fn(Req) -> Resp>,
}

impl<Req, Resp> Method<Req, Resp> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _types: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<Req, Resp> fmt::Debug for Method<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("request", &std::any::type_name::<Req>())
            .field("response", &std::any::type_name::<Resp>())
            .finish()
    }
}

/// A message type, standing in for the type itself at runtime.
#[derive(Clone, Copy)]
pub struct Prototype {
    type_id: TypeId,
    type_name: &'static str,
    decode: fn(Bytes) -> protowire::Result<Box<dyn DynMessage>>,
}

impl Prototype {
    pub fn of<M: Message + Default + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: std::any::type_name::<M>(),
            decode: decode_boxed::<M>,
        }
    }

    /// Whether this prototype describes `M`.
    pub fn is<M: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<M>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether `message` is a value of this type.
    pub fn matches(&self, message: &dyn DynMessage) -> bool {
        Any::type_id(message.as_any()) == self.type_id
    }

    /// Builds a new value of this type from raw bytes.
    pub fn decode(&self, bytes: Bytes) -> protowire::Result<Box<dyn DynMessage>> {
        (self.decode)(bytes)
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Prototype").field(&self.type_name).finish()
    }
}

fn decode_boxed<M: Message + Default + 'static>(bytes: Bytes) -> protowire::Result<Box<dyn DynMessage>> {
    Ok(Box::new(M::decode(bytes)?))
}

/// Request and response types of one method.
#[derive(Debug, Clone, Copy)]
pub struct MethodSignature {
    pub request: Prototype,
    pub response: Prototype,
}

/// Method name to signature, for one protocol.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, MethodSignature>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table for `P` by running its registration.
    pub fn for_protocol<P: Protocol>() -> Self {
        let mut table = Self::new();
        P::register(&mut table);
        table
    }

    /// Registers a method; a later registration under the same name wins.
    pub fn register<Req, Resp>(&mut self, method: &Method<Req, Resp>) -> &mut Self
    where
        Req: Message + Default + 'static,
        Resp: Message + Default + 'static,
    {
        let signature = MethodSignature {
            request: Prototype::of::<Req>(),
            response: Prototype::of::<Resp>(),
        };
        self.methods.insert(method.name().to_string(), signature);
        self
    }

    pub fn get(&self, method: &str) -> Option<&MethodSignature> {
        self.methods.get(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
