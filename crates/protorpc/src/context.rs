//! Per-call context and the dynamic argument list.

use protowire::DynMessage;

/// Opaque per-call data passed alongside every request.
///
/// The proxy never interprets it beyond an optional label used in logs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    label: Option<String>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// One positional argument of a dynamic invocation.
///
/// A well-formed call carries exactly two: a context followed by a message.
#[derive(Debug)]
pub enum Arg {
    Context(CallContext),
    Message(Box<dyn DynMessage>),
    Null,
}

impl Arg {
    pub fn message(message: impl DynMessage) -> Self {
        Self::Message(Box::new(message))
    }
}

impl From<CallContext> for Arg {
    fn from(context: CallContext) -> Self {
        Self::Context(context)
    }
}

impl From<Box<dyn DynMessage>> for Arg {
    fn from(message: Box<dyn DynMessage>) -> Self {
        Self::Message(message)
    }
}
