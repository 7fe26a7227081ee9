//! Messages exchanged between a remote provider client and the server-side provider.
//!
//! Frames are bincode-encoded and capped at the configured `max_message_bytes`; a frame that
//! does not decode is a transport error, while naming failures travel back as
//! [`RemoteResponse::Failed`].

use naming_core::{
    BoundValue, ContextMarker, NamingError, Object, Reference, RemoteStub, Result, Value,
};
use serde::{Deserialize, Serialize};

/// The serializable subset of [`BoundValue`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WireValue {
    Data(Value),
    Stub(RemoteStub),
    Reference(Reference),
    Context(ContextMarker),
}

impl WireValue {
    /// Fails with `NotSerializable` for in-process objects and deferred proxies.
    pub fn from_bound(name: &str, value: &BoundValue) -> Result<Self> {
        match value {
            BoundValue::Object(Object::Value(data)) => Ok(WireValue::Data(data.clone())),
            BoundValue::Object(Object::Stub(stub)) => Ok(WireValue::Stub(stub.clone())),
            BoundValue::Reference(reference) => Ok(WireValue::Reference(reference.clone())),
            BoundValue::Context(marker) => Ok(WireValue::Context(marker.clone())),
            BoundValue::Object(Object::Local(_)) | BoundValue::Deferred(_) => {
                Err(NamingError::NotSerializable {
                    name: name.to_owned(),
                    type_name: value.class_name(),
                })
            }
        }
    }

    pub fn into_bound(self) -> BoundValue {
        match self {
            WireValue::Data(data) => BoundValue::Object(Object::Value(data)),
            WireValue::Stub(stub) => BoundValue::Object(Object::Stub(stub)),
            WireValue::Reference(reference) => BoundValue::Reference(reference),
            WireValue::Context(marker) => BoundValue::Context(marker),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RemoteRequest {
    Lookup { name: String },
    Bind { name: String, value: WireValue },
    Rebind { name: String, value: WireValue },
    Unbind { name: String },
    Rename { old_name: String, new_name: String },
    List { name: String },
    CreateSubcontext { name: String },
    DestroySubcontext { name: String },
}

impl RemoteRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteRequest::Lookup { .. } => "lookup",
            RemoteRequest::Bind { .. } => "bind",
            RemoteRequest::Rebind { .. } => "rebind",
            RemoteRequest::Unbind { .. } => "unbind",
            RemoteRequest::Rename { .. } => "rename",
            RemoteRequest::List { .. } => "list",
            RemoteRequest::CreateSubcontext { .. } => "create_subcontext",
            RemoteRequest::DestroySubcontext { .. } => "destroy_subcontext",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RemoteResponse {
    Done,
    Value(WireValue),
    Listing(Vec<(String, WireValue)>),
    Subcontext(ContextMarker),
    Failed(NamingError),
}
