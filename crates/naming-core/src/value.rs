use crate::context::Context;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Factory name of references that must be resolved through the ORB rather than copied.
pub const IIOP_OBJECT_FACTORY: &str = "naming.iiop.IiopObjectFactory";

/// Plain serializable data bound into a namespace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Serializable handle to an object living in another process (a CORBA stub).
///
/// Stubs cross process boundaries as-is; copying one through a serializer would detach it from
/// its remote binding, so copy utilities share them instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStub {
    pub type_id: String,
    pub ior: String,
}

/// An in-process object that cannot be serialized. Clones share the same allocation.
#[derive(Clone)]
pub struct LocalObject {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl LocalObject {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn ptr_eq(&self, other: &LocalObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for LocalObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalObject").field(&self.type_name).finish()
    }
}

impl PartialEq for LocalObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// A materialized object.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Value(Value),
    Stub(RemoteStub),
    Local(LocalObject),
}

impl Object {
    pub fn local<T: Any + Send + Sync>(value: T) -> Self {
        Object::Local(LocalObject::new(value))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Object::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_serializable(&self) -> bool {
        !matches!(self, Object::Local(_))
    }

    pub fn class_name(&self) -> String {
        match self {
            Object::Value(value) => value.type_name().to_owned(),
            Object::Stub(stub) => stub.type_id.clone(),
            Object::Local(local) => local.type_name().to_owned(),
        }
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        Object::Value(value)
    }
}

/// One address of a [`Reference`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefAddr {
    pub addr_type: String,
    pub content: String,
}

/// Information needed to construct an object through a named object factory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub class_name: String,
    pub factory: Option<String>,
    pub addrs: Vec<RefAddr>,
}

impl Reference {
    pub fn new(class_name: impl Into<String>, factory: Option<String>) -> Self {
        Self {
            class_name: class_name.into(),
            factory,
            addrs: Vec::new(),
        }
    }

    pub fn with_addr(mut self, addr_type: impl Into<String>, content: impl Into<String>) -> Self {
        self.addrs.push(RefAddr {
            addr_type: addr_type.into(),
            content: content.into(),
        });
        self
    }

    /// Content of the first address of the given type.
    pub fn addr(&self, addr_type: &str) -> Option<&str> {
        self.addrs
            .iter()
            .find(|addr| addr.addr_type == addr_type)
            .map(|addr| addr.content.as_str())
    }

    pub fn is_iiop(&self) -> bool {
        self.factory.as_deref() == Some(IIOP_OBJECT_FACTORY)
    }
}

/// A placeholder that builds its object on lookup rather than at bind time.
pub trait NamingObjectProxy: Send + Sync {
    /// Materializes the object. `ctx` is the context the lookup came through.
    fn create(&self, ctx: &dyn Context) -> Result<Object>;

    /// Proxies that perform side-effecting initialization return `true`; the caller then looks
    /// the name up again and returns the canonical bound value instead of `create`'s result.
    fn relookup_after_create(&self) -> bool {
        false
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[derive(Clone)]
pub struct DeferredObject(Arc<dyn NamingObjectProxy>);

impl DeferredObject {
    pub fn new(proxy: impl NamingObjectProxy + 'static) -> Self {
        Self(Arc::new(proxy))
    }

    pub fn from_arc(proxy: Arc<dyn NamingObjectProxy>) -> Self {
        Self(proxy)
    }

    pub fn proxy(&self) -> &dyn NamingObjectProxy {
        self.0.as_ref()
    }

    pub fn create(&self, ctx: &dyn Context) -> Result<Object> {
        self.0.create(ctx)
    }

    pub fn relookup_after_create(&self) -> bool {
        self.0.relookup_after_create()
    }

    pub fn ptr_eq(&self, other: &DeferredObject) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for DeferredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeferredObject")
            .field(&self.0.type_name())
            .finish()
    }
}

/// Marks a binding that names a context rather than a leaf object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMarker {
    /// Full name of the context within its namespace.
    pub name: String,
}

impl ContextMarker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Everything a name can be bound to.
#[derive(Clone, Debug)]
pub enum BoundValue {
    Object(Object),
    Deferred(DeferredObject),
    Reference(Reference),
    Context(ContextMarker),
}

impl BoundValue {
    pub fn value(value: impl Into<Value>) -> Self {
        BoundValue::Object(Object::Value(value.into()))
    }

    pub fn local<T: Any + Send + Sync>(value: T) -> Self {
        BoundValue::Object(Object::local(value))
    }

    pub fn deferred(proxy: impl NamingObjectProxy + 'static) -> Self {
        BoundValue::Deferred(DeferredObject::new(proxy))
    }

    pub fn context(name: impl Into<String>) -> Self {
        BoundValue::Context(ContextMarker::new(name))
    }

    pub fn is_serializable(&self) -> bool {
        match self {
            BoundValue::Object(object) => object.is_serializable(),
            BoundValue::Deferred(_) => false,
            BoundValue::Reference(_) | BoundValue::Context(_) => true,
        }
    }

    pub fn is_context(&self) -> bool {
        matches!(self, BoundValue::Context(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            BoundValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn class_name(&self) -> String {
        match self {
            BoundValue::Object(object) => object.class_name(),
            BoundValue::Deferred(deferred) => deferred.proxy().type_name().to_owned(),
            BoundValue::Reference(reference) => reference.class_name.clone(),
            BoundValue::Context(_) => "context".to_owned(),
        }
    }
}

impl From<Object> for BoundValue {
    fn from(value: Object) -> Self {
        BoundValue::Object(value)
    }
}

impl From<Value> for BoundValue {
    fn from(value: Value) -> Self {
        BoundValue::Object(Object::Value(value))
    }
}

impl From<Reference> for BoundValue {
    fn from(value: Reference) -> Self {
        BoundValue::Reference(value)
    }
}

/// The result of a lookup after proxies, references and context markers have been handled.
#[derive(Clone)]
pub enum Resolved {
    Object(Object),
    /// A reference no object factory could (or was asked to) turn into an object.
    Reference(Reference),
    Context(Arc<dyn Context>),
    /// Only produced by binding listings when materializing the proxy failed.
    Deferred(DeferredObject),
}

impl Resolved {
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Resolved::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.as_object().and_then(Object::as_value)
    }

    pub fn as_context(&self) -> Option<&Arc<dyn Context>> {
        match self {
            Resolved::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn into_context(self) -> Option<Arc<dyn Context>> {
        match self {
            Resolved::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    pub fn class_name(&self) -> String {
        match self {
            Resolved::Object(object) => object.class_name(),
            Resolved::Reference(reference) => reference.class_name.clone(),
            Resolved::Context(_) => "context".to_owned(),
            Resolved::Deferred(deferred) => deferred.proxy().type_name().to_owned(),
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Object(object) => f.debug_tuple("Object").field(object).finish(),
            Resolved::Reference(reference) => f.debug_tuple("Reference").field(reference).finish(),
            Resolved::Context(ctx) => f
                .debug_tuple("Context")
                .field(&ctx.name_in_namespace())
                .finish(),
            Resolved::Deferred(deferred) => f.debug_tuple("Deferred").field(deferred).finish(),
        }
    }
}

impl From<Object> for Resolved {
    fn from(value: Object) -> Self {
        Resolved::Object(value)
    }
}
