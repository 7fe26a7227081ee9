//! Shared vocabulary of the naming runtime.
//!
//! - [`JndiName`] / [`CompositeName`]: `java:` names and their `/`-separated components
//! - [`BoundValue`]: what a name can be bound to (object, deferred proxy, reference, context)
//! - [`Resolved`]: what a lookup hands back once proxies and references are dealt with
//! - [`Context`]: the contract every naming context implements
//! - [`NamingError`]: the single error hierarchy surfaced to callers

mod context;
mod error;
mod invocation;
mod name;
mod value;

pub use context::{Binding, Context, Environment, NameClassPair};
pub use error::{NamingError, Result};
pub use invocation::{InvocationIdentity, ProcessType};
pub use name::{
    CompositeName, JndiName, Scope, JNDI_CTX_JAVA, JNDI_CTX_JAVA_APP, JNDI_CTX_JAVA_APP_ENV,
    JNDI_CTX_JAVA_APP_NS_ID, JNDI_CTX_JAVA_COMPONENT, JNDI_CTX_JAVA_COMPONENT_ENV,
    JNDI_CTX_JAVA_COMPONENT_NS_ID, JNDI_CTX_JAVA_GLOBAL, JNDI_CTX_JAVA_MODULE,
    JNDI_CTX_JAVA_MODULE_ENV, JNDI_CTX_JAVA_MODULE_NS_ID,
};
pub use value::{
    BoundValue, ContextMarker, DeferredObject, LocalObject, NamingObjectProxy, Object, RefAddr,
    Reference, RemoteStub, Resolved, Value, IIOP_OBJECT_FACTORY,
};
