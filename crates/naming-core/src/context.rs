use crate::error::Result;
use crate::value::{BoundValue, Resolved};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Context environment properties.
pub type Environment = BTreeMap<String, String>;

/// A name and the class of the object bound to it, as produced by [`Context::list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameClassPair {
    /// Name relative to the listed context.
    pub name: String,
    pub class_name: String,
    /// Name within the namespace the context belongs to.
    pub full_name: String,
}

/// A name and its (resolved) object, as produced by [`Context::list_bindings`].
#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    pub full_name: String,
    pub value: Resolved,
}

/// A naming context: resolves names relative to itself and optionally accepts mutations.
pub trait Context: Send + Sync + fmt::Debug {
    fn lookup(&self, name: &str) -> Result<Resolved>;

    fn bind(&self, name: &str, value: BoundValue) -> Result<()>;

    fn rebind(&self, name: &str, value: BoundValue) -> Result<()>;

    fn unbind(&self, name: &str) -> Result<()>;

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()>;

    fn list(&self, name: &str) -> Result<Vec<NameClassPair>>;

    fn list_bindings(&self, name: &str) -> Result<Vec<Binding>>;

    fn create_subcontext(&self, name: &str) -> Result<Arc<dyn Context>>;

    fn destroy_subcontext(&self, name: &str) -> Result<()>;

    /// Full name of this context within its namespace.
    fn name_in_namespace(&self) -> String;

    fn environment(&self) -> Environment;
}
