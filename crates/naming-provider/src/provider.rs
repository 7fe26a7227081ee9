use crate::error::Result;
use naming_core::{BoundValue, ContextMarker};
use std::collections::BTreeMap;

/// Backend of a [`crate::SerialContext`]: the operations a naming context forwards to the
/// namespace store, either in-process or across the remote boundary.
///
/// Names are full names relative to the store root.
pub trait SerialContextProvider: Send + Sync {
    fn lookup(&self, name: &str) -> Result<BoundValue>;

    fn bind(&self, name: &str, value: BoundValue) -> Result<()>;

    fn rebind(&self, name: &str, value: BoundValue) -> Result<()>;

    fn unbind(&self, name: &str) -> Result<()>;

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// Direct children of the context at `name`, keyed by their relative names.
    fn list(&self, name: &str) -> Result<BTreeMap<String, BoundValue>>;

    fn create_subcontext(&self, name: &str) -> Result<ContextMarker>;

    fn destroy_subcontext(&self, name: &str) -> Result<()>;
}
