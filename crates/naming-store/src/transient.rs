use naming_core::{BoundValue, CompositeName, ContextMarker, Environment, NamingError, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

const STORE_NAMESPACE: &str = "transient store";

/// In-memory tree of bindings.
///
/// Every node lives under one read/write lock: lookups and listings share it, every mutation
/// takes it exclusively. Writes happen at deployment time while reads happen on every remote
/// lookup, so readers are never serialized behind each other.
///
/// Subcontexts are reported as [`BoundValue::Context`] markers carrying their full path from the
/// root of this store.
pub struct TransientContext {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    root: Node,
    environment: Environment,
}

#[derive(Default)]
struct Node {
    bindings: HashMap<String, Entry>,
}

enum Entry {
    Value(BoundValue),
    Subcontext(Node),
}

/// How a walk treats an intermediate component that is not bound yet.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Missing {
    Fail,
    Create,
}

impl Node {
    fn snapshot(&self, path: &str) -> BTreeMap<String, BoundValue> {
        self.bindings
            .iter()
            .map(|(key, entry)| {
                let value = match entry {
                    Entry::Value(value) => value.clone(),
                    Entry::Subcontext(_) => BoundValue::context(child_path(path, key)),
                };
                (key.clone(), value)
            })
            .collect()
    }

    /// Follows `parents` down from this node. Every component must name a subcontext.
    fn walk(&self, parents: &[String]) -> Result<&Node> {
        let mut node = self;
        let mut path = String::new();
        for component in parents {
            path = child_path(&path, component);
            node = match node.bindings.get(component) {
                Some(Entry::Subcontext(child)) => child,
                Some(Entry::Value(_)) => return Err(NamingError::not_context(path)),
                None => return Err(NamingError::name_not_found(path, STORE_NAMESPACE)),
            };
        }
        Ok(node)
    }

    /// Mutable walk. With [`Missing::Create`] absent components become new subcontexts, while a
    /// component bound to a leaf value fails with `NameAlreadyBound`.
    fn walk_mut(&mut self, parents: &[String], missing: Missing) -> Result<&mut Node> {
        let mut node = self;
        let mut path = String::new();
        for component in parents {
            path = child_path(&path, component);
            if missing == Missing::Create && !node.bindings.contains_key(component) {
                tracing::trace!(
                    target = "naming.store",
                    subcontext = %path,
                    "creating intermediate subcontext"
                );
                node.bindings
                    .insert(component.clone(), Entry::Subcontext(Node::default()));
            }
            node = match node.bindings.get_mut(component) {
                Some(Entry::Subcontext(child)) => child,
                Some(Entry::Value(_)) if missing == Missing::Create => {
                    return Err(NamingError::already_bound(path))
                }
                Some(Entry::Value(_)) => return Err(NamingError::not_context(path)),
                None => return Err(NamingError::name_not_found(path, STORE_NAMESPACE)),
            };
        }
        Ok(node)
    }
}

fn child_path(parent: &str, component: &str) -> String {
    if parent.is_empty() {
        component.to_owned()
    } else {
        format!("{parent}/{component}")
    }
}

/// Splits `name` into (parents, last), rejecting empty names with `message`.
fn split_name(name: &str, message: &str) -> Result<(Vec<String>, String)> {
    let parsed = CompositeName::parse(name);
    let Some((last, parents)) = parsed.components().split_last() else {
        return Err(NamingError::invalid_name(message));
    };
    if last.is_empty() {
        return Err(NamingError::invalid_name(message));
    }
    Ok((parents.to_vec(), last.clone()))
}

impl TransientContext {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<BoundValue> {
        let (parents, last) = split_name(name, "Cannot look up empty name")?;
        let state = self.state.read();
        let node = state.root.walk(&parents)?;
        match node.bindings.get(&last) {
            Some(Entry::Value(value)) => Ok(value.clone()),
            Some(Entry::Subcontext(_)) => Ok(BoundValue::Context(ContextMarker::new(name))),
            None => Err(NamingError::name_not_found(name, STORE_NAMESPACE)),
        }
    }

    /// Binds `value`, creating missing intermediate subcontexts. Fails if `name` is bound.
    pub fn bind(&self, name: &str, value: BoundValue) -> Result<()> {
        let (parents, last) = split_name(name, "Cannot bind empty name")?;
        let mut state = self.state.write();
        let node = state.root.walk_mut(&parents, Missing::Create)?;
        if node.bindings.contains_key(&last) {
            return Err(NamingError::already_bound(name));
        }
        tracing::debug!(target = "naming.store", name, class = %value.class_name(), "bind");
        node.bindings.insert(last, Entry::Value(value));
        Ok(())
    }

    /// Binds `value`, replacing whatever `name` was bound to.
    pub fn rebind(&self, name: &str, value: BoundValue) -> Result<()> {
        let (parents, last) = split_name(name, "Cannot bind empty name")?;
        let mut state = self.state.write();
        let node = state.root.walk_mut(&parents, Missing::Create)?;
        tracing::debug!(target = "naming.store", name, class = %value.class_name(), "rebind");
        node.bindings.insert(last, Entry::Value(value));
        Ok(())
    }

    /// Removes the binding. Unbinding a name that is not bound succeeds; a missing intermediate
    /// context does not.
    pub fn unbind(&self, name: &str) -> Result<()> {
        let (parents, last) = split_name(name, "Cannot unbind empty name")?;
        let mut state = self.state.write();
        let node = state.root.walk_mut(&parents, Missing::Fail)?;
        if node.bindings.remove(&last).is_some() {
            tracing::debug!(target = "naming.store", name, "unbind");
        }
        Ok(())
    }

    /// Moves the binding at `old_name` to `new_name`, which must not be bound and whose parent
    /// context must exist.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        let (old_parents, old_last) = split_name(old_name, "Cannot rename empty name")?;
        let (new_parents, new_last) = split_name(new_name, "Cannot rename empty name")?;

        let old_components = CompositeName::parse(old_name);
        let new_components = CompositeName::parse(new_name);
        if new_components.len() > old_components.len()
            && new_components.components()[..old_components.len()] == *old_components.components()
        {
            return Err(NamingError::invalid_name(format!(
                "Cannot rename {old_name} into its own subcontext {new_name}"
            )));
        }

        let mut state = self.state.write();
        if let Ok(node) = state.root.walk(&new_parents) {
            if node.bindings.contains_key(&new_last) {
                return Err(NamingError::already_bound(new_name));
            }
        }
        match state.root.walk(&old_parents) {
            Ok(node) if node.bindings.contains_key(&old_last) => {}
            Ok(_) => return Err(NamingError::name_not_found(old_name, STORE_NAMESPACE)),
            Err(err) => return Err(err),
        }
        // Validate the destination before detaching anything.
        state.root.walk(&new_parents)?;

        let entry = state
            .root
            .walk_mut(&old_parents, Missing::Fail)?
            .bindings
            .remove(&old_last)
            .ok_or_else(|| NamingError::name_not_found(old_name, STORE_NAMESPACE))?;
        state
            .root
            .walk_mut(&new_parents, Missing::Fail)?
            .bindings
            .insert(new_last, entry);
        tracing::debug!(target = "naming.store", old_name, new_name, "rename");
        Ok(())
    }

    /// Creates an empty subcontext, creating missing intermediate subcontexts along the way.
    pub fn create_subcontext(&self, name: &str) -> Result<ContextMarker> {
        let (parents, last) = split_name(name, "Cannot create empty subcontext")?;
        let mut state = self.state.write();
        let node = state.root.walk_mut(&parents, Missing::Create)?;
        if node.bindings.contains_key(&last) {
            return Err(NamingError::already_bound(name));
        }
        node.bindings.insert(last, Entry::Subcontext(Node::default()));
        tracing::debug!(target = "naming.store", name, "create subcontext");
        Ok(ContextMarker::new(name))
    }

    pub fn destroy_subcontext(&self, name: &str) -> Result<()> {
        let (parents, last) = split_name(name, "Cannot destroy empty subcontext")?;
        let mut state = self.state.write();
        let node = state.root.walk_mut(&parents, Missing::Fail)?;
        match node.bindings.get(&last) {
            Some(Entry::Subcontext(_)) => {
                node.bindings.remove(&last);
                tracing::debug!(target = "naming.store", name, "destroy subcontext");
                Ok(())
            }
            Some(Entry::Value(_)) => Err(NamingError::not_context(name)),
            None => Err(NamingError::name_not_found(name, STORE_NAMESPACE)),
        }
    }

    /// Snapshot of the root bindings.
    pub fn list(&self) -> BTreeMap<String, BoundValue> {
        self.state.read().root.snapshot("")
    }

    /// Snapshot of the bindings of the context at `name` (the root when `name` is empty).
    pub fn list_context(&self, name: &str) -> Result<BTreeMap<String, BoundValue>> {
        let state = self.state.read();
        if name.is_empty() {
            return Ok(state.root.snapshot(""));
        }
        let (parents, last) = split_name(name, "Cannot list empty name")?;
        let node = state.root.walk(&parents)?;
        match node.bindings.get(&last) {
            Some(Entry::Subcontext(child)) => Ok(child.snapshot(name)),
            Some(Entry::Value(_)) => Err(NamingError::not_context(name)),
            None => Err(NamingError::name_not_found(name, STORE_NAMESPACE)),
        }
    }

    pub fn add_to_environment(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.state.write().environment.insert(key.into(), value.into())
    }

    pub fn remove_from_environment(&self, key: &str) -> Option<String> {
        self.state.write().environment.remove(key)
    }

    pub fn environment(&self) -> Environment {
        self.state.read().environment.clone()
    }

    /// Drops every binding and the environment.
    pub fn close(&self) {
        let mut state = self.state.write();
        state.root.bindings.clear();
        state.environment.clear();
    }
}

impl Default for TransientContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("TransientContext")
            .field("root_bindings", &state.root.bindings.len())
            .field("environment", &state.environment.len())
            .finish()
    }
}
