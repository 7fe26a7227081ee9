use crate::factory::ObjectFactories;
use crate::provider::SerialContextProvider;
use naming_core::{
    Binding, BoundValue, Context, Environment, NameClassPair, NamingError, Resolved, Result,
};
use std::fmt;
use std::sync::Arc;

/// The platform initial context, and every subcontext reached from it.
///
/// All operations go through a [`SerialContextProvider`]. Lookups finish the job the provider
/// leaves: deferred proxies are materialized against this context, references are handed to the
/// object factories, and subcontext markers become child contexts.
#[derive(Clone)]
pub struct SerialContext {
    provider: Arc<dyn SerialContextProvider>,
    factories: Arc<ObjectFactories>,
    prefix: String,
    environment: Environment,
}

impl SerialContext {
    pub fn new(provider: Arc<dyn SerialContextProvider>, factories: Arc<ObjectFactories>) -> Self {
        Self {
            provider,
            factories,
            prefix: String::new(),
            environment: Environment::new(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    fn full_name(&self, name: &str) -> String {
        match (self.prefix.is_empty(), name.is_empty()) {
            (true, _) => name.to_owned(),
            (false, true) => self.prefix.clone(),
            (false, false) => format!("{}/{name}", self.prefix),
        }
    }

    fn child(&self, prefix: String) -> SerialContext {
        SerialContext {
            provider: Arc::clone(&self.provider),
            factories: Arc::clone(&self.factories),
            prefix,
            environment: self.environment.clone(),
        }
    }

    fn resolve(&self, full_name: &str, value: BoundValue) -> Result<Resolved> {
        match value {
            BoundValue::Object(object) => Ok(Resolved::Object(object)),
            BoundValue::Reference(reference) => self.factories.resolve(reference, full_name),
            BoundValue::Context(marker) => Ok(Resolved::Context(Arc::new(self.child(marker.name)))),
            BoundValue::Deferred(deferred) => {
                let object = deferred.create(self)?;
                if !deferred.relookup_after_create() {
                    return Ok(Resolved::Object(object));
                }
                match self.provider.lookup(full_name)? {
                    BoundValue::Deferred(_) => Err(NamingError::other(format!(
                        "{full_name} is still a proxy after initialization"
                    ))),
                    value => self.resolve(full_name, value),
                }
            }
        }
    }

    fn require_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(NamingError::invalid_name("Cannot bind empty name"));
        }
        Ok(())
    }
}

impl Context for SerialContext {
    fn lookup(&self, name: &str) -> Result<Resolved> {
        if name.is_empty() {
            return Ok(Resolved::Context(Arc::new(self.clone())));
        }
        let full_name = self.full_name(name);
        let value = self.provider.lookup(&full_name)?;
        self.resolve(&full_name, value)
    }

    fn bind(&self, name: &str, value: BoundValue) -> Result<()> {
        Self::require_name(name)?;
        Ok(self.provider.bind(&self.full_name(name), value)?)
    }

    fn rebind(&self, name: &str, value: BoundValue) -> Result<()> {
        Self::require_name(name)?;
        Ok(self.provider.rebind(&self.full_name(name), value)?)
    }

    fn unbind(&self, name: &str) -> Result<()> {
        Ok(self.provider.unbind(&self.full_name(name))?)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        Ok(self
            .provider
            .rename(&self.full_name(old_name), &self.full_name(new_name))?)
    }

    fn list(&self, name: &str) -> Result<Vec<NameClassPair>> {
        let full_name = self.full_name(name);
        let entries = self.provider.list(&full_name)?;
        Ok(entries
            .into_iter()
            .map(|(key, value)| NameClassPair {
                full_name: child_name(&full_name, &key),
                class_name: value.class_name(),
                name: key,
            })
            .collect())
    }

    fn list_bindings(&self, name: &str) -> Result<Vec<Binding>> {
        let full_name = self.full_name(name);
        let entries = self.provider.list(&full_name)?;
        let mut bindings = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let child = child_name(&full_name, &key);
            let resolved = match value {
                BoundValue::Deferred(deferred) => {
                    match self.resolve(&child, BoundValue::Deferred(deferred.clone())) {
                        Ok(resolved) => resolved,
                        Err(err) => {
                            tracing::warn!(
                                target = "naming.provider",
                                name = %child,
                                error = %err,
                                "failed to materialize proxy while listing; returning it unresolved"
                            );
                            Resolved::Deferred(deferred)
                        }
                    }
                }
                value => self.resolve(&child, value)?,
            };
            bindings.push(Binding {
                name: key,
                full_name: child,
                value: resolved,
            });
        }
        Ok(bindings)
    }

    fn create_subcontext(&self, name: &str) -> Result<Arc<dyn Context>> {
        let marker = self.provider.create_subcontext(&self.full_name(name))?;
        Ok(Arc::new(self.child(marker.name)))
    }

    fn destroy_subcontext(&self, name: &str) -> Result<()> {
        Ok(self.provider.destroy_subcontext(&self.full_name(name))?)
    }

    fn name_in_namespace(&self) -> String {
        self.prefix.clone()
    }

    fn environment(&self) -> Environment {
        self.environment.clone()
    }
}

fn child_name(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_owned()
    } else {
        format!("{parent}/{child}")
    }
}

impl fmt::Debug for SerialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialContext")
            .field("prefix", &self.prefix)
            .field("environment", &self.environment)
            .finish()
    }
}
