use crate::copy::{deep_copy, CopyPolicy};
use crate::error::Result;
use crate::factory::ObjectFactories;
use crate::provider::SerialContextProvider;
use naming_core::{BoundValue, ContextMarker, Reference, IIOP_OBJECT_FACTORY};
use naming_store::TransientContext;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Provider used by code running in the server process.
///
/// Values are copied on the way in and on the way out so callers never share mutable state
/// through the namespace. References created by the IIOP object factory are resolved into live
/// objects instead of copied.
pub struct LocalSerialContextProvider {
    store: Arc<TransientContext>,
    factories: Arc<ObjectFactories>,
    policy: CopyPolicy,
}

impl LocalSerialContextProvider {
    pub fn new(
        store: Arc<TransientContext>,
        factories: Arc<ObjectFactories>,
        policy: CopyPolicy,
    ) -> Self {
        Self {
            store,
            factories,
            policy,
        }
    }

    pub fn store(&self) -> &Arc<TransientContext> {
        &self.store
    }

    pub fn copy_policy(&self) -> CopyPolicy {
        self.policy
    }

    fn resolve_iiop(&self, name: &str, reference: Reference) -> Result<BoundValue> {
        let Some(factory) = self.factories.get(IIOP_OBJECT_FACTORY) else {
            tracing::trace!(
                target = "naming.provider",
                name,
                "IIOP factory not registered; returning the reference"
            );
            return Ok(BoundValue::Reference(reference));
        };
        Ok(match factory.get_object_instance(&reference, name)? {
            Some(object) => BoundValue::Object(object),
            None => BoundValue::Reference(reference),
        })
    }
}

impl SerialContextProvider for LocalSerialContextProvider {
    fn lookup(&self, name: &str) -> Result<BoundValue> {
        match self.store.lookup(name)? {
            BoundValue::Reference(reference) if reference.is_iiop() => {
                self.resolve_iiop(name, reference)
            }
            value => Ok(deep_copy(&value, self.policy)?),
        }
    }

    fn bind(&self, name: &str, value: BoundValue) -> Result<()> {
        self.store.bind(name, deep_copy(&value, self.policy)?)?;
        Ok(())
    }

    fn rebind(&self, name: &str, value: BoundValue) -> Result<()> {
        self.store.rebind(name, deep_copy(&value, self.policy)?)?;
        Ok(())
    }

    fn unbind(&self, name: &str) -> Result<()> {
        Ok(self.store.unbind(name)?)
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        Ok(self.store.rename(old_name, new_name)?)
    }

    fn list(&self, name: &str) -> Result<BTreeMap<String, BoundValue>> {
        Ok(self.store.list_context(name)?)
    }

    fn create_subcontext(&self, name: &str) -> Result<ContextMarker> {
        Ok(self.store.create_subcontext(name)?)
    }

    fn destroy_subcontext(&self, name: &str) -> Result<()> {
        Ok(self.store.destroy_subcontext(name)?)
    }
}
