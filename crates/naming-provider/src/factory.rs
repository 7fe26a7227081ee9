use naming_core::{Context, NamingError, Object, Reference, Resolved, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use naming_core::IIOP_OBJECT_FACTORY;

/// Turns a [`Reference`] into the object it describes.
pub trait ObjectFactory: Send + Sync {
    /// `Ok(None)` means the factory does not handle this reference; the caller then keeps the
    /// reference itself.
    fn get_object_instance(&self, reference: &Reference, name: &str) -> Result<Option<Object>>;
}

/// The object request broker a server or app client talks to for remote objects.
pub trait Orb: Send + Sync {
    /// Resolves a stringified object reference (`corbaname:`, `IOR:` ...) to an object.
    fn string_to_object(&self, url: &str) -> Result<Object>;

    /// The CORBA naming service root context.
    fn naming_context(&self) -> Result<Arc<dyn Context>>;
}

/// Registered object factories, keyed by factory name.
#[derive(Default)]
pub struct ObjectFactories {
    factories: RwLock<HashMap<String, Arc<dyn ObjectFactory>>>,
}

impl ObjectFactories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, factory: Arc<dyn ObjectFactory>) {
        let name = name.into();
        tracing::debug!(target = "naming.provider", factory = %name, "registering object factory");
        self.factories.write().insert(name, factory);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ObjectFactory>> {
        self.factories.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(name)
    }

    /// Resolves `reference` through the factory it names. References without a registered
    /// factory, or that the factory declines, come back unchanged.
    pub fn resolve(&self, reference: Reference, name: &str) -> Result<Resolved> {
        let Some(factory) = reference.factory.as_deref().and_then(|f| self.get(f)) else {
            return Ok(Resolved::Reference(reference));
        };
        match factory.get_object_instance(&reference, name)? {
            Some(object) => Ok(Resolved::Object(object)),
            None => Ok(Resolved::Reference(reference)),
        }
    }
}

impl fmt::Debug for ObjectFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factories = self.factories.read();
        let mut names: Vec<_> = factories.keys().collect();
        names.sort();
        f.debug_struct("ObjectFactories").field("factories", &names).finish()
    }
}

/// Resolves references published by `publish_cos_naming_object`: the `url` address is handed
/// to the ORB.
pub struct IiopObjectFactory {
    orb: Arc<dyn Orb>,
}

impl IiopObjectFactory {
    pub fn new(orb: Arc<dyn Orb>) -> Self {
        Self { orb }
    }
}

impl ObjectFactory for IiopObjectFactory {
    fn get_object_instance(&self, reference: &Reference, name: &str) -> Result<Option<Object>> {
        let Some(url) = reference.addr("url") else {
            return Err(NamingError::other(format!(
                "IIOP reference bound to {name} has no url address"
            )));
        };
        tracing::trace!(target = "naming.provider", name, url, "resolving IIOP reference");
        self.orb.string_to_object(url).map(Some)
    }
}
