use naming_core::{JndiName, Resolved, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A platform object provider answering for every name under its declared prefixes.
pub trait NamedNamingObjectProxy: Send + Sync {
    /// Name prefixes this provider answers for, e.g. `java:comp/ORB`.
    fn prefixes(&self) -> Vec<String>;

    /// `Ok(None)` means "not mine after all"; resolution continues elsewhere.
    fn handle(&self, name: &str) -> Result<Option<Resolved>>;
}

/// The set of installed providers. Replacing the registry (by pointer identity) invalidates
/// everything cached about the previous one.
#[derive(Default)]
pub struct ProxyRegistry {
    proxies: Vec<Arc<dyn NamedNamingObjectProxy>>,
}

impl ProxyRegistry {
    pub fn new(proxies: Vec<Arc<dyn NamedNamingObjectProxy>>) -> Self {
        Self { proxies }
    }

    pub fn proxies(&self) -> &[Arc<dyn NamedNamingObjectProxy>] {
        &self.proxies
    }

    /// First provider with a prefix of `name`, along with that prefix.
    fn find(&self, name: &str) -> Option<(String, Arc<dyn NamedNamingObjectProxy>)> {
        self.proxies.iter().find_map(|proxy| {
            proxy
                .prefixes()
                .into_iter()
                .find(|prefix| name.starts_with(prefix.as_str()))
                .map(|prefix| (prefix, Arc::clone(proxy)))
        })
    }
}

impl fmt::Debug for ProxyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRegistry")
            .field("proxies", &self.proxies.len())
            .finish()
    }
}

struct ProxyCache {
    registry: Arc<ProxyRegistry>,
    by_prefix: HashMap<String, Arc<dyn NamedNamingObjectProxy>>,
}

impl ProxyCache {
    fn empty(registry: Arc<ProxyRegistry>) -> Self {
        Self {
            registry,
            by_prefix: HashMap::new(),
        }
    }

    fn get(&self, name: &str) -> Option<Arc<dyn NamedNamingObjectProxy>> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix.as_str()))
            .map(|(_, proxy)| Arc::clone(proxy))
    }
}

/// Consulted before bound names: finds the provider for a name by prefix and caches the match.
pub struct NamedObjectManager {
    registry: RwLock<Arc<ProxyRegistry>>,
    cache: RwLock<ProxyCache>,
}

impl NamedObjectManager {
    pub fn new(registry: Arc<ProxyRegistry>) -> Self {
        Self {
            cache: RwLock::new(ProxyCache::empty(Arc::clone(&registry))),
            registry: RwLock::new(registry),
        }
    }

    pub fn install(&self, registry: Arc<ProxyRegistry>) {
        tracing::debug!(
            target = "naming.manager",
            proxies = registry.proxies().len(),
            "installing named object proxy registry"
        );
        *self.registry.write() = registry;
    }

    pub fn registry(&self) -> Arc<ProxyRegistry> {
        self.registry.read().clone()
    }

    /// Resolves `name` through the provider owning its prefix, if any.
    pub fn try_named_proxies(&self, name: &JndiName) -> Result<Option<Resolved>> {
        let registry = self.registry();
        let cached = {
            let cache = self.cache.read();
            if Arc::ptr_eq(&cache.registry, &registry) {
                cache.get(name.as_str())
            } else {
                None
            }
        };

        let proxy = match cached {
            Some(proxy) => proxy,
            None => {
                // Enumerate without holding the cache lock.
                let Some((prefix, proxy)) = registry.find(name.as_str()) else {
                    return Ok(None);
                };
                let mut cache = self.cache.write();
                if !Arc::ptr_eq(&cache.registry, &registry) {
                    tracing::debug!(
                        target = "naming.manager",
                        "proxy registry changed; dropping cached providers"
                    );
                    *cache = ProxyCache::empty(Arc::clone(&registry));
                }
                tracing::trace!(target = "naming.manager", prefix = %prefix, "caching named object proxy");
                cache.by_prefix.insert(prefix, Arc::clone(&proxy));
                proxy
            }
        };
        proxy.handle(name.as_str())
    }

    #[cfg(test)]
    fn cached_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<_> = self.cache.read().by_prefix.keys().cloned().collect();
        prefixes.sort();
        prefixes
    }
}

impl Default for NamedObjectManager {
    fn default() -> Self {
        Self::new(Arc::new(ProxyRegistry::default()))
    }
}

impl fmt::Debug for NamedObjectManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedObjectManager")
            .field("registry", &*self.registry.read())
            .field("cached", &self.cache.read().by_prefix.len())
            .finish()
    }
}
