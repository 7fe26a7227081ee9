use crate::client::RemoteProviderClient;
use crate::copy::CopyPolicy;
use crate::factory::{IiopObjectFactory, ObjectFactories, Orb};
use crate::local::LocalSerialContextProvider;
use crate::provider::SerialContextProvider;
use crate::remote::RemoteSerialContextProvider;
use crate::serial::SerialContext;
use crate::transport::InProcessTransport;
use naming_config::NamingConfig;
use naming_core::IIOP_OBJECT_FACTORY;
use naming_store::TransientContext;
use std::fmt;
use std::sync::{Arc, OnceLock};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderManagerOptions {
    pub copy_policy: CopyPolicy,
    pub max_message_bytes: usize,
}

impl ProviderManagerOptions {
    pub fn from_config(config: &NamingConfig) -> Self {
        let max_message_bytes = config.provider.max_message_bytes;
        let copy_policy = if config.provider.copy_local_values {
            CopyPolicy::ByValue {
                max_bytes: max_message_bytes,
            }
        } else {
            CopyPolicy::ByReference
        };
        Self {
            copy_policy,
            max_message_bytes,
        }
    }
}

impl Default for ProviderManagerOptions {
    fn default() -> Self {
        Self::from_config(&NamingConfig::default())
    }
}

/// Owns the namespace store and hands out the providers that front it.
///
/// The local provider is created on first use. The remote provider exists only after
/// [`ProviderManager::init_remote_provider`] has been called with an ORB.
pub struct ProviderManager {
    store: Arc<TransientContext>,
    factories: Arc<ObjectFactories>,
    options: ProviderManagerOptions,
    local: OnceLock<Arc<LocalSerialContextProvider>>,
    remote: OnceLock<Arc<RemoteSerialContextProvider>>,
    orb: OnceLock<Arc<dyn Orb>>,
}

impl ProviderManager {
    pub fn new(options: ProviderManagerOptions) -> Self {
        Self {
            store: Arc::new(TransientContext::new()),
            factories: Arc::new(ObjectFactories::new()),
            options,
            local: OnceLock::new(),
            remote: OnceLock::new(),
            orb: OnceLock::new(),
        }
    }

    pub fn store(&self) -> &Arc<TransientContext> {
        &self.store
    }

    pub fn factories(&self) -> &Arc<ObjectFactories> {
        &self.factories
    }

    pub fn options(&self) -> &ProviderManagerOptions {
        &self.options
    }

    pub fn local_provider(&self) -> Arc<LocalSerialContextProvider> {
        Arc::clone(self.local.get_or_init(|| {
            tracing::debug!(target = "naming.provider", "creating local provider");
            Arc::new(LocalSerialContextProvider::new(
                Arc::clone(&self.store),
                Arc::clone(&self.factories),
                self.options.copy_policy,
            ))
        }))
    }

    /// Registers the IIOP object factory and builds the remote provider. Later calls return the
    /// provider built by the first one.
    pub fn init_remote_provider(&self, orb: Arc<dyn Orb>) -> Arc<RemoteSerialContextProvider> {
        let orb = Arc::clone(self.orb.get_or_init(|| orb));
        if !self.factories.contains(IIOP_OBJECT_FACTORY) {
            self.factories
                .register(IIOP_OBJECT_FACTORY, Arc::new(IiopObjectFactory::new(orb)));
        }
        Arc::clone(self.remote.get_or_init(|| {
            tracing::debug!(target = "naming.provider", "creating remote provider");
            Arc::new(RemoteSerialContextProvider::new(
                self.local_provider(),
                Arc::clone(&self.factories),
                self.options.max_message_bytes,
            ))
        }))
    }

    pub fn remote_provider(&self) -> Option<Arc<RemoteSerialContextProvider>> {
        self.remote.get().cloned()
    }

    pub fn orb(&self) -> Option<Arc<dyn Orb>> {
        self.orb.get().cloned()
    }

    /// A fresh initial context over the local provider.
    pub fn initial_context(&self) -> SerialContext {
        let provider: Arc<dyn SerialContextProvider> = self.local_provider();
        SerialContext::new(provider, Arc::clone(&self.factories))
    }

    /// A client connected to the remote provider through an [`InProcessTransport`], or `None`
    /// before remote initialization.
    pub fn remote_client(&self) -> Option<RemoteProviderClient<InProcessTransport>> {
        let server = self.remote_provider()?;
        Some(RemoteProviderClient::new(
            InProcessTransport::new(server),
            self.options.max_message_bytes,
        ))
    }

    /// An initial context that reaches the store the way an app client does: through the remote
    /// provider.
    pub fn remote_initial_context(&self) -> Option<SerialContext> {
        let provider: Arc<dyn SerialContextProvider> = Arc::new(self.remote_client()?);
        Some(SerialContext::new(provider, Arc::clone(&self.factories)))
    }
}

impl Default for ProviderManager {
    fn default() -> Self {
        Self::new(ProviderManagerOptions::default())
    }
}

impl fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderManager")
            .field("store", &self.store)
            .field("factories", &self.factories)
            .field("options", &self.options)
            .field("remote_initialized", &self.remote.get().is_some())
            .finish()
    }
}
