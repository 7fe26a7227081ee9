use crate::named_proxy::{NamedObjectManager, ProxyRegistry};
use crate::namespace::{direct_children, AppModuleKey, JavaNamespace};
use crate::naming_util::{ComponentNamingUtil, DefaultComponentNamingUtil};
use crate::url_context::JavaUrlContext;
use naming_config::NamingConfig;
use naming_core::{
    Binding, BoundValue, CompositeName, Context, Environment, InvocationIdentity, JndiName,
    NameClassPair, NamingError, ProcessType, Reference, Resolved, Result, Scope,
    IIOP_OBJECT_FACTORY, JNDI_CTX_JAVA_COMPONENT, JNDI_CTX_JAVA_MODULE,
};
use naming_provider::{
    Orb, ProviderManager, ProviderManagerOptions, RemoteSerialContextProvider, SerialContext,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// A deployment-time request to bind `value` under `name`.
#[derive(Clone, Debug)]
pub struct JndiBinding {
    pub name: JndiName,
    pub value: BoundValue,
}

impl JndiBinding {
    pub fn new(name: impl Into<JndiName>, value: impl Into<BoundValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone)]
pub struct NamingManagerOptions {
    pub process_type: ProcessType,
    pub naming_util: Arc<dyn ComponentNamingUtil>,
    pub proxy_registry: Arc<ProxyRegistry>,
}

impl NamingManagerOptions {
    pub fn from_config(config: &NamingConfig) -> Self {
        Self {
            process_type: config.process.process_type,
            ..Self::default()
        }
    }
}

impl Default for NamingManagerOptions {
    fn default() -> Self {
        Self {
            process_type: ProcessType::Server,
            naming_util: Arc::new(DefaultComponentNamingUtil),
            proxy_registry: Arc::new(ProxyRegistry::default()),
        }
    }
}

impl fmt::Debug for NamingManagerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamingManagerOptions")
            .field("process_type", &self.process_type)
            .field("proxy_registry", &self.proxy_registry)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct ComponentIdInfo {
    app_name: String,
    module_name: String,
    component_id: String,
    treat_component_as_module: bool,
}

#[derive(Clone, Debug)]
enum NamespaceKey {
    Component(String),
    Module(AppModuleKey),
    App(String),
}

impl NamespaceKey {
    fn scope(&self) -> Scope {
        match self {
            NamespaceKey::Component(_) => Scope::Component,
            NamespaceKey::Module(_) => Scope::Module,
            NamespaceKey::App(_) => Scope::App,
        }
    }

    fn label(&self) -> String {
        match self {
            NamespaceKey::Component(id) => format!("component {id}"),
            NamespaceKey::Module(key) => format!("module {key}"),
            NamespaceKey::App(app) => format!("app {app}"),
        }
    }
}

/// Where a name landed after component-to-module rewriting and namespace selection.
struct Located {
    replaced: bool,
    name: JndiName,
    key: NamespaceKey,
    value: Option<BoundValue>,
}

fn app_key(app_name: Option<&str>) -> Result<String> {
    app_name.map(str::to_owned).ok_or(NamingError::InvalidScope {
        app_name: None,
        module_name: None,
    })
}

/// The scoped namespace registry.
///
/// Holds one flat namespace per component, per (app, module) pair and per app. Namespaces are
/// filled by the deployment-time `bind_to_*` calls and read by every `java:` lookup; reads
/// clone the bound value out before materializing it, so no namespace lock is held while a
/// proxy runs.
pub struct NamingManager {
    this: Weak<NamingManager>,
    component_namespaces: RwLock<HashMap<String, JavaNamespace>>,
    module_namespaces: RwLock<HashMap<AppModuleKey, JavaNamespace>>,
    app_namespaces: RwLock<HashMap<String, JavaNamespace>>,
    component_id_info: RwLock<HashMap<String, ComponentIdInfo>>,
    named_objects: NamedObjectManager,
    providers: Arc<ProviderManager>,
    initial_context: SerialContext,
    cos_context: RwLock<Option<Arc<dyn Context>>>,
    process_type: ProcessType,
    naming_util: Arc<dyn ComponentNamingUtil>,
}

impl NamingManager {
    /// A manager whose initial context is the local provider of `providers`.
    pub fn new(providers: Arc<ProviderManager>, options: NamingManagerOptions) -> Arc<Self> {
        let initial_context = providers.initial_context();
        Self::with_initial_context(providers, initial_context, options)
    }

    pub fn with_initial_context(
        providers: Arc<ProviderManager>,
        initial_context: SerialContext,
        options: NamingManagerOptions,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            component_namespaces: RwLock::new(HashMap::new()),
            module_namespaces: RwLock::new(HashMap::new()),
            app_namespaces: RwLock::new(HashMap::new()),
            component_id_info: RwLock::new(HashMap::new()),
            named_objects: NamedObjectManager::new(options.proxy_registry),
            providers,
            initial_context,
            cos_context: RwLock::new(None),
            process_type: options.process_type,
            naming_util: options.naming_util,
        })
    }

    /// Builds the provider manager and the naming manager described by `config`. When remote
    /// naming is enabled and an ORB is supplied, remote naming support is initialized too.
    pub fn from_config(config: &NamingConfig, orb: Option<Arc<dyn Orb>>) -> Result<Arc<Self>> {
        let providers = Arc::new(ProviderManager::new(ProviderManagerOptions::from_config(
            config,
        )));
        let manager = Self::new(providers, NamingManagerOptions::from_config(config));
        match (config.remote.enabled, orb) {
            (true, Some(orb)) => {
                manager.initialize_remote_naming_support(orb)?;
            }
            (true, None) => tracing::warn!(
                target = "naming.manager",
                "remote naming is enabled but no ORB was supplied; staying local"
            ),
            (false, _) => {}
        }
        Ok(manager)
    }

    fn shared(&self) -> Result<Arc<Self>> {
        self.this
            .upgrade()
            .ok_or_else(|| NamingError::other("naming manager has been dropped"))
    }

    pub fn initial_context(&self) -> &SerialContext {
        &self.initial_context
    }

    pub fn providers(&self) -> &Arc<ProviderManager> {
        &self.providers
    }

    pub fn process_type(&self) -> ProcessType {
        self.process_type
    }

    pub fn naming_util(&self) -> &dyn ComponentNamingUtil {
        self.naming_util.as_ref()
    }

    pub fn named_objects(&self) -> &NamedObjectManager {
        &self.named_objects
    }

    pub fn install_proxy_registry(&self, registry: Arc<ProxyRegistry>) {
        self.named_objects.install(registry);
    }

    /// A `java:` URL context rooted at the empty name, acting for `identity`.
    pub fn java_url_context(&self, identity: InvocationIdentity) -> Result<JavaUrlContext> {
        Ok(JavaUrlContext::new(self.shared()?, JndiName::default()).with_identity(identity))
    }

    /// Recreates the context for `java:comp/env` (or one of its subcontexts) from its name,
    /// resolving on behalf of `identity`.
    pub fn restore_java_comp_env_context(
        &self,
        name: &JndiName,
        identity: InvocationIdentity,
    ) -> Result<JavaUrlContext> {
        if !name.has_java_prefix() {
            return Err(NamingError::invalid_name(format!(
                "Invalid context name [{name}]. Name must start with java:"
            )));
        }
        Ok(JavaUrlContext::new(self.shared()?, name.clone()).with_identity(identity))
    }

    // Deployment-time population.

    fn with_namespace_mut<R>(
        &self,
        key: NamespaceKey,
        f: impl FnOnce(&mut JavaNamespace) -> R,
    ) -> R {
        match key {
            NamespaceKey::Component(id) => {
                let mut namespaces = self.component_namespaces.write();
                let namespace = namespaces
                    .entry(id.clone())
                    .or_insert_with(|| JavaNamespace::new(id, Scope::Component));
                f(namespace)
            }
            NamespaceKey::Module(key) => {
                let mut namespaces = self.module_namespaces.write();
                let namespace = namespaces
                    .entry(key.clone())
                    .or_insert_with(|| JavaNamespace::new(key.to_string(), Scope::Module));
                f(namespace)
            }
            NamespaceKey::App(app) => {
                let mut namespaces = self.app_namespaces.write();
                let namespace = namespaces
                    .entry(app.clone())
                    .or_insert_with(|| JavaNamespace::new(app, Scope::App));
                f(namespace)
            }
        }
    }

    /// Binds a component's environment.
    ///
    /// Each binding goes to the namespace its prefix selects; with `treat_component_as_module`
    /// `java:comp/` names are stored as `java:module/` names. Existing bindings are kept. The
    /// component's app and module are remembered for later lookups when both are known.
    pub fn bind_to_component_namespace(
        &self,
        app_name: Option<&str>,
        module_name: Option<&str>,
        component_id: &str,
        treat_component_as_module: bool,
        bindings: impl IntoIterator<Item = JndiBinding>,
    ) -> Result<()> {
        tracing::debug!(
            target = "naming.manager",
            app = ?app_name,
            module = ?module_name,
            component = component_id,
            treat_component_as_module,
            "bind to component namespace"
        );
        if let (Some(app), Some(module)) = (app_name, module_name) {
            self.component_id_info.write().insert(
                component_id.to_owned(),
                ComponentIdInfo {
                    app_name: app.to_owned(),
                    module_name: module.to_owned(),
                    component_id: component_id.to_owned(),
                    treat_component_as_module,
                },
            );
        }

        for binding in bindings {
            let name = if treat_component_as_module && binding.name.is_java_component() {
                binding.name.change_prefix(JNDI_CTX_JAVA_MODULE)
            } else {
                binding.name
            };
            let key = match name.scope() {
                Some(Scope::Component) => NamespaceKey::Component(component_id.to_owned()),
                Some(Scope::Module) => {
                    NamespaceKey::Module(AppModuleKey::try_new(app_name, module_name)?)
                }
                Some(Scope::App) => NamespaceKey::App(app_key(app_name)?),
                Some(Scope::Global) | None => {
                    tracing::warn!(
                        target = "naming.manager",
                        name = %name,
                        app = ?app_name,
                        module = ?module_name,
                        component = component_id,
                        "no namespace found for binding; skipping it"
                    );
                    continue;
                }
            };
            self.with_namespace_mut(key, |namespace| namespace.bind(name, binding.value, false))?;
        }
        Ok(())
    }

    /// Binds `java:module/` names into the module's namespace, replacing existing values.
    /// Bindings of other scopes are ignored.
    pub fn bind_to_module_namespace(
        &self,
        app_name: &str,
        module_name: &str,
        bindings: impl IntoIterator<Item = JndiBinding>,
    ) -> Result<()> {
        tracing::trace!(
            target = "naming.manager",
            app = app_name,
            module = module_name,
            "bind to module namespace"
        );
        let key = AppModuleKey::new(app_name, module_name);
        for binding in bindings.into_iter().filter(|b| b.name.is_java_module()) {
            self.with_namespace_mut(NamespaceKey::Module(key.clone()), |namespace| {
                namespace.bind(binding.name, binding.value, true)
            })?;
        }
        Ok(())
    }

    /// Binds `java:app/` names into the app's namespace, replacing existing values. Bindings of
    /// other scopes are ignored.
    pub fn bind_to_app_namespace(
        &self,
        app_name: &str,
        bindings: impl IntoIterator<Item = JndiBinding>,
    ) -> Result<()> {
        tracing::trace!(target = "naming.manager", app = app_name, "bind to app namespace");
        for binding in bindings.into_iter().filter(|b| b.name.is_java_app()) {
            self.with_namespace_mut(NamespaceKey::App(app_name.to_owned()), |namespace| {
                namespace.bind(binding.name, binding.value, true)
            })?;
        }
        Ok(())
    }

    // Undeployment.

    pub fn unbind_component_objects(&self, component_id: &str) {
        tracing::debug!(target = "naming.manager", component = component_id, "unbind component objects");
        self.component_namespaces.write().remove(component_id);
        self.component_id_info.write().remove(component_id);
    }

    /// Drops the app namespace and every module namespace of the app.
    pub fn unbind_app_objects(&self, app_name: &str) {
        tracing::debug!(target = "naming.manager", app = app_name, "unbind app objects");
        self.app_namespaces.write().remove(app_name);
        self.module_namespaces
            .write()
            .retain(|key, _| key.app() != app_name);
    }

    pub fn unbind_app_object(&self, app_name: &str, name: &JndiName) {
        tracing::debug!(target = "naming.manager", app = app_name, name = %name, "unbind app object");
        if let Some(namespace) = self.app_namespaces.write().get_mut(app_name) {
            namespace.remove(name);
        }
    }

    pub fn unbind_module_object(&self, app_name: &str, module_name: &str, name: &JndiName) {
        tracing::debug!(
            target = "naming.manager",
            app = app_name,
            module = module_name,
            name = %name,
            "unbind module object"
        );
        let key = AppModuleKey::new(app_name, module_name);
        if let Some(namespace) = self.module_namespaces.write().get_mut(&key) {
            namespace.remove(name);
        }
    }

    // Lookup.

    fn read_namespace<R>(
        &self,
        key: &NamespaceKey,
        f: impl FnOnce(Option<&JavaNamespace>) -> R,
    ) -> R {
        match key {
            NamespaceKey::Component(id) => f(self.component_namespaces.read().get(id)),
            NamespaceKey::Module(module) => f(self.module_namespaces.read().get(module)),
            NamespaceKey::App(app) => f(self.app_namespaces.read().get(app)),
        }
    }

    /// The bound value, as seen by a namespace that may not have been populated yet.
    fn namespace_get(&self, key: &NamespaceKey, name: &JndiName) -> Option<BoundValue> {
        self.read_namespace(key, |namespace| match namespace {
            Some(namespace) => namespace.get(name).cloned(),
            None => JavaNamespace::seeded_binding(key.scope(), name),
        })
    }

    fn locate(&self, identity: &InvocationIdentity, name: &JndiName) -> Result<Located> {
        let component_id = identity.component_id()?;
        let info = self.component_id_info.read().get(component_id).cloned();

        let replaced = info
            .as_ref()
            .is_some_and(|info| info.treat_component_as_module && name.is_java_component());
        let lookup_name = if replaced {
            name.change_prefix(JNDI_CTX_JAVA_MODULE)
        } else {
            name.clone()
        };

        let key = match (&info, lookup_name.scope()) {
            (Some(info), Some(Scope::Module)) => NamespaceKey::Module(AppModuleKey::new(
                info.app_name.as_str(),
                info.module_name.as_str(),
            )),
            (Some(info), Some(Scope::App)) => NamespaceKey::App(info.app_name.clone()),
            (Some(info), _) => NamespaceKey::Component(info.component_id.clone()),
            (None, Some(Scope::Module)) => NamespaceKey::Module(AppModuleKey::try_new(
                identity.app_name(),
                identity.module_name(),
            )?),
            (None, Some(Scope::App)) => NamespaceKey::App(app_key(identity.app_name())?),
            (None, _) => NamespaceKey::Component(component_id.to_owned()),
        };

        let value = self.namespace_get(&key, &lookup_name);
        tracing::trace!(
            target = "naming.manager",
            name = %lookup_name,
            namespace = %key.label(),
            found = value.is_some(),
            "located name"
        );
        Ok(Located {
            replaced,
            name: lookup_name,
            key,
            value,
        })
    }

    /// Resolves `name` in the namespaces of the component `identity` names.
    ///
    /// Deferred proxies are materialized against `ctx` (the initial context when `None`).
    /// Context placeholders come back as fresh URL contexts; when the name was rewritten from
    /// component to module scope, the new context keeps the name the caller used.
    pub fn lookup(
        &self,
        identity: &InvocationIdentity,
        name: &JndiName,
        ctx: Option<&SerialContext>,
    ) -> Result<Resolved> {
        tracing::debug!(
            target = "naming.manager",
            component = ?identity.component_id().ok(),
            name = %name,
            "lookup"
        );
        let located = self.locate(identity, name)?;
        let Some(value) = located.value else {
            return Err(NamingError::name_not_found(
                located.name.as_str(),
                located.key.label(),
            ));
        };
        match value {
            BoundValue::Deferred(deferred) => {
                let ctx = ctx.unwrap_or(&self.initial_context);
                Ok(Resolved::Object(deferred.create(ctx)?))
            }
            BoundValue::Context(marker) => {
                let url_name = if located.replaced {
                    name.clone()
                } else {
                    JndiName::new(marker.name)
                };
                let mut url = JavaUrlContext::new(self.shared()?, url_name)
                    .with_identity(identity.clone());
                if let Some(serial) = ctx {
                    url = url.with_serial_context(serial.clone());
                }
                Ok(Resolved::Context(Arc::new(url)))
            }
            BoundValue::Object(object) => Ok(Resolved::Object(object)),
            BoundValue::Reference(reference) => Ok(Resolved::Reference(reference)),
        }
    }

    /// [`NamingManager::lookup`] for a bare component id.
    pub fn lookup_component(&self, component_id: &str, name: &JndiName) -> Result<Resolved> {
        self.lookup(&InvocationIdentity::component(component_id), name, None)
    }

    fn list_names(&self, identity: &InvocationIdentity, name: &JndiName) -> Result<Vec<JndiName>> {
        let located = self.locate(identity, name)?;
        match &located.value {
            None => {
                return Err(NamingError::name_not_found(
                    name.as_str(),
                    located.key.label(),
                ))
            }
            Some(value) if !value.is_context() => return Err(NamingError::not_context(name.as_str())),
            Some(_) => {}
        }

        let children = self.read_namespace(&located.key, |namespace| match namespace {
            Some(namespace) => direct_children(&located.name, namespace.names()),
            None => direct_children(
                &located.name,
                JavaNamespace::seeded_names(located.key.scope()).iter(),
            ),
        });
        if located.replaced {
            Ok(children
                .into_iter()
                .map(|child| child.change_prefix(JNDI_CTX_JAVA_COMPONENT))
                .collect())
        } else {
            Ok(children)
        }
    }

    /// Direct children of the context `name`, with full names.
    pub fn list(&self, identity: &InvocationIdentity, name: &JndiName) -> Result<Vec<NameClassPair>> {
        let mut pairs = Vec::new();
        for child in self.list_names(identity, name)? {
            let Some(value) = self.locate(identity, &child)?.value else {
                continue;
            };
            pairs.push(NameClassPair {
                name: child.last_component().to_owned(),
                class_name: value.class_name(),
                full_name: child.into_string(),
            });
        }
        Ok(pairs)
    }

    /// Direct children of the context `name` with their resolved values. A proxy that fails to
    /// materialize is logged and returned unresolved.
    pub fn list_bindings(
        &self,
        identity: &InvocationIdentity,
        name: &JndiName,
        ctx: Option<&SerialContext>,
    ) -> Result<Vec<Binding>> {
        let mut bindings = Vec::new();
        for child in self.list_names(identity, name)? {
            let value = match self.lookup(identity, &child, ctx) {
                Ok(value) => value,
                Err(err) => match self.locate(identity, &child)?.value {
                    Some(BoundValue::Deferred(deferred)) => {
                        tracing::warn!(
                            target = "naming.manager",
                            name = %child,
                            error = %err,
                            "failed to materialize proxy while listing; returning it unresolved"
                        );
                        Resolved::Deferred(deferred)
                    }
                    _ => return Err(err),
                },
            };
            bindings.push(Binding {
                name: child.last_component().to_owned(),
                full_name: child.into_string(),
                value,
            });
        }
        Ok(bindings)
    }

    /// Looks `name` up in the app namespace directly. Context placeholders come back as URL
    /// contexts acting for `identity`, when one is given.
    pub fn lookup_from_app_namespace(
        &self,
        app_name: &str,
        name: &JndiName,
        env: Option<&Environment>,
        identity: Option<&InvocationIdentity>,
    ) -> Result<Resolved> {
        tracing::trace!(target = "naming.manager", app = app_name, name = %name, "lookup from app namespace");
        self.lookup_from_namespace(NamespaceKey::App(app_name.to_owned()), name, env, identity)
    }

    pub fn lookup_from_module_namespace(
        &self,
        app_name: &str,
        module_name: &str,
        name: &JndiName,
        env: Option<&Environment>,
        identity: Option<&InvocationIdentity>,
    ) -> Result<Resolved> {
        tracing::trace!(
            target = "naming.manager",
            app = app_name,
            module = module_name,
            name = %name,
            "lookup from module namespace"
        );
        let key = NamespaceKey::Module(AppModuleKey::new(app_name, module_name));
        self.lookup_from_namespace(key, name, env, identity)
    }

    fn lookup_from_namespace(
        &self,
        key: NamespaceKey,
        name: &JndiName,
        env: Option<&Environment>,
        identity: Option<&InvocationIdentity>,
    ) -> Result<Resolved> {
        let Some(value) = self.namespace_get(&key, name) else {
            return Err(NamingError::name_not_found(name.as_str(), key.label()));
        };
        match value {
            BoundValue::Deferred(deferred) => {
                let ctx = match env {
                    Some(env) if !env.is_empty() => {
                        self.initial_context.clone().with_environment(env.clone())
                    }
                    _ => self.initial_context.clone(),
                };
                Ok(Resolved::Object(deferred.create(&ctx)?))
            }
            BoundValue::Reference(reference) => {
                match self
                    .providers
                    .factories()
                    .resolve(reference.clone(), name.as_str())
                {
                    Ok(resolved) => Ok(resolved),
                    Err(err) => {
                        tracing::debug!(
                            target = "naming.manager",
                            name = %name,
                            error = %err,
                            "unable to get object instance from reference; returning the reference"
                        );
                        Ok(Resolved::Reference(reference))
                    }
                }
            }
            BoundValue::Context(marker) => {
                let mut url = JavaUrlContext::new(self.shared()?, JndiName::new(marker.name));
                if let Some(identity) = identity {
                    url = url.with_identity(identity.clone());
                }
                if let Some(env) = env {
                    url = url.with_environment(env.clone());
                }
                Ok(Resolved::Context(Arc::new(url)))
            }
            BoundValue::Object(object) => Ok(Resolved::Object(object)),
        }
    }

    // Publishing into the initial context and the CORBA naming service.

    pub fn publish_object(&self, name: &str, value: BoundValue, rebind: bool) -> Result<()> {
        tracing::debug!(target = "naming.manager", name, rebind, "publish object");
        if rebind {
            self.initial_context.rebind(name, value)
        } else {
            self.initial_context.bind(name, value)
        }
    }

    pub fn unpublish_object(&self, name: &str) -> Result<()> {
        tracing::debug!(target = "naming.manager", name, "unpublish object");
        self.initial_context.unbind(name)
    }

    /// Connects to the ORB's naming service and starts the remote provider.
    pub fn initialize_remote_naming_support(
        &self,
        orb: Arc<dyn Orb>,
    ) -> Result<Arc<RemoteSerialContextProvider>> {
        let cos = orb.naming_context()?;
        *self.cos_context.write() = Some(cos);
        tracing::debug!(target = "naming.manager", "remote naming support initialized");
        Ok(self.providers.init_remote_provider(orb))
    }

    fn cos_context(&self) -> Result<Arc<dyn Context>> {
        self.cos_context.read().clone().ok_or_else(|| {
            NamingError::other(
                "COS naming context is not initialized; call initialize_remote_naming_support first",
            )
        })
    }

    /// Binds `value` in the CORBA naming service, creating missing subcontexts, and publishes
    /// an IIOP reference to it under the same name in the initial context.
    pub fn publish_cos_naming_object(
        &self,
        name: &str,
        value: BoundValue,
        rebind: bool,
    ) -> Result<()> {
        tracing::debug!(target = "naming.manager", name, rebind, "publish COS naming object");
        let cos = self.cos_context()?;
        create_sub_contexts(name, Arc::clone(&cos))?;
        if rebind {
            cos.rebind(name, value)?;
        } else {
            cos.bind(name, value)?;
        }

        let reference = Reference::new("reference", Some(IIOP_OBJECT_FACTORY.to_owned()))
            .with_addr("url", name);
        self.publish_object(name, reference.into(), rebind)
    }

    /// Removes the object from the CORBA naming service and the initial context. A failure on
    /// the CORBA side is logged and does not stop the second unbind.
    pub fn unpublish_cos_naming_object(&self, name: &str) -> Result<()> {
        tracing::debug!(target = "naming.manager", name, "unpublish COS naming object");
        if let Err(err) = self.cos_context().and_then(|cos| cos.unbind(name)) {
            tracing::warn!(
                target = "naming.manager",
                name,
                error = %err,
                "error during CosNaming unbind"
            );
        }
        self.initial_context.unbind(name)
    }
}

/// Walks every component of `name` but the last below `root`, creating missing subcontexts.
fn create_sub_contexts(name: &str, root: Arc<dyn Context>) -> Result<()> {
    let parsed = CompositeName::parse(name);
    let Some((_, parents)) = parsed.components().split_last() else {
        return Ok(());
    };
    let mut current = root;
    for component in parents {
        current = match current.lookup(component) {
            Ok(Resolved::Context(ctx)) => ctx,
            Ok(_) => return Err(NamingError::already_bound(component.as_str())),
            Err(err) if err.is_name_not_found() => current.create_subcontext(component)?,
            Err(err) => return Err(err),
        };
    }
    Ok(())
}

impl fmt::Debug for NamingManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamingManager")
            .field("components", &self.component_namespaces.read().len())
            .field("modules", &self.module_namespaces.read().len())
            .field("apps", &self.app_namespaces.read().len())
            .field("process_type", &self.process_type)
            .field("named_objects", &self.named_objects)
            .finish()
    }
}
