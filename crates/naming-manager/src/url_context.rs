use crate::manager::NamingManager;
use naming_core::{
    Binding, BoundValue, Context, Environment, InvocationIdentity, JndiName, NameClassPair,
    NamingError, ProcessType, Resolved, Result, JNDI_CTX_JAVA, JNDI_CTX_JAVA_APP,
    JNDI_CTX_JAVA_GLOBAL,
};
use naming_provider::SerialContext;
use std::fmt;
use std::sync::Arc;

/// One way of resolving a `java:` name, tried in [`ResolutionStrategy::plan`] order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// A platform object provider registered for a prefix of the name.
    NamedProxies,
    /// The component, module or app namespace of the current invocation.
    ScopedNamespace,
    /// App clients only: `java:app/x` looked up as `java:global/<app>/x` on the server.
    GlobalTranslation,
    /// App clients only: the internal global name the server exports `java:app` names under.
    InternalGlobalName,
}

impl ResolutionStrategy {
    pub fn plan(name: &JndiName, process_type: ProcessType) -> Vec<ResolutionStrategy> {
        let mut plan = Vec::with_capacity(4);
        // Environment entries are never served by named proxies.
        if !name.is_java_env() {
            plan.push(ResolutionStrategy::NamedProxies);
        }
        plan.push(ResolutionStrategy::ScopedNamespace);
        if process_type.is_app_client() && name.is_java_app() {
            plan.push(ResolutionStrategy::GlobalTranslation);
            plan.push(ResolutionStrategy::InternalGlobalName);
        }
        plan
    }
}

/// The context behind every `java:` name.
///
/// Read-only: it resolves names relative to its own name through the [`NamingManager`] on
/// behalf of the invocation it carries, and rejects every mutation.
#[derive(Clone)]
pub struct JavaUrlContext {
    name: JndiName,
    environment: Environment,
    identity: Option<InvocationIdentity>,
    serial_context: Option<SerialContext>,
    manager: Arc<NamingManager>,
}

impl JavaUrlContext {
    pub fn new(manager: Arc<NamingManager>, name: impl Into<JndiName>) -> Self {
        Self {
            name: name.into(),
            environment: Environment::new(),
            identity: None,
            serial_context: None,
            manager,
        }
    }

    pub fn with_identity(mut self, identity: InvocationIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Proxies bound in the scoped namespaces are materialized against `serial_context`
    /// instead of the manager's initial context.
    pub fn with_serial_context(mut self, serial_context: SerialContext) -> Self {
        self.serial_context = Some(serial_context);
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn name(&self) -> &JndiName {
        &self.name
    }

    pub fn identity(&self) -> Option<&InvocationIdentity> {
        self.identity.as_ref()
    }

    /// `None` for names of other URL schemes (`jdbc:...`, `http://...`), which this context
    /// never resolves.
    fn full_name(&self, name: &str) -> Option<JndiName> {
        if !name.starts_with(JNDI_CTX_JAVA) && name.contains(':') {
            return None;
        }
        Some(if self.name.is_empty() {
            JndiName::new(name)
        } else if self.name.as_str() == JNDI_CTX_JAVA {
            JndiName::new(format!("{JNDI_CTX_JAVA}{name}"))
        } else {
            self.name.join(name)
        })
    }

    fn identity_or_err(&self) -> Result<&InvocationIdentity> {
        self.identity
            .as_ref()
            .ok_or_else(|| NamingError::invocation("Got null ComponentInvocation"))
    }

    fn read_only(&self, called_for: impl fmt::Display) -> NamingError {
        NamingError::ReadOnly {
            namespace: self.name.to_string(),
            name: called_for.to_string(),
        }
    }

    fn try_strategy(
        &self,
        strategy: ResolutionStrategy,
        full_name: &JndiName,
        app_name: &mut Option<Result<String>>,
    ) -> Result<Option<Resolved>> {
        match strategy {
            ResolutionStrategy::NamedProxies => {
                self.manager.named_objects().try_named_proxies(full_name)
            }
            ResolutionStrategy::ScopedNamespace => self
                .manager
                .lookup(self.identity_or_err()?, full_name, self.serial_context.as_ref())
                .map(Some),
            ResolutionStrategy::GlobalTranslation => {
                let app = self.app_name(app_name)?;
                let global = format!(
                    "{JNDI_CTX_JAVA_GLOBAL}{app}/{}",
                    full_name.remove_prefix()
                );
                self.manager.initial_context().lookup(&global).map(Some)
            }
            ResolutionStrategy::InternalGlobalName => {
                let app = self.app_name(app_name)?;
                let internal = self
                    .manager
                    .naming_util()
                    .compose_internal_global_java_app_name(&app, full_name);
                self.manager
                    .initial_context()
                    .lookup(internal.as_str())
                    .map(Some)
            }
        }
    }

    /// The app name published in the initial context, looked up once per resolution.
    fn app_name(&self, cached: &mut Option<Result<String>>) -> Result<String> {
        cached
            .get_or_insert_with(|| {
                let key = format!("{JNDI_CTX_JAVA_APP}AppName");
                let resolved = self.manager.initial_context().lookup(&key)?;
                resolved
                    .as_value()
                    .and_then(|value| value.as_str())
                    .map(str::to_owned)
                    .ok_or_else(|| NamingError::other(format!("{key} is not bound to a string")))
            })
            .clone()
    }

    /// Resolves `name` through every strategy that applies, collecting the failures.
    pub fn resolve(&self, name: &str) -> Result<Resolved> {
        let Some(full_name) = self.full_name(name) else {
            return Err(NamingError::name_not_found(name, self.name.as_str()));
        };
        tracing::debug!(target = "naming.url", name, full_name = %full_name, "java: lookup");

        let mut attempts = Vec::new();
        let mut app_name = None;
        for strategy in ResolutionStrategy::plan(&full_name, self.manager.process_type()) {
            match self.try_strategy(strategy, &full_name, &mut app_name) {
                Ok(Some(resolved)) => return Ok(resolved),
                Ok(None) => {}
                Err(err) => {
                    tracing::trace!(
                        target = "naming.url",
                        name = %full_name,
                        ?strategy,
                        error = %err,
                        "resolution attempt failed"
                    );
                    // One failed app name lookup answers for both global strategies.
                    if !attempts.contains(&err) {
                        attempts.push(err);
                    }
                }
            }
        }
        Err(NamingError::Unresolved {
            name: full_name.into_string(),
            attempts,
        })
    }
}

impl Context for JavaUrlContext {
    fn lookup(&self, name: &str) -> Result<Resolved> {
        if name.is_empty() {
            let copy = JavaUrlContext {
                serial_context: None,
                ..self.clone()
            };
            return Ok(Resolved::Context(Arc::new(copy)));
        }
        self.resolve(name)
    }

    fn bind(&self, name: &str, _value: BoundValue) -> Result<()> {
        Err(self.read_only(name))
    }

    fn rebind(&self, name: &str, _value: BoundValue) -> Result<()> {
        Err(self.read_only(name))
    }

    fn unbind(&self, name: &str) -> Result<()> {
        Err(self.read_only(name))
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        Err(self.read_only(format_args!("{old_name} and {new_name}")))
    }

    fn list(&self, name: &str) -> Result<Vec<NameClassPair>> {
        if name.is_empty() {
            return self.manager.list(self.identity_or_err()?, &self.name);
        }
        match self.lookup(name)?.into_context() {
            Some(target) => target.list(""),
            None => Err(NamingError::not_context(format!("{name} cannot be listed"))),
        }
    }

    fn list_bindings(&self, name: &str) -> Result<Vec<Binding>> {
        if name.is_empty() {
            return self.manager.list_bindings(
                self.identity_or_err()?,
                &self.name,
                self.serial_context.as_ref(),
            );
        }
        match self.lookup(name)?.into_context() {
            Some(target) => target.list_bindings(""),
            None => Err(NamingError::not_context(format!("{name} cannot be listed"))),
        }
    }

    fn create_subcontext(&self, name: &str) -> Result<Arc<dyn Context>> {
        Err(self.read_only(name))
    }

    fn destroy_subcontext(&self, name: &str) -> Result<()> {
        Err(self.read_only(name))
    }

    fn name_in_namespace(&self) -> String {
        self.name.to_string()
    }

    fn environment(&self) -> Environment {
        self.environment.clone()
    }
}

impl fmt::Debug for JavaUrlContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JavaUrlContext")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
