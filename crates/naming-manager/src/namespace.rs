use naming_core::{
    BoundValue, JndiName, NamingError, Result, Scope, JNDI_CTX_JAVA, JNDI_CTX_JAVA_APP_NS_ID,
    JNDI_CTX_JAVA_COMPONENT_NS_ID, JNDI_CTX_JAVA_MODULE_NS_ID,
};
use std::collections::HashMap;
use std::fmt;

/// Identifies a module namespace. Equal only when both parts are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppModuleKey {
    app: String,
    module: String,
}

impl AppModuleKey {
    pub fn new(app: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            module: module.into(),
        }
    }

    /// Fails with `InvalidScope` unless both parts are present.
    pub fn try_new(app: Option<&str>, module: Option<&str>) -> Result<Self> {
        match (app, module) {
            (Some(app), Some(module)) => Ok(Self::new(app, module)),
            _ => Err(NamingError::InvalidScope {
                app_name: app.map(str::to_owned),
                module_name: module.map(str::to_owned),
            }),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}

impl fmt::Display for AppModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app, self.module)
    }
}

/// A flat `java:` namespace: full name → bound value.
///
/// Context placeholders for `java:`, `java:<scope>` and `java:<scope>/env` exist from the start,
/// each under both its bare and its `/`-terminated form.
pub(crate) struct JavaNamespace {
    name: String,
    bindings: HashMap<JndiName, BoundValue>,
}

impl JavaNamespace {
    pub(crate) fn new(name: impl Into<String>, scope: Scope) -> Self {
        let mut bindings = HashMap::new();
        for (key, marker) in Self::seeds(scope) {
            bindings.insert(key, BoundValue::context(marker));
        }
        Self {
            name: name.into(),
            bindings,
        }
    }

    /// (key, context name) pairs every namespace of `scope` starts with.
    fn seeds(scope: Scope) -> [(JndiName, String); 6] {
        let java = JNDI_CTX_JAVA.to_owned();
        let sub = format!("{JNDI_CTX_JAVA}{}", scope.subcontext_name());
        let env = format!("{sub}/env");
        [
            (JndiName::new(java.clone()), java.clone()),
            (JndiName::new(format!("{java}/")), java),
            (JndiName::new(sub.clone()), sub.clone()),
            (JndiName::new(format!("{sub}/")), sub),
            (JndiName::new(env.clone()), env.clone()),
            (JndiName::new(format!("{env}/")), env),
        ]
    }

    /// What a namespace of `scope` that was never populated would hold for `name`.
    pub(crate) fn seeded_binding(scope: Scope, name: &JndiName) -> Option<BoundValue> {
        Self::seeds(scope)
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, marker)| BoundValue::context(marker))
    }

    pub(crate) fn seeded_names(scope: Scope) -> Vec<JndiName> {
        Self::seeds(scope).into_iter().map(|(key, _)| key).collect()
    }

    pub(crate) fn get(&self, name: &JndiName) -> Option<&BoundValue> {
        self.bindings.get(name)
    }

    pub(crate) fn remove(&mut self, name: &JndiName) -> Option<BoundValue> {
        self.bindings.remove(name)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &JndiName> {
        self.bindings.keys()
    }

    /// Binds `value`. A forcing bind replaces an existing value with a warning; a non-forcing
    /// bind leaves it in place. Intermediate context placeholders are added after every bind
    /// that stored the value.
    pub(crate) fn bind(&mut self, name: JndiName, value: BoundValue, force: bool) -> Result<()> {
        tracing::debug!(
            target = "naming.manager",
            namespace = %self.name,
            name = %name,
            class = %value.class_name(),
            force,
            "bind to namespace"
        );
        if force {
            if self.bindings.insert(name.clone(), value).is_some() {
                tracing::warn!(
                    target = "naming.manager",
                    namespace = %self.name,
                    name = %name,
                    "replaced existing binding"
                );
            }
        } else if self.bindings.contains_key(&name) {
            tracing::trace!(
                target = "naming.manager",
                namespace = %self.name,
                name = %name,
                "namespace already contains a binding; ignoring request"
            );
            return Ok(());
        } else {
            self.bindings.insert(name.clone(), value);
        }
        self.bind_intermediate_contexts(&name)
    }

    fn bind_intermediate_contexts(&mut self, name: &JndiName) -> Result<()> {
        let namespace_id = match name.scope() {
            Some(Scope::Component) => JNDI_CTX_JAVA_COMPONENT_NS_ID,
            Some(Scope::Module) => JNDI_CTX_JAVA_MODULE_NS_ID,
            Some(Scope::App) => JNDI_CTX_JAVA_APP_NS_ID,
            _ => {
                return Err(NamingError::invalid_name(format!(
                    "Invalid environment namespace name: {name}"
                )))
            }
        };

        let rest = &name.as_str()[namespace_id.len() + 1..];
        let mut partial = namespace_id.to_owned();
        for component in rest.split('/').filter(|c| !c.is_empty()) {
            partial.push('/');
            partial.push_str(component);
            let key = JndiName::new(partial.clone());
            if !self.bindings.contains_key(&key) {
                tracing::trace!(
                    target = "naming.manager",
                    namespace = %self.name,
                    context = %key,
                    "adding intermediate context"
                );
                self.bindings.insert(key, BoundValue::context(partial.clone()));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for JavaNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.bindings.keys().map(JndiName::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("JavaNamespace")
            .field("name", &self.name)
            .field("keys", &keys)
            .finish()
    }
}

/// Direct children of `parent` among `names`: one more component, never `parent` itself.
pub(crate) fn direct_children<'a>(
    parent: &JndiName,
    names: impl Iterator<Item = &'a JndiName>,
) -> Vec<JndiName> {
    let prefix = parent.with_trailing_slash();
    let mut children: Vec<JndiName> = names
        .filter(|key| {
            key.has_prefix(prefix.as_str())
                && key.as_str() != prefix.as_str()
                && !key.as_str()[prefix.as_str().len()..].contains('/')
        })
        .cloned()
        .collect();
    children.sort();
    children
}
