use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

pub const JNDI_CTX_JAVA: &str = "java:";
pub const JNDI_CTX_JAVA_COMPONENT: &str = "java:comp/";
pub const JNDI_CTX_JAVA_MODULE: &str = "java:module/";
pub const JNDI_CTX_JAVA_APP: &str = "java:app/";
pub const JNDI_CTX_JAVA_GLOBAL: &str = "java:global/";

pub const JNDI_CTX_JAVA_COMPONENT_ENV: &str = "java:comp/env/";
pub const JNDI_CTX_JAVA_MODULE_ENV: &str = "java:module/env/";
pub const JNDI_CTX_JAVA_APP_ENV: &str = "java:app/env/";

/// Namespace identifiers: the scope prefixes without their trailing separator.
pub const JNDI_CTX_JAVA_COMPONENT_NS_ID: &str = "java:comp";
pub const JNDI_CTX_JAVA_MODULE_NS_ID: &str = "java:module";
pub const JNDI_CTX_JAVA_APP_NS_ID: &str = "java:app";

/// The nesting levels at which a `java:` name can be bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Component,
    Module,
    App,
    Global,
}

impl Scope {
    /// Prefix (with trailing `/`) that names in this scope start with.
    pub fn prefix(self) -> &'static str {
        match self {
            Scope::Component => JNDI_CTX_JAVA_COMPONENT,
            Scope::Module => JNDI_CTX_JAVA_MODULE,
            Scope::App => JNDI_CTX_JAVA_APP,
            Scope::Global => JNDI_CTX_JAVA_GLOBAL,
        }
    }

    /// Subcontext name used when seeding a namespace of this scope (`comp`, `module`, ...).
    pub fn subcontext_name(self) -> &'static str {
        match self {
            Scope::Component => "comp",
            Scope::Module => "module",
            Scope::App => "app",
            Scope::Global => "global",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcontext_name())
    }
}

/// A `java:`-style JNDI name.
///
/// Names are compared by exact string value. `java:comp/env` and `java:comp/env/` are distinct
/// keys; namespaces store both forms for context placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JndiName(String);

impl JndiName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix)
    }

    pub fn has_java_prefix(&self) -> bool {
        self.has_prefix(JNDI_CTX_JAVA)
    }

    pub fn is_java_component(&self) -> bool {
        self.has_prefix(JNDI_CTX_JAVA_COMPONENT)
    }

    pub fn is_java_module(&self) -> bool {
        self.has_prefix(JNDI_CTX_JAVA_MODULE)
    }

    pub fn is_java_app(&self) -> bool {
        self.has_prefix(JNDI_CTX_JAVA_APP)
    }

    pub fn is_java_global(&self) -> bool {
        self.has_prefix(JNDI_CTX_JAVA_GLOBAL)
    }

    /// The scope selected by this name's prefix, if it is a scoped `java:` name.
    pub fn scope(&self) -> Option<Scope> {
        if self.is_java_component() {
            Some(Scope::Component)
        } else if self.is_java_module() {
            Some(Scope::Module)
        } else if self.is_java_app() {
            Some(Scope::App)
        } else if self.is_java_global() {
            Some(Scope::Global)
        } else {
            None
        }
    }

    /// Whether the name lies in (or is) one of the `java:comp/env`, `java:module/env` or
    /// `java:app/env` environment namespaces.
    pub fn is_java_env(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        self.has_prefix(JNDI_CTX_JAVA_COMPONENT_ENV)
            || self.has_prefix(JNDI_CTX_JAVA_MODULE_ENV)
            || self.has_prefix(JNDI_CTX_JAVA_APP_ENV)
            || matches!(
                self.as_str(),
                "java:comp/env" | "java:module/env" | "java:app/env"
            )
    }

    /// Strips the `java:<scope>/` prefix, returning the remainder.
    ///
    /// A bare `java:<scope>` name yields an empty string; names outside the `java:` scheme are
    /// returned unchanged.
    pub fn remove_prefix(&self) -> &str {
        let Some(rest) = self.0.strip_prefix(JNDI_CTX_JAVA) else {
            return &self.0;
        };
        match rest.find('/') {
            Some(idx) => &rest[idx + 1..],
            None => "",
        }
    }

    /// Replaces the `java:<scope>/` prefix with `new_prefix` (which should end with `/`).
    pub fn change_prefix(&self, new_prefix: &str) -> JndiName {
        JndiName(format!("{new_prefix}{}", self.remove_prefix()))
    }

    /// Appends `child` with a `/` separator.
    pub fn join(&self, child: &str) -> JndiName {
        if self.is_empty() {
            return JndiName::new(child);
        }
        JndiName(format!("{}/{child}", self.0))
    }

    /// The form of this name with a trailing `/`.
    pub fn with_trailing_slash(&self) -> JndiName {
        if self.has_suffix("/") {
            self.clone()
        } else {
            JndiName(format!("{}/", self.0))
        }
    }

    /// The last `/`-separated component of the name.
    pub fn last_component(&self) -> &str {
        let trimmed = self.0.strip_suffix('/').unwrap_or(&self.0);
        match trimmed.rfind('/') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        }
    }
}

impl fmt::Display for JndiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JndiName {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for JndiName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for JndiName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for JndiName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A name split into its `/`-separated components.
///
/// The empty string has no components; a trailing separator yields a trailing empty component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeName {
    components: Vec<String>,
}

impl CompositeName {
    pub fn parse(name: &str) -> Self {
        let components = if name.is_empty() {
            Vec::new()
        } else {
            name.split('/').map(str::to_owned).collect()
        };
        Self { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// The first component and the remaining ones.
    pub fn split_first(&self) -> Option<(&str, &[String])> {
        self.components
            .split_first()
            .map(|(head, rest)| (head.as_str(), rest))
    }

    /// Components `[from..]` joined back into a name.
    pub fn suffix(&self, from: usize) -> String {
        self.components
            .get(from..)
            .map(|rest| rest.join("/"))
            .unwrap_or_default()
    }
}

impl fmt::Display for CompositeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("/"))
    }
}
