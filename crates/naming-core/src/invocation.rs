use crate::error::{NamingError, Result};
use serde::{Deserialize, Serialize};

/// Identity of the component on whose behalf a naming operation runs.
///
/// Scoped lookups are a function of this identity and the requested name; callers pass it
/// explicitly instead of relying on a per-thread "current invocation".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InvocationIdentity {
    app_name: Option<String>,
    module_name: Option<String>,
    component_id: Option<String>,
}

impl InvocationIdentity {
    pub fn new(
        app_name: impl Into<String>,
        module_name: impl Into<String>,
        component_id: impl Into<String>,
    ) -> Self {
        Self {
            app_name: Some(app_name.into()),
            module_name: Some(module_name.into()),
            component_id: Some(component_id.into()),
        }
    }

    /// An identity that only carries a component id, e.g. the default web module.
    pub fn component(component_id: impl Into<String>) -> Self {
        Self {
            component_id: Some(component_id.into()),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn component_id(&self) -> Result<&str> {
        self.component_id
            .as_deref()
            .ok_or_else(|| NamingError::invocation("ComponentId is null"))
    }
}

/// Kind of process hosting the naming runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessType {
    #[default]
    Server,
    /// Application-client container.
    AppClient,
}

impl ProcessType {
    pub fn is_app_client(self) -> bool {
        self == ProcessType::AppClient
    }
}
