use naming_core::{JndiName, JNDI_CTX_JAVA_GLOBAL};

/// Path segment under which app clients find `java:app` names exported by the server.
pub const INTERNAL_APP_CLIENT_SEGMENT: &str = "__internal_java_app_for_app_client__";

/// Naming conventions shared between the server and the app client container.
pub trait ComponentNamingUtil: Send + Sync {
    /// The `java:global` name under which the server exports `name` (a `java:app` name of
    /// `app_name`) for app clients.
    fn compose_internal_global_java_app_name(&self, app_name: &str, name: &JndiName) -> JndiName;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultComponentNamingUtil;

impl ComponentNamingUtil for DefaultComponentNamingUtil {
    fn compose_internal_global_java_app_name(&self, app_name: &str, name: &JndiName) -> JndiName {
        JndiName::new(format!(
            "{JNDI_CTX_JAVA_GLOBAL}{app_name}/{INTERNAL_APP_CLIENT_SEGMENT}/{}",
            name.remove_prefix()
        ))
    }
}
