//! The `java:` naming runtime.
//!
//! [`NamingManager`] keeps one flat namespace per component, per module and per application,
//! populated at deployment and consulted on every `java:comp`, `java:module` and `java:app`
//! lookup. [`JavaUrlContext`] is the read-only context callers see for those names; it tries
//! the named object proxies first, then the scoped namespaces, and in app clients falls back to
//! the server's `java:global` names.

mod manager;
mod named_proxy;
mod namespace;
mod naming_util;
mod url_context;

pub use manager::{JndiBinding, NamingManager, NamingManagerOptions};
pub use named_proxy::{NamedNamingObjectProxy, NamedObjectManager, ProxyRegistry};
pub use namespace::AppModuleKey;
pub use naming_util::{ComponentNamingUtil, DefaultComponentNamingUtil, INTERNAL_APP_CLIENT_SEGMENT};
pub use url_context::{JavaUrlContext, ResolutionStrategy};
