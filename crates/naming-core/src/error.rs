use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, NamingError>;

/// Errors produced by every naming operation.
///
/// The enum is `Clone` and serializable so a failure raised inside a remote provider reaches the
/// client unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum NamingError {
    #[error("no object bound to name {name} in namespace {namespace}")]
    NameNotFound { name: String, namespace: String },

    #[error("name {name} is already bound")]
    NameAlreadyBound { name: String },

    #[error("{name} cannot be listed")]
    NotContext { name: String },

    #[error("invalid name: {message}")]
    InvalidName { message: String },

    #[error("the namespace '{namespace}' cannot be modified; called for {name}")]
    ReadOnly { namespace: String, name: String },

    #[error("invalid scope key: app={app_name:?}, module={module_name:?}")]
    InvalidScope {
        app_name: Option<String>,
        module_name: Option<String>,
    },

    #[error("invocation exception: {message}")]
    Invocation { message: String },

    #[error("object bound to {name} is not serializable ({type_name})")]
    NotSerializable { name: String, type_name: String },

    #[error("communication failure: {message}")]
    Communication { message: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("no object bound for {name} ({} resolution attempts failed)", .attempts.len())]
    Unresolved {
        name: String,
        attempts: Vec<NamingError>,
    },

    #[error("{message}")]
    Other { message: String },
}

impl NamingError {
    pub fn name_not_found(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::NameNotFound {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn already_bound(name: impl Into<String>) -> Self {
        Self::NameAlreadyBound { name: name.into() }
    }

    pub fn not_context(name: impl Into<String>) -> Self {
        Self::NotContext { name: name.into() }
    }

    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName {
            message: message.into(),
        }
    }

    pub fn invocation(message: impl Into<String>) -> Self {
        Self::Invocation {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// True for "nothing is bound here", including lookups where every resolution strategy
    /// came up empty.
    pub fn is_name_not_found(&self) -> bool {
        matches!(self, Self::NameNotFound { .. } | Self::Unresolved { .. })
    }
}
