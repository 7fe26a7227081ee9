use naming_core::NamingError;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Failures of the remote path that have nothing to do with the names involved.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("frame too large: {len} > {max}")]
    FrameTooLarge { len: usize, max: usize },

    #[error("decode error: {message}")]
    Decode { message: String },

    #[error("encode error: {message}")]
    Encode { message: String },

    #[error("unexpected response: {message}")]
    UnexpectedResponse { message: String },

    #[error("connection closed")]
    ConnectionClosed,
}

/// What a serial context provider operation can fail with.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<ProviderError> for NamingError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Naming(err) => err,
            ProviderError::Transport(err) => NamingError::Communication {
                message: err.to_string(),
            },
        }
    }
}
