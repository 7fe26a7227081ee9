use crate::error::TransportError;
use crate::remote::RemoteSerialContextProvider;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Carries encoded frames to a remote provider and brings the response back.
pub trait Transport: Send + Sync {
    fn round_trip(&self, frame: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// Connects a client directly to a server-side provider in the same process. Frames are still
/// encoded and decoded, so everything that would fail to cross a real connection fails here too.
pub struct InProcessTransport {
    server: Arc<RemoteSerialContextProvider>,
    closed: AtomicBool,
}

impl InProcessTransport {
    pub fn new(server: Arc<RemoteSerialContextProvider>) -> Self {
        Self {
            server,
            closed: AtomicBool::new(false),
        }
    }

    /// Every later round trip fails with [`TransportError::ConnectionClosed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl Transport for InProcessTransport {
    fn round_trip(&self, frame: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::ConnectionClosed);
        }
        self.server.handle_frame(&frame)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn round_trip(&self, frame: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        (**self).round_trip(frame)
    }
}
