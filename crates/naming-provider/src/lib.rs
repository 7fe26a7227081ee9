//! Serial context providers.
//!
//! A [`ProviderManager`] owns the [`naming_store::TransientContext`] backing the platform
//! namespace and fronts it with two providers:
//!
//! - [`LocalSerialContextProvider`] for callers inside the server process, which copies values
//!   on bind and lookup;
//! - [`RemoteSerialContextProvider`] for callers across the remote boundary, reached through a
//!   [`RemoteProviderClient`] and a [`Transport`].
//!
//! [`SerialContext`] turns either provider into a [`naming_core::Context`].

mod client;
mod codec;
mod copy;
mod error;
mod factory;
mod local;
mod manager;
mod provider;
mod remote;
mod serial;
mod transport;
pub mod wire;

pub use client::RemoteProviderClient;
pub use copy::{deep_copy, CopyPolicy, DEFAULT_COPY_LIMIT_BYTES};
pub use error::{ProviderError, Result, TransportError};
pub use factory::{IiopObjectFactory, ObjectFactories, ObjectFactory, Orb, IIOP_OBJECT_FACTORY};
pub use local::LocalSerialContextProvider;
pub use manager::{ProviderManager, ProviderManagerOptions};
pub use provider::SerialContextProvider;
pub use remote::RemoteSerialContextProvider;
pub use serial::SerialContext;
pub use transport::{InProcessTransport, Transport};
