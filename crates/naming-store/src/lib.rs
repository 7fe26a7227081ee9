//! In-memory namespace storage.
//!
//! [`TransientContext`] is the tree every serial context provider reads from and writes to. It
//! knows nothing about proxies, references or copying; it stores [`naming_core::BoundValue`]s and
//! hands out clones.

mod transient;

pub use transient::TransientContext;
