use crate::codec;
use naming_core::{BoundValue, Object, Result};

/// Largest payload a by-value copy will serialize.
pub const DEFAULT_COPY_LIMIT_BYTES: usize = 16 * 1024 * 1024;

/// How [`deep_copy`] treats serializable data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Serialize and deserialize plain data and references so the copy shares nothing with the
    /// original.
    ByValue { max_bytes: usize },
    /// Hand out clones of the bound handles.
    ByReference,
}

impl CopyPolicy {
    pub fn by_value() -> Self {
        CopyPolicy::ByValue {
            max_bytes: DEFAULT_COPY_LIMIT_BYTES,
        }
    }
}

impl Default for CopyPolicy {
    fn default() -> Self {
        Self::by_value()
    }
}

/// Copies a bound value according to `policy`.
///
/// Remote stubs, in-process objects, deferred proxies and context markers are always shared:
/// stubs stay attached to their remote object, and the others either cannot be serialized or
/// carry no state worth copying.
pub fn deep_copy(value: &BoundValue, policy: CopyPolicy) -> Result<BoundValue> {
    let CopyPolicy::ByValue { max_bytes } = policy else {
        return Ok(value.clone());
    };
    match value {
        BoundValue::Object(Object::Value(data)) => {
            Ok(BoundValue::Object(Object::Value(codec::round_trip(data, max_bytes)?)))
        }
        BoundValue::Reference(reference) => {
            Ok(BoundValue::Reference(codec::round_trip(reference, max_bytes)?))
        }
        BoundValue::Object(Object::Stub(_) | Object::Local(_))
        | BoundValue::Deferred(_)
        | BoundValue::Context(_) => Ok(value.clone()),
    }
}
