use crate::error::TransportError;
use bincode::Options;
use naming_core::NamingError;
use serde::de::DeserializeOwned;
use serde::Serialize;

fn bincode_options() -> impl bincode::Options + Copy {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

/// Encodes a frame, refusing anything larger than `max_bytes`.
pub(crate) fn encode_frame<T: Serialize>(
    value: &T,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let bytes = bincode_options()
        .serialize(value)
        .map_err(|err| TransportError::Encode {
            message: err.to_string(),
        })?;
    if bytes.len() > max_bytes {
        return Err(TransportError::FrameTooLarge {
            len: bytes.len(),
            max: max_bytes,
        });
    }
    Ok(bytes)
}

pub(crate) fn decode_frame<T: DeserializeOwned>(
    bytes: &[u8],
    max_bytes: usize,
) -> Result<T, TransportError> {
    if bytes.len() > max_bytes {
        return Err(TransportError::FrameTooLarge {
            len: bytes.len(),
            max: max_bytes,
        });
    }
    bincode_options()
        .with_limit(max_bytes as u64)
        .deserialize(bytes)
        .map_err(|err| TransportError::Decode {
            message: err.to_string(),
        })
}

/// Serializes and deserializes `value`, producing an independent copy.
pub(crate) fn round_trip<T: Serialize + DeserializeOwned>(
    value: &T,
    max_bytes: usize,
) -> Result<T, NamingError> {
    let options = bincode_options().with_limit(max_bytes as u64);
    let bytes = options
        .serialize(value)
        .map_err(|err| NamingError::Serialization {
            message: err.to_string(),
        })?;
    options
        .deserialize(&bytes)
        .map_err(|err| NamingError::Serialization {
            message: err.to_string(),
        })
}
