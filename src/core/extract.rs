use crate::core::{FieldValue, SystemPayload};
use crate::utils::error::{Result, StreamError};

pub const DEFAULT_FIELD_NAMES: [&str; 4] = ["memory_stream", "memoryStream", "memory", "memory_streams"];

/// Pull the memory stream out of a `getSystem` payload.
///
/// The first name in `field_names` present in the payload wins, even when its
/// value is JSON `null`.
pub fn extract_memory_stream(
    payload: Option<SystemPayload>,
    field_names: &[String],
) -> Result<FieldValue> {
    let mut payload = payload.ok_or(StreamError::EmptyPayload)?;

    for name in field_names {
        if let Some(value) = payload.fields.remove(name) {
            tracing::debug!("Memory stream found under '{}'", name);
            return Ok(value);
        }
    }

    tracing::debug!(
        "Payload fields were: {:?}",
        payload.fields.keys().collect::<Vec<_>>()
    );
    Err(StreamError::MissingMemoryStream {
        looked_for: field_names.to_vec(),
    })
}

pub fn default_field_names() -> Vec<String> {
    DEFAULT_FIELD_NAMES.iter().map(|n| n.to_string()).collect()
}
