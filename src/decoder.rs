use serde_json::Value;

use crate::{
    error::DecodeError,
    models::transaction::{Envelope, TicketTransaction},
};

/// Decodes a raw queue body into a transaction.
///
/// The body must be a JSON object; fields the model does not know about are
/// ignored and absent ones stay `None`.
pub fn decode(bytes: &[u8]) -> Result<TicketTransaction, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;

    if !value.is_object() {
        return Err(DecodeError::NotAnObject {
            found: json_type_name(&value),
        });
    }

    let envelope: Envelope = serde_json::from_value(value)?;
    Ok(envelope.data.unwrap_or_default())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
