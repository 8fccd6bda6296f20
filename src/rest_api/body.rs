//! # Request Body Fields
//!
//! Field-set and field-type checks for mutating verbs. Checks run in a fixed
//! order: unexpected fields, then missing fields, then field types.

use serde_json::{Map, Value};

use super::errors::ClientError;
use super::parser::{is_numeric, whole_float, whole_number, WholeNumberError};

/// The body must contain exactly `required`.
pub fn require_fields(body: &Map<String, Value>, required: &[&str]) -> Result<(), ClientError> {
    if let Some(unexpected) = body.keys().find(|key| !required.contains(&key.as_str())) {
        return Err(ClientError::invalid_parameter(format!(
            "Unexpected Parameter {}",
            unexpected
        )));
    }

    if let Some(missing) = required.iter().find(|field| !body.contains_key(**field)) {
        return Err(ClientError::invalid_parameter(format!(
            "{} is required",
            missing
        )));
    }

    Ok(())
}

/// Read an identifier field: a whole number, given as a JSON number or a
/// numeric string.
pub fn id_field(body: &Map<String, Value>, name: &str) -> Result<i64, ClientError> {
    let number = match body.get(name) {
        Some(Value::Number(number)) => match number.as_i64() {
            Some(id) => Ok(id),
            None => number
                .as_f64()
                .map_or(Err(WholeNumberError::OutOfRange), whole_float),
        },
        Some(Value::String(text)) if is_numeric(text) => whole_number(text),
        _ => Err(WholeNumberError::NotANumber),
    };

    number.map_err(|error| {
        let detail = match error {
            WholeNumberError::NotANumber => format!("{}: Expected a number.", name),
            WholeNumberError::Fractional => format!("{} must be a whole number", name),
            WholeNumberError::OutOfRange => format!("{} is out of range", name),
        };
        ClientError::invalid_parameter(detail)
    })
}

/// Read a non-empty text field, trimmed
pub fn text_field<'a>(body: &'a Map<String, Value>, name: &str) -> Result<&'a str, ClientError> {
    match body.get(name) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim()),
        _ => Err(ClientError::invalid_parameter(format!(
            "{} must be a non-empty string",
            name
        ))),
    }
}
