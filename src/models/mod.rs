use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::store::{Document, FieldWrite, Fields, WriteBatch};

pub mod order;
pub mod patch;
pub mod product;
pub mod review;
pub mod user;
pub mod validate;

pub use patch::Patch;

/// Serialize a payload into raw document fields.
pub(crate) fn to_fields<T: Serialize>(value: &T) -> Result<Fields, ApiError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::internal_server_error("payload did not serialize to an object")),
        Err(e) => {
            Err(ApiError::internal_server_error(format!("failed to serialize payload: {}", e)))
        }
    }
}

/// Build a full resource from a document snapshot, injecting the storage
/// key under the resource's id field.
pub(crate) fn document_into<T: DeserializeOwned>(
    doc: Document,
    id_field: &str,
    kind: &str,
) -> Result<T, ApiError> {
    let mut fields = doc.fields;
    fields.insert(id_field.to_string(), Value::String(doc.id));
    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        ApiError::internal_server_error(format!("malformed {} document: {}", kind, e))
    })
}

pub(crate) fn field_value<T: Serialize>(field: &str, value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        ApiError::internal_server_error(format!("failed to encode field '{}': {}", field, e))
    })
}

/// Append a write for a three-state patch field: `Null` stores an explicit
/// null, `Absent` leaves the stored field untouched.
pub(crate) fn push_patch<T: Serialize>(
    writes: &mut WriteBatch,
    field: &str,
    patch: &Patch<T>,
) -> Result<(), ApiError> {
    match patch {
        Patch::Absent => {}
        Patch::Null => writes.push((field.to_string(), FieldWrite::Set(Value::Null))),
        Patch::Value(value) => {
            writes.push((field.to_string(), FieldWrite::Set(field_value(field, value)?)))
        }
    }
    Ok(())
}

pub(crate) fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339())
}

pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)).map_err(|_| {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), format!("Invalid timestamp format: {}", raw));
        ApiError::validation_error("Invalid field format", field_errors)
    })
}
