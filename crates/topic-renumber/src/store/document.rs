//! Mapping between JSON documents and records.

use serde_json::{Map, Value};

use crate::config::FieldNames;
use crate::record::Record;

/// Read a document field as a string.
///
/// Strings are kept verbatim, numbers use their decimal form, `true` becomes
/// `"true"`. `null`, `false` and empty arrays/objects count as absent.
pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Build a record from a document and its id.
pub fn record_from_document(
    id: &str,
    document: &Map<String, Value>,
    fields: &FieldNames,
) -> Record {
    let get = |name: &str| document.get(name).and_then(value_as_string);
    Record {
        id: id.to_string(),
        area_id: get(&fields.area),
        record_type: get(&fields.record_type),
        sequence_number: get(&fields.sequence),
        created_at: get(&fields.created_at),
        last_update: get(&fields.last_update),
        deleted_at: get(&fields.deleted_at),
    }
}
