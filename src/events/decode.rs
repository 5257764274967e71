// Copyright (c) 2025 - Cowboy AI, Inc.
//! Invocation Decoding
//!
//! The trigger delivers an envelope `{"invokingEvent": "<json>"}` whose
//! string payload is the change notification itself:
//!
//! ```text
//! {
//!   "configurationItem": {
//!     "resourceId": "...", "resourceType": "...", "resourceName": "...",
//!     "configurationItemStatus": "OK", ...property bag...
//!   },
//!   "configurationItemDiff": { "Relationships.0": { "changeType": "DELETE", ... } }
//! }
//! ```
//!
//! Decoding failures are fatal for the invocation; nothing is planned.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::change_event::{
    ChangeEvent, ChangeType, ConfigurationDiff, ConfigurationItem, DiffEntry, ItemStatus,
};
use super::value::{PropertyMap, PropertyValue};
use crate::domain::{ResourceId, ResourceType};
use crate::errors::{ConfigGraphError, ConfigGraphResult};

/// Outer trigger envelope
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationEnvelope {
    #[serde(rename = "invokingEvent")]
    pub invoking_event: String,
}

/// Decode a raw trigger envelope into a change event
pub fn decode_envelope(raw: &[u8]) -> ConfigGraphResult<ChangeEvent> {
    let envelope: InvocationEnvelope = serde_json::from_slice(raw)?;
    decode_invoking_event(&envelope.invoking_event)
}

/// Decode the `invokingEvent` payload
pub fn decode_invoking_event(payload: &str) -> ConfigGraphResult<ChangeEvent> {
    let value: Value = serde_json::from_str(payload)?;
    let Value::Object(mut root) = value else {
        return Err(ConfigGraphError::Decode(
            "invoking event is not a JSON object".to_string(),
        ));
    };

    let item = match root.remove("configurationItem") {
        Some(Value::Object(item)) => decode_item(item)?,
        _ => {
            return Err(ConfigGraphError::MissingField(
                "configurationItem".to_string(),
            ))
        }
    };

    let diff = match root.remove("configurationItemDiff") {
        Some(Value::Object(diff)) => Some(decode_diff(diff)),
        _ => None,
    };

    debug!(
        resource_id = %item.id,
        status = %item.status,
        diff_entries = diff.as_ref().map(ConfigurationDiff::len).unwrap_or(0),
        "Decoded change event"
    );

    Ok(ChangeEvent { item, diff })
}

fn decode_item(record: Map<String, Value>) -> ConfigGraphResult<ConfigurationItem> {
    let id = required_str(&record, "resourceId")?;
    let raw_type = required_str(&record, "resourceType")?;
    let status = required_str(&record, "configurationItemStatus")?;
    let name = match record.get("resourceName") {
        Some(Value::String(name)) => name.clone(),
        _ => String::new(),
    };

    Ok(ConfigurationItem {
        id: ResourceId::new(id),
        resource_type: ResourceType::new(&raw_type),
        name,
        status: ItemStatus::parse(&status),
        properties: record
            .into_iter()
            .map(|(k, v)| (k, PropertyValue::from(v)))
            .collect::<PropertyMap>(),
    })
}

fn required_str(record: &Map<String, Value>, field: &str) -> ConfigGraphResult<String> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ConfigGraphError::MissingField(format!(
            "configurationItem.{}",
            field
        ))),
    }
}

/// Diff entries are either top-level or nested under `changedProperties`.
/// Values that are not objects (such as a top-level `changeType` string)
/// are not entries and are dropped.
fn decode_diff(mut diff: Map<String, Value>) -> ConfigurationDiff {
    let entries = match diff.remove("changedProperties") {
        Some(Value::Object(changed)) => changed,
        _ => diff,
    };

    let mut decoded = ConfigurationDiff::new();
    for (key, value) in entries {
        if let Value::Object(entry) = value {
            decoded.push(key, decode_diff_entry(&entry));
        }
    }
    decoded
}

fn decode_diff_entry(entry: &Map<String, Value>) -> DiffEntry {
    let change_type = entry
        .get("changeType")
        .and_then(Value::as_str)
        .map(ChangeType::parse)
        .unwrap_or_else(|| ChangeType::Other(String::new()));

    let previous = entry.get("previousValue").and_then(Value::as_object);
    let lookup = |field: &str| -> Option<String> {
        entry
            .get(field)
            .and_then(Value::as_str)
            .or_else(|| previous.and_then(|p| p.get(field)).and_then(Value::as_str))
            .map(str::to_string)
    };

    DiffEntry {
        change_type,
        resource_id: lookup("resourceId").map(ResourceId::new),
        name: lookup("name"),
    }
}
