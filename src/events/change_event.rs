// Copyright (c) 2025 - Cowboy AI, Inc.
//! Change Notification Model
//!
//! A [`ChangeEvent`] is one change notification: the configuration item as it
//! stands now, plus an optional diff against its prior state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::PropertyMap;
use crate::domain::{ResourceId, ResourceType};

/// Status of a configuration item as reported by the notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Resource exists and its state is current
    Ok,
    /// Resource no longer exists
    ResourceDeleted,
    /// Any other status (discovery, not-recorded, ...)
    Other(String),
}

impl ItemStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OK" => ItemStatus::Ok,
            "ResourceDeleted" => ItemStatus::ResourceDeleted,
            other => ItemStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ItemStatus::Ok => "OK",
            ItemStatus::ResourceDeleted => "ResourceDeleted",
            ItemStatus::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cloud resource's current configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationItem {
    pub id: ResourceId,
    pub resource_type: ResourceType,
    /// Empty when the notification carries no name
    pub name: String,
    pub status: ItemStatus,
    /// The full configuration-item record, in delivery order
    pub properties: PropertyMap,
}

/// Kind of change recorded by a diff entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Create,
    Update,
    Delete,
    Other(String),
}

impl ChangeType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CREATE" => ChangeType::Create,
            "UPDATE" => ChangeType::Update,
            "DELETE" => ChangeType::Delete,
            other => ChangeType::Other(other.to_string()),
        }
    }
}

/// A single entry of a configuration diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub change_type: ChangeType,
    /// Related resource, for relationship entries
    pub resource_id: Option<ResourceId>,
    /// Relationship name, for relationship entries
    pub name: Option<String>,
}

impl DiffEntry {
    pub fn new(change_type: ChangeType) -> Self {
        Self {
            change_type,
            resource_id: None,
            name: None,
        }
    }

    pub fn with_relationship(mut self, resource_id: impl Into<ResourceId>, name: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self.name = Some(name.into());
        self
    }
}

/// Diff keyed by entry path (`Relationships.0`, `Configuration.State.Name`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDiff {
    entries: Vec<(String, DiffEntry)>,
}

impl ConfigurationDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, entry: DiffEntry) {
        self.entries.push((key.into(), entry));
    }

    pub fn with_entry(mut self, key: impl Into<String>, entry: DiffEntry) -> Self {
        self.push(key, entry);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub item: ConfigurationItem,
    pub diff: Option<ConfigurationDiff>,
}

impl ChangeEvent {
    pub fn new(item: ConfigurationItem) -> Self {
        Self { item, diff: None }
    }

    pub fn with_diff(mut self, diff: ConfigurationDiff) -> Self {
        self.diff = Some(diff);
        self
    }

    pub fn status(&self) -> &ItemStatus {
        &self.item.status
    }
}
