// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Graph Domain Values
//!
//! - [`ResourceId`] - opaque node key
//! - [`ResourceType`] - normalized node label
//! - [`ImplicitRelation`] - a related resource discovered inside a property bag

pub mod resource_id;
pub mod resource_type;

pub use resource_id::ResourceId;
pub use resource_type::{reformat_resource_type, ResourceType};

use serde::{Deserialize, Serialize};

/// Related resource referenced from another resource's property bag
///
/// Materialized as a node (`target_id`, labelled `target_type`) and a directed
/// edge `source_id -[edge_label]-> target_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplicitRelation {
    pub target_id: ResourceId,
    pub target_type: ResourceType,
    pub edge_label: String,
    pub source_id: ResourceId,
}
