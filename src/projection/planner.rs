// Copyright (c) 2025 - Cowboy AI, Inc.
//! Graph Mutation Planner
//!
//! Pure function from a change event to the ordered graph operations that
//! realize it. No I/O happens here; see [`executor`](super::executor).
//!
//! # Plan Shape
//!
//! ```text
//! OK               UpsertNode(item) → SetProperties(item)
//!                  → [UpsertNode(target) → UpsertEdge(item → target)]*
//!                  → [DeleteEdge(item → removed)]*
//! ResourceDeleted  DeleteNode(item)
//! other status     [DeleteEdge(item → removed)]*
//! ```

use tracing::{debug, warn};

use super::dispatch::{dispatch, EventPath};
use super::flatten::flatten;
use super::GraphOp;
use crate::domain::ResourceId;
use crate::errors::ConfigGraphResult;
use crate::events::{ChangeEvent, ChangeType, ConfigurationDiff, ConfigurationItem};

/// Prefix of diff keys that describe relationship changes
pub const RELATIONSHIP_DIFF_PREFIX: &str = "Relationships.";

/// Build the mutation plan for one change event
pub fn plan(event: &ChangeEvent) -> ConfigGraphResult<Vec<GraphOp>> {
    let item = &event.item;
    let path = dispatch(event);
    let mut ops = Vec::new();

    match path {
        EventPath::Delete => {
            ops.push(GraphOp::DeleteNode {
                id: item.id.clone(),
            });
            debug!(resource_id = %item.id, "Planned node deletion");
            return Ok(ops);
        }
        EventPath::Upsert => plan_upsert(item, &mut ops)?,
        EventPath::DiffOnly => {}
    }

    if let Some(diff) = &event.diff {
        plan_relationship_removals(&item.id, diff, &mut ops);
    }

    debug!(resource_id = %item.id, ?path, ops = ops.len(), "Planned change event");
    Ok(ops)
}

fn plan_upsert(item: &ConfigurationItem, ops: &mut Vec<GraphOp>) -> ConfigGraphResult<()> {
    let flattened = flatten(item)?;

    ops.push(GraphOp::UpsertNode {
        id: item.id.clone(),
        label: item.resource_type.clone(),
        name: item.name.clone(),
    });
    ops.push(GraphOp::SetProperties {
        id: item.id.clone(),
        props: flattened.scalar_properties,
    });

    for relation in flattened.implicit_relations {
        ops.push(GraphOp::UpsertNode {
            id: relation.target_id.clone(),
            label: relation.target_type,
            name: String::new(),
        });
        ops.push(GraphOp::UpsertEdge {
            from: relation.source_id,
            to: relation.target_id,
            label: relation.edge_label,
        });
    }

    Ok(())
}

/// Only `Relationships.<index>` entries with a DELETE change are acted on;
/// every other diff entry is already reflected by the item itself.
fn plan_relationship_removals(
    source_id: &ResourceId,
    diff: &ConfigurationDiff,
    ops: &mut Vec<GraphOp>,
) {
    for (key, entry) in diff.iter() {
        if !is_relationship_key(key) || entry.change_type != ChangeType::Delete {
            continue;
        }

        match (&entry.resource_id, &entry.name) {
            (Some(target), Some(label)) => ops.push(GraphOp::DeleteEdge {
                from: source_id.clone(),
                to: target.clone(),
                label: label.clone(),
            }),
            _ => warn!(
                resource_id = %source_id,
                key,
                "Relationship removal without target id or name, skipping"
            ),
        }
    }
}

/// `Relationships.0`, `Relationships.12`, ...
pub fn is_relationship_key(key: &str) -> bool {
    key.strip_prefix(RELATIONSHIP_DIFF_PREFIX)
        .map(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
