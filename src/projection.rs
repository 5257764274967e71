// Copyright (c) 2025 - Cowboy AI, Inc.

//! Change Event Projection
//!
//! Projects configuration change events into the property graph.
//!
//! # Architecture
//!
//! ```text
//! Pure planning                       Effect execution
//! ─────────────                       ────────────────
//!
//! ChangeEvent                         Vec<GraphOp>
//!      │                                   │
//!      ▼                                   ▼
//! ┌──────────────┐                  ┌──────────────┐
//! │   plan()     │   Vec<GraphOp>   │ execute_plan │
//! │  + flatten() │ ───────────────> │  GraphStore  │
//! └──────────────┘                  └──────────────┘
//!                                          │
//!                                          ▼
//!                                   ExecutionReport
//! ```
//!
//! Planning never touches the graph, so the planner and flattener are tested
//! as plain functions; execution is tested against the in-memory store.

pub mod dispatch;
pub mod executor;
pub mod flatten;
pub mod planner;

pub use dispatch::{dispatch, EventPath};
pub use executor::{execute_plan, AppliedOp, ExecutionError, ExecutionReport, OpOutcome};
pub use flatten::{classify, flatten, ContainerKind, Flattened, PropertyKind};
pub use planner::{is_relationship_key, plan};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{ResourceId, ResourceType};

/// One graph mutation
///
/// Ops are data: the planner returns them and an executor performs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphOp {
    /// Create the node if absent; on creation `name` becomes `resourceName`
    UpsertNode {
        id: ResourceId,
        label: ResourceType,
        name: String,
    },

    /// Overwrite the given properties on an existing node
    SetProperties {
        id: ResourceId,
        props: BTreeMap<String, String>,
    },

    /// Create the directed edge if absent
    UpsertEdge {
        from: ResourceId,
        to: ResourceId,
        label: String,
    },

    /// Remove the node and every incident edge
    DeleteNode { id: ResourceId },

    /// Remove exactly one (from, to, label) edge
    DeleteEdge {
        from: ResourceId,
        to: ResourceId,
        label: String,
    },
}

impl GraphOp {
    pub fn kind(&self) -> &'static str {
        match self {
            GraphOp::UpsertNode { .. } => "upsert_node",
            GraphOp::SetProperties { .. } => "set_properties",
            GraphOp::UpsertEdge { .. } => "upsert_edge",
            GraphOp::DeleteNode { .. } => "delete_node",
            GraphOp::DeleteEdge { .. } => "delete_edge",
        }
    }
}

impl fmt::Display for GraphOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphOp::UpsertNode { id, label, .. } => write!(f, "upsert_node {}:{}", id, label),
            GraphOp::SetProperties { id, props } => {
                write!(f, "set_properties {} ({} props)", id, props.len())
            }
            GraphOp::UpsertEdge { from, to, label } => {
                write!(f, "upsert_edge {} -[{}]-> {}", from, label, to)
            }
            GraphOp::DeleteNode { id } => write!(f, "delete_node {}", id),
            GraphOp::DeleteEdge { from, to, label } => {
                write!(f, "delete_edge {} -[{}]-> {}", from, label, to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let op = GraphOp::UpsertEdge {
            from: "i-1".into(),
            to: "sg-1".into(),
            label: "IsAssociatedWith".into(),
        };
        assert_eq!(op.to_string(), "upsert_edge i-1 -[IsAssociatedWith]-> sg-1");
        assert_eq!(op.kind(), "upsert_edge");
    }
}
