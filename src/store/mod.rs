// Copyright (c) 2025 - Cowboy AI, Inc.
//! Graph Store Abstraction
//!
//! The capability the planner's output is executed against. A store is
//! constructed once per process and shared by every invocation, so all
//! methods take `&self` and implementations must be `Send + Sync`.
//!
//! # Requirements
//!
//! 1. **Atomic upserts**: existence check and creation are one operation, so
//!    two concurrent upserts of the same id create exactly one node
//! 2. **Idempotency**: re-applying any operation leaves the graph unchanged
//! 3. **Cascade**: deleting a node deletes every incident edge
//! 4. **Explicit outcomes**: upserts report whether they created anything

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::StoreError;

pub mod memory;

pub use memory::{InMemoryGraphStore, StoredNode};

/// Node key property; MERGE and MATCH address nodes by it
pub const NODE_ID_PROPERTY: &str = "id";

/// Property written on node creation from the item name
pub const RESOURCE_NAME_PROPERTY: &str = "resourceName";

/// Properties owned by the node itself. `set_properties` never writes them:
/// the id is fixed at creation and the name is only set by the creating upsert.
pub const RESERVED_PROPERTIES: [&str; 2] = [NODE_ID_PROPERTY, RESOURCE_NAME_PROPERTY];

pub fn is_reserved_property(key: &str) -> bool {
    RESERVED_PROPERTIES.contains(&key)
}

/// Result of an existence-checked create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpsertOutcome {
    Created,
    AlreadyExisted,
}

impl UpsertOutcome {
    pub fn created(&self) -> bool {
        matches!(self, UpsertOutcome::Created)
    }
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeleteOutcome {
    Removed,
    Absent,
}

impl DeleteOutcome {
    pub fn removed(&self) -> bool {
        matches!(self, DeleteOutcome::Removed)
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Idempotent graph primitives backing the configuration graph
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Create the node if absent, with `label` and a `resourceName` property.
    /// An existing node is left untouched, label and name included.
    async fn upsert_node(&self, id: &str, label: &str, name: &str) -> StoreResult<UpsertOutcome>;

    /// Overwrite each given property (single value per key).
    ///
    /// Keys in [`RESERVED_PROPERTIES`] are skipped. Fails with
    /// [`StoreError::NodeNotFound`] if the node does not exist. Returns the
    /// number of properties written.
    async fn set_properties(&self, id: &str, props: &BTreeMap<String, String>) -> StoreResult<usize>;

    /// Create the directed edge `from -[label]-> to` if absent.
    ///
    /// Fails with [`StoreError::MissingEndpoint`] if either node is absent.
    async fn upsert_edge(&self, from: &str, to: &str, label: &str) -> StoreResult<UpsertOutcome>;

    /// Delete the node and every edge incident to it
    async fn delete_node(&self, id: &str) -> StoreResult<DeleteOutcome>;

    /// Delete exactly the `from -[label]-> to` edge
    async fn delete_edge(&self, from: &str, to: &str, label: &str) -> StoreResult<DeleteOutcome>;

    /// Prepare the backend (constraints, indexes). Safe to call repeatedly.
    async fn initialize(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Verify the backend is reachable
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Backend name, for logs
    fn name(&self) -> &str;
}
