// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory graph store
//!
//! Every operation runs inside a single mutex critical section, which makes
//! existence-check-then-create atomic across concurrent invocations.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{
    is_reserved_property, DeleteOutcome, GraphStore, StoreResult, UpsertOutcome,
    RESOURCE_NAME_PROPERTY,
};
use crate::errors::StoreError;

/// A node as held by [`InMemoryGraphStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNode {
    pub id: String,
    pub label: String,
    pub properties: BTreeMap<String, String>,
}

/// Directed edge key: (from, to, label)
pub type EdgeKey = (String, String, String);

#[derive(Debug, Default)]
struct GraphState {
    nodes: HashMap<String, StoredNode>,
    edges: BTreeSet<EdgeKey>,
}

/// Graph store held entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    state: Mutex<GraphState>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, GraphState>> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Snapshot of a node
    pub fn node(&self, id: &str) -> Option<StoredNode> {
        self.lock().ok()?.nodes.get(id).cloned()
    }

    /// All edges, ordered by (from, to, label)
    pub fn edges(&self) -> Vec<EdgeKey> {
        self.lock()
            .map(|state| state.edges.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_edge(&self, from: &str, to: &str, label: &str) -> bool {
        self.lock()
            .map(|state| state.edges.contains(&edge_key(from, to, label)))
            .unwrap_or(false)
    }

    pub fn node_count(&self) -> usize {
        self.lock().map(|state| state.nodes.len()).unwrap_or(0)
    }

    pub fn edge_count(&self) -> usize {
        self.lock().map(|state| state.edges.len()).unwrap_or(0)
    }

    /// Ids of every node, sorted
    pub fn node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lock()
            .map(|state| state.nodes.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }
}

fn edge_key(from: &str, to: &str, label: &str) -> EdgeKey {
    (from.to_string(), to.to_string(), label.to_string())
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn upsert_node(&self, id: &str, label: &str, name: &str) -> StoreResult<UpsertOutcome> {
        let mut state = self.lock()?;
        if state.nodes.contains_key(id) {
            return Ok(UpsertOutcome::AlreadyExisted);
        }

        let properties = BTreeMap::from([(RESOURCE_NAME_PROPERTY.to_string(), name.to_string())]);
        state.nodes.insert(
            id.to_string(),
            StoredNode {
                id: id.to_string(),
                label: label.to_string(),
                properties,
            },
        );
        debug!("Created node {} ({})", id, label);
        Ok(UpsertOutcome::Created)
    }

    async fn set_properties(&self, id: &str, props: &BTreeMap<String, String>) -> StoreResult<usize> {
        let mut state = self.lock()?;
        let node = state
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NodeNotFound(id.to_string()))?;

        let mut written = 0;
        for (key, value) in props.iter().filter(|(key, _)| !is_reserved_property(key)) {
            node.properties.insert(key.clone(), value.clone());
            written += 1;
        }
        Ok(written)
    }

    async fn upsert_edge(&self, from: &str, to: &str, label: &str) -> StoreResult<UpsertOutcome> {
        let mut state = self.lock()?;
        if !state.nodes.contains_key(from) || !state.nodes.contains_key(to) {
            return Err(StoreError::MissingEndpoint {
                from: from.to_string(),
                to: to.to_string(),
                label: label.to_string(),
            });
        }

        if state.edges.insert(edge_key(from, to, label)) {
            debug!("Created edge {} -[{}]-> {}", from, label, to);
            Ok(UpsertOutcome::Created)
        } else {
            Ok(UpsertOutcome::AlreadyExisted)
        }
    }

    async fn delete_node(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let mut state = self.lock()?;
        if state.nodes.remove(id).is_none() {
            return Ok(DeleteOutcome::Absent);
        }

        let before = state.edges.len();
        state.edges.retain(|(from, to, _)| from != id && to != id);
        debug!(
            "Deleted node {} and {} incident edges",
            id,
            before - state.edges.len()
        );
        Ok(DeleteOutcome::Removed)
    }

    async fn delete_edge(&self, from: &str, to: &str, label: &str) -> StoreResult<DeleteOutcome> {
        let mut state = self.lock()?;
        if state.edges.remove(&edge_key(from, to, label)) {
            Ok(DeleteOutcome::Removed)
        } else {
            Ok(DeleteOutcome::Absent)
        }
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
