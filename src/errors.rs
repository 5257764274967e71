// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for configuration graph operations

use thiserror::Error;

use crate::projection::executor::ExecutionError;

/// Errors raised while turning a change notification into graph mutations
#[derive(Debug, Error)]
pub enum ConfigGraphError {
    /// The envelope or the invoking event is not valid JSON
    #[error("Decode error: {0}")]
    Decode(String),

    /// A required field is absent or has the wrong shape
    #[error("Missing or invalid field: {0}")]
    MissingField(String),

    /// A `relationships` entry cannot be turned into an edge
    #[error("Malformed relationship on {resource_id}: {reason}")]
    MalformedRelationship { resource_id: String, reason: String },

    /// Applying the mutation plan failed part way through
    #[error(transparent)]
    Execution(#[from] Box<ExecutionError>),
}

impl ConfigGraphError {
    /// Decode-class errors can never succeed on redelivery
    pub fn is_permanent(&self) -> bool {
        !matches!(self, ConfigGraphError::Execution(_))
    }
}

/// Result type for configuration graph operations
pub type ConfigGraphResult<T> = Result<T, ConfigGraphError>;

impl From<serde_json::Error> for ConfigGraphError {
    fn from(err: serde_json::Error) -> Self {
        ConfigGraphError::Decode(err.to_string())
    }
}

impl From<ExecutionError> for ConfigGraphError {
    fn from(err: ExecutionError) -> Self {
        ConfigGraphError::Execution(Box::new(err))
    }
}

/// Errors reported by a [`GraphStore`](crate::store::GraphStore) backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend is not reachable
    #[error("Graph connection error: {0}")]
    Connection(String),

    /// Query failed inside the backend
    #[error("Graph database error: {0}")]
    Database(String),

    /// Properties were written to a node that does not exist
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Edge upsert referenced an endpoint that does not exist
    #[error("Missing endpoint for edge {from} -[{label}]-> {to}")]
    MissingEndpoint {
        from: String,
        to: String,
        label: String,
    },

    /// In-memory state is unusable after a panic in another writer
    #[error("Graph store lock poisoned")]
    Poisoned,
}

#[cfg(feature = "neo4j")]
impl From<neo4rs::Error> for StoreError {
    fn from(err: neo4rs::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Errors loading process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable is set but unusable
    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}
