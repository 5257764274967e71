// Copyright (c) 2025 - Cowboy AI, Inc.

//! Graph store backends
//!
//! Concrete [`GraphStore`](crate::store::GraphStore) implementations for
//! remote graph databases.

#[cfg(feature = "neo4j")]
pub mod neo4j;

#[cfg(feature = "neo4j")]
pub use neo4j::Neo4jGraphStore;
