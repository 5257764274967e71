// Copyright (c) 2025 - Cowboy AI, Inc.

//! Neo4j Graph Store
//!
//! Implements [`GraphStore`] on a Neo4j database over Bolt.
//!
//! # Graph Model
//!
//! ## Nodes
//! Every resource node carries the shared `ConfigurationItem` label (unique on
//! `id`) plus its normalized resource type as a second label:
//!
//! ```text
//! (:ConfigurationItem:`AWS-EC2-Instance` {id: "i-1", resourceName: "web1", ...})
//! ```
//!
//! ## Relationships
//! Relationship names from the configuration item become relationship types
//! verbatim:
//!
//! ```text
//! (i-1)-[:`Is associated with SecurityGroup`]->(sg-1)
//! ```
//!
//! # Atomic Upserts
//!
//! Upserts are a single `MERGE` under the `id` uniqueness constraint, so
//! concurrent invocations for the same new resource create one node. A
//! transient `_created` marker set `ON CREATE` and removed in the same
//! statement reports which branch ran.
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_config_graph::adapters::Neo4jGraphStore;
//! use cim_config_graph::config::GraphConfig;
//! use cim_config_graph::store::GraphStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Neo4jGraphStore::connect(GraphConfig::from_env()?).await?;
//!     store.initialize().await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::GraphConfig;
use crate::errors::StoreError;
use crate::store::{
    is_reserved_property, DeleteOutcome, GraphStore, StoreResult, UpsertOutcome,
    RESOURCE_NAME_PROPERTY,
};

/// Label shared by every resource node
pub const NODE_LABEL: &str = "ConfigurationItem";

/// Transient property marking the `ON CREATE` branch of an upsert
const CREATED_MARKER: &str = "_created";

/// Neo4j-backed graph store
pub struct Neo4jGraphStore {
    graph: Arc<Graph>,
    config: GraphConfig,
}

impl Neo4jGraphStore {
    /// Connect once; the returned store is shared by every invocation
    pub async fn connect(config: GraphConfig) -> StoreResult<Self> {
        info!("Connecting to Neo4j at {}", config.uri);

        let bolt_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database())
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let graph = Graph::connect(bolt_config)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Neo4j: {}", e)))?;

        Ok(Self {
            graph: Arc::new(graph),
            config,
        })
    }

    /// Wrap an existing connection
    pub fn from_graph(graph: Arc<Graph>, config: GraphConfig) -> Self {
        Self { graph, config }
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    async fn fetch_bool(&self, query: Query, column: &str) -> StoreResult<Option<bool>> {
        let mut rows = self.graph.execute(query).await?;
        match rows.next().await? {
            Some(row) => {
                let value: bool = row
                    .get(column)
                    .map_err(|e| StoreError::Database(format!("Bad `{}` column: {}", column, e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn fetch_count(&self, query: Query, column: &str) -> StoreResult<i64> {
        let mut rows = self.graph.execute(query).await?;
        match rows.next().await? {
            Some(row) => row
                .get(column)
                .map_err(|e| StoreError::Database(format!("Bad `{}` column: {}", column, e))),
            None => Ok(0),
        }
    }
}

/// Backtick-quote a label or relationship type
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Parameters for `SET n += $props`
///
/// `+=` would overwrite the node key or name like any other entry, so reserved
/// keys and the create marker are left out.
fn property_params(props: &BTreeMap<String, String>) -> HashMap<String, String> {
    props
        .iter()
        .filter(|(key, _)| !is_reserved_property(key) && key.as_str() != CREATED_MARKER)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn upsert_node_cypher(label: &str) -> String {
    format!(
        r#"
        MERGE (n:{node} {{id: $id}})
        ON CREATE SET n:{label}, n.{name_prop} = $name, n.{marker} = true
        WITH n, coalesce(n.{marker}, false) AS created
        REMOVE n.{marker}
        RETURN created
        "#,
        node = NODE_LABEL,
        label = quote_identifier(label),
        name_prop = RESOURCE_NAME_PROPERTY,
        marker = CREATED_MARKER,
    )
}

fn set_properties_cypher() -> String {
    format!(
        r#"
        MATCH (n:{node} {{id: $id}})
        SET n += $props
        RETURN count(n) AS matched
        "#,
        node = NODE_LABEL,
    )
}

fn upsert_edge_cypher(label: &str) -> String {
    format!(
        r#"
        MATCH (a:{node} {{id: $from}})
        MATCH (b:{node} {{id: $to}})
        MERGE (a)-[r:{rel}]->(b)
        ON CREATE SET r.{marker} = true
        WITH r, coalesce(r.{marker}, false) AS created
        REMOVE r.{marker}
        RETURN created
        "#,
        node = NODE_LABEL,
        rel = quote_identifier(label),
        marker = CREATED_MARKER,
    )
}

fn delete_node_cypher() -> String {
    format!(
        r#"
        MATCH (n:{node} {{id: $id}})
        DETACH DELETE n
        RETURN count(*) AS removed
        "#,
        node = NODE_LABEL,
    )
}

fn delete_edge_cypher(label: &str) -> String {
    format!(
        r#"
        MATCH (:{node} {{id: $from}})-[r:{rel}]->(:{node} {{id: $to}})
        DELETE r
        RETURN count(*) AS removed
        "#,
        node = NODE_LABEL,
        rel = quote_identifier(label),
    )
}

fn upsert_outcome(created: bool) -> UpsertOutcome {
    if created {
        UpsertOutcome::Created
    } else {
        UpsertOutcome::AlreadyExisted
    }
}

fn delete_outcome(removed: i64) -> DeleteOutcome {
    if removed > 0 {
        DeleteOutcome::Removed
    } else {
        DeleteOutcome::Absent
    }
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn upsert_node(&self, id: &str, label: &str, name: &str) -> StoreResult<UpsertOutcome> {
        let query = Query::new(upsert_node_cypher(label))
            .param("id", id)
            .param("name", name);

        let created = self.fetch_bool(query, "created").await?.unwrap_or(false);
        debug!("Upserted node {} ({}): created={}", id, label, created);
        Ok(upsert_outcome(created))
    }

    async fn set_properties(&self, id: &str, props: &BTreeMap<String, String>) -> StoreResult<usize> {
        let params = property_params(props);
        let written = params.len();
        let query = Query::new(set_properties_cypher())
            .param("id", id)
            .param("props", params);

        if self.fetch_count(query, "matched").await? == 0 {
            return Err(StoreError::NodeNotFound(id.to_string()));
        }
        Ok(written)
    }

    async fn upsert_edge(&self, from: &str, to: &str, label: &str) -> StoreResult<UpsertOutcome> {
        let query = Query::new(upsert_edge_cypher(label))
            .param("from", from)
            .param("to", to);

        match self.fetch_bool(query, "created").await? {
            Some(created) => {
                debug!("Upserted edge {} -[{}]-> {}: created={}", from, label, to, created);
                Ok(upsert_outcome(created))
            }
            None => Err(StoreError::MissingEndpoint {
                from: from.to_string(),
                to: to.to_string(),
                label: label.to_string(),
            }),
        }
    }

    async fn delete_node(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let query = Query::new(delete_node_cypher()).param("id", id);
        let removed = self.fetch_count(query, "removed").await?;
        debug!("Deleted node {}: removed={}", id, removed);
        Ok(delete_outcome(removed))
    }

    async fn delete_edge(&self, from: &str, to: &str, label: &str) -> StoreResult<DeleteOutcome> {
        let query = Query::new(delete_edge_cypher(label))
            .param("from", from)
            .param("to", to);
        let removed = self.fetch_count(query, "removed").await?;
        debug!("Deleted edge {} -[{}]-> {}: removed={}", from, label, to, removed);
        Ok(delete_outcome(removed))
    }

    async fn initialize(&self) -> StoreResult<()> {
        info!("Initializing Neo4j schema for configuration graph");

        let statements = [
            format!(
                "CREATE CONSTRAINT configuration_item_id IF NOT EXISTS FOR (n:{}) REQUIRE n.id IS UNIQUE",
                NODE_LABEL
            ),
            format!(
                "CREATE INDEX configuration_item_name IF NOT EXISTS FOR (n:{}) ON (n.{})",
                NODE_LABEL, RESOURCE_NAME_PROPERTY
            ),
        ];

        for statement in statements {
            self.graph.run(Query::new(statement)).await?;
        }

        info!("Neo4j schema initialization complete");
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        self.graph
            .run(Query::new("RETURN 1".to_string()))
            .await
            .map_err(|e| StoreError::Connection(format!("Neo4j health check failed: {}", e)))?;

        debug!("Neo4j health check passed");
        Ok(())
    }

    fn name(&self) -> &str {
        "neo4j"
    }
}
