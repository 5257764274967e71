// Copyright (c) 2025 - Cowboy AI, Inc.
//! Process configuration
//!
//! The graph endpoint is configured once per process and loaded from the
//! environment:
//!
//! | Variable         | Default                 |
//! |------------------|-------------------------|
//! | `NEO4J_URI`      | `bolt://localhost:7687` |
//! | `NEO4J_USER`     | `neo4j`                 |
//! | `NEO4J_PASSWORD` | empty (no auth)         |
//! | `NEO4J_DATABASE` | server default          |
//! | `NATS_URL`       | `localhost:4222`        |
//! | `NATS_STREAM`    | `CONFIG_EVENTS`         |
//! | `NATS_SUBJECT`   | `config.events.>`       |
//! | `NATS_CONSUMER`  | `config-graph-projector`|

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Connection settings for the graph database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Bolt URI (e.g., "bolt://localhost:7687")
    pub uri: String,

    /// Username for authentication
    pub user: String,

    /// Password for authentication
    pub password: String,

    /// Optional database name (defaults to "neo4j")
    pub database: Option<String>,
}

impl GraphConfig {
    pub fn new(uri: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Database name, "neo4j" if not set
    pub fn database(&self) -> &str {
        self.database.as_deref().unwrap_or("neo4j")
    }

    /// Load from `NEO4J_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let uri = lookup("NEO4J_URI").unwrap_or(defaults.uri);
        if !uri.contains("://") {
            return Err(ConfigError::InvalidVar {
                name: "NEO4J_URI",
                reason: format!("'{}' has no scheme", uri),
            });
        }

        Ok(Self {
            uri,
            user: lookup("NEO4J_USER").unwrap_or(defaults.user),
            password: lookup("NEO4J_PASSWORD").unwrap_or(defaults.password),
            database: lookup("NEO4J_DATABASE").filter(|db| !db.is_empty()),
        })
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: None,
        }
    }
}

/// Settings for the long-running projector service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// NATS server URL
    pub nats_url: String,
    /// JetStream stream holding invoking events
    pub stream_name: String,
    /// Subject filter the stream captures
    pub subject: String,
    /// Durable consumer name
    pub consumer_name: String,
    pub graph: GraphConfig,
}

impl ProjectorConfig {
    /// Load from `NATS_*` and `NEO4J_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let consumer_name =
            lookup("NATS_CONSUMER").unwrap_or_else(|| "config-graph-projector".to_string());
        if consumer_name.contains(['.', '*', '>', ' ']) {
            return Err(ConfigError::InvalidVar {
                name: "NATS_CONSUMER",
                reason: format!("'{}' is not a valid durable name", consumer_name),
            });
        }

        Ok(Self {
            nats_url: lookup("NATS_URL").unwrap_or_else(|| "localhost:4222".to_string()),
            stream_name: lookup("NATS_STREAM").unwrap_or_else(|| "CONFIG_EVENTS".to_string()),
            subject: lookup("NATS_SUBJECT").unwrap_or_else(|| "config.events.>".to_string()),
            consumer_name,
            graph: GraphConfig::from_lookup(&lookup)?,
        })
    }
}
