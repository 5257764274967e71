// Copyright (c) 2025 - Cowboy AI, Inc.
//! Change Event Handler
//!
//! Per-invocation entry point: decode → plan → execute. The handler owns a
//! shared [`GraphStore`] capability constructed once per process; each
//! invocation is otherwise self-contained.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ConfigGraphResult;
use crate::events::{decode_envelope, ChangeEvent};
use crate::projection::{execute_plan, plan, ExecutionReport};
use crate::store::GraphStore;

/// Applies change notifications to a graph store
pub struct ChangeEventHandler<S: GraphStore + ?Sized> {
    store: Arc<S>,
}

impl<S: GraphStore + ?Sized> Clone for ChangeEventHandler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: GraphStore + ?Sized> ChangeEventHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Handle a raw trigger envelope `{"invokingEvent": "..."}`
    ///
    /// Decode errors abort before anything is applied. Graph errors abort the
    /// remaining plan and leave earlier ops applied.
    pub async fn handle_invocation(&self, raw: &[u8]) -> ConfigGraphResult<ExecutionReport> {
        let event = decode_envelope(raw)?;
        self.handle_event(&event).await
    }

    /// Handle an already decoded change event
    pub async fn handle_event(&self, event: &ChangeEvent) -> ConfigGraphResult<ExecutionReport> {
        let invocation_id = Uuid::now_v7();
        let ops = plan(event)?;
        debug!(
            "Invocation {}: executing {} ops for {} against {}",
            invocation_id,
            ops.len(),
            event.item.id,
            self.store.name()
        );

        let report = execute_plan(self.store.as_ref(), ops).await?;

        info!(
            %invocation_id,
            resource_id = %event.item.id,
            status = %event.item.status,
            ops = report.len(),
            nodes_created = report.nodes_created(),
            edges_created = report.edges_created(),
            nodes_removed = report.nodes_removed(),
            edges_removed = report.edges_removed(),
            "Applied change event"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigGraphError;
    use crate::store::InMemoryGraphStore;
    use serde_json::json;

    fn envelope(inner: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({ "invokingEvent": inner.to_string() })).unwrap()
    }

    #[tokio::test]
    async fn test_handle_invocation() {
        let store = Arc::new(InMemoryGraphStore::new());
        let handler = ChangeEventHandler::new(Arc::clone(&store));

        let raw = envelope(json!({
            "configurationItem": {
                "resourceId": "vpc-1",
                "resourceType": "AWS::EC2::VPC",
                "resourceName": "main",
                "configurationItemStatus": "OK",
                "cidrBlockAssociationSet": [{"cidrBlock": "10.0.0.0/16"}]
            }
        }));

        let report = handler.handle_invocation(&raw).await.unwrap();
        assert_eq!(report.nodes_created(), 1);
        let node = store.node("vpc-1").unwrap();
        assert_eq!(node.label, "AWS-EC2-VPC");
        assert!(!node.properties.contains_key("cidrBlockAssociationSet"));
    }

    #[tokio::test]
    async fn test_decode_error_applies_nothing() {
        let store = Arc::new(InMemoryGraphStore::new());
        let handler = ChangeEventHandler::new(Arc::clone(&store));

        let err = handler.handle_invocation(b"{\"invokingEvent\": 3}").await.unwrap_err();
        assert!(matches!(err, ConfigGraphError::Decode(_)));
        assert!(err.is_permanent());
        assert_eq!(store.node_count(), 0);
    }

    #[tokio::test]
    async fn test_dyn_store() {
        let store: Arc<dyn GraphStore> = Arc::new(InMemoryGraphStore::new());
        let handler = ChangeEventHandler::new(store);

        let raw = envelope(json!({
            "configurationItem": {
                "resourceId": "i-9",
                "resourceType": "AWS::EC2::Instance",
                "configurationItemStatus": "ResourceDeleted"
            }
        }));
        let report = handler.handle_invocation(&raw).await.unwrap();
        assert_eq!(report.nodes_removed(), 0);
        assert_eq!(report.len(), 1);
    }
}
