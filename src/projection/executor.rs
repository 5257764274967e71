// Copyright (c) 2025 - Cowboy AI, Inc.
//! Plan Executor
//!
//! Interprets the [`GraphOp`]s produced by the planner against a
//! [`GraphStore`].
//!
//! # Failure Semantics
//!
//! ```text
//! op[0] ✓ → op[1] ✓ → op[2] ✗   op[3..] never attempted
//!                        │
//!                        └─> ExecutionError { index: 2, applied: [op0, op1] }
//! ```
//!
//! Applied ops are never rolled back. Redelivering the same event re-runs the
//! whole plan, and idempotent upserts make the retry converge.

use serde::Serialize;
use tracing::{debug, warn};

use super::GraphOp;
use crate::errors::StoreError;
use crate::store::{DeleteOutcome, GraphStore, UpsertOutcome};

/// What a single applied op did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OpOutcome {
    Upserted(UpsertOutcome),
    PropertiesWritten(usize),
    Deleted(DeleteOutcome),
}

/// An op together with its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOp {
    pub op: GraphOp,
    pub outcome: OpOutcome,
}

/// Outcome of every op applied so far, in plan order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub applied: Vec<AppliedOp>,
}

impl ExecutionReport {
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = OpOutcome> + '_ {
        self.applied.iter().map(|a| a.outcome)
    }

    pub fn nodes_created(&self) -> usize {
        self.count(|a| {
            matches!(a.op, GraphOp::UpsertNode { .. })
                && a.outcome == OpOutcome::Upserted(UpsertOutcome::Created)
        })
    }

    pub fn edges_created(&self) -> usize {
        self.count(|a| {
            matches!(a.op, GraphOp::UpsertEdge { .. })
                && a.outcome == OpOutcome::Upserted(UpsertOutcome::Created)
        })
    }

    pub fn nodes_removed(&self) -> usize {
        self.count(|a| {
            matches!(a.op, GraphOp::DeleteNode { .. })
                && a.outcome == OpOutcome::Deleted(DeleteOutcome::Removed)
        })
    }

    pub fn edges_removed(&self) -> usize {
        self.count(|a| {
            matches!(a.op, GraphOp::DeleteEdge { .. })
                && a.outcome == OpOutcome::Deleted(DeleteOutcome::Removed)
        })
    }

    fn count(&self, pred: impl Fn(&AppliedOp) -> bool) -> usize {
        self.applied.iter().filter(|a| pred(a)).count()
    }
}

/// A plan stopped at a failing op
#[derive(Debug, thiserror::Error)]
#[error("Graph op {index} ({op}) failed: {source}")]
pub struct ExecutionError {
    /// Position of the failing op in the plan
    pub index: usize,
    pub op: GraphOp,
    #[source]
    pub source: StoreError,
    /// Ops applied before the failure; they remain in the graph
    pub applied: ExecutionReport,
}

/// Apply a plan in order, stopping at the first failure
pub async fn execute_plan<S>(store: &S, plan: Vec<GraphOp>) -> Result<ExecutionReport, ExecutionError>
where
    S: GraphStore + ?Sized,
{
    let mut report = ExecutionReport::default();

    for (index, op) in plan.into_iter().enumerate() {
        match apply(store, &op).await {
            Ok(outcome) => {
                debug!("Applied {} -> {:?}", op, outcome);
                report.applied.push(AppliedOp { op, outcome });
            }
            Err(source) => {
                warn!(
                    "Graph op {} ({}) failed on {}: {}",
                    index,
                    op,
                    store.name(),
                    source
                );
                return Err(ExecutionError {
                    index,
                    op,
                    source,
                    applied: report,
                });
            }
        }
    }

    Ok(report)
}

/// Apply a single op
pub async fn apply<S>(store: &S, op: &GraphOp) -> Result<OpOutcome, StoreError>
where
    S: GraphStore + ?Sized,
{
    Ok(match op {
        GraphOp::UpsertNode { id, label, name } => OpOutcome::Upserted(
            store
                .upsert_node(id.as_str(), label.as_str(), name)
                .await?,
        ),
        GraphOp::SetProperties { id, props } => {
            OpOutcome::PropertiesWritten(store.set_properties(id.as_str(), props).await?)
        }
        GraphOp::UpsertEdge { from, to, label } => OpOutcome::Upserted(
            store
                .upsert_edge(from.as_str(), to.as_str(), label)
                .await?,
        ),
        GraphOp::DeleteNode { id } => OpOutcome::Deleted(store.delete_node(id.as_str()).await?),
        GraphOp::DeleteEdge { from, to, label } => OpOutcome::Deleted(
            store
                .delete_edge(from.as_str(), to.as_str(), label)
                .await?,
        ),
    })
}
