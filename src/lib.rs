//! Configuration graph for the Composable Information Machine
//!
//! Projects cloud configuration change notifications into a property graph:
//! resources become nodes, their scalar attributes become node properties,
//! and the resources they reference become related nodes joined by edges.
//!
//! ```text
//! invokingEvent ─decode─> ChangeEvent ─plan─> [GraphOp] ─execute─> GraphStore
//! ```
//!
//! Every graph mutation is idempotent, so at-least-once and out-of-order
//! delivery converge on the same graph.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod handler;
pub mod projection;
pub mod store;

// Re-export commonly used types
pub use config::{GraphConfig, ProjectorConfig};
pub use domain::{reformat_resource_type, ImplicitRelation, ResourceId, ResourceType};
pub use errors::{ConfigError, ConfigGraphError, ConfigGraphResult, StoreError};
pub use events::{ChangeEvent, ConfigurationItem, ItemStatus};
pub use handler::ChangeEventHandler;
pub use projection::{execute_plan, plan, ExecutionReport, GraphOp};
pub use store::{DeleteOutcome, GraphStore, InMemoryGraphStore, UpsertOutcome};
