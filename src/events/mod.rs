// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration Change Events
//!
//! Typed representation of incoming change notifications.
//!
//! # Event Flow
//!
//! ```text
//! Trigger → InvocationEnvelope → decode → ChangeEvent → planner → GraphOps
//! ```
//!
//! # Module Organization
//!
//! - [`value`] - property-bag values (exact decimals, recognized timestamps)
//! - [`change_event`] - configuration item, status, diff
//! - [`decode`] - envelope and invoking-event decoding

pub mod change_event;
pub mod decode;
pub mod value;

pub use change_event::{
    ChangeEvent, ChangeType, ConfigurationDiff, ConfigurationItem, DiffEntry, ItemStatus,
};
pub use decode::{decode_envelope, decode_invoking_event, InvocationEnvelope};
pub use value::{canonical_timestamp, parse_timestamp, PropertyMap, PropertyValue};
