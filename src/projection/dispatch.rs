// Copyright (c) 2025 - Cowboy AI, Inc.
//! Status Dispatch
//!
//! Classifies a single change event into its handling path. There is no
//! memory between events: the item status alone decides the path.

use crate::events::{ChangeEvent, ItemStatus};

/// Handling path of one change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventPath {
    /// Upsert the item, its properties and related resources, then apply
    /// relationship removals from the diff
    Upsert,
    /// Remove the item's node and every incident edge
    Delete,
    /// Only relationship removals from the diff
    DiffOnly,
}

pub fn dispatch(event: &ChangeEvent) -> EventPath {
    classify_status(event.status())
}

pub fn classify_status(status: &ItemStatus) -> EventPath {
    match status {
        ItemStatus::Ok => EventPath::Upsert,
        ItemStatus::ResourceDeleted => EventPath::Delete,
        ItemStatus::Other(_) => EventPath::DiffOnly,
    }
}
