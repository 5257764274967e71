// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Change Event Projection
//!
//! These tests generate configuration items with arbitrary scalar
//! attributes, structured attributes and relationship lists, and check the
//! properties the projected graph must satisfy for all of them.

use cim_config_graph::events::{decode_invoking_event, ChangeEvent};
use cim_config_graph::projection::{classify, flatten, PropertyKind};
use cim_config_graph::store::memory::StoredNode;
use cim_config_graph::{
    execute_plan, plan, reformat_resource_type, InMemoryGraphStore, ResourceType,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ============================================================================
// Property Test Strategies
// ============================================================================

const RESERVED_KEYS: [&str; 4] = [
    "resourceId",
    "resourceType",
    "resourceName",
    "configurationItemStatus",
];

const TARGET_TYPES: [&str; 4] = [
    "AWS::EC2::SecurityGroup",
    "AWS::EC2::Subnet",
    "AWS::EC2::Volume",
    "AWS::IAM::Role",
];

const EDGE_LABELS: [&str; 3] = [
    "IsAssociatedWith",
    "Is contained in Subnet",
    "Is attached to Volume",
];

/// Keys that classify as scalar and do not collide with item identity
fn scalar_key() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z]{0,10}".prop_filter("scalar, non-reserved key", |key| {
        classify(key) == PropertyKind::Scalar && !RESERVED_KEYS.contains(&key.as_str())
    })
}

fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        "[a-z0-9 .-]{0,12}".prop_map(Value::String),
    ]
}

fn nested_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        prop::collection::vec(scalar_value(), 0..4).prop_map(Value::Array),
        prop::collection::btree_map("[a-z]{1,6}", scalar_value(), 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect())),
    ]
}

fn relationship() -> impl Strategy<Value = Value> {
    (
        "[a-z]{2,3}-[0-9]{1,2}",
        prop::sample::select(TARGET_TYPES.to_vec()),
        prop::sample::select(EDGE_LABELS.to_vec()),
    )
        .prop_map(|(id, resource_type, name)| {
            json!({ "resourceId": id, "resourceType": resource_type, "name": name })
        })
}

/// An OK change event with a generated property bag
fn ok_event() -> impl Strategy<Value = ChangeEvent> {
    (
        prop::collection::btree_map(scalar_key(), scalar_value(), 0..8),
        prop::collection::vec(relationship(), 0..6),
    )
        .prop_map(|(scalars, relationships)| {
            let mut item: Map<String, Value> = scalars.into_iter().collect();
            item.insert("resourceId".into(), json!("i-1"));
            item.insert("resourceType".into(), json!("AWS::EC2::Instance"));
            item.insert("resourceName".into(), json!("web1"));
            item.insert("configurationItemStatus".into(), json!("OK"));
            item.insert("relationships".into(), Value::Array(relationships));
            decode_invoking_event(&json!({ "configurationItem": item }).to_string())
                .expect("generated event decodes")
        })
}

fn falsy_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!(false)),
        Just(json!(0)),
        Just(json!(0.0)),
        Just(json!("")),
        Just(json!([])),
        Just(json!({})),
    ]
}

fn single_property_event(key: &str, value: Value) -> ChangeEvent {
    let mut item = Map::new();
    item.insert("resourceId".into(), json!("r-1"));
    item.insert("resourceType".into(), json!("AWS::S3::Bucket"));
    item.insert("configurationItemStatus".into(), json!("OK"));
    item.insert(key.to_string(), value);
    decode_invoking_event(&json!({ "configurationItem": item }).to_string())
        .expect("generated event decodes")
}

fn type_segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}"
}

type Snapshot = (Vec<Option<StoredNode>>, Vec<(String, String, String)>);

fn snapshot(store: &InMemoryGraphStore) -> Snapshot {
    let nodes = store.node_ids().iter().map(|id| store.node(id)).collect();
    (nodes, store.edges())
}

fn apply(store: &InMemoryGraphStore, event: &ChangeEvent) {
    let ops = plan(event).expect("generated event plans");
    tokio_test::block_on(execute_plan(store, ops)).expect("in-memory plan applies");
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Normalization is deterministic and idempotent
    ///
    /// `::` separators always become `-`, and normalizing a normalized type
    /// changes nothing.
    #[test]
    fn prop_normalization_is_idempotent(segments in prop::collection::vec(type_segment(), 1..5)) {
        let raw = segments.join("::");
        let once = reformat_resource_type(&raw);

        prop_assert_eq!(&once, &segments.join("-"));
        prop_assert!(!once.contains("::"));
        prop_assert_eq!(reformat_resource_type(&once), once.clone());
        let normalized = ResourceType::new(&raw);
        prop_assert_eq!(normalized.as_str(), once.as_str());
    }

    /// Property: Structured values never become node properties
    ///
    /// A list or mapping under any key other than `configuration` or
    /// `relationships` is excluded from the scalar properties.
    #[test]
    fn prop_structured_values_are_excluded(key in scalar_key(), value in nested_value()) {
        let event = single_property_event(&key, value);
        let flattened = flatten(&event.item).expect("flattens");

        prop_assert!(!flattened.scalar_properties.contains_key(&key));
    }

    /// Property: Falsy scalars are never written
    #[test]
    fn prop_falsy_scalars_are_dropped(key in scalar_key(), value in falsy_value()) {
        let event = single_property_event(&key, value);
        let flattened = flatten(&event.item).expect("flattens");

        prop_assert!(!flattened.scalar_properties.contains_key(&key));
    }

    /// Property: Applying an OK event twice equals applying it once
    #[test]
    fn prop_ok_event_is_idempotent(event in ok_event()) {
        let store = InMemoryGraphStore::new();

        apply(&store, &event);
        let once = snapshot(&store);
        apply(&store, &event);

        prop_assert_eq!(once, snapshot(&store));
    }

    /// Property: Planning is pure
    ///
    /// The same event always yields the same ops.
    #[test]
    fn prop_plan_is_deterministic(event in ok_event()) {
        prop_assert_eq!(plan(&event).expect("plans"), plan(&event).expect("plans"));
    }

    /// Property: Deleting a resource leaves no dangling edges
    #[test]
    fn prop_deletion_cascades(event in ok_event()) {
        let store = InMemoryGraphStore::new();
        apply(&store, &event);

        let mut deleted = event.clone();
        deleted.item.status = cim_config_graph::ItemStatus::ResourceDeleted;
        apply(&store, &deleted);

        prop_assert!(store.node("i-1").is_none());
        prop_assert!(store
            .edges()
            .iter()
            .all(|(from, to, _)| from != "i-1" && to != "i-1"));
    }
}
