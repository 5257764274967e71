// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-config-graph
//!
//! Deterministic change notifications shared by the integration tests.
//!
//! # Design Principles
//! - All ids and capture times are fixed constants
//! - Fixtures build the wire form (`{"invokingEvent": "..."}`) so tests
//!   exercise decoding as well as projection

#![allow(dead_code)]

use serde_json::{json, Value};

pub const INSTANCE_ID: &str = "i-1";
pub const INSTANCE_TYPE: &str = "AWS::EC2::Instance";
pub const SECURITY_GROUP_ID: &str = "sg-1";
pub const SECURITY_GROUP_TYPE: &str = "AWS::EC2::SecurityGroup";
pub const ASSOCIATION: &str = "IsAssociatedWith";

// Fixed capture time
pub const CAPTURE_TIME: &str = "2026-01-19T12:00:00.000Z";

/// Wrap an invoking event in the trigger envelope
pub fn envelope(invoking_event: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({ "invokingEvent": invoking_event.to_string() }))
        .expect("Invalid envelope in test fixture")
}

/// `{resourceId, resourceType, name}` relationship record
pub fn relationship(resource_id: &str, resource_type: &str, name: &str) -> Value {
    json!({ "resourceId": resource_id, "resourceType": resource_type, "name": name })
}

/// OK notification for `web1`, associated with one security group
pub fn instance_ok_fixture() -> Value {
    json!({
        "configurationItem": {
            "resourceId": INSTANCE_ID,
            "resourceType": INSTANCE_TYPE,
            "resourceName": "web1",
            "configurationItemStatus": "OK",
            "configurationItemCaptureTime": CAPTURE_TIME,
            "state": "running",
            "tags": [{"key": "env", "value": "prod"}],
            "relationships": [relationship(SECURITY_GROUP_ID, SECURITY_GROUP_TYPE, ASSOCIATION)]
        }
    })
}

/// OK notification for `web1` whose diff drops the security group association
pub fn instance_association_removed_fixture() -> Value {
    json!({
        "configurationItem": {
            "resourceId": INSTANCE_ID,
            "resourceType": INSTANCE_TYPE,
            "resourceName": "web1",
            "configurationItemStatus": "OK",
            "configurationItemCaptureTime": CAPTURE_TIME,
            "state": "running"
        },
        "configurationItemDiff": {
            "Relationships.0": {
                "changeType": "DELETE",
                "resourceId": SECURITY_GROUP_ID,
                "name": ASSOCIATION
            }
        }
    })
}

/// Direct OK notification for the security group, named and carrying an `id` attribute
pub fn security_group_ok_fixture() -> Value {
    json!({
        "configurationItem": {
            "resourceId": SECURITY_GROUP_ID,
            "resourceType": SECURITY_GROUP_TYPE,
            "resourceName": "default",
            "configurationItemStatus": "OK",
            "configurationItemCaptureTime": CAPTURE_TIME,
            "groupName": "default",
            "configuration": {"id": "sg-other", "description": "default VPC security group"}
        }
    })
}

/// Deletion notification for any resource
pub fn resource_deleted_fixture(resource_id: &str, resource_type: &str) -> Value {
    json!({
        "configurationItem": {
            "resourceId": resource_id,
            "resourceType": resource_type,
            "configurationItemStatus": "ResourceDeleted",
            "configurationItemCaptureTime": CAPTURE_TIME
        }
    })
}
