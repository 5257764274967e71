// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property Flattening
//!
//! Separates a configuration item's property bag into facts about the item
//! itself (scalar node properties) and references to other resources
//! (implicit relations that become nodes and edges).
//!
//! Every key is classified once through a static table:
//!
//! ```text
//! key ──classify──> Scalar                    → stringified if truthy
//!               └─> Container(Relationships)  → ImplicitRelation per record
//!               └─> Container(Configuration)  → one level of scalar flattening
//!               └─> Container(_)              → ignored
//! ```

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::{ImplicitRelation, ResourceId, ResourceType};
use crate::errors::{ConfigGraphError, ConfigGraphResult};
use crate::events::{ConfigurationItem, PropertyMap, PropertyValue};
use crate::store::is_reserved_property;

/// Structured property-bag keys that never become scalar properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Groups,
    CidrBlockAssociationSet,
    Ipv6CidrBlockAssociationSet,
    Relationships,
    RelatedEvents,
    RolePolicyList,
    InstanceProfileList,
    Configuration,
    SupplementaryConfiguration,
    PolicyVersionList,
    IpPermissions,
    IpPermissionsEgress,
    PrivateIpAddresses,
    Tags,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 14] = [
        ContainerKind::Groups,
        ContainerKind::CidrBlockAssociationSet,
        ContainerKind::Ipv6CidrBlockAssociationSet,
        ContainerKind::Relationships,
        ContainerKind::RelatedEvents,
        ContainerKind::RolePolicyList,
        ContainerKind::InstanceProfileList,
        ContainerKind::Configuration,
        ContainerKind::SupplementaryConfiguration,
        ContainerKind::PolicyVersionList,
        ContainerKind::IpPermissions,
        ContainerKind::IpPermissionsEgress,
        ContainerKind::PrivateIpAddresses,
        ContainerKind::Tags,
    ];

    /// Property-bag key for this container
    pub fn key(&self) -> &'static str {
        match self {
            ContainerKind::Groups => "groups",
            ContainerKind::CidrBlockAssociationSet => "cidrBlockAssociationSet",
            ContainerKind::Ipv6CidrBlockAssociationSet => "ipv6CidrBlockAssociationSet",
            ContainerKind::Relationships => "relationships",
            ContainerKind::RelatedEvents => "relatedEvents",
            ContainerKind::RolePolicyList => "rolePolicyList",
            ContainerKind::InstanceProfileList => "instanceProfileList",
            ContainerKind::Configuration => "configuration",
            ContainerKind::SupplementaryConfiguration => "supplementaryConfiguration",
            ContainerKind::PolicyVersionList => "policyVersionList",
            ContainerKind::IpPermissions => "ipPermissions",
            ContainerKind::IpPermissionsEgress => "ipPermissionsEgress",
            ContainerKind::PrivateIpAddresses => "privateIpAddresses",
            ContainerKind::Tags => "tags",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "groups" => ContainerKind::Groups,
            "cidrBlockAssociationSet" => ContainerKind::CidrBlockAssociationSet,
            "ipv6CidrBlockAssociationSet" => ContainerKind::Ipv6CidrBlockAssociationSet,
            "relationships" => ContainerKind::Relationships,
            "relatedEvents" => ContainerKind::RelatedEvents,
            "rolePolicyList" => ContainerKind::RolePolicyList,
            "instanceProfileList" => ContainerKind::InstanceProfileList,
            "configuration" => ContainerKind::Configuration,
            "supplementaryConfiguration" => ContainerKind::SupplementaryConfiguration,
            "policyVersionList" => ContainerKind::PolicyVersionList,
            "ipPermissions" => ContainerKind::IpPermissions,
            "ipPermissionsEgress" => ContainerKind::IpPermissionsEgress,
            "privateIpAddresses" => ContainerKind::PrivateIpAddresses,
            "tags" => ContainerKind::Tags,
            _ => return None,
        })
    }
}

/// Classification of a property-bag key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar,
    Container(ContainerKind),
}

/// Classify a property-bag key
pub fn classify(key: &str) -> PropertyKind {
    match ContainerKind::from_key(key) {
        Some(kind) => PropertyKind::Container(kind),
        None => PropertyKind::Scalar,
    }
}

/// Output of [`flatten`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    pub scalar_properties: BTreeMap<String, String>,
    pub implicit_relations: Vec<ImplicitRelation>,
}

/// Flatten a configuration item's property bag
///
/// Lists and maps outside `relationships` and `configuration` are dropped, as
/// are falsy scalars and the node's own `id` and `resourceName` keys. A null relationship target is skipped; a relationship
/// record missing its type or name is an error.
pub fn flatten(item: &ConfigurationItem) -> ConfigGraphResult<Flattened> {
    let mut flattened = Flattened::default();

    for (key, value) in item.properties.iter() {
        match classify(key) {
            PropertyKind::Scalar => write_scalar(&mut flattened.scalar_properties, key, value),
            PropertyKind::Container(ContainerKind::Relationships) => {
                extract_relations(&item.id, value, &mut flattened.implicit_relations)?
            }
            PropertyKind::Container(ContainerKind::Configuration) => {
                flatten_configuration(&item.id, value, &mut flattened.scalar_properties)
            }
            PropertyKind::Container(_) => {}
        }
    }

    debug!(
        resource_id = %item.id,
        properties = flattened.scalar_properties.len(),
        relations = flattened.implicit_relations.len(),
        "Flattened configuration item"
    );

    Ok(flattened)
}

fn write_scalar(props: &mut BTreeMap<String, String>, key: &str, value: &PropertyValue) {
    // Name is fixed by the creating upsert
    if is_reserved_property(key) || !value.is_scalar() || !value.is_truthy() {
        return;
    }
    if let Some(rendered) = value.to_property_string() {
        props.insert(key.to_string(), rendered);
    }
}

fn flatten_configuration(
    resource_id: &ResourceId,
    value: &PropertyValue,
    props: &mut BTreeMap<String, String>,
) {
    let Some(configuration) = value.as_map() else {
        if !value.is_null() {
            debug!(resource_id = %resource_id, "configuration is not a mapping, skipping");
        }
        return;
    };

    for (key, sub_value) in configuration.iter() {
        if classify(key) == PropertyKind::Scalar {
            write_scalar(props, key, sub_value);
        }
    }
}

fn extract_relations(
    source_id: &ResourceId,
    value: &PropertyValue,
    relations: &mut Vec<ImplicitRelation>,
) -> ConfigGraphResult<()> {
    let records = match value {
        PropertyValue::List(records) => records,
        PropertyValue::Null => return Ok(()),
        _ => {
            return Err(malformed(source_id, "relationships is not a sequence"));
        }
    };

    for (index, record) in records.iter().enumerate() {
        let Some(record) = record.as_map() else {
            return Err(malformed(
                source_id,
                &format!("relationships[{}] is not a record", index),
            ));
        };

        let Some(target_id) = relation_field(record, "resourceId") else {
            warn!(
                resource_id = %source_id,
                index,
                "Relationship without target resource id, skipping"
            );
            continue;
        };
        let target_type = relation_field(record, "resourceType").ok_or_else(|| {
            malformed(
                source_id,
                &format!("relationships[{}] has no resourceType", index),
            )
        })?;
        let edge_label = relation_field(record, "name").ok_or_else(|| {
            malformed(source_id, &format!("relationships[{}] has no name", index))
        })?;

        relations.push(ImplicitRelation {
            target_id: ResourceId::new(target_id),
            target_type: ResourceType::new(target_type),
            edge_label: edge_label.to_string(),
            source_id: source_id.clone(),
        });
    }

    Ok(())
}

fn relation_field<'a>(record: &'a PropertyMap, field: &str) -> Option<&'a str> {
    record.get(field).and_then(PropertyValue::as_str)
}

fn malformed(resource_id: &ResourceId, reason: &str) -> ConfigGraphError {
    ConfigGraphError::MalformedRelationship {
        resource_id: resource_id.to_string(),
        reason: reason.to_string(),
    }
}
