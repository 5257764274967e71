// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Type Graph Labels
//!
//! Cloud resource types arrive namespaced (`AWS::EC2::Instance`). The `::`
//! separator is not usable in a graph label, so every type is normalized into
//! a dash-separated label (`AWS-EC2-Instance`) before it reaches the graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace separator used by raw resource types
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Separator used in normalized labels
pub const LABEL_SEPARATOR: &str = "-";

/// Normalize a raw resource type into a graph label
///
/// Pure and idempotent: an already-normalized label passes through unchanged.
///
/// ```rust
/// use cim_config_graph::domain::reformat_resource_type;
///
/// assert_eq!(reformat_resource_type("AWS::EC2::Instance"), "AWS-EC2-Instance");
/// assert_eq!(reformat_resource_type("AWS-EC2-Instance"), "AWS-EC2-Instance");
/// ```
pub fn reformat_resource_type(raw: &str) -> String {
    raw.replace(NAMESPACE_SEPARATOR, LABEL_SEPARATOR)
}

/// Normalized resource type, safe to use as a node label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    /// Build a label from a raw (possibly namespaced) resource type
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(reformat_resource_type(raw.as_ref()))
    }

    /// The normalized label
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ResourceType {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for ResourceType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_type_normalized() {
        assert_eq!(reformat_resource_type("AWS::EC2::Instance"), "AWS-EC2-Instance");
        assert_eq!(
            ResourceType::new("AWS::EC2::SecurityGroup").as_str(),
            "AWS-EC2-SecurityGroup"
        );
    }

    #[test]
    fn test_normalization_idempotent() {
        let once = reformat_resource_type("AWS::IAM::Role");
        assert_eq!(reformat_resource_type(&once), once);
        assert_eq!(ResourceType::new(ResourceType::new("AWS::S3::Bucket").as_str()).as_str(), "AWS-S3-Bucket");
    }

    #[test]
    fn test_single_colon_untouched() {
        assert_eq!(reformat_resource_type("custom:thing"), "custom:thing");
        assert_eq!(reformat_resource_type(""), "");
    }

    #[test]
    fn test_serde_transparent() {
        let t = ResourceType::new("AWS::EC2::Subnet");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"AWS-EC2-Subnet\"");
    }
}
