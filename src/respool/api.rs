//! Resource pool wire types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque resource pool identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePoolId {
    pub value: String,
}

/// Slash separated resource pool path, e.g. `/IntegrationTestPool`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePoolPath {
    pub value: String,
}

/// Reservation, limit and share of one resource kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// `cpu`, `memory`, `disk` or `gpu`.
    pub kind: String,
    #[serde(default)]
    pub reservation: f64,
    #[serde(default)]
    pub limit: f64,
    #[serde(default)]
    pub share: f64,
}

/// Configuration used to create a resource pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePoolConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owning_team: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ldap_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ResourcePoolId>,
    /// Fields the harness forwards untouched (policy, controller limits...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupPoolRequest {
    pub path: ResourcePoolPath,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupPoolResponse {
    #[serde(default)]
    pub id: Option<ResourcePoolId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePoolRequest {
    pub config: ResourcePoolConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePoolResponse {
    #[serde(default)]
    pub result: Option<ResourcePoolId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePoolRequest {
    pub path: ResourcePoolPath,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePoolResponse {}

impl ResourcePoolId {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl ResourcePoolPath {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl fmt::Display for ResourcePoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Display for ResourcePoolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
