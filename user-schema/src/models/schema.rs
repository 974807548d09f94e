//! User profile schema documents.

use super::attribute::AttributeDefinition;
use schema_core::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which partition of a schema document a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionScope {
    /// Platform-defined attributes.
    Base,
    /// Tenant-defined attributes.
    Custom,
}

impl ResolutionScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionScope::Base => "base",
            ResolutionScope::Custom => "custom",
        }
    }
}

impl fmt::Display for ResolutionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionScope {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(ResolutionScope::Base),
            "custom" => Ok(ResolutionScope::Custom),
            other => Err(SchemaError::InvalidScope(other.to_string())),
        }
    }
}

/// Attribute definitions of one partition, keyed by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, AttributeDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinitions {
    #[serde(default)]
    pub base: AttributeGroup,
    #[serde(default)]
    pub custom: AttributeGroup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub definitions: SchemaDefinitions,
}

impl SchemaDocument {
    pub fn group(&self, scope: ResolutionScope) -> &AttributeGroup {
        match scope {
            ResolutionScope::Base => &self.definitions.base,
            ResolutionScope::Custom => &self.definitions.custom,
        }
    }

    /// Custom attribute indexes, in key order.
    pub fn custom_indexes(&self) -> impl Iterator<Item = &str> {
        self.definitions.custom.properties.keys().map(String::as_str)
    }
}
