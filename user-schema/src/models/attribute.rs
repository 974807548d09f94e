//! Attribute definitions as returned by the user schema endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Data type of a profile attribute (or of the items of an array attribute).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    #[default]
    String,
    Boolean,
    Number,
    Integer,
    Array,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Boolean => "boolean",
            AttributeType::Number => "number",
            AttributeType::Integer => "integer",
            AttributeType::Array => "array",
        }
    }

    /// Convert a textual enum/const value into the JSON shape this type
    /// expects on the wire. Returns `None` if `raw` does not parse.
    pub fn coerce(&self, raw: &str) -> Option<Value> {
        match self {
            AttributeType::String | AttributeType::Array => Some(Value::String(raw.to_string())),
            AttributeType::Boolean => raw.parse::<bool>().ok().map(Value::Bool),
            AttributeType::Integer => raw.parse::<i64>().ok().map(Value::from),
            AttributeType::Number => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(AttributeType::String),
            "boolean" => Ok(AttributeType::Boolean),
            "number" => Ok(AttributeType::Number),
            "integer" => Ok(AttributeType::Integer),
            "array" => Ok(AttributeType::Array),
            other => Err(format!("unknown attribute type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionAction {
    ReadOnly,
    ReadWrite,
    Hide,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::ReadOnly => "READ_ONLY",
            PermissionAction::ReadWrite => "READ_WRITE",
            PermissionAction::Hide => "HIDE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub principal: String,
    pub action: PermissionAction,
}

impl Permission {
    pub const SELF_PRINCIPAL: &'static str = "SELF";

    pub fn for_self(action: PermissionAction) -> Self {
        Self {
            principal: Self::SELF_PRINCIPAL.to_string(),
            action,
        }
    }
}

/// Which system is authoritative for the attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MasterType {
    ProfileMaster,
    Okta,
    Override,
}

impl MasterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasterType::ProfileMaster => "PROFILE_MASTER",
            MasterType::Okta => "OKTA",
            MasterType::Override => "OVERRIDE",
        }
    }
}

/// One entry of an OVERRIDE master priority list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterPriority {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Master {
    #[serde(rename = "type")]
    pub kind: MasterType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub priority: Vec<MasterPriority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneOf {
    #[serde(rename = "const")]
    pub value: Value,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyScope {
    #[serde(rename = "SELF")]
    SelfOnly,
    #[serde(rename = "NONE")]
    Unscoped,
}

impl PropertyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyScope::SelfOnly => "SELF",
            PropertyScope::Unscoped => "NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Uniqueness {
    UniqueValidated,
    NotUnique,
}

impl Uniqueness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Uniqueness::UniqueValidated => "UNIQUE_VALIDATED",
            Uniqueness::NotUnique => "NOT_UNIQUE",
        }
    }
}

/// Item constraints of an array attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayItems {
    #[serde(rename = "type")]
    pub item_type: AttributeType,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<OneOf>>,
}

/// One profile field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<OneOf>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<Master>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ArrayItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<PropertyScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<Uniqueness>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_namespace: Option<String>,
}

impl AttributeDefinition {
    pub fn new(attr_type: AttributeType, title: impl Into<String>) -> Self {
        Self {
            attr_type,
            title: title.into(),
            description: None,
            required: None,
            min_length: None,
            max_length: None,
            enum_values: None,
            one_of: None,
            permissions: Vec::new(),
            master: None,
            items: None,
            pattern: None,
            scope: None,
            unique: None,
            external_name: None,
            external_namespace: None,
        }
    }

    /// Action granted to the `SELF` principal, if any.
    pub fn self_permission(&self) -> Option<PermissionAction> {
        self.permissions
            .iter()
            .find(|p| p.principal == Permission::SELF_PRINCIPAL)
            .map(|p| p.action)
    }
}

/// Render a JSON scalar the way flattened state stores it.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
