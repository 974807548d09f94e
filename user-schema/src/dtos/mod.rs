//! Wire bodies for the schema endpoints that have no model counterpart.

use crate::models::{AttributeDefinition, ResolutionScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Partial schema update. A `None` property value serializes as `null`,
/// which removes the property.
#[derive(Debug, Serialize)]
pub struct SchemaUpdateRequest {
    pub definitions: UpdateDefinitions,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateDefinitions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<UpdateGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<UpdateGroup>,
}

#[derive(Debug, Serialize)]
pub struct UpdateGroup {
    pub id: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub properties: BTreeMap<String, Option<AttributeDefinition>>,
}

impl SchemaUpdateRequest {
    pub fn single(
        scope: ResolutionScope,
        index: &str,
        definition: Option<AttributeDefinition>,
    ) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(index.to_string(), definition);

        let group = UpdateGroup {
            id: format!("#{}", scope.as_str()),
            group_type: "object".to_string(),
            properties,
        };

        let definitions = match scope {
            ResolutionScope::Base => UpdateDefinitions {
                base: Some(group),
                custom: None,
            },
            ResolutionScope::Custom => UpdateDefinitions {
                base: None,
                custom: Some(group),
            },
        };

        Self { definitions }
    }
}

/// Error body returned by the identity API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub error_summary: String,
    #[serde(default)]
    pub error_id: Option<String>,
    #[serde(default)]
    pub error_causes: Vec<ApiErrorCause>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorCause {
    pub error_summary: String,
}

impl ApiErrorBody {
    /// Summary plus any causes, joined for display.
    pub fn describe(&self) -> String {
        if self.error_causes.is_empty() {
            return self.error_summary.clone();
        }
        let causes: Vec<&str> = self
            .error_causes
            .iter()
            .map(|c| c.error_summary.as_str())
            .collect();
        format!("{} ({})", self.error_summary, causes.join("; "))
    }
}
