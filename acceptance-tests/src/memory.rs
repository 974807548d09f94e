//! In-memory stand-in for the identity API.
//!
//! Keeps user types and schema documents in a mutex and records every call,
//! so suites can run without a tenant and assert on traffic.

use async_trait::async_trait;
use schema_core::error::{Result, SchemaError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use user_schema::models::{
    AttributeDefinition, AttributeType, Link, SchemaDocument, UserType, UserTypeLinks,
    SCHEMA_PATH_PREFIX,
};
use user_schema::IdentityApi;

const FAKE_ORG_URL: &str = "https://fake.okta.test";

/// Name of the default user type seeded by [`InMemoryIdentityApi::new`].
pub const DEFAULT_TYPE_NAME: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListUserTypes,
    GetUserSchema(String),
    UpdateCustomProperty { schema_id: String, index: String },
    RemoveCustomProperty { schema_id: String, index: String },
}

/// How [`InMemoryIdentityApi`] answers removal requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalBehavior {
    #[default]
    Apply,
    /// Fail with a 403, leaving the property in place.
    Reject,
    /// Answer success without removing anything.
    Ignore,
    /// Remove the property, then fail every later call with a 503.
    ApplyThenUnavailable,
}

#[derive(Default)]
struct Inner {
    user_types: Vec<UserType>,
    schemas: HashMap<String, SchemaDocument>,
    calls: Vec<ApiCall>,
    unavailable: bool,
    removals: RemovalBehavior,
}

pub struct InMemoryIdentityApi {
    inner: Mutex<Inner>,
}

impl Default for InMemoryIdentityApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentityApi {
    /// A tenant with only the default user type.
    pub fn new() -> Self {
        let api = Self {
            inner: Mutex::new(Inner::default()),
        };
        api.insert_user_type(DEFAULT_TYPE_NAME, true);
        api
    }

    pub fn with_user_type(self, name: &str) -> Self {
        self.add_user_type(name);
        self
    }

    /// Add a non-default user type; returns its schema id.
    pub fn add_user_type(&self, name: &str) -> String {
        self.insert_user_type(name, false)
    }

    fn insert_user_type(&self, name: &str, default: bool) -> String {
        let schema_id = format!("osc_{}", name);
        let user_type = UserType {
            id: format!("oty_{}", name),
            name: name.to_string(),
            display_name: Some(name.to_string()),
            description: None,
            default,
            links: UserTypeLinks {
                schema: Some(Link {
                    href: format!("{}{}{}", FAKE_ORG_URL, SCHEMA_PATH_PREFIX, schema_id),
                }),
            },
        };

        let mut doc = SchemaDocument {
            id: format!("{}/meta/schemas/user/{}", FAKE_ORG_URL, schema_id),
            name: Some(name.to_string()),
            title: Some(format!("{} schema", name)),
            ..Default::default()
        };
        for (index, title) in [
            ("login", "Username"),
            ("email", "Primary email"),
            ("firstName", "First name"),
            ("lastName", "Last name"),
        ] {
            doc.definitions.base.properties.insert(
                index.to_string(),
                AttributeDefinition::new(AttributeType::String, title),
            );
        }
        doc.definitions.base.required = vec!["login".to_string(), "email".to_string()];

        let mut inner = self.lock();
        inner.user_types.push(user_type);
        inner.schemas.insert(schema_id.clone(), doc);
        schema_id
    }

    /// Drop a user type and its schema.
    pub fn remove_user_type(&self, name: &str) {
        let mut inner = self.lock();
        let schema_id = format!("osc_{}", name);
        inner.user_types.retain(|ut| ut.name != name);
        inner.schemas.remove(&schema_id);
    }

    /// Seed a custom property directly, bypassing call recording.
    pub fn seed_custom_property(&self, user_type: &str, index: &str, definition: AttributeDefinition) {
        let schema_id = format!("osc_{}", user_type);
        if let Some(doc) = self.lock().schemas.get_mut(&schema_id) {
            doc.definitions
                .custom
                .properties
                .insert(index.to_string(), definition);
        }
    }

    pub fn custom_property(&self, user_type: &str, index: &str) -> Option<AttributeDefinition> {
        let schema_id = format!("osc_{}", user_type);
        self.lock()
            .schemas
            .get(&schema_id)
            .and_then(|doc| doc.definitions.custom.properties.get(index).cloned())
    }

    /// When set, every call fails with a 503 API error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn set_removal_behavior(&self, behavior: RemovalBehavior) {
        self.lock().removals = behavior;
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// `(schema_id, index)` of every removal request, in order.
    pub fn removals(&self) -> Vec<(String, String)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::RemoveCustomProperty { schema_id, index } => {
                    Some((schema_id.clone(), index.clone()))
                }
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record `call`, then fail if the API is marked unavailable.
    fn begin(&self, call: ApiCall) -> Result<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.unavailable {
            return Err(SchemaError::Api {
                status: 503,
                code: "E0000010".to_string(),
                summary: "Service is in read only mode".to_string(),
            });
        }
        Ok(inner)
    }
}

fn schema_not_found(schema_id: &str) -> SchemaError {
    SchemaError::Api {
        status: 404,
        code: "E0000007".to_string(),
        summary: format!("Not found: Resource not found: {} (UserSchema)", schema_id),
    }
}

#[async_trait]
impl IdentityApi for InMemoryIdentityApi {
    async fn list_user_types(&self) -> Result<Vec<UserType>> {
        let inner = self.begin(ApiCall::ListUserTypes)?;
        Ok(inner.user_types.clone())
    }

    async fn get_user_schema(&self, schema_id: &str) -> Result<SchemaDocument> {
        let inner = self.begin(ApiCall::GetUserSchema(schema_id.to_string()))?;
        inner
            .schemas
            .get(schema_id)
            .cloned()
            .ok_or_else(|| schema_not_found(schema_id))
    }

    async fn update_custom_property(
        &self,
        schema_id: &str,
        index: &str,
        definition: &AttributeDefinition,
    ) -> Result<SchemaDocument> {
        let mut inner = self.begin(ApiCall::UpdateCustomProperty {
            schema_id: schema_id.to_string(),
            index: index.to_string(),
        })?;
        let doc = inner
            .schemas
            .get_mut(schema_id)
            .ok_or_else(|| schema_not_found(schema_id))?;
        doc.definitions
            .custom
            .properties
            .insert(index.to_string(), definition.clone());
        Ok(doc.clone())
    }

    async fn remove_custom_property(
        &self,
        schema_id: &str,
        index: &str,
    ) -> Result<SchemaDocument> {
        let mut inner = self.begin(ApiCall::RemoveCustomProperty {
            schema_id: schema_id.to_string(),
            index: index.to_string(),
        })?;
        let behavior = inner.removals;
        let doc = inner
            .schemas
            .get_mut(schema_id)
            .ok_or_else(|| schema_not_found(schema_id))?;
        match behavior {
            RemovalBehavior::Apply | RemovalBehavior::ApplyThenUnavailable => {
                doc.definitions.custom.properties.remove(index);
            }
            RemovalBehavior::Reject => {
                return Err(SchemaError::Api {
                    status: 403,
                    code: "E0000006".to_string(),
                    summary: "You do not have permission to perform the requested action"
                        .to_string(),
                })
            }
            RemovalBehavior::Ignore => {}
        }
        let doc = doc.clone();
        if behavior == RemovalBehavior::ApplyThenUnavailable {
            inner.unavailable = true;
        }
        Ok(doc)
    }
}
