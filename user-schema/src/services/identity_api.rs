use crate::models::{AttributeDefinition, SchemaDocument, UserType};
use async_trait::async_trait;
use schema_core::error::Result;

/// The identity-management endpoints this crate consumes.
///
/// Implemented over HTTP by [`super::okta::OktaClient`]; tests substitute
/// in-memory implementations.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn list_user_types(&self) -> Result<Vec<UserType>>;

    async fn get_user_schema(&self, schema_id: &str) -> Result<SchemaDocument>;

    /// Create or replace one custom property; returns the updated document.
    async fn update_custom_property(
        &self,
        schema_id: &str,
        index: &str,
        definition: &AttributeDefinition,
    ) -> Result<SchemaDocument>;

    async fn remove_custom_property(&self, schema_id: &str, index: &str)
        -> Result<SchemaDocument>;
}
