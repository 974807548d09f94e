//! Resolves a user type name to the id of its profile schema document.

use super::identity_api::IdentityApi;
use crate::models::UserType;
use schema_core::error::{Result, SchemaError};

/// Name that selects the tenant's default user type.
pub const DEFAULT_USER_TYPE: &str = "default";

/// Whether `user_type` answers to `name`.
///
/// `"default"` matches the type flagged as the tenant default as well as a
/// type literally named `default`.
pub fn matches_name(user_type: &UserType, name: &str) -> bool {
    user_type.name == name || (name == DEFAULT_USER_TYPE && user_type.default)
}

/// Find the user type called `name`.
pub async fn find_user_type(api: &dyn IdentityApi, name: &str) -> Result<UserType> {
    let user_types = api.list_user_types().await?;

    user_types
        .into_iter()
        .find(|ut| matches_name(ut, name))
        .ok_or_else(|| SchemaError::NotFound(format!("unable to find user type named {}", name)))
}

/// Schema document id of the user type called `name`.
pub async fn resolve_schema_id(api: &dyn IdentityApi, name: &str) -> Result<String> {
    let user_type = find_user_type(api, name).await?;
    let schema_id = user_type.schema_id()?;

    tracing::debug!(user_type = %name, schema_id = %schema_id, "resolved user type schema");
    Ok(schema_id)
}
