use super::identity_api::IdentityApi;
use super::{locator, resolver};
use crate::models::ResolutionScope;
use schema_core::error::Result;
use std::sync::Arc;

/// Answers whether a property is present in a user type's schema.
///
/// Every call fetches the schema document again. A failed fetch is returned
/// as an error and is never reported as "absent". A user type that no longer
/// exists holds no properties, so it answers `false`.
#[derive(Clone)]
pub struct ExistenceChecker {
    api: Arc<dyn IdentityApi>,
}

impl ExistenceChecker {
    pub fn new(api: Arc<dyn IdentityApi>) -> Self {
        Self { api }
    }

    pub async fn exists(
        &self,
        user_type: &str,
        index: &str,
        scope: ResolutionScope,
    ) -> Result<bool> {
        let schema_id = match locator::resolve_schema_id(self.api.as_ref(), user_type).await {
            Ok(id) => id,
            Err(e) if e.is_not_found() => {
                tracing::debug!(user_type = %user_type, index = %index, "user type is gone");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        let doc = self.api.get_user_schema(&schema_id).await?;
        let found = resolver::find(&doc, scope, index).is_some();

        tracing::debug!(
            user_type = %user_type,
            index = %index,
            scope = %scope,
            found,
            "checked schema property"
        );
        Ok(found)
    }

    /// Same as [`Self::exists`] with the scope given as `"base"` or `"custom"`.
    pub async fn exists_in(&self, user_type: &str, index: &str, scope: &str) -> Result<bool> {
        let scope: ResolutionScope = scope.parse()?;
        self.exists(user_type, index, scope).await
    }
}
