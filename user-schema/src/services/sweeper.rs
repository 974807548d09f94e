//! Removes custom properties left behind by interrupted test runs.

use super::identity_api::IdentityApi;
use schema_core::error::Result;

/// One removed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweptProperty {
    pub user_type: String,
    pub schema_id: String,
    pub index: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub user_types_scanned: usize,
    pub removed: Vec<SweptProperty>,
}

/// Remove every custom property whose index starts with `prefix`, across
/// all user types. The first failing call aborts the sweep.
pub async fn sweep_custom_properties(api: &dyn IdentityApi, prefix: &str) -> Result<SweepReport> {
    let mut report = SweepReport::default();

    for user_type in api.list_user_types().await? {
        let schema_id = user_type.schema_id()?;
        let doc = api.get_user_schema(&schema_id).await?;
        report.user_types_scanned += 1;

        let doomed: Vec<String> = doc
            .custom_indexes()
            .filter(|index| index.starts_with(prefix))
            .map(str::to_string)
            .collect();

        for index in doomed {
            api.remove_custom_property(&schema_id, &index).await?;
            tracing::info!(user_type = %user_type.name, index = %index, "swept custom property");
            report.removed.push(SweptProperty {
                user_type: user_type.name.clone(),
                schema_id: schema_id.clone(),
                index,
            });
        }
    }

    tracing::info!(
        user_types = report.user_types_scanned,
        removed = report.removed.len(),
        prefix = %prefix,
        "sweep finished"
    );
    Ok(report)
}
