use schema_core::config::Config;
use schema_core::observability::init_tracing;
use user_schema::{sweeper, OktaClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_tracing("schema-sweeper", &config.log_level);

    let client = OktaClient::from_config(&config)?;
    tracing::info!(api_url = %client.api_url(), prefix = %config.sweep_prefix, "starting sweep");

    let report = sweeper::sweep_custom_properties(&client, &config.sweep_prefix).await?;
    for swept in &report.removed {
        tracing::info!(user_type = %swept.user_type, index = %swept.index, "removed");
    }

    Ok(())
}
