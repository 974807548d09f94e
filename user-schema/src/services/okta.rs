//! HTTP client for the user type and user schema endpoints.

use super::identity_api::IdentityApi;
use crate::dtos::{ApiErrorBody, SchemaUpdateRequest};
use crate::models::{AttributeDefinition, ResolutionScope, SchemaDocument, UserType};
use async_trait::async_trait;
use reqwest::{Client, Response};
use schema_core::config::Config;
use schema_core::error::{Result, SchemaError};
use schema_core::observability::TracedClientExt;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct OktaClient {
    client: Client,
    api_url: String,
    api_token: Secret<String>,
    timeout: Duration,
}

impl OktaClient {
    pub fn new(api_url: impl Into<String>, api_token: Secret<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_token,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.api_url()?,
            config.api_token.clone(),
            config.request_timeout(),
        ))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn authorization(&self) -> String {
        format!("SSWS {}", self.api_token.expose_secret())
    }

    fn schema_url(&self, schema_id: &str) -> String {
        format!("{}/api/v1/meta/schemas/user/{}", self.api_url, schema_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .traced_get(url)
            .header("Authorization", &self.authorization())
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send GET request to {}: {}", url, e);
                SchemaError::Transport(e)
            })?;

        Self::decode(url, response).await
    }

    async fn post_schema(&self, schema_id: &str, body: &SchemaUpdateRequest) -> Result<SchemaDocument> {
        let url = self.schema_url(schema_id);

        let response = self
            .client
            .traced_post(&url)
            .header("Authorization", &self.authorization())
            .header("Accept", "application/json")
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                SchemaError::Transport(e)
            })?;

        Self::decode(&url, response).await
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, url = %url, "identity API response");

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let error: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
        tracing::warn!(
            status = %status,
            code = %error.error_code,
            summary = %error.error_summary,
            "identity API request failed"
        );

        Err(SchemaError::Api {
            status: status.as_u16(),
            code: error.error_code.clone(),
            summary: if error.error_summary.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                error.describe()
            },
        })
    }
}

#[async_trait]
impl IdentityApi for OktaClient {
    async fn list_user_types(&self) -> Result<Vec<UserType>> {
        let url = format!("{}/api/v1/meta/types/user", self.api_url);
        self.get_json(&url).await
    }

    async fn get_user_schema(&self, schema_id: &str) -> Result<SchemaDocument> {
        self.get_json(&self.schema_url(schema_id)).await
    }

    async fn update_custom_property(
        &self,
        schema_id: &str,
        index: &str,
        definition: &AttributeDefinition,
    ) -> Result<SchemaDocument> {
        let body =
            SchemaUpdateRequest::single(ResolutionScope::Custom, index, Some(definition.clone()));
        let doc = self.post_schema(schema_id, &body).await?;
        tracing::info!(schema_id = %schema_id, index = %index, "custom property updated");
        Ok(doc)
    }

    async fn remove_custom_property(
        &self,
        schema_id: &str,
        index: &str,
    ) -> Result<SchemaDocument> {
        let body = SchemaUpdateRequest::single(ResolutionScope::Custom, index, None);
        let doc = self.post_schema(schema_id, &body).await?;
        tracing::info!(schema_id = %schema_id, index = %index, "custom property removed");
        Ok(doc)
    }
}
