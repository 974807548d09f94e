//! Request correlation for outbound identity API calls.
//!
//! Every request leaving the client carries an `x-request-id` header so that
//! a failed check can be matched with the tenant's system log.

use reqwest::header::{HeaderMap, HeaderValue};
use uuid::Uuid;

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Insert a request ID into `headers` and return the value used.
///
/// A fresh v4 UUID is generated when `request_id` is `None` or not a valid
/// header value.
pub fn inject_request_id(headers: &mut HeaderMap, request_id: Option<&str>) -> String {
    if let Some(id) = request_id
        && let Ok(value) = HeaderValue::from_str(id)
    {
        headers.insert(REQUEST_ID_HEADER, value);
        return id.to_string();
    }

    let id = Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    id
}

/// Extract request ID from a header map.
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Wraps reqwest's RequestBuilder to attach a correlation ID on send.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    pub fn header(self, key: &str, value: &str) -> Self {
        Self {
            request: self.request.header(key, value),
        }
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        Self {
            request: self.request.json(json),
        }
    }

    pub fn timeout(self, timeout: std::time::Duration) -> Self {
        Self {
            request: self.request.timeout(timeout),
        }
    }

    /// Send with a generated request ID.
    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        self.send_with_request_id(None).await
    }

    pub async fn send_with_request_id(
        self,
        request_id: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        let id = inject_request_id(&mut headers, request_id);
        tracing::trace!(request_id = %id, "sending request");

        self.request.headers(headers).send().await
    }
}

/// Extension trait for reqwest::Client to create traced requests.
pub trait TracedClientExt {
    fn traced_get(&self, url: &str) -> TracedRequest;
    fn traced_post(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_get(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.get(url))
    }

    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }
}
