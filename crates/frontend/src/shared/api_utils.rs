//! API utilities for talking to the CRM REST backend.
//!
//! Every call carries `Authorization: Bearer <token>`; the token comes from
//! the authentication context, never from storage directly.

use gloo_net::http::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::config;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Failed to send request: {0}")]
    Network(String),
    #[error("Request failed: {status}")]
    Status { status: u16 },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Failed to serialize request: {0}")]
    Serialize(String),
}

/// Base URL of the REST backend, without a trailing slash.
pub fn api_base() -> String {
    config().api.base_url.clone()
}

/// Ordered query parameters. Order is preserved so requests are stable and
/// easy to assert on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Skips blank values; an empty filter means "unset".
    pub fn push_non_empty(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.trim().is_empty() {
            self.push(key, value.trim());
        }
        self
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Join a path and its query string.
pub fn with_query(path: &str, query: &QueryParams) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query.to_query_string())
    }
}

/// Authenticated REST client. Cheap to clone; build one per call site from
/// the auth context.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base: base.into(),
            token,
        }
    }

    pub fn with_token(token: Option<String>) -> Self {
        Self::new(api_base(), token)
    }

    pub fn url(&self, path: &str, query: &QueryParams) -> String {
        format!("{}{}", self.base, with_query(path, query))
    }

    fn request(&self, method: Method, path: &str, query: &QueryParams) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::Unauthenticated)?;
        let url = self.url(path, query);
        log::debug!("{:?} {}", method, url);
        Ok(RequestBuilder::new(&url)
            .method(method)
            .header("Authorization", &format!("Bearer {}", token)))
    }

    async fn check(response: Result<Response, gloo_net::Error>) -> Result<Response, ApiError> {
        let response = response.map_err(|e| ApiError::Network(e.to_string()))?;
        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
            });
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &QueryParams) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path, query)?;
        let response = Self::check(builder.send().await).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn get_bytes(&self, path: &str, query: &QueryParams) -> Result<Vec<u8>, ApiError> {
        let builder = self.request(Method::GET, path, query)?;
        let response = Self::check(builder.send().await).await?;
        response
            .binary()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Sends a body and ignores the response payload; many mutation endpoints
    /// answer with plain text.
    pub async fn send_body<B: Serialize>(&self, method: Method, path: &str, query: &QueryParams, body: &B) -> Result<(), ApiError> {
        let request = self
            .request(method, path, query)?
            .json(body)
            .map_err(|e| ApiError::Serialize(e.to_string()))?;
        Self::check(request.send().await).await?;
        Ok(())
    }

    /// Bodyless call (DELETE, status PUTs); the response payload is ignored.
    pub async fn send_empty(&self, method: Method, path: &str, query: &QueryParams) -> Result<(), ApiError> {
        let builder = self.request(method, path, query)?;
        Self::check(builder.send().await).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_preserves_order_and_encodes() {
        let mut query = QueryParams::new();
        query
            .push_non_empty("storeName", "Acme & Sons")
            .push_non_empty("city", "  ")
            .push("page", 0)
            .push("size", 10);
        assert_eq!(
            query.to_query_string(),
            "storeName=Acme%20%26%20Sons&page=0&size=10"
        );
        assert_eq!(query.get("page"), Some("0"));
        assert_eq!(query.get("city"), None);
    }

    #[test]
    fn test_url_building() {
        let client = ApiClient::new("http://crm.local", Some("t".into()));
        assert_eq!(client.url("/store/export", &QueryParams::new()), "http://crm.local/store/export");
        assert_eq!(
            client.url("/visit/getByStore", &QueryParams::new().with("id", 7)),
            "http://crm.local/visit/getByStore?id=7"
        );
    }

    #[test]
    fn test_missing_token_is_unauthenticated() {
        let client = ApiClient::new("http://crm.local", None);
        let result = client.request(Method::GET, "/user/me", &QueryParams::new());
        assert!(matches!(result, Err(ApiError::Unauthenticated)));
    }

    #[test]
    fn test_error_messages_are_human_readable() {
        assert_eq!(ApiError::Status { status: 500 }.to_string(), "Request failed: 500");
        assert_eq!(ApiError::Unauthenticated.to_string(), "Not authenticated");
    }
}
