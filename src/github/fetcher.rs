//! Single-request transport: one GET, one decoded JSON payload.

use http::HeaderMap;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

use super::models::Summary;

/// Public GitHub REST API.
pub const DEFAULT_BASE_URI: &str = "https://api.github.com";

/// Query parameters in request order.
pub type QueryParams = Vec<(String, String)>;

/// A GET request: base URL plus query parameters and headers.
#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub params: QueryParams,
    pub headers: HeaderMap,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Build the full URL with escaped query parameters.
    ///
    /// `extra` is appended after the request's own parameters.
    pub fn to_url(&self, extra: &[(String, String)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(self.url.clone()));
        }

        let params: Vec<&(String, String)> = self.params.iter().chain(extra.iter()).collect();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

/// Issues GET requests against the API and decodes the JSON response.
#[derive(Clone)]
pub struct Fetcher {
    client: Octocrab,
}

impl Fetcher {
    /// Build a fetcher for the given API base URI.
    ///
    /// No credentials are configured on the client itself; authorization is
    /// carried per request in [`Request::headers`].
    pub fn new(base_uri: &str) -> Result<Self, ApiError> {
        let client = Octocrab::builder()
            .base_uri(base_uri)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|e| ApiError::Transport(Box::new(e)))?;

        Ok(Self { client })
    }

    /// Fetch and decode a single payload.
    pub async fn fetch<T>(&self, request: &Request) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Summary,
    {
        self.fetch_with(request, &[]).await
    }

    /// Fetch with extra query parameters appended to the request's own.
    pub async fn fetch_with<T>(
        &self,
        request: &Request,
        extra: &[(String, String)],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Summary,
    {
        let url = request.to_url(extra)?;
        debug!(url = %url, "Fetching");

        let response = self
            .client
            ._get_with_headers(url.as_str(), Some(request.headers.clone()))
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))?;

        let status = response.status();
        if status.as_u16() == 404 {
            debug!(url = %url, "404 - not found");
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            return Err(ApiError::Unknown {
                status: status.as_u16(),
            });
        }

        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))?;

        debug!("Received {} bytes", body.len());

        let value: T = serde_json::from_str(&body).map_err(ApiError::Decoding)?;
        debug!("{}", value.summary());

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_params() {
        let request = Request::new("http://example.com/repos/o/r/pulls").param("state", "closed");
        let url = request
            .to_url(&[("per_page".into(), "100".into()), ("page".into(), "2".into())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://example.com/repos/o/r/pulls?state=closed&per_page=100&page=2"
        );
    }

    #[test]
    fn test_url_without_params_has_no_query() {
        let url = Request::new("http://example.com/tags").to_url(&[]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/tags");
    }

    #[test]
    fn test_url_escapes_search_query() {
        let request = Request::new("http://example.com/search/issues")
            .param("q", "repo:o/r is:pr merged:>=2021-01-01T00:00:00Z");
        let url = request.to_url(&[]).unwrap();
        let query = url.query().unwrap();
        assert!(query.starts_with("q=repo%3Ao%2Fr+is%3Apr+merged%3A%3E%3D"));
    }

    #[test]
    fn test_malformed_url_is_rejected() {
        let result = Request::new("not a url").to_url(&[]);
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_base_url_is_rejected() {
        let result = Request::new("mailto:someone@example.com").to_url(&[]);
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
