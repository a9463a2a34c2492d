//! Repository-scoped GitHub endpoints.

use chrono::{DateTime, Utc};
use http::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::warn;

use crate::error::ApiError;

use super::date;
use super::fetcher::{DEFAULT_BASE_URI, Fetcher, Request};
use super::models::{Comparison, FullCommit, Issue, Milestone, PullRequest, Release, SearchResult, Tag};
use super::paginator::Paginator;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// List endpoints under `/repos/{owner}/{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Tags,
    Pulls,
    Issues,
    Milestones,
    Releases,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Pulls => "pulls",
            Self::Issues => "issues",
            Self::Milestones => "milestones",
            Self::Releases => "releases",
        }
    }
}

/// Client for one repository.
#[derive(Clone)]
pub struct GitHub {
    fetcher: Fetcher,
    base_uri: String,
    repository: String,
    headers: HeaderMap,
}

impl GitHub {
    /// Client against the public API.
    pub fn new(repository: &str, token: Option<&str>) -> Result<Self, ApiError> {
        Self::with_base_uri(DEFAULT_BASE_URI, repository, token)
    }

    /// Client against a custom API host (GitHub Enterprise or a mock server).
    pub fn with_base_uri(
        base_uri: &str,
        repository: &str,
        token: Option<&str>,
    ) -> Result<Self, ApiError> {
        let base_uri = base_uri.trim_end_matches('/').to_string();
        let fetcher = Fetcher::new(&base_uri)?;
        let headers = build_headers(token)?;

        Ok(Self {
            fetcher,
            base_uri,
            repository: repository.to_string(),
            headers,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn repo_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.base_uri, self.repository, path)
    }

    fn request(&self, url: String) -> Request {
        Request::new(url).headers(self.headers.clone())
    }

    fn endpoint_request(&self, endpoint: Endpoint) -> Request {
        self.request(self.repo_url(endpoint.as_str()))
    }

    /// `GET /repos/{repo}/tags`, newest first.
    pub fn tags(&self) -> Paginator<'_, Vec<Tag>, Tag> {
        Paginator::list(&self.fetcher, self.endpoint_request(Endpoint::Tags))
    }

    /// `GET /repos/{repo}/pulls?state=closed`, merged and unmerged alike.
    pub fn closed_pulls(&self) -> Paginator<'_, Vec<PullRequest>, PullRequest> {
        let request = self.endpoint_request(Endpoint::Pulls).param("state", "closed");
        Paginator::list(&self.fetcher, request)
    }

    /// `GET /repos/{repo}/milestones?state=all&direction=desc`.
    pub fn milestones(&self) -> Paginator<'_, Vec<Milestone>, Milestone> {
        let request = self
            .endpoint_request(Endpoint::Milestones)
            .param("state", "all")
            .param("direction", "desc");
        Paginator::list(&self.fetcher, request)
    }

    /// Closed issues of one milestone, most recently updated first.
    pub fn milestone_issues(&self, milestone: u64) -> Paginator<'_, Vec<Issue>, Issue> {
        let request = self
            .endpoint_request(Endpoint::Issues)
            .param("milestone", milestone.to_string())
            .param("state", "closed")
            .param("sort", "updated")
            .param("direction", "desc");
        Paginator::list(&self.fetcher, request)
    }

    /// Search for pull requests merged at or after `since`.
    pub fn merged_pulls_since(
        &self,
        since: &DateTime<Utc>,
    ) -> Paginator<'_, SearchResult<Issue>, Issue> {
        let query = [
            format!("repo:{}", self.repository),
            "is:pr".to_string(),
            "is:merged".to_string(),
            format!("merged:>={}", date::format(since)),
        ]
        .join(" ");

        let request = self
            .request(format!("{}/search/issues", self.base_uri))
            .param("q", query);
        Paginator::search(&self.fetcher, request)
    }

    /// `GET /repos/{repo}/compare/{base}...{head}`, paginated over commits.
    pub fn compare(&self, base: &str, head: &str) -> Paginator<'_, Comparison, FullCommit, Comparison> {
        let url = self.repo_url(&format!("compare/{}...{}", base, head));
        Paginator::comparison(&self.fetcher, self.request(url))
    }

    /// Fetch the full comparison between two refs.
    pub async fn fetch_comparison(
        &self,
        base: &str,
        head: &str,
        max_pages: Option<u32>,
    ) -> Result<Comparison, ApiError> {
        self.compare(base, head).fetch_comparison(max_pages).await
    }

    /// `GET /repos/{repo}/releases/latest`.
    pub async fn fetch_latest_release(&self) -> Result<Release, ApiError> {
        let url = self.repo_url(&format!("{}/latest", Endpoint::Releases.as_str()));
        self.fetcher.fetch(&self.request(url)).await
    }

    /// Fetch only the first item of a list endpoint.
    ///
    /// Requests page 1 with a page size of 1. Servers that ignore `per_page`
    /// may still return a full page; everything they send is returned.
    pub async fn fetch_first<T>(&self, endpoint: Endpoint) -> Result<Vec<T>, ApiError>
    where
        Vec<T>: serde::de::DeserializeOwned + super::models::Summary,
    {
        let page = Paginator::list(&self.fetcher, self.endpoint_request(endpoint))
            .page_size(1)
            .fetch_page(1)
            .await?;
        Ok(page.items)
    }
}

fn build_headers(token: Option<&str>) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("token {}", token)).map_err(|_| {
            warn!("GitHub token contains characters that cannot be sent in a header");
            ApiError::InvalidHeader(AUTHORIZATION.to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}
