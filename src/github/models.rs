//! Payload shapes decoded from the GitHub REST API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::date;

/// Open/closed state shared by pull requests, issues and milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Open,
    Closed,
}

/// A commit reference as embedded in a tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitRef {
    pub sha: String,
    pub url: String,
}

/// A repository tag.
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub name: String,
    pub commit: CommitRef,
}

// Tags are identified by name and commit; the API url is incidental.
impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.commit.sha == other.commit.sha
    }
}

impl Eq for Tag {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub html_url: String,
}

/// A pull request from the `pulls` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub url: String,
    pub html_url: String,
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: State,
    #[serde(default, deserialize_with = "date::deserialize_option")]
    pub merged_at: Option<DateTime<Utc>>,
    pub merge_commit_sha: Option<String>,
    pub labels: Vec<Label>,
    pub user: User,
}

/// The pull request link attached to an issue that is backed by a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePullRequest {
    pub url: String,
    pub html_url: String,
    #[serde(default, deserialize_with = "date::deserialize_option")]
    pub merged_at: Option<DateTime<Utc>>,
}

/// An issue from the `issues` or `search/issues` endpoints.
///
/// Issues never expose the merge commit, so they cannot be attributed to a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub url: String,
    pub html_url: String,
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: State,
    pub user: User,
    pub labels: Vec<Label>,
    pub pull_request: Option<IssuePullRequest>,
}

impl Issue {
    /// Merge time of the backing pull request, if it was merged.
    pub fn merged_at(&self) -> Option<DateTime<Utc>> {
        self.pull_request.as_ref().and_then(|pr| pr.merged_at)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub url: String,
    pub id: u64,
    pub tag_name: String,
    pub name: Option<String>,
    #[serde(deserialize_with = "date::deserialize")]
    pub created_at: DateTime<Utc>,
    /// `None` while the release is a draft.
    #[serde(default, deserialize_with = "date::deserialize_option")]
    pub published_at: Option<DateTime<Utc>>,
    pub draft: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub number: u64,
    pub url: String,
    pub html_url: String,
    pub title: String,
    pub description: Option<String>,
    pub open_issues: u32,
    pub closed_issues: u32,
    pub state: State,
}

/// Envelope returned by the search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult<T> {
    pub total_count: usize,
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "date::deserialize")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
}

/// A commit as listed by the compare endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FullCommit {
    pub sha: String,
    pub commit: CommitDetails,
}

/// Result of comparing two refs.
///
/// The endpoint is paginated over `commits`; every page repeats the other fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Comparison {
    pub url: String,
    pub status: String,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub total_commits: usize,
    pub commits: Vec<FullCommit>,
    pub base_commit: FullCommit,
    pub merge_base_commit: FullCommit,
}

impl Comparison {
    /// Whether a commit with the given sha is part of the comparison.
    pub fn contains_commit(&self, sha: &str) -> bool {
        self.commits.iter().any(|c| c.sha == sha)
    }
}

/// One-line description of a decoded payload for debug logging.
pub trait Summary {
    fn summary(&self) -> String;
}

impl Summary for Tag {
    fn summary(&self) -> String {
        format!("Tag: {} {}", self.name, self.commit.sha)
    }
}

impl Summary for PullRequest {
    fn summary(&self) -> String {
        format!(
            "Pull: {} ({}) {}",
            self.title,
            self.url,
            self.merge_commit_sha.as_deref().unwrap_or("")
        )
    }
}

impl Summary for Issue {
    fn summary(&self) -> String {
        format!("Issue#{} ({})", self.id, self.url)
    }
}

impl Summary for Release {
    fn summary(&self) -> String {
        format!("Release: {}", self.name.as_deref().unwrap_or(&self.tag_name))
    }
}

impl Summary for Milestone {
    fn summary(&self) -> String {
        format!("Milestone#{}: {}", self.number, self.title)
    }
}

impl Summary for FullCommit {
    fn summary(&self) -> String {
        format!("FullCommit: {} {}", self.sha, self.commit.message)
    }
}

impl Summary for Comparison {
    fn summary(&self) -> String {
        format!(
            "Comparison: {} ({} of {} commits)",
            self.status,
            self.commits.len(),
            self.total_commits
        )
    }
}

impl<T: Summary> Summary for SearchResult<T> {
    fn summary(&self) -> String {
        format!("SearchResult: {} total\n{}", self.total_count, self.items.summary())
    }
}

impl<T: Summary> Summary for Vec<T> {
    fn summary(&self) -> String {
        let mut out = String::from("[\n");
        for item in self {
            out.push_str(&item.summary());
            out.push_str(",\n");
        }
        out.push(']');
        out
    }
}
