//! The common shape of anything that can appear as a changelog line.

use chrono::{DateTime, Utc};

use crate::github::{Issue, Label, PullRequest, User};

/// A merged change, built from either a pull request or an issue payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogItem {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub html_url: String,
    pub author: User,
    pub labels: Vec<Label>,
    /// Only pull request payloads carry this; issues never do.
    pub merge_commit_sha: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl ChangelogItem {
    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// Markdown list line: `- [#12](url): Title by [login](profile)`.
    pub fn formatted_line(&self) -> String {
        format!(
            "- [#{}]({}): {} by [{}]({})",
            self.number, self.html_url, self.title, self.author.login, self.author.html_url
        )
    }
}

impl From<PullRequest> for ChangelogItem {
    fn from(pr: PullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            body: pr.body,
            html_url: pr.html_url,
            author: pr.user,
            labels: pr.labels,
            merge_commit_sha: pr.merge_commit_sha,
            merged_at: pr.merged_at,
        }
    }
}

impl From<Issue> for ChangelogItem {
    fn from(issue: Issue) -> Self {
        let merged_at = issue.merged_at();
        Self {
            number: issue.number,
            title: issue.title,
            body: issue.body,
            html_url: issue.html_url,
            author: issue.user,
            labels: issue.labels,
            merge_commit_sha: None,
            merged_at,
        }
    }
}
