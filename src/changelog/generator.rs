//! Changelog generation modes.
//!
//! Every mode fetches tags and merged changes, then hands them to
//! [`create_changelog`] for sectioning and rendering.

use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::{debug, info, instrument, warn};

use crate::error::GeneratorError;
use crate::github::{DEFAULT_BASE_URI, GitHub, Issue, Milestone, PullRequest, Tag};

use super::item::ChangelogItem;
use super::render::{RenderOptions, create_changelog};

/// Settings for a [`Generator`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// `owner/name`.
    pub repository: String,
    pub token: Option<String>,
    /// Labels to group by, in heading order.
    pub labels: Vec<String>,
    pub excluded_labels: Vec<String>,
    /// Regular expression; pull requests whose title matches are left out.
    pub filter_regex: Option<String>,
    /// Page limit per paginated endpoint. `None` fetches everything.
    pub max_pages: Option<u32>,
    /// Heading for changes merged after the newest tag.
    pub next_tag: Option<String>,
    pub include_untagged: bool,
    pub base_uri: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            repository: String::new(),
            token: None,
            labels: Vec::new(),
            excluded_labels: Vec::new(),
            filter_regex: None,
            max_pages: None,
            next_tag: None,
            include_untagged: true,
            base_uri: DEFAULT_BASE_URI.to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Default::default()
        }
    }
}

/// Builds changelogs for one repository.
pub struct Generator {
    github: GitHub,
    max_pages: Option<u32>,
    options: RenderOptions,
}

static REPOSITORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+/[a-zA-Z]+").expect("Invalid regex"));

/// Whether `repository` looks like `owner/name`.
///
/// The check is a substring match of two alphabetic segments around a slash.
pub fn is_valid_repository(repository: &str) -> bool {
    REPOSITORY_RE.is_match(repository)
}

impl Generator {
    /// Validate the configuration and build the API client.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        if !is_valid_repository(&config.repository) {
            return Err(GeneratorError::InvalidRepositoryFormat(config.repository));
        }

        let title_filter = config
            .filter_regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(GeneratorError::InvalidFilterPattern)?;

        let github = GitHub::with_base_uri(
            &config.base_uri,
            &config.repository,
            config.token.as_deref(),
        )?;

        Ok(Self {
            github,
            max_pages: config.max_pages,
            options: RenderOptions {
                labels: config.labels,
                excluded_labels: config.excluded_labels,
                title_filter,
                next_tag: config.next_tag,
                include_untagged: config.include_untagged,
            },
        })
    }

    pub fn github(&self) -> &GitHub {
        &self.github
    }

    /// Changelog of everything merged since the latest published release.
    ///
    /// With a branch, this is the since-tag changelog for the release's tag
    /// restricted to that branch. Without one, merged pull requests are found
    /// through search and rendered as a single untagged list.
    #[instrument(skip(self), fields(repository = %self.github.repository()))]
    pub async fn generate_since_latest_release(
        &self,
        branch: Option<&str>,
    ) -> Result<String, GeneratorError> {
        let release = match self.github.fetch_latest_release().await {
            Ok(release) => release,
            Err(e) if e.is_not_found() => {
                info!("No release found. No changelog");
                return Ok(String::new());
            }
            Err(e) => return Err(e.into()),
        };

        let Some(published_at) = release.published_at else {
            info!("Not released. No changelog");
            return Ok(String::new());
        };

        if let Some(branch) = branch {
            return self.generate_since_tag(&release.tag_name, Some(branch)).await;
        }

        info!("Fetching pull requests merged since {}", published_at);
        let pulls = self
            .github
            .merged_pulls_since(&published_at)
            .fetch_all_pages(self.max_pages)
            .await?
            .items;

        let items: Vec<ChangelogItem> = pulls.into_iter().map(ChangelogItem::from).collect();
        Ok(create_changelog(items, &[], &self.options))
    }

    /// Changelog of everything merged after `tag`, optionally only on `branch`.
    ///
    /// The pull request whose merge commit is the tagged commit is not part of
    /// the result; it shipped with the tag itself.
    #[instrument(skip(self), fields(repository = %self.github.repository()))]
    pub async fn generate_since_tag(
        &self,
        tag: &str,
        branch: Option<&str>,
    ) -> Result<String, GeneratorError> {
        info!("Generating since {} on branch {}", tag, branch.unwrap_or("(none)"));

        let tags = self
            .github
            .tags()
            .fetch_all_pages_while(self.max_pages, |tags| !tags.iter().any(|t| t.name == tag))
            .await?
            .items;

        let Some(target) = tags.iter().find(|t| t.name == tag).cloned() else {
            warn!("Tag {} not found", tag);
            return Ok(String::new());
        };

        let newer_tags: Vec<Tag> = tags.into_iter().take_while(|t| *t != target).collect();

        let target_sha = target.commit.sha.as_str();
        let pulls = self
            .github
            .closed_pulls()
            .fetch_all_pages_while(self.max_pages, |pulls| {
                !pulls
                    .iter()
                    .any(|p| p.merge_commit_sha.as_deref() == Some(target_sha))
            })
            .await?
            .items;

        let mut items: Vec<ChangelogItem> = merged_items(pulls)
            .into_iter()
            .take_while(|item| item.merge_commit_sha.as_deref() != Some(target_sha))
            .collect();

        if let Some(branch) = branch {
            let comparison = self
                .github
                .fetch_comparison(&target.name, branch, self.max_pages)
                .await?;
            debug!(
                commits = comparison.commits.len(),
                "Restricting to commits between {} and {}", target.name, branch
            );

            items.retain(|item| {
                item.merge_commit_sha
                    .as_deref()
                    .is_some_and(|sha| comparison.contains_commit(sha))
            });
        }

        Ok(create_changelog(items, &newer_tags, &self.options))
    }

    /// Changelog of every merged pull request, sectioned by every tag.
    #[instrument(skip(self), fields(repository = %self.github.repository()))]
    pub async fn generate_complete(&self) -> Result<String, GeneratorError> {
        let mut tags_paginator = self.github.tags();
        let mut pulls_paginator = self.github.closed_pulls();

        let (tags, pulls) = tokio::try_join!(
            tags_paginator.fetch_all_pages(self.max_pages),
            pulls_paginator.fetch_all_pages(self.max_pages),
        )?;

        let mut items = merged_items(pulls.items);
        items.sort_by(|a, b| b.merged_at.cmp(&a.merged_at));

        info!(tags = tags.items.len(), pulls = items.len(), "Fetched complete history");
        Ok(create_changelog(items, &tags.items, &self.options))
    }

    /// Changelog of the merged pull requests closed under a milestone.
    ///
    /// Issue payloads never carry a merge commit, so everything lands in the
    /// leading section, headed by the next-tag placeholder or, failing that,
    /// the milestone title. It is left out when untagged items are excluded.
    #[instrument(skip(self), fields(repository = %self.github.repository()))]
    pub async fn generate_for_milestone(&self, title: &str) -> Result<String, GeneratorError> {
        let milestone = self.find_milestone(title).await?;
        info!("Found milestone #{} {}", milestone.number, milestone.title);

        let mut tags_paginator = self.github.tags();
        let mut issues_paginator = self.github.milestone_issues(milestone.number);

        let (tags, issues) = tokio::try_join!(
            tags_paginator.fetch_all_pages(self.max_pages),
            issues_paginator.fetch_all_pages(self.max_pages),
        )?;

        let items: Vec<ChangelogItem> = issues
            .items
            .into_iter()
            .filter(|issue: &Issue| issue.merged_at().is_some())
            .map(ChangelogItem::from)
            .collect();

        let options = RenderOptions {
            next_tag: self.options.next_tag.clone().or(Some(milestone.title)),
            ..self.options.clone()
        };

        Ok(create_changelog(items, &tags.items, &options))
    }

    async fn find_milestone(&self, title: &str) -> Result<Milestone, GeneratorError> {
        let milestones = self
            .github
            .milestones()
            .fetch_all_pages_while(self.max_pages, |milestones| {
                !milestones.iter().any(|m| m.title == title)
            })
            .await?
            .items;

        milestones
            .into_iter()
            .find(|m| m.title == title)
            .ok_or_else(|| GeneratorError::MilestoneNotFound(title.to_string()))
    }
}

/// Keep merged pull requests only, in their original order.
fn merged_items(pulls: Vec<PullRequest>) -> Vec<ChangelogItem> {
    pulls
        .into_iter()
        .map(ChangelogItem::from)
        .filter(ChangelogItem::is_merged)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_format() {
        assert!(is_valid_repository("AFNetworking/AFNetworking"));
        assert!(is_valid_repository("owner/name"));
        assert!(!is_valid_repository("hello"));
        assert!(!is_valid_repository("/name"));
        assert!(!is_valid_repository("123/456"));
    }

    #[test]
    fn test_invalid_repository_fails_construction() {
        let result = Generator::new(GeneratorConfig::new("hello"));
        assert!(matches!(result, Err(GeneratorError::InvalidRepositoryFormat(r)) if r == "hello"));
    }

    #[test]
    fn test_invalid_filter_fails_construction() {
        let config = GeneratorConfig {
            filter_regex: Some("(unclosed".to_string()),
            ..GeneratorConfig::new("owner/name")
        };
        let result = Generator::new(config);
        assert!(matches!(result, Err(GeneratorError::InvalidFilterPattern(_))));
    }

    #[tokio::test]
    async fn test_valid_repository_builds() {
        let result = Generator::new(GeneratorConfig::new("AFNetworking/AFNetworking"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_default_config_includes_untagged() {
        let config = GeneratorConfig::default();
        assert!(config.include_untagged);
        assert_eq!(config.base_uri, DEFAULT_BASE_URI);
    }
}
