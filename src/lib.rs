//! changelog-gen - Generate a markdown changelog from GitHub pull requests and tags.
//!
//! # Overview
//!
//! Tags, pull requests, releases, milestones and ref comparisons are fetched
//! page by page from the GitHub REST API. Merged pull requests are then split
//! into sections at each tagged merge commit, optionally grouped by label, and
//! rendered as markdown.

pub mod changelog;
pub mod error;
pub mod github;
pub mod logging;

// Re-export commonly used types
pub use changelog::{ChangelogEntry, ChangelogItem, Generator, GeneratorConfig};
pub use error::{ApiError, ChangelogError, CliError, GeneratorError};
pub use github::{GitHub, PullRequest, Tag};
