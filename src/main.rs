//! changelog-gen - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use changelog_gen::changelog::writer::{generate_summary, prepend_changelog};
use changelog_gen::github::resolve_token;
use changelog_gen::logging::{self, LogLevel};
use changelog_gen::{CliError, Generator, GeneratorConfig};

/// Which slice of history to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogType {
    /// Every merged pull request, sectioned by tag
    #[value(name = "complete")]
    Complete,
    /// Pull requests merged since the latest published release
    #[value(name = "sinceLatestRelease")]
    SinceLatestRelease,
    /// Pull requests merged after --tag
    #[value(name = "sinceTag")]
    SinceTag,
    /// Merged pull requests closed under --milestone
    #[value(name = "byMilestone")]
    ByMilestone,
}

/// Generate a markdown changelog from GitHub pull requests and tags.
#[derive(Parser, Debug)]
#[command(name = "changelog-gen")]
#[command(about = "Generate a markdown changelog from GitHub pull requests and tags")]
#[command(version)]
struct Cli {
    /// Repository in owner/name form
    #[arg(long)]
    repository: String,

    /// GitHub token. Falls back to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`
    #[arg(long)]
    token: Option<String>,

    /// Kind of changelog to generate
    #[arg(long = "type", value_enum, default_value_t = LogType::SinceLatestRelease)]
    log_type: LogType,

    /// Tag to start from when --type sinceTag is used
    #[arg(long)]
    tag: Option<String>,

    /// Only include pull requests reachable on this branch
    #[arg(long)]
    branch: Option<String>,

    /// Milestone title when --type byMilestone is used
    #[arg(long)]
    milestone: Option<String>,

    /// Maximum number of pages to fetch per endpoint. Fetches all pages by default
    #[arg(long)]
    max_pages: Option<u32>,

    /// File to prepend the changelog to. Prints to stdout when omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Pull requests whose title matches this regular expression are left out
    #[arg(long)]
    filter_regex: Option<String>,

    /// Pull requests with any of these labels are left out. Comma separated
    #[arg(long, value_delimiter = ',')]
    excluded_labels: Vec<String>,

    /// Labels to group by, in order. Comma separated. No grouping by default
    #[arg(long, value_delimiter = ',')]
    labels: Vec<String>,

    /// Heading for pull requests merged after the newest tag
    #[arg(long)]
    next_tag: Option<String>,

    /// Whether to include merged pull requests that are not under a tag yet
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    include_untagged: bool,

    /// Also print the changelog when writing to --output
    #[arg(long)]
    console: bool,

    /// Log every request
    #[arg(short, long)]
    verbose: bool,

    /// GitHub API base URL
    #[arg(long, default_value = changelog_gen::github::DEFAULT_BASE_URI)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(LogLevel::from_verbose(cli.verbose));

    let config = GeneratorConfig {
        repository: cli.repository.clone(),
        token: resolve_token(cli.token.clone()),
        labels: non_empty(cli.labels.clone()),
        excluded_labels: non_empty(cli.excluded_labels.clone()),
        filter_regex: cli.filter_regex.clone(),
        max_pages: cli.max_pages,
        next_tag: cli.next_tag.clone(),
        include_untagged: cli.include_untagged,
        base_uri: cli.api_url.clone(),
    };

    let generator = Generator::new(config).context("Invalid configuration")?;
    let branch = cli.branch.as_deref();

    let changelog = match cli.log_type {
        LogType::Complete => generator.generate_complete().await,
        LogType::SinceLatestRelease => generator.generate_since_latest_release(branch).await,
        LogType::SinceTag => {
            let tag = cli.tag.as_deref().ok_or(CliError::MissingRequiredTag)?;
            generator.generate_since_tag(tag, branch).await
        }
        LogType::ByMilestone => {
            let milestone = cli
                .milestone
                .as_deref()
                .ok_or(CliError::MissingRequiredMilestone)?;
            generator.generate_for_milestone(milestone).await
        }
    }
    .context("Failed to generate changelog")?;

    match &cli.output {
        Some(path) => {
            prepend_changelog(path, &changelog).context("Failed to write changelog")?;
            info!("{}", generate_summary(&changelog, path));
            if cli.console {
                println!("{}", changelog);
            }
        }
        None => println!("{}", changelog),
    }

    Ok(())
}

/// Drop empty entries left by stray commas.
fn non_empty(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
