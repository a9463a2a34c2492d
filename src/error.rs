//! Error types for changelog-gen modules using thiserror.

use thiserror::Error;

/// Errors from a single GitHub API fetch.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for header '{0}'")]
    InvalidHeader(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Request failed: {0}")]
    Transport(#[source] Box<octocrab::Error>),

    #[error("Failed to decode response: {0}")]
    Decoding(#[source] serde_json::Error),

    #[error("Unexpected response status {status}")]
    Unknown { status: u16 },
}

impl ApiError {
    /// Whether this error means the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Errors from changelog generation.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Invalid repository '{0}'. Expected the format owner/name")]
    InvalidRepositoryFormat(String),

    #[error("Invalid title filter pattern: {0}")]
    InvalidFilterPattern(#[source] regex_lite::Error),

    #[error("Milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors from writing the changelog file.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read changelog: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write changelog: {0}")]
    WriteFailed(#[source] std::io::Error),
}

/// Errors from command-line argument combinations.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("A tag is required when --type sinceTag is used. Pass --tag <TAG>")]
    MissingRequiredTag,

    #[error("A milestone is required when --type byMilestone is used. Pass --milestone <TITLE>")]
    MissingRequiredMilestone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(ApiError::NotFound.is_not_found());
        assert!(!ApiError::Unknown { status: 500 }.is_not_found());
    }

    #[test]
    fn test_api_error_converts_into_generator_error() {
        let err: GeneratorError = ApiError::NotFound.into();
        assert!(matches!(err, GeneratorError::Api(ApiError::NotFound)));
        assert_eq!(err.to_string(), "Resource not found");
    }
}
