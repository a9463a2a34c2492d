//! Tracing setup for the command-line tool.
//!
//! Logs go to stderr so the changelog on stdout stays clean.
//! `RUST_LOG` takes precedence over the level chosen here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
}

impl LogLevel {
    /// `--verbose` turns on per-request detail.
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose { Self::Debug } else { Self::Info }
    }

    /// Convert to a filter string for tracing-subscriber.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }
}

/// Build the filter: `RUST_LOG` if set, otherwise `level` for this crate and
/// `warn` for dependencies.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,changelog_gen={}", level.as_filter_str()))
    })
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbose() {
        assert_eq!(LogLevel::from_verbose(true), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbose(false), LogLevel::Info);
    }

    #[test]
    fn test_filter_strings() {
        assert_eq!(LogLevel::Debug.as_filter_str(), "debug");
        assert_eq!(LogLevel::Warn.as_filter_str(), "warn");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(LogLevel::Warn);
        init(LogLevel::Debug);
    }
}
