//! CLI-specific error types and exit code mapping

use rift_core::error::{RiftError, SourceError};
use rift_tail::TailError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Flag, configuration file or logging setup failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// The source could not be initialized (no stream, unresolved queue, bad schema).
    #[error("initialization failed: {0}")]
    Init(String),

    /// A remote call or the entry channel failed while tailing.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// IO error (stdout write, file read, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from rift-core.
    #[error("{0}")]
    Core(#[from] RiftError),

    /// Anything else.
    #[error("{0}")]
    Command(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | General / command error                  |
    /// | 2    | Configuration or flag error              |
    /// | 3    | Source initialization error              |
    /// | 4    | Remote / runtime error while tailing     |
    /// | 10   | IO error                                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Init(_) => 3,
            Self::Runtime(_) => 4,
            Self::Io(_) => 10,
            Self::Core(core) => match core {
                RiftError::Config(_) => 2,
                RiftError::Source(SourceError::InitFailed(_)) => 3,
                RiftError::Source(_) => 4,
                RiftError::Io(_) => 10,
                RiftError::Decode(_) => 1,
            },
            Self::Command(_) => 1,
        }
    }
}

impl From<TailError> for CliError {
    fn from(e: TailError) -> Self {
        if e.is_init_failure() {
            return Self::Init(e.to_string());
        }
        match e {
            TailError::Config { .. } | TailError::Regex(_) => Self::Config(e.to_string()),
            TailError::Remote { .. } => Self::Runtime(e.to_string()),
            TailError::Io(io) => Self::Io(io),
            other => Self::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("missing --region".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_init_error() {
        let err: CliError = TailError::StreamNotFound {
            group: "/svc/app".to_owned(),
            prefix: "web-1".to_owned(),
        }
        .into();
        assert!(matches!(err, CliError::Init(_)));
        assert_eq!(err.exit_code(), 3, "init failure should return exit code 3");
    }

    #[test]
    fn test_exit_code_queue_unresolved() {
        let err: CliError = TailError::QueueUnresolved {
            queue: "jobs".to_owned(),
            attempts: 10,
            reason: "does not exist".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("jobs"));
    }

    #[test]
    fn test_exit_code_remote_error() {
        let err: CliError = TailError::Remote {
            operation: "GetLogEvents".to_owned(),
            reason: "throttled".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 4, "remote error should return exit code 4");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let tail_err = rift_tail::Filter::new(Some("(")).expect_err("unbalanced group");
        let err: CliError = tail_err.into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: CliError = TailError::Io(io_err).into();
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_core_errors() {
        use rift_core::error::ConfigError;

        let err: CliError = RiftError::Config(ConfigError::ParseFailed {
            reason: "expected `]`".to_owned(),
        })
        .into();
        assert_eq!(err.exit_code(), 2);

        let err: CliError =
            RiftError::Source(SourceError::InitFailed("no stream".to_owned())).into();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = format!("{}", err);
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }
}
