//! Error types for route-rerun.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while installing the viewer or streaming a route.
#[derive(Debug, Error)]
pub enum Error {
    /// The Rerun viewer could not be found on `PATH`.
    #[error("Rerun is not installed, run with --install first")]
    ViewerMissing,

    /// The install command could not be started or exited unsuccessfully.
    #[error("install command `{command}` failed: {reason}")]
    Install { command: String, reason: String },

    /// A route or segment name could not be parsed.
    #[error("invalid route name {name:?}: {reason}")]
    InvalidRoute { name: String, reason: String },

    /// No log files exist for the requested route or selection.
    #[error("no segments found for {route} under {}", dir.display())]
    RouteNotFound { route: String, dir: PathBuf },

    /// A segment directory exists but holds neither rlog nor qlog.
    #[error("no log file in {}", .0.display())]
    MissingLog(PathBuf),

    /// A log line could not be decoded into a message.
    #[error("{}:{line}: {reason}", path.display())]
    MalformedLog {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// I/O failure while reading logs or registries.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The service registry file is not a JSON object of services.
    #[error("invalid service registry {}: {source}", path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Settings could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The worker pool could not be built.
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// The visualization session rejected a call.
    #[error("visualization session error: {0}")]
    Session(#[from] rerun::RecordingStreamError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn install(command: &[String], status: ExitStatus) -> Self {
        Error::Install {
            command: command.join(" "),
            reason: status.to_string(),
        }
    }
}
