use std::path::PathBuf;

/// Errors raised while scanning a `.vpx` container or writing its report.
///
/// Only `NotFound`, `ContainerOpen` and `ReportWrite` ever reach the caller of
/// a scan. `StreamRead` is produced by [`crate::vpx::container::Container`]
/// implementations and downgraded to a per-stream skip by the scanner.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The input path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be opened as a compound document.
    #[error("Could not open container '{}': {source}", .path.display())]
    ContainerOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single stream inside the container could not be read.
    #[error("Could not read stream '{key}': {source}")]
    StreamRead {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The removal report could not be written.
    #[error("Could not write report '{}': {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the gist listing and sync commands.
#[derive(Debug, thiserror::Error)]
pub enum GistError {
    /// Transport-level failure (DNS, TLS, connection reset, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API error: {status} ({message})")]
    Status { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error on a local path.
    #[error("I/O error on path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// `sync` needs write access to the account.
    #[error("A GitHub token is required (use --token or GITHUB_TOKEN)")]
    MissingToken,

    /// The sync state file exists but is unreadable.
    #[error("Corrupt sync state '{}': {message}", .path.display())]
    State { path: PathBuf, message: String },
}

impl GistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GistError::Io { path: path.into(), source }
    }
}
