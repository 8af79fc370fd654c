//! # Error Types
//!
//! One error enum per pipeline concern. Discovery errors abort the run,
//! collection errors are logged per repository, dataset and report errors
//! abort only when a required input is missing or unreadable.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while querying the repository search API.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Transport-level failure (connection, TLS, body decoding)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered 200 but the payload carried an `errors` field
    #[error("API returned errors: {0}")]
    Api(String),

    /// The payload did not have the expected shape
    #[error("malformed API response: {0}")]
    Malformed(String),

    /// No access token was configured
    #[error("GitHub access token not found (set GITHUB_TOKEN)")]
    MissingToken,
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Errors raised while cloning and analysing a single repository.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CK exited with a nonzero status
    #[error("CK exited with {status}: {stderr}")]
    Ck { status: String, stderr: String },

    /// The CK jar configured for the run does not exist
    #[error("CK jar not found at {0}")]
    MissingJar(PathBuf),

    #[error("could not derive a repository name from URL {0}")]
    InvalidUrl(String),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

pub type CollectResult<T> = Result<T, CollectError>;

impl CollectError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CollectError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while reading, aggregating or merging CSV tables.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("required input not found: {0}")]
    MissingInput(PathBuf),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("column `{column}` missing from {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Aggregation produced no rows, so there is nothing to save
    #[error("no metrics were aggregated from {0}; nothing to save")]
    NothingToSave(PathBuf),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

impl DatasetError {
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DatasetError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while writing report tables. Plot rendering failures are
/// logged per image instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Errors raised while loading the pipeline configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
