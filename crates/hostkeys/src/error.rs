// ABOUTME: Error types for the hostkeys pipeline.
// ABOUTME: Fetch failures end a run with status 2; other RunErrors with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for a failed host list fetch.
pub const EXIT_FETCH_FAILED: u8 = 2;

/// Exit status for every other fatal error.
pub const EXIT_FAILURE: u8 = 1;

/// Failures while fetching the host list page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid host pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to create key directory {path}: {source}")]
    KeyDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read public key {path}: {source}")]
    ReadPublicKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read passphrase: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl RunError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            // Setup failure; no request was made.
            RunError::Fetch(FetchError::Client(_)) => EXIT_FAILURE,
            RunError::Fetch(_) => EXIT_FETCH_FAILED,
            _ => EXIT_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
