//! Error types shared by the fetch, resolve, and export stages.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write table {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not write spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

impl Error {
    /// Whether another attempt at the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport { .. } => true,
            Error::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Errors coming from a remote API rather than local configuration or output.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Transport { .. } | Error::Status { .. } | Error::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
