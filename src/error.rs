//! Error types for the import workflow

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Everything that can stop an upload or a status poll.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The export archive could not be read from disk
    #[error("Failed to open archive {}: {source}", path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request could not be built (bad token header, bad MIME, ...)
    #[error("Failed to build request: {0}")]
    Request(String),

    /// Connecting to or talking with the server failed
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read to the end
    #[error("Failed to read response body from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code
    #[error("Server returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// The response body was not the JSON record we expected
    #[error("Failed to decode response ({source}): {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writing progress lines to the output failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// The import never reached a terminal state
    #[error("Import of project {project_id} still '{last_status}' after {attempts} polls")]
    AttemptsExhausted {
        project_id: u64,
        attempts: u32,
        last_status: String,
    },
}
