use thiserror::Error;

use crate::job::JobId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Api(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Duplicate job ID: {0}")]
    DuplicateJob(JobId),

    #[error("No backend configured")]
    NoBackend,

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Invalid job record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, Error>;
