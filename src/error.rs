use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to retrieve or parse a single feed. The run skips the feed and continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("error fetching {url}: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("received status {status} from {url}")]
    Status { url: String, status: StatusCode },
    #[error("error reading response from {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },
    #[error("error parsing feed from {url}: {source}")]
    Parse {
        url: String,
        source: quick_xml::de::DeError,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. }
            | FetchError::Parse { url, .. } => url,
        }
    }
}

#[derive(Debug, Error)]
#[error("error parsing date {value:?}: {source}")]
pub struct DateParseError {
    pub value: String,
    pub source: chrono::ParseError,
}

/// Failures that abort the run before the report is produced.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("error reading prior report {}: {source}", .path.display())]
    ReadPrior {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error creating {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
