use std::path::PathBuf;

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Problems found while building the harness configuration. All of these are
/// raised before any request leaves the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("the environment name must not be empty")]
    EmptyEnvironment,

    #[error("unknown environment `{0}` (expected one of: prod, staging, dev, local)")]
    UnknownEnvironment(String),

    #[error("invalid base URL `{url}` for environment `{environment}`: {reason}")]
    InvalidBaseUrl {
        environment: String,
        url: String,
        reason: String,
    },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} responded with status {actual}, expected {expected}")]
    UnexpectedStatus {
        endpoint: &'static str,
        expected: StatusCode,
        actual: StatusCode,
    },

    #[error("{endpoint} returned a malformed body: {reason}")]
    MalformedBody {
        endpoint: &'static str,
        reason: String,
    },

    #[error("topic {topic} holds {actual} message(s), expected {expected}")]
    MessageCount {
        topic: String,
        expected: usize,
        actual: usize,
    },

    #[error("stored message has {field} `{actual}`, expected `{expected}`")]
    MessageMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },
}

impl HarnessError {
    pub(crate) fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        HarnessError::MalformedBody {
            endpoint,
            reason: reason.into(),
        }
    }
}
