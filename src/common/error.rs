//! Error types for miniweed

use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The client operation an error or log line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Upload location negotiation against the master
    Assign,
    /// Multipart upload to a volume
    Store,
    /// Download from a volume
    Fetch,
    /// Deletion on a volume
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Assign => "assign",
            Operation::Store => "store",
            Operation::Fetch => "fetch",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    // === Transport Errors ===
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    // === Status Errors ===
    #[error("{} failed, status: {}{}", .operation, .status, body_suffix(.body))]
    UnexpectedStatus {
        operation: Operation,
        status: reqwest::StatusCode,
        body: Option<String>,
    },

    #[error("master refused to assign a location: {0}")]
    Assign(String),

    // === Decode Errors ===
    #[error("failed to decode {operation} response: {payload}")]
    MalformedJson { operation: Operation, payload: String },

    #[error("{field} not found in {operation} response")]
    MissingField {
        operation: Operation,
        field: &'static str,
    },

    #[error("{field} in {operation} response is not a string (found {found})")]
    InvalidFieldType {
        operation: Operation,
        field: &'static str,
        found: &'static str,
    },

    #[error("response body exceeds the {limit} byte limit")]
    BodyTooLarge { limit: u64 },

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(", body: {}", body),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn transport(operation: Operation, source: reqwest::Error) -> Self {
        Error::Transport { operation, source }
    }

    /// HTTP status returned by the remote node, if this is a status error
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Operation the error was raised by, when it came from a round trip
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::Transport { operation, .. }
            | Error::UnexpectedStatus { operation, .. }
            | Error::MalformedJson { operation, .. }
            | Error::MissingField { operation, .. }
            | Error::InvalidFieldType { operation, .. } => Some(*operation),
            Error::Assign(_) => Some(Operation::Assign),
            Error::BodyTooLarge { .. } => Some(Operation::Fetch),
            _ => None,
        }
    }

    /// Is this a decoding failure (bad JSON, missing or mistyped field)?
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::MalformedJson { .. }
                | Error::MissingField { .. }
                | Error::InvalidFieldType { .. }
        )
    }
}
