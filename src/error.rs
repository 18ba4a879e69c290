//! Unified error type for the oracle.
//!
//! Transport failures never reach callers directly: the HTTP client retries
//! internally and surfaces exhaustion as an empty JSON object, which the
//! probes treat as "no error messages were returned". Everything here is a
//! fatal condition that aborts the current run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("transport error talking to the endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(
        "endpoint never suggested a field name; field typing is impossible without \
         'did you mean' errors (target may have suggestions disabled)"
    )]
    EndpointError,

    #[error("type '{0}' is not present in the schema")]
    TypeNotInSchema(String),

    #[error("'{0}' is not a declared root operation type")]
    UnknownOperationType(String),

    #[error("{0}")]
    ArgumentParse(String),

    #[error("invalid schema JSON: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("malformed type reference: {0}")]
    MalformedTypeRef(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OracleError>;
