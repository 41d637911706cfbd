//! Error types shared by the selection and fetch layers.

use thiserror::Error;

/// A retrieval that did not produce usable data.
///
/// Kept `Clone` so a failure can be stored in the view state and carried
/// across the provider channel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport failure (connect, DNS, reset, client-side timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status
    #[error("http {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a JSON object of non-negative numbers
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// No response within the configured window
    #[error("timed out after {0}s")]
    TimedOut(u64),

    /// The provider thread is gone
    #[error("stats provider unavailable")]
    Disconnected,
}

/// Rejected option lists and selections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("option list is empty")]
    EmptyOptions,

    #[error("option labels must not be blank")]
    EmptyLabel,

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("no option at position {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
