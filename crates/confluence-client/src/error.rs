//! Error types for the search client and orchestrator.

use thiserror::Error;

/// Errors from one call to the Confluence search API.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {message}")]
    RequestFailed { message: String },
    /// Non-success HTTP status; the body usually carries Confluence's own
    /// explanation, so it is kept verbatim.
    #[error("Search API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Could not decode response: {message}")]
    Parse { message: String },
}

/// Errors from one search round.
///
/// Cancellation never shows up here: a cancelled round yields an empty
/// result set, not an error.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Search timed out")]
    Timeout,
}
