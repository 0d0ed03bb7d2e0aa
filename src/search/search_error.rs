use thiserror::Error;

/// Failures talking to the search API. Callers treat all of them as
/// "no results" and show the message to the user.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Search API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
