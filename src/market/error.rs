use thiserror::Error;

/// Failure talking to the market-data provider
#[derive(Debug, Error)]
pub enum MarketError {
    /// Transport failure. The request URL is stripped so the API key never
    /// reaches a log line.
    #[error("HTTP request error: {0}")]
    Http(reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider answered with an error payload (`"status": "error"`)
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

pub type Result<T, E = MarketError> = std::result::Result<T, E>;
