//! Error types for the MediaWiki API client.

use thiserror::Error;

/// Errors from talking to the MediaWiki API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bot credentials were supplied.
    #[error(
        "Missing bot credentials. Set WIKI_BOT_USERNAME and WIKI_BOT_PASSWORD environment variables."
    )]
    MissingCredentials,

    /// The login request completed but was not accepted.
    #[error("Bot login failed ({result}). Check credentials.")]
    LoginFailed {
        /// The `login.result` value returned by the API.
        result: String,
    },

    /// Transport, TLS, timeout or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status other than 429.
    #[error("Unexpected HTTP status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The server kept answering 429 until attempts ran out.
    #[error("Rate limited by the API")]
    RateLimited,

    /// The response was JSON but lacked an expected member.
    #[error("Malformed API response: missing {context}")]
    MalformedResponse {
        /// What was being looked for.
        context: &'static str,
    },

    /// The API reported an error object.
    #[error("API error {code}: {info}")]
    Api {
        /// MediaWiki error code (e.g. `badtoken`).
        code: String,
        /// Human-readable message from the API.
        info: String,
    },

    /// Every attempt failed.
    #[error("Request failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The last failure seen.
        last: Box<ApiError>,
    },
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
