/*!
 * Error types for the bisrt application.
 *
 * Remote-call failures are modelled by `ProviderError` and are always
 * retryable. `TranslationError` separates fatal configuration problems from
 * chunk-level failures, and `AppError` covers everything that ends a run.
 */

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the completion service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails, or no text could be extracted
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The attempt was cancelled because its timeout budget ran out
    #[error("Request aborted after {}s", .after.as_secs_f64())]
    Timeout {
        /// Budget that was exceeded
        after: Duration,
    },

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// HTTP status attached to the error, if the service answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => Some(*status_code),
            Self::RateLimitExceeded(_) => Some(429),
            _ => None,
        }
    }

    /// Short machine-friendly name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestFailed(_) => "request_failed",
            Self::ParseError(_) => "parse_error",
            Self::ApiError { .. } => "api_error",
            Self::ConnectionError(_) => "connection_error",
            Self::Timeout { .. } => "timeout",
            Self::RateLimitExceeded(_) => "rate_limited",
            Self::AuthenticationError(_) => "authentication_error",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur during translation of a single chunk
#[derive(Error, Debug)]
pub enum TranslationError {
    /// No access credential configured; never retried
    #[error(
        "OpenAI API key is not set. Set OPENAI_API_KEY (or OPENAI_KEY), e.g. `export OPENAI_API_KEY=\"your_key\"`"
    )]
    MissingCredential,

    /// Final error from the provider once every attempt failed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl TranslationError {
    /// Fatal errors abort the whole run instead of dropping one chunk
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input path does not exist
    #[error("The file was not found at {0:?}. Please check the path.")]
    InputNotFound(PathBuf),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),
}
