//! Error types for translation lookups.

use thiserror::Error;

/// Result alias for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Errors raised while fetching or scraping a translation.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Building the HTTP client failed.
    #[error("failed to build translation client")]
    ClientBuild {
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// A scraping pattern failed to compile.
    #[error("failed to compile scraping pattern")]
    PatternCompile {
        /// Pattern identifier.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// The request could not be sent or its body could not be read.
    #[error("translation request failed")]
    Request {
        /// Target language of the failed request.
        target: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The response did not contain a translation marker.
    #[error("translation marker missing from response")]
    NoMatch {
        /// Target language of the failed request.
        target: String,
    },
}
