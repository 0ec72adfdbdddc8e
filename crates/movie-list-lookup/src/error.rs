//! Lookup error types shared by every provider.

use thiserror::Error;

/// Errors a lookup provider can report.
///
/// Every provider adapter fails with this one type so the resolver can fall
/// back from one provider to the next uniformly.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The provider answered with an HTTP error status.
    #[error("HTTP error from {provider}: {message}")]
    Http {
        provider: &'static str,
        message: String,
    },

    /// The provider has no movie matching the query.
    #[error("no match for `{title}` at {provider}")]
    NotFound {
        provider: &'static str,
        title: String,
    },

    /// A response could not be parsed, or lacked a canonical title.
    #[error("parse error from {provider}: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl LookupError {
    /// Returns `true` when the provider simply had no match.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for lookup results.
pub type LookupResult<T> = std::result::Result<T, LookupError>;
