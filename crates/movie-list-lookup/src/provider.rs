//! The provider seam: what the resolver asks and what it gets back.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use movie_list_core::model::Identifiers;

use crate::error::LookupResult;

const USER_AGENT: &str = concat!(
    "movie-list/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/oxur/movie-list)"
);

/// What to look up: a title, an optional year, and any identifiers the user
/// already knows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupQuery {
    pub title: String,
    pub year: Option<i32>,
    pub identifiers: Identifiers,
}

impl LookupQuery {
    #[must_use]
    pub fn new(title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            year,
            identifiers: Identifiers::new(),
        }
    }

    #[must_use]
    pub fn with_identifiers(mut self, identifiers: Identifiers) -> Self {
        self.identifiers = identifiers;
        self
    }
}

/// Canonical metadata for a movie as returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub title: String,
    pub year: Option<i32>,
    /// Identifiers discovered by the provider.
    pub identifiers: Identifiers,
}

/// An external metadata service that can resolve a title to a
/// [`MovieRecord`].
#[async_trait]
pub trait LookupProvider: Send + Sync + fmt::Debug {
    /// Short, lowercase provider name (e.g. `"tmdb"`).
    fn name(&self) -> &'static str;

    /// Resolve the query into a canonical record.
    async fn lookup(&self, query: &LookupQuery) -> LookupResult<MovieRecord>;
}

/// HTTP client shared by the provider adapters.
pub(crate) fn http_client() -> LookupResult<Client> {
    let http = Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(http)
}

/// Year from the leading four digits of a date-ish string
/// (`"2010"`, `"2010-07-15"`, `"2008–2013"`).
pub(crate) fn leading_year(value: &str) -> Option<i32> {
    let digits = value.get(..4)?;
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
