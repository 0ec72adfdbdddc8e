//! TMDb lookup provider.
//!
//! Resolves a movie to a TMDb id (from a `tmdb_id` hint, from an `imdb_id`
//! hint through the find endpoint, or by title search), then fetches the
//! movie details to pick up the canonical title, release year and IMDb id.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use movie_list_core::model::{IdentifierKind, Identifiers};

use crate::error::{LookupError, LookupResult};
use crate::provider::{http_client, leading_year, LookupProvider, LookupQuery, MovieRecord};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const PROVIDER: &str = "tmdb";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TmdbSearchResult>,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbSearchResult>,
}

/// A movie entry in TMDb search and find results.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResult {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Movie details from the TMDb movie endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl TmdbMovie {
    fn into_record(self) -> LookupResult<MovieRecord> {
        if self.title.trim().is_empty() {
            return Err(LookupError::Parse {
                provider: PROVIDER,
                message: format!("movie {} has no title", self.id),
            });
        }

        let mut identifiers = Identifiers::new();
        identifiers.insert(IdentifierKind::TmdbId, self.id.to_string());
        if let Some(imdb_id) = self.imdb_id.filter(|id| !id.is_empty()) {
            identifiers.insert(IdentifierKind::ImdbId, imdb_id);
        }

        Ok(MovieRecord {
            year: self.release_date.as_deref().and_then(leading_year),
            title: self.title,
            identifiers,
        })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// TMDb API client (v3, API key authentication).
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDb client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: String) -> LookupResult<Self> {
        Ok(Self {
            http: http_client()?,
            api_key,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> LookupResult<T> {
        let response = self
            .http
            .get(format!("{TMDB_API_BASE}{path}"))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| LookupError::Http {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        response.json().await.map_err(|e| LookupError::Parse {
            provider: PROVIDER,
            message: e.to_string(),
        })
    }

    /// Search movies by title, optionally constrained by year.
    pub async fn search_movie(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> LookupResult<Vec<TmdbSearchResult>> {
        let mut params = vec![("query", title.to_string())];
        if let Some(year) = year {
            params.push(("year", year.to_string()));
        }
        let response: SearchResponse = self.get("/search/movie", &params).await?;
        Ok(response.results)
    }

    /// Find movies by IMDb id.
    pub async fn find_by_imdb_id(&self, imdb_id: &str) -> LookupResult<Vec<TmdbSearchResult>> {
        let response: FindResponse = self
            .get(
                &format!("/find/{imdb_id}"),
                &[("external_source", "imdb_id".to_string())],
            )
            .await?;
        Ok(response.movie_results)
    }

    /// Get movie details by TMDb id.
    pub async fn get_movie(&self, id: u64) -> LookupResult<TmdbMovie> {
        self.get(&format!("/movie/{id}"), &[]).await
    }

    async fn resolve_id(&self, query: &LookupQuery) -> LookupResult<u64> {
        if let Some(id) = query
            .identifiers
            .get(IdentifierKind::TmdbId)
            .and_then(|id| id.parse::<u64>().ok())
        {
            return Ok(id);
        }

        let candidates = match query.identifiers.get(IdentifierKind::ImdbId) {
            Some(imdb_id) => self.find_by_imdb_id(imdb_id).await?,
            None => self.search_movie(&query.title, query.year).await?,
        };

        candidates
            .first()
            .map(|result| result.id)
            .ok_or_else(|| LookupError::NotFound {
                provider: PROVIDER,
                title: query.title.clone(),
            })
    }
}

#[async_trait]
impl LookupProvider for TmdbClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn lookup(&self, query: &LookupQuery) -> LookupResult<MovieRecord> {
        log::debug!("Looking up `{}` at TMDb", query.title);

        let id = self.resolve_id(query).await?;
        self.get_movie(id).await?.into_record()
    }
}
