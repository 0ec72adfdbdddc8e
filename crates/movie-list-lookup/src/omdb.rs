//! OMDb lookup provider.
//!
//! OMDb serves IMDb-backed metadata. A lookup goes by IMDb id when the query
//! carries one, otherwise by exact title (and year, when known). The only
//! identifier OMDb discovers is `imdb_id`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use movie_list_core::model::{IdentifierKind, Identifiers};

use crate::error::{LookupError, LookupResult};
use crate::provider::{http_client, leading_year, LookupProvider, LookupQuery, MovieRecord};

const OMDB_API_BASE: &str = "https://www.omdbapi.com/";
const PROVIDER: &str = "omdb";

/// Response of the OMDb lookup endpoint.
///
/// Failures still come back as `200 OK` with `"Response": "False"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default, rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OMDb API client.
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http: Client,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: String) -> LookupResult<Self> {
        Ok(Self {
            http: http_client()?,
            api_key,
        })
    }

    fn query_params(&self, query: &LookupQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", self.api_key.clone()),
            ("type", "movie".to_string()),
        ];
        if let Some(imdb_id) = query.identifiers.get(IdentifierKind::ImdbId) {
            params.push(("i", imdb_id.to_string()));
        } else {
            params.push(("t", query.title.clone()));
            if let Some(year) = query.year {
                params.push(("y", year.to_string()));
            }
        }
        params
    }
}

#[async_trait]
impl LookupProvider for OmdbClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn lookup(&self, query: &LookupQuery) -> LookupResult<MovieRecord> {
        log::debug!("Looking up `{}` at OMDb", query.title);

        let response = self
            .http
            .get(OMDB_API_BASE)
            .query(&self.query_params(query))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| LookupError::Http {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let body: OmdbResponse = response.json().await.map_err(|e| LookupError::Parse {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        record_from_response(body, &query.title)
    }
}

fn record_from_response(body: OmdbResponse, query_title: &str) -> LookupResult<MovieRecord> {
    if !body.response.eq_ignore_ascii_case("true") {
        log::debug!(
            "OMDb has no match for `{}`: {}",
            query_title,
            body.error.as_deref().unwrap_or("no error given")
        );
        return Err(LookupError::NotFound {
            provider: PROVIDER,
            title: query_title.to_string(),
        });
    }

    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| LookupError::Parse {
            provider: PROVIDER,
            message: format!("response for `{}` has no title", query_title),
        })?;

    let mut identifiers = Identifiers::new();
    if let Some(imdb_id) = body.imdb_id.filter(|id| id.starts_with("tt")) {
        identifiers.insert(IdentifierKind::ImdbId, imdb_id);
    }

    Ok(MovieRecord {
        title,
        year: body.year.as_deref().and_then(leading_year),
        identifiers,
    })
}
