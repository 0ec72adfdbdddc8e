use crate::config::Config;
use crate::error::LookupResult;
use crate::omdb::OmdbClient;
use crate::provider::{LookupProvider, LookupQuery, MovieRecord};
use crate::tmdb::TmdbClient;

/// Resolves free-text titles through up to two providers, in priority
/// order.
///
/// The secondary provider is only consulted when the primary is missing or
/// fails. With no provider at all, nothing resolves.
#[derive(Debug, Default)]
pub struct Resolver {
    primary: Option<Box<dyn LookupProvider>>,
    secondary: Option<Box<dyn LookupProvider>>,
}

impl Resolver {
    #[must_use]
    pub fn new(
        primary: Option<Box<dyn LookupProvider>>,
        secondary: Option<Box<dyn LookupProvider>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Build the resolver from configuration: OMDb first, TMDb second, each
    /// only when its API key is set.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be created.
    pub fn from_config(config: &Config) -> LookupResult<Self> {
        let primary = match &config.omdb_api_key {
            Some(key) => {
                Some(Box::new(OmdbClient::new(key.clone())?) as Box<dyn LookupProvider>)
            }
            None => None,
        };
        let secondary = match &config.tmdb_api_key {
            Some(key) => {
                Some(Box::new(TmdbClient::new(key.clone())?) as Box<dyn LookupProvider>)
            }
            None => None,
        };
        Ok(Self::new(primary, secondary))
    }

    /// Names of the configured providers, in the order they are consulted.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers().map(|p| p.name()).collect()
    }

    pub fn is_configured(&self) -> bool {
        self.primary.is_some() || self.secondary.is_some()
    }

    fn providers(&self) -> impl Iterator<Item = &dyn LookupProvider> {
        [self.primary.as_deref(), self.secondary.as_deref()]
            .into_iter()
            .flatten()
    }

    /// Resolve a query into a canonical record.
    ///
    /// Identifier hints from the query are kept on the result unless the
    /// provider returned its own value for the same kind.
    pub async fn resolve(&self, query: &LookupQuery) -> Option<MovieRecord> {
        if !self.is_configured() {
            log::warn!(
                "No lookup provider configured, cannot resolve `{}`",
                query.title
            );
            return None;
        }

        for provider in self.providers() {
            match provider.lookup(query).await {
                Ok(mut record) if !record.title.trim().is_empty() => {
                    log::debug!(
                        "{} resolved `{}` to `{}` ({:?})",
                        provider.name(),
                        query.title,
                        record.title,
                        record.year
                    );
                    record.identifiers.fill_missing(&query.identifiers);
                    return Some(record);
                }
                Ok(_) => {
                    log::warn!(
                        "{} returned a record without a title for `{}`",
                        provider.name(),
                        query.title
                    );
                }
                Err(e) if e.is_not_found() => {
                    log::info!("{}: {}", provider.name(), e);
                }
                Err(e) => {
                    log::warn!(
                        "{} lookup failed for `{}`: {}",
                        provider.name(),
                        query.title,
                        e
                    );
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use movie_list_core::model::{IdentifierKind, Identifiers};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    enum Behaviour {
        Resolve(&'static str, Option<i32>, Option<&'static str>),
        NotFound,
        HttpError,
        BlankTitle,
    }

    #[derive(Debug)]
    struct FakeProvider {
        name: &'static str,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    impl FakeProvider {
        fn boxed(
            name: &'static str,
            behaviour: Behaviour,
        ) -> (Box<dyn LookupProvider>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Self {
                name,
                behaviour,
                calls: Arc::clone(&calls),
            };
            (Box::new(provider), calls)
        }
    }

    #[async_trait]
    impl LookupProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn lookup(&self, query: &LookupQuery) -> LookupResult<MovieRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Resolve(title, year, tmdb_id) => {
                    let mut identifiers = Identifiers::new();
                    if let Some(id) = tmdb_id {
                        identifiers.insert(IdentifierKind::TmdbId, *id);
                    }
                    Ok(MovieRecord {
                        title: (*title).to_string(),
                        year: *year,
                        identifiers,
                    })
                }
                Behaviour::NotFound => Err(LookupError::NotFound {
                    provider: self.name,
                    title: query.title.clone(),
                }),
                Behaviour::HttpError => Err(LookupError::Http {
                    provider: self.name,
                    message: "503 Service Unavailable".to_string(),
                }),
                Behaviour::BlankTitle => Ok(MovieRecord {
                    title: String::new(),
                    year: None,
                    identifiers: Identifiers::new(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_no_providers_resolves_nothing() {
        let resolver = Resolver::default();
        assert!(!resolver.is_configured());
        assert!(resolver
            .resolve(&LookupQuery::new("Inception", None))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let (primary, _) =
            FakeProvider::boxed("one", Behaviour::Resolve("Inception", Some(2010), None));
        let (secondary, secondary_calls) = FakeProvider::boxed("two", Behaviour::NotFound);
        let resolver = Resolver::new(Some(primary), Some(secondary));

        let record = resolver
            .resolve(&LookupQuery::new("inception", None))
            .await
            .unwrap();
        assert_eq!(record.title, "Inception");
        assert_eq!(record.year, Some(2010));
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_on_not_found() {
        let (primary, _) = FakeProvider::boxed("one", Behaviour::NotFound);
        let (secondary, _) =
            FakeProvider::boxed("two", Behaviour::Resolve("Inception", Some(2010), Some("27205")));
        let resolver = Resolver::new(Some(primary), Some(secondary));

        let record = resolver
            .resolve(&LookupQuery::new("Inception", None))
            .await
            .unwrap();
        assert_eq!(record.identifiers.get(IdentifierKind::TmdbId), Some("27205"));
    }

    #[tokio::test]
    async fn test_falls_back_on_http_error() {
        let (primary, primary_calls) = FakeProvider::boxed("one", Behaviour::HttpError);
        let (secondary, secondary_calls) =
            FakeProvider::boxed("two", Behaviour::Resolve("Inception", Some(2010), None));
        let resolver = Resolver::new(Some(primary), Some(secondary));

        assert!(resolver
            .resolve(&LookupQuery::new("Inception", None))
            .await
            .is_some());
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_title_counts_as_failure() {
        let (primary, _) = FakeProvider::boxed("one", Behaviour::BlankTitle);
        let resolver = Resolver::new(Some(primary), None);

        assert!(resolver
            .resolve(&LookupQuery::new("Inception", None))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_secondary_only() {
        let (secondary, _) =
            FakeProvider::boxed("two", Behaviour::Resolve("Heat", Some(1995), None));
        let resolver = Resolver::new(None, Some(secondary));

        assert_eq!(resolver.provider_names(), ["two"]);
        let record = resolver
            .resolve(&LookupQuery::new("heat", Some(1995)))
            .await
            .unwrap();
        assert_eq!(record.title, "Heat");
    }

    #[tokio::test]
    async fn test_both_fail_resolves_nothing() {
        let (primary, _) = FakeProvider::boxed("one", Behaviour::HttpError);
        let (secondary, _) = FakeProvider::boxed("two", Behaviour::NotFound);
        let resolver = Resolver::new(Some(primary), Some(secondary));

        assert!(resolver
            .resolve(&LookupQuery::new("Inception", None))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_hints_survive_unless_provider_overrides() {
        let (primary, _) =
            FakeProvider::boxed("one", Behaviour::Resolve("Inception", Some(2010), Some("27205")));
        let resolver = Resolver::new(Some(primary), None);

        let mut hints = Identifiers::new();
        hints.insert(IdentifierKind::ImdbId, "tt1375666");
        hints.insert(IdentifierKind::TmdbId, "1");
        let query = LookupQuery::new("Inception", None).with_identifiers(hints);

        let record = resolver.resolve(&query).await.unwrap();
        assert_eq!(
            record.identifiers.get(IdentifierKind::ImdbId),
            Some("tt1375666")
        );
        assert_eq!(record.identifiers.get(IdentifierKind::TmdbId), Some("27205"));
    }

    #[test]
    fn test_from_config_without_keys() {
        let resolver = Resolver::from_config(&Config::default()).unwrap();
        assert!(!resolver.is_configured());
    }

    #[test]
    fn test_from_config_with_keys() {
        let config = Config {
            omdb_api_key: Some("omdb-key".to_string()),
            tmdb_api_key: Some("tmdb-key".to_string()),
            ..Config::default()
        };
        let resolver = Resolver::from_config(&config).unwrap();
        assert_eq!(resolver.provider_names(), ["omdb", "tmdb"]);
    }
}
