use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An external catalog identifier kind a movie can carry.
///
/// The set is closed: anything else is rejected when arguments are parsed.
/// Variant order is the column order used when movies are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// IMDb title id (`tt1375666`).
    ImdbId,
    /// Trakt numeric movie id.
    TraktMovieId,
    /// TMDb numeric movie id.
    TmdbId,
}

impl IdentifierKind {
    /// Every supported kind, in display order.
    pub const ALL: [Self; 3] = [Self::ImdbId, Self::TraktMovieId, Self::TmdbId];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ImdbId => "imdb_id",
            Self::TraktMovieId => "trakt_movie_id",
            Self::TmdbId => "tmdb_id",
        }
    }

    /// Comma separated list of supported kind names, for messages.
    #[must_use]
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidIdentifier(format!(
                    "Received unsupported identifier ID {}. Should be one of {}",
                    s,
                    Self::supported_names()
                ))
            })
    }
}

/// A set of identifiers keyed by kind, at most one value per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifiers(BTreeMap<IdentifierKind, String>);

impl Identifiers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the one it replaced.
    pub fn insert(&mut self, kind: IdentifierKind, value: impl Into<String>) -> Option<String> {
        self.0.insert(kind, value.into())
    }

    #[must_use]
    pub fn get(&self, kind: IdentifierKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IdentifierKind, &str)> {
        self.0.iter().map(|(kind, value)| (*kind, value.as_str()))
    }

    /// Upsert every entry of `other` into `self`.
    ///
    /// Kinds present in `other` overwrite; kinds only in `self` are kept.
    pub fn merge(&mut self, other: &Self) {
        for (kind, value) in other.iter() {
            self.0.insert(kind, value.to_string());
        }
    }

    /// Like [`merge`](Self::merge), but never overwrites a kind already set.
    pub fn fill_missing(&mut self, other: &Self) {
        for (kind, value) in other.iter() {
            self.0.entry(kind).or_insert_with(|| value.to_string());
        }
    }
}

impl FromIterator<(IdentifierKind, String)> for Identifiers {
    fn from_iter<I: IntoIterator<Item = (IdentifierKind, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(IdentifierKind, String)> for Identifiers {
    fn extend<I: IntoIterator<Item = (IdentifierKind, String)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Parse a `key=value` identifier argument.
///
/// The argument must contain exactly one `=`, name a supported kind and
/// carry a non-empty value.
pub fn parse_identifier_arg(arg: &str) -> Result<(IdentifierKind, String)> {
    let malformed = || {
        Error::InvalidIdentifier(format!(
            "Received identifier in wrong format: {}, should be in keyword format like `imdb_id=tt1234567`",
            arg
        ))
    };

    if arg.matches('=').count() != 1 {
        return Err(malformed());
    }
    let (name, value) = arg.split_once('=').ok_or_else(malformed)?;
    if value.is_empty() {
        return Err(malformed());
    }

    let kind = name.parse::<IdentifierKind>()?;
    Ok((kind, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_identifier() {
        let (kind, value) = parse_identifier_arg("imdb_id=tt1375666").unwrap();
        assert_eq!(kind, IdentifierKind::ImdbId);
        assert_eq!(value, "tt1375666");

        let (kind, value) = parse_identifier_arg("trakt_movie_id=16662").unwrap();
        assert_eq!(kind, IdentifierKind::TraktMovieId);
        assert_eq!(value, "16662");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let err = parse_identifier_arg("imdb_id").unwrap_err();
        assert!(err.to_string().contains("wrong format"));
    }

    #[test]
    fn test_parse_rejects_multiple_separators() {
        assert!(parse_identifier_arg("imdb_id=tt1=tt2").is_err());
        assert!(parse_identifier_arg("==").is_err());
    }

    #[test]
    fn test_parse_rejects_unsupported_kind() {
        let err = parse_identifier_arg("tvdb_id=81189").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unsupported identifier ID tvdb_id"));
        assert!(message.contains("imdb_id, trakt_movie_id, tmdb_id"));
    }

    #[test]
    fn test_parse_rejects_empty_value() {
        assert!(parse_identifier_arg("tmdb_id=").is_err());
    }

    #[test]
    fn test_kind_display_order() {
        let names: Vec<_> = IdentifierKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["imdb_id", "trakt_movie_id", "tmdb_id"]);
    }

    #[test]
    fn test_merge_overwrites_and_preserves() {
        let mut stored = Identifiers::new();
        stored.insert(IdentifierKind::ImdbId, "tt0000001");
        stored.insert(IdentifierKind::TraktMovieId, "99");

        let mut incoming = Identifiers::new();
        incoming.insert(IdentifierKind::ImdbId, "tt1375666");
        incoming.insert(IdentifierKind::TmdbId, "27205");

        stored.merge(&incoming);
        assert_eq!(stored.get(IdentifierKind::ImdbId), Some("tt1375666"));
        assert_eq!(stored.get(IdentifierKind::TraktMovieId), Some("99"));
        assert_eq!(stored.get(IdentifierKind::TmdbId), Some("27205"));
    }

    #[test]
    fn test_fill_missing_keeps_existing() {
        let mut hints = Identifiers::new();
        hints.insert(IdentifierKind::ImdbId, "tt1375666");

        let mut discovered = Identifiers::new();
        discovered.insert(IdentifierKind::ImdbId, "tt9999999");
        discovered.insert(IdentifierKind::TmdbId, "27205");

        hints.fill_missing(&discovered);
        assert_eq!(hints.get(IdentifierKind::ImdbId), Some("tt1375666"));
        assert_eq!(hints.get(IdentifierKind::TmdbId), Some("27205"));
    }
}
