use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::identifier::Identifiers;
use crate::model::ids::{ListId, MovieId};

/// A movie stored in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,

    /// The list that owns this movie.
    pub list_id: ListId,

    /// Canonical title as resolved at insertion time.
    pub title: String,

    pub year: Option<i32>,

    /// External identifiers, at most one per kind.
    pub identifiers: Identifiers,

    pub added: DateTime<Utc>,
}

/// A movie that has not been persisted yet.
///
/// Built from a resolved title and year only; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub list_id: ListId,
    pub title: String,
    pub year: Option<i32>,
}

impl NewMovie {
    #[must_use]
    pub fn new(list_id: ListId, title: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            list_id,
            title: title.into(),
            year,
        }
    }
}

impl Movie {
    /// Title with the year appended in parentheses, when known.
    #[must_use]
    pub fn display_title(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}
