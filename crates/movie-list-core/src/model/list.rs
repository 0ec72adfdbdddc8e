use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ListId;

/// A named, user-defined collection of movies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieList {
    pub id: ListId,

    /// Unique (case-insensitively) list name.
    pub name: String,

    pub added: DateTime<Utc>,
}
