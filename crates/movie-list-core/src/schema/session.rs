use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{OptionalExtension, Transaction};
use std::fmt;

use crate::error::{Error, Result};
use crate::model::{IdentifierKind, Identifiers, ListId, Movie, MovieId, MovieList, NewMovie};
use crate::title::split_title_year;

/// A unit of work against the store.
///
/// Wraps a SQLite transaction. Dropping a session without calling
/// [`commit`](Self::commit) rolls back everything it did.
pub struct Session<'conn> {
    tx: Transaction<'conn>,
}

impl fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl<'conn> Session<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self { tx }
    }

    /// Commit everything done in this session.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

/// Timestamps are stored as fixed-width UTC RFC 3339 so they sort as text.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

// List operations
impl Session<'_> {
    /// Find a list by name (case-insensitive exact match).
    pub fn find_list_by_name(&self, name: &str) -> Result<Option<MovieList>> {
        let list = self
            .tx
            .query_row(
                "SELECT id, name, added FROM movie_lists WHERE name = ?1",
                [name],
                row_to_list,
            )
            .optional()?;
        Ok(list)
    }

    /// Find a list by name, creating it when absent.
    ///
    /// The flag is `true` when the list was created by this call.
    pub fn find_or_create_list(&self, name: &str) -> Result<(MovieList, bool)> {
        if name.trim().is_empty() {
            return Err(Error::InvalidData("movie list name is empty".to_string()));
        }
        if let Some(list) = self.find_list_by_name(name)? {
            return Ok((list, false));
        }

        let added = now_timestamp();
        self.tx.execute(
            "INSERT INTO movie_lists (name, added) VALUES (?1, ?2)",
            rusqlite::params![name, added],
        )?;
        let id = ListId::from_raw(self.tx.last_insert_rowid());
        log::info!("Created movie list {} (id {})", name, id);

        let list = MovieList {
            id,
            name: name.to_string(),
            added: parse_timestamp(2, &added)?,
        };
        Ok((list, true))
    }

    /// All lists, in store order.
    pub fn lists(&self) -> Result<Vec<MovieList>> {
        let mut stmt = self
            .tx
            .prepare("SELECT id, name, added FROM movie_lists ORDER BY id")?;
        let lists = stmt
            .query_map([], row_to_list)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lists)
    }

    /// Delete a list by name, together with its movies and their identifiers.
    ///
    /// Returns the deleted list, or `None` if no list had that name.
    pub fn delete_list_by_name(&self, name: &str) -> Result<Option<MovieList>> {
        let Some(list) = self.find_list_by_name(name)? else {
            return Ok(None);
        };
        self.tx
            .execute("DELETE FROM movie_lists WHERE id = ?1", [list.id])?;
        log::debug!("Deleted movie list {} (id {})", list.name, list.id);
        Ok(Some(list))
    }
}

// Movie operations
impl Session<'_> {
    /// Find a movie in a list by title (case-insensitive) and year.
    ///
    /// A `None` year only matches movies stored without a year.
    pub fn find_movie(
        &self,
        list_id: ListId,
        title: &str,
        year: Option<i32>,
    ) -> Result<Option<Movie>> {
        let row = self
            .tx
            .query_row(
                "SELECT id, list_id, title, year, added FROM movies
                 WHERE list_id = ?1 AND title = ?2 COLLATE NOCASE AND year IS ?3",
                rusqlite::params![list_id, title, year],
                row_to_movie,
            )
            .optional()?;
        row.map(|movie| self.with_identifiers(movie)).transpose()
    }

    /// Find a movie by id, restricted to the given list.
    pub fn find_movie_by_id(
        &self,
        list_id: ListId,
        movie_id: MovieId,
    ) -> Result<Option<Movie>> {
        let row = self
            .tx
            .query_row(
                "SELECT id, list_id, title, year, added FROM movies
                 WHERE list_id = ?1 AND id = ?2",
                rusqlite::params![list_id, movie_id],
                row_to_movie,
            )
            .optional()?;
        row.map(|movie| self.with_identifiers(movie)).transpose()
    }

    /// Insert a new movie with no identifiers.
    pub fn insert_movie(&self, new: &NewMovie) -> Result<Movie> {
        if new.title.trim().is_empty() {
            return Err(Error::InvalidData("movie title is empty".to_string()));
        }
        let added = now_timestamp();
        self.tx.execute(
            "INSERT INTO movies (list_id, title, year, added) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![new.list_id, new.title, new.year, added],
        )?;

        Ok(Movie {
            id: MovieId::from_raw(self.tx.last_insert_rowid()),
            list_id: new.list_id,
            title: new.title.clone(),
            year: new.year,
            identifiers: Identifiers::new(),
            added: parse_timestamp(4, &added)?,
        })
    }

    /// All movies of a list, most recently added first.
    pub fn movies_in_list(&self, list_id: ListId) -> Result<Vec<Movie>> {
        let mut stmt = self.tx.prepare(
            "SELECT id, list_id, title, year, added FROM movies
             WHERE list_id = ?1
             ORDER BY added DESC, id DESC",
        )?;
        let movies = stmt
            .query_map([list_id], row_to_movie)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        movies
            .into_iter()
            .map(|movie| self.with_identifiers(movie))
            .collect()
    }

    /// Delete a movie; its identifiers go with it.
    pub fn delete_movie(&self, movie_id: MovieId) -> Result<bool> {
        let deleted = self
            .tx
            .execute("DELETE FROM movies WHERE id = ?1", [movie_id])?;
        Ok(deleted > 0)
    }

    /// Find a movie by numeric id or, failing that, by `"Title [Year]"`.
    ///
    /// Input that parses as an integer is tried as an id first; on a miss
    /// (or when it is not numeric) it is split into title and year and
    /// matched that way.
    pub fn find_movie_by_name_or_id(
        &self,
        list_id: ListId,
        input: &str,
    ) -> Result<Option<Movie>> {
        if let Ok(raw) = input.trim().parse::<i64>() {
            if let Some(movie) = self.find_movie_by_id(list_id, MovieId::from_raw(raw))? {
                return Ok(Some(movie));
            }
            log::debug!(
                "No movie with id {} in list {}, trying as title",
                raw,
                list_id
            );
        }

        let (title, year) = split_title_year(input.trim());
        self.find_movie(list_id, &title, year)
    }

    /// Delete a movie identified by numeric id or title, see
    /// [`find_movie_by_name_or_id`](Self::find_movie_by_name_or_id).
    ///
    /// Returns the deleted movie, or `None` when nothing matched.
    pub fn delete_movie_by_name_or_id(
        &self,
        list_id: ListId,
        input: &str,
    ) -> Result<Option<Movie>> {
        let Some(movie) = self.find_movie_by_name_or_id(list_id, input)? else {
            return Ok(None);
        };
        self.delete_movie(movie.id)?;
        Ok(Some(movie))
    }

    fn with_identifiers(&self, mut movie: Movie) -> Result<Movie> {
        movie.identifiers = self.movie_identifiers(movie.id)?;
        Ok(movie)
    }
}

// Identifier operations
impl Session<'_> {
    /// Identifiers stored for a movie.
    ///
    /// Rows whose kind is no longer supported are skipped.
    pub fn movie_identifiers(&self, movie_id: MovieId) -> Result<Identifiers> {
        let mut stmt = self.tx.prepare(
            "SELECT id_name, id_value FROM movie_identifiers
             WHERE movie_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([movie_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut identifiers = Identifiers::new();
        for (name, value) in rows {
            match name.parse::<IdentifierKind>() {
                Ok(kind) => {
                    identifiers.insert(kind, value);
                }
                Err(_) => {
                    log::warn!(
                        "Ignoring unsupported identifier {} on movie {}",
                        name,
                        movie_id
                    );
                }
            }
        }
        Ok(identifiers)
    }

    /// Upsert identifiers into a movie.
    ///
    /// Each kind in `identifiers` is inserted or overwritten; kinds already
    /// stored but not mentioned are kept. Returns the full resulting set.
    pub fn merge_identifiers(
        &self,
        movie_id: MovieId,
        identifiers: &Identifiers,
    ) -> Result<Identifiers> {
        let added = now_timestamp();
        for (kind, value) in identifiers.iter() {
            self.tx.execute(
                "INSERT INTO movie_identifiers (movie_id, id_name, id_value, added)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (movie_id, id_name) DO UPDATE SET
                    id_value = excluded.id_value,
                    added = excluded.added",
                rusqlite::params![movie_id, kind.as_str(), value, added],
            )?;
        }
        self.movie_identifiers(movie_id)
    }
}

fn row_to_list(row: &rusqlite::Row) -> rusqlite::Result<MovieList> {
    let added: String = row.get(2)?;
    Ok(MovieList {
        id: row.get(0)?,
        name: row.get(1)?,
        added: parse_timestamp(2, &added)?,
    })
}

fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
    let added: String = row.get(4)?;
    Ok(Movie {
        id: row.get(0)?,
        list_id: row.get(1)?,
        title: row.get(2)?,
        year: row.get(3)?,
        identifiers: Identifiers::new(),
        added: parse_timestamp(4, &added)?,
    })
}
