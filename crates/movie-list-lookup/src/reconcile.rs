//! Adding a movie to a list: resolve, deduplicate, merge identifiers.

use movie_list_core::model::{Identifiers, Movie, MovieList, NewMovie};
use movie_list_core::schema::Database;
use movie_list_core::title::split_title_year;
use movie_list_core::Result;

use crate::provider::{LookupQuery, MovieRecord};
use crate::resolver::Resolver;

/// What [`add_movie`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// No provider resolved the title; the store was left untouched.
    LookupFailed { title: String },
    Added(AddedMovie),
}

/// A movie that was added to, or already existed in, a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedMovie {
    pub list: MovieList,
    /// `true` when the list did not exist before this call.
    pub list_created: bool,
    /// The stored movie, with its full identifier set after the merge.
    pub movie: Movie,
    /// `true` when the movie was inserted; `false` when it already existed.
    pub created: bool,
    /// Identifiers merged into the movie by this call.
    pub applied: Identifiers,
}

/// Resolve `movie_title` and add it to the list named `list_name`.
///
/// The title may carry a trailing year (`"Inception 2010"`). When lookup
/// fails nothing is written, not even the list. Otherwise the list is
/// created if needed, the movie is matched on resolved title and year (or
/// inserted), and identifiers are merged into it: the caller's
/// `identifiers` when non-empty, else the ones the provider discovered.
pub async fn add_movie(
    db: &mut Database,
    resolver: &Resolver,
    list_name: &str,
    movie_title: &str,
    identifiers: &Identifiers,
) -> Result<AddOutcome> {
    let (title, year) = split_title_year(movie_title);
    log::info!("Trying to look up movie title `{}`", title);

    let query = LookupQuery::new(title, year).with_identifiers(identifiers.clone());
    let Some(record) = resolver.resolve(&query).await else {
        return Ok(AddOutcome::LookupFailed {
            title: movie_title.to_string(),
        });
    };

    let year = record.year.or(year);
    let applied = identifiers_to_apply(identifiers, &record);

    db.with_session(|session| {
        let (list, list_created) = session.find_or_create_list(list_name)?;

        let (mut movie, created) = match session.find_movie(list.id, &record.title, year)? {
            Some(existing) => (existing, false),
            None => {
                let new = NewMovie::new(list.id, record.title.clone(), year);
                (session.insert_movie(&new)?, true)
            }
        };

        if !applied.is_empty() {
            movie.identifiers = session.merge_identifiers(movie.id, &applied)?;
        }

        Ok(AddOutcome::Added(AddedMovie {
            list,
            list_created,
            movie,
            created,
            applied,
        }))
    })
}

fn identifiers_to_apply(supplied: &Identifiers, record: &MovieRecord) -> Identifiers {
    if supplied.is_empty() {
        record.identifiers.clone()
    } else {
        supplied.clone()
    }
}
