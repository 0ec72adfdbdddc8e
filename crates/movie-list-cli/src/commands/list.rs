use anyhow::Result;
use movie_list_core::model::{IdentifierKind, Movie};
use movie_list_core::schema::Database;

use super::print_table;
use crate::output::{TableType, TerminalTable};

/// Columns shed, in order, when the table is wider than the terminal:
/// `tmdb_id`, the year, then `trakt_movie_id`.
const DROP_ORDER: [usize; 3] = [5, 2, 4];

pub fn show_list(db: &mut Database, list_name: &str, table_type: TableType) -> Result<()> {
    let found = db.with_session(|session| -> movie_list_core::Result<_> {
        let Some(list) = session.find_list_by_name(list_name)? else {
            return Ok(None);
        };
        let movies = session.movies_in_list(list.id)?;
        Ok(Some((list, movies)))
    })?;

    let Some((list, movies)) = found else {
        println!("Could not find movie list with name {list_name}");
        return Ok(());
    };

    let table = TerminalTable::new(table_type, header(), rows(&movies))
        .with_title(format!(
            "{} Movies in movie list: `{}`",
            movies.len(),
            list.name
        ))
        .with_drop_columns(&DROP_ORDER);
    print_table(&table);
    Ok(())
}

fn header() -> Vec<String> {
    let mut header = vec![
        "#".to_string(),
        "Movie Name".to_string(),
        "Movie year".to_string(),
    ];
    header.extend(IdentifierKind::ALL.iter().map(ToString::to_string));
    header
}

fn rows(movies: &[Movie]) -> Vec<Vec<String>> {
    movies.iter().map(row).collect()
}

fn row(movie: &Movie) -> Vec<String> {
    let mut row = vec![
        movie.id.to_string(),
        movie.title.clone(),
        movie.year.map(|y| y.to_string()).unwrap_or_default(),
    ];
    row.extend(
        IdentifierKind::ALL
            .iter()
            .map(|&kind| movie.identifiers.get(kind).unwrap_or_default().to_string()),
    );
    row
}
