use anyhow::Result;
use movie_list_core::schema::Database;

/// Remove a movie, given by title or id, from a list.
pub fn run_del(db: &mut Database, list_name: &str, movie: &str) -> Result<()> {
    let outcome = db.with_session(|session| -> movie_list_core::Result<_> {
        let Some(list) = session.find_list_by_name(list_name)? else {
            return Ok(None);
        };
        let deleted = session.delete_movie_by_name_or_id(list.id, movie)?;
        Ok(Some((list, deleted)))
    })?;

    match outcome {
        None => println!("Could not find movie list with name {list_name}"),
        Some((list, Some(deleted))) => {
            println!(
                "Removing movie {} from list {}",
                deleted.display_title(),
                list.name
            );
        }
        Some((list, None)) => println!("Could not find movie {movie} in list {}", list.name),
    }
    Ok(())
}
