use anyhow::Result;
use movie_list_core::schema::Database;

/// Delete a list together with its movies and their identifiers.
pub fn run_purge(db: &mut Database, list_name: &str) -> Result<()> {
    match db.with_session(|session| session.delete_list_by_name(list_name))? {
        Some(list) => println!("Deleting list {}", list.name),
        None => println!("Could not find movie list with name {list_name}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purge_removes_list() {
        let mut db = Database::open_in_memory().unwrap();
        db.with_session(|s| s.find_or_create_list("Watchlist")).unwrap();

        run_purge(&mut db, "watchlist").unwrap();
        assert!(db.with_session(|s| s.lists()).unwrap().is_empty());

        // a second purge only reports
        run_purge(&mut db, "watchlist").unwrap();
    }
}
