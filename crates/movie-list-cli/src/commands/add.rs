use anyhow::Result;
use movie_list_core::model::Identifiers;
use movie_list_core::schema::Database;
use movie_list_core::title::split_title_year;
use movie_list_lookup::config::config_file_path;
use movie_list_lookup::{add_movie, AddOutcome, AddedMovie, Config, Resolver};

pub async fn run_add(
    db: &mut Database,
    config: &Config,
    list_name: &str,
    movie_title: &str,
    identifiers: &Identifiers,
) -> Result<()> {
    let resolver = Resolver::from_config(config)?;
    if !resolver.is_configured() {
        eprintln!(
            "No lookup provider configured. Set MOVIELIST_OMDB_API_KEY or \
             MOVIELIST_TMDB_API_KEY, or add omdb_api_key / tmdb_api_key to {}",
            config_file_path().display()
        );
    }

    add(db, &resolver, list_name, movie_title, identifiers).await
}

async fn add(
    db: &mut Database,
    resolver: &Resolver,
    list_name: &str,
    movie_title: &str,
    identifiers: &Identifiers,
) -> Result<()> {
    let (title, _) = split_title_year(movie_title);
    println!("Trying to lookup movie title: `{title}`");

    match add_movie(db, resolver, list_name, movie_title, identifiers).await? {
        AddOutcome::LookupFailed { title } => {
            println!("ERROR: movie lookup failed for movie {title}, aborting");
        }
        AddOutcome::Added(added) => report(&added),
    }
    Ok(())
}

fn report(added: &AddedMovie) {
    let title = added.movie.display_title();
    if added.created {
        println!("Adding movie with title {title} to list {}", added.list.name);
    } else {
        println!(
            "Movie with title {title} already exist in list {}",
            added.list.name
        );
    }

    if !added.applied.is_empty() {
        println!("Setting movie identifiers:");
        for (kind, value) in added.applied.iter() {
            println!("ID: {kind} with value: {value}");
        }
    }

    println!(
        "Successfully added movie {title} to movie list {}",
        added.list.name
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use movie_list_core::model::IdentifierKind;
    use movie_list_lookup::{LookupProvider, LookupQuery, LookupResult, MovieRecord};

    #[derive(Debug)]
    struct Fixed;

    #[async_trait]
    impl LookupProvider for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn lookup(&self, _query: &LookupQuery) -> LookupResult<MovieRecord> {
            let mut identifiers = Identifiers::new();
            identifiers.insert(IdentifierKind::ImdbId, "tt0113277");
            Ok(MovieRecord {
                title: "Heat".to_string(),
                year: Some(1995),
                identifiers,
            })
        }
    }

    #[tokio::test]
    async fn test_add_twice_reuses_movie() {
        let mut db = Database::open_in_memory().unwrap();
        let resolver = Resolver::new(Some(Box::new(Fixed)), None);

        add(&mut db, &resolver, "movies", "heat", &Identifiers::new())
            .await
            .unwrap();
        add(&mut db, &resolver, "movies", "Heat 1995", &Identifiers::new())
            .await
            .unwrap();

        let movies = db
            .with_session(|s| {
                let list = s.find_list_by_name("movies")?.unwrap();
                s.movies_in_list(list.id)
            })
            .unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].display_title(), "Heat (1995)");
        assert_eq!(
            movies[0].identifiers.get(IdentifierKind::ImdbId),
            Some("tt0113277")
        );
    }

    #[tokio::test]
    async fn test_add_without_providers_writes_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        run_add(
            &mut db,
            &Config::default(),
            "movies",
            "Heat",
            &Identifiers::new(),
        )
        .await
        .unwrap();

        assert!(db.with_session(|s| s.lists()).unwrap().is_empty());
    }
}
