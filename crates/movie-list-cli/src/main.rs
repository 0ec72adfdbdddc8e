use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use movie_list_core::model::{parse_identifier_arg, IdentifierKind};
use movie_list_core::schema::Database;
use movie_list_lookup::Config;

mod commands;
mod output;

use output::TableArgs;

const DEFAULT_LIST: &str = "movies";

#[derive(Debug, Parser)]
#[command(name = "movie-list", version, about)]
struct Cli {
    #[command(subcommand)]
    action: Action,

    /// Path to the database (default: ~/.local/share/movie-list/movie-list.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Action {
    /// List all movie lists
    All {
        #[command(flatten)]
        table: TableArgs,
    },
    /// List movies in a movie list
    List {
        /// Name of the movie list
        #[arg(value_name = "LIST NAME", default_value = DEFAULT_LIST)]
        list_name: String,

        #[command(flatten)]
        table: TableArgs,
    },
    /// Add a movie to a movie list
    ///
    /// The title is looked up with the configured providers (OMDb first,
    /// then TMDb) to find its canonical name and year. A trailing year in
    /// the title, as in `"Inception 2010"`, narrows the lookup. If the
    /// movie is already in the list only its identifiers are updated.
    #[command(allow_missing_positional = true)]
    Add {
        /// Name of the movie list
        #[arg(value_name = "LIST NAME", default_value = DEFAULT_LIST)]
        list_name: String,

        /// Title of the movie, optionally followed by its year
        #[arg(value_name = "MOVIE TITLE")]
        movie_title: String,

        /// Identifiers to set on the movie, e.g. `imdb_id=tt1375666`.
        /// Supported: imdb_id, trakt_movie_id, tmdb_id
        #[arg(
            short = 'i',
            long,
            value_name = "identifiers",
            num_args = 1..,
            value_parser = parse_identifier
        )]
        identifiers: Vec<(IdentifierKind, String)>,
    },
    /// Remove a movie from a movie list
    #[command(allow_missing_positional = true)]
    Del {
        /// Name of the movie list
        #[arg(value_name = "LIST NAME", default_value = DEFAULT_LIST)]
        list_name: String,

        /// Title of the movie (optionally with year) or its ID
        #[arg(value_name = "NAME or ID")]
        movie: String,
    },
    /// Delete a movie list and every movie in it
    Purge {
        /// Name of the movie list
        #[arg(value_name = "LIST NAME", default_value = DEFAULT_LIST)]
        list_name: String,
    },
}

fn parse_identifier(arg: &str) -> Result<(IdentifierKind, String), String> {
    parse_identifier_arg(arg).map_err(|e| e.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.db {
        Some(path) => Config::load_with_db_path(path)?,
        None => Config::load()?,
    };

    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory {}", parent.display())
        })?;
    }

    let mut db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open database {}",
            config.database_path.display()
        )
    })?;

    match cli.action {
        Action::All { table } => commands::show_all(&mut db, table.table_type())?,
        Action::List { list_name, table } => {
            commands::show_list(&mut db, &list_name, table.table_type())?;
        }
        Action::Add {
            list_name,
            movie_title,
            identifiers,
        } => {
            let identifiers = identifiers.into_iter().collect();
            commands::run_add(&mut db, &config, &list_name, &movie_title, &identifiers).await?;
        }
        Action::Del { list_name, movie } => commands::run_del(&mut db, &list_name, &movie)?,
        Action::Purge { list_name } => commands::run_purge(&mut db, &list_name)?,
    }

    Ok(())
}
