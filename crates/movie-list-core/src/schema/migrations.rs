/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Named movie lists
CREATE TABLE IF NOT EXISTS movie_lists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    added TEXT NOT NULL
);

-- Movies (each belongs to exactly one list)
CREATE TABLE IF NOT EXISTS movies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    list_id INTEGER NOT NULL REFERENCES movie_lists(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    year INTEGER,
    added TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_movies_list_id ON movies(list_id);
CREATE INDEX IF NOT EXISTS idx_movies_list_title ON movies(list_id, title COLLATE NOCASE);

-- External identifiers (one value per movie and kind)
CREATE TABLE IF NOT EXISTS movie_identifiers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
    id_name TEXT NOT NULL,
    id_value TEXT NOT NULL,
    added TEXT NOT NULL,
    UNIQUE (movie_id, id_name)
);

CREATE INDEX IF NOT EXISTS idx_movie_identifiers_movie_id ON movie_identifiers(movie_id);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
