use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("{0}")]
    InvalidIdentifier(String),
}

pub type Result<T> = std::result::Result<T, Error>;
