//! Metadata lookup and list reconciliation for movie-list.
//!
//! Resolves free-text titles into canonical movie records through the OMDb
//! and TMDb providers, and reconciles the result with the movies already
//! stored in a list.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod omdb;
pub mod provider;
pub mod reconcile;
pub mod resolver;
pub mod tmdb;

pub use config::Config;
pub use error::{LookupError, LookupResult};
pub use provider::{LookupProvider, LookupQuery, MovieRecord};
pub use reconcile::{add_movie, AddOutcome, AddedMovie};
pub use resolver::Resolver;
