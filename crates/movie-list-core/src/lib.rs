//! Core domain model for movie-list.
//!
//! This crate defines the list/movie/identifier data model, title and year
//! parsing, the SQLite schema, and the scoped sessions every persistence
//! operation runs inside.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;
pub mod title;

pub use error::{Error, Result};
