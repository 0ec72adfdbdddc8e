//! SQLite schema, migrations, and scoped sessions.

pub mod db;
pub mod migrations;
pub mod session;

pub use db::Database;
pub use session::Session;
