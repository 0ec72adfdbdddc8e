pub mod identifier;
pub mod ids;
pub mod list;
pub mod movie;

pub use identifier::{parse_identifier_arg, IdentifierKind, Identifiers};
pub use ids::{ListId, MovieId};
pub use list::MovieList;
pub use movie::{Movie, NewMovie};
