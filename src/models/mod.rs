pub mod catalog;
pub mod game;
pub mod user_profile;

pub use catalog::{Candidate, CatalogRecord};
pub use game::{EnrichedGame, RawgGame, RawgGenre, RawgSearchResponse};
pub use user_profile::{UserDocument, UserProfile};
