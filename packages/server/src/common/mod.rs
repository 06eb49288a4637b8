// Common types and utilities shared across the application

pub mod entity_ids;
pub mod id;
pub mod like;
pub mod pagination;

pub use entity_ids::{DeckId, FlashcardId, UserId};
pub use id::Id;
pub use like::contains_pattern;
pub use pagination::{PaginationArgs, ValidatedPagination};
