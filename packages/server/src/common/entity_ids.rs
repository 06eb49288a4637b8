//! Typed ID aliases for the persisted entities.

pub use super::id::Id;

/// Marker type for User entities.
pub struct User;

/// Marker type for Deck entities.
pub struct Deck;

/// Marker type for Flashcard entities.
pub struct Flashcard;

pub type UserId = Id<User>;
pub type DeckId = Id<Deck>;
pub type FlashcardId = Id<Flashcard>;
