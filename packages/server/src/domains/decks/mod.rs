//! Decks domain - named, optionally public collections of flashcards

pub mod actions;
pub mod models;

pub use models::{Deck, DeckChanges};
