//! Flashcards domain - question/answer cards, optionally grouped in a deck

pub mod models;

pub use models::{Flashcard, FlashcardChanges};
