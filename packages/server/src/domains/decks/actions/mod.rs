//! Deck domain actions - business logic functions called from route handlers

mod save_generated;

pub use save_generated::{save_generated_flashcards, SavedFlashcards};
