// HTTP routes
pub mod auth;
pub mod decks;
pub mod flashcards;
pub mod health;
pub mod search;
pub mod users;

pub use health::*;
