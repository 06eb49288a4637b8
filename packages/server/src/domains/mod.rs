// Business domains
pub mod auth;
pub mod decks;
pub mod flashcards;
pub mod generation;
pub mod users;
