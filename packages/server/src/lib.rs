// Flashcards API - Core
//
// This crate provides the backend API for studying with flashcards: accounts,
// decks, cards, keyword search, and flashcard generation from web search
// results via an LLM.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
