pub mod deck;

pub use deck::{Deck, DeckChanges};
