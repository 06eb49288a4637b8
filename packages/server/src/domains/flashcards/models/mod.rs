pub mod flashcard;

pub use flashcard::{Flashcard, FlashcardChanges};
