//! Persist a batch of generated flashcards into a named deck

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::common::UserId;
use crate::domains::decks::models::Deck;
use crate::domains::flashcards::models::Flashcard;
use crate::domains::generation::FlashcardCandidate;

pub struct SavedFlashcards {
    pub deck: Deck,
    pub flashcards: Vec<Flashcard>,
}

/// Find the user's deck called `deck_name` (creating it if needed) and insert
/// every candidate into it. All or nothing: one transaction.
pub async fn save_generated_flashcards(
    user_id: UserId,
    deck_name: &str,
    query: Option<&str>,
    candidates: &[FlashcardCandidate],
    pool: &PgPool,
) -> Result<SavedFlashcards> {
    let mut tx = pool.begin().await.context("Failed to start transaction")?;
    Deck::lock_name(user_id, deck_name, &mut *tx).await?;

    let deck = match Deck::find_owned_by_name(user_id, deck_name, &mut *tx).await? {
        Some(deck) => deck,
        None => {
            let description = query
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(generated_deck_description);
            let deck =
                Deck::create(user_id, deck_name, description.as_deref(), false, &mut *tx).await?;
            info!(deck_id = %deck.id, deck_name = %deck_name, "Created deck for generated flashcards");
            deck
        }
    };

    let mut flashcards = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let flashcard = Flashcard::create(
            user_id,
            &candidate.question,
            &candidate.answer,
            Some(deck.id),
            &mut *tx,
        )
        .await?;
        flashcards.push(flashcard);
    }

    tx.commit().await.context("Failed to commit generated flashcards")?;

    info!(
        deck_id = %deck.id,
        user_id = %user_id,
        count = flashcards.len(),
        "Saved generated flashcards"
    );

    Ok(SavedFlashcards { deck, flashcards })
}

fn generated_deck_description(query: &str) -> String {
    format!("Flashcards generated from search: {}", query)
}
