//! Integration tests for deck and flashcard CRUD and their permissions.

mod common;

use axum::http::StatusCode;
use common::{create_user, ApiClient, TestHarness, TestUser};
use serde_json::{json, Value};
use test_context::test_context;

async fn create_deck(api: &ApiClient, owner: &TestUser, name: &str, is_public: bool) -> Value {
    let response = api
        .post(
            "/api/v1/decks",
            owner.token(),
            json!({"name": name, "description": "test deck", "is_public": is_public}),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.body
}

async fn create_card(api: &ApiClient, owner: &TestUser, deck_id: Option<&Value>) -> Value {
    let response = api
        .post(
            "/api/v1/flashcards",
            owner.token(),
            json!({"question": "What is 2 + 2?", "answer": "4", "deck_id": deck_id}),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.body
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deck_detail_includes_its_flashcards(ctx: &TestHarness) {
    let api = ctx.api();
    let owner = create_user(ctx).await;
    let deck = create_deck(&api, &owner, "Arithmetic", false).await;
    create_card(&api, &owner, Some(&deck["id"])).await;
    create_card(&api, &owner, Some(&deck["id"])).await;

    let detail = api
        .get(&format!("/api/v1/decks/{}", deck["id"].as_str().unwrap()), owner.token())
        .await;

    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["name"], "Arithmetic");
    assert_eq!(detail.body["flashcards"].as_array().unwrap().len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn private_decks_are_hidden_from_others(ctx: &TestHarness) {
    let api = ctx.api();
    let owner = create_user(ctx).await;
    let stranger = create_user(ctx).await;

    let private = create_deck(&api, &owner, "Secret", false).await;
    let public = create_deck(&api, &owner, "Shared", true).await;
    let private_path = format!("/api/v1/decks/{}", private["id"].as_str().unwrap());
    let public_path = format!("/api/v1/decks/{}", public["id"].as_str().unwrap());

    assert_eq!(api.get(&private_path, stranger.token()).await.status, StatusCode::FORBIDDEN);
    assert_eq!(api.get(&public_path, stranger.token()).await.status, StatusCode::OK);

    // Reading a public deck does not grant write access
    let edit = api
        .put(&public_path, stranger.token(), json!({"name": "Mine now"}))
        .await;
    assert_eq!(edit.status, StatusCode::FORBIDDEN);
    assert_eq!(api.delete(&public_path, stranger.token()).await.status, StatusCode::FORBIDDEN);

    let public_list = api.get("/api/v1/decks/public?limit=500", stranger.token()).await;
    let ids: Vec<&Value> = public_list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| &d["id"])
        .collect();
    assert!(ids.contains(&&public["id"]));
    assert!(!ids.contains(&&private["id"]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deck_listing_is_paginated_and_owner_scoped(ctx: &TestHarness) {
    let api = ctx.api();
    let owner = create_user(ctx).await;
    let other = create_user(ctx).await;
    for name in ["One", "Two", "Three"] {
        create_deck(&api, &owner, name, false).await;
    }
    create_deck(&api, &other, "Not mine", false).await;

    let all = api.get("/api/v1/decks", owner.token()).await;
    assert_eq!(all.body.as_array().unwrap().len(), 3);

    let page = api.get("/api/v1/decks?skip=1&limit=1", owner.token()).await;
    assert_eq!(page.body.as_array().unwrap().len(), 1);

    let invalid = api.get("/api/v1/decks?skip=-1", owner.token()).await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_a_deck_removes_its_flashcards(ctx: &TestHarness) {
    let api = ctx.api();
    let owner = create_user(ctx).await;
    let deck = create_deck(&api, &owner, "Doomed", false).await;
    let card = create_card(&api, &owner, Some(&deck["id"])).await;

    let deleted = api
        .delete(&format!("/api/v1/decks/{}", deck["id"].as_str().unwrap()), owner.token())
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let card_lookup = api
        .get(&format!("/api/v1/flashcards/{}", card["id"].as_str().unwrap()), owner.token())
        .await;
    assert_eq!(card_lookup.status, StatusCode::NOT_FOUND);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn flashcards_require_an_owned_deck(ctx: &TestHarness) {
    let api = ctx.api();
    let owner = create_user(ctx).await;
    let stranger = create_user(ctx).await;
    let deck = create_deck(&api, &owner, "Owned", true).await;

    let response = api
        .post(
            "/api/v1/flashcards",
            stranger.token(),
            json!({"question": "Q", "answer": "A", "deck_id": deck["id"]}),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let blank = api
        .post(
            "/api/v1/flashcards",
            owner.token(),
            json!({"question": "   ", "answer": "A"}),
        )
        .await;
    assert_eq!(blank.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn flashcard_visibility_follows_its_deck(ctx: &TestHarness) {
    let api = ctx.api();
    let owner = create_user(ctx).await;
    let stranger = create_user(ctx).await;
    let public = create_deck(&api, &owner, "Public", true).await;

    let loose = create_card(&api, &owner, None).await;
    let shared = create_card(&api, &owner, Some(&public["id"])).await;
    let loose_path = format!("/api/v1/flashcards/{}", loose["id"].as_str().unwrap());
    let shared_path = format!("/api/v1/flashcards/{}", shared["id"].as_str().unwrap());

    assert_eq!(api.get(&loose_path, stranger.token()).await.status, StatusCode::FORBIDDEN);
    assert_eq!(api.get(&shared_path, stranger.token()).await.status, StatusCode::OK);
    assert_eq!(
        api.put(&shared_path, stranger.token(), json!({"answer": "5"})).await.status,
        StatusCode::FORBIDDEN
    );

    let updated = api
        .put(&shared_path, owner.token(), json!({"answer": "four"}))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["answer"], "four");
    assert_eq!(updated.body["question"], "What is 2 + 2?");

    assert_eq!(api.delete(&loose_path, owner.token()).await.status, StatusCode::NO_CONTENT);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn flashcard_listing_filters_by_deck(ctx: &TestHarness) {
    let api = ctx.api();
    let owner = create_user(ctx).await;
    let deck = create_deck(&api, &owner, "Filtered", false).await;
    create_card(&api, &owner, Some(&deck["id"])).await;
    create_card(&api, &owner, None).await;

    let all = api.get("/api/v1/flashcards", owner.token()).await;
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    let in_deck = api
        .get(
            &format!("/api/v1/flashcards?deck_id={}", deck["id"].as_str().unwrap()),
            owner.token(),
        )
        .await;
    assert_eq!(in_deck.status, StatusCode::OK);
    assert_eq!(in_deck.body.as_array().unwrap().len(), 1);
}
