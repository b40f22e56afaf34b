//! Batch write of orchestrator output: all-or-nothing.

use assert_matches::assert_matches;
use boxiii_core::card_parser::CardDraft;
use boxiii_core::content::DomainMetadata;
use boxiii_core::error::CoreError;
use boxiii_db::models::creator::CreateCreator;
use boxiii_db::models::generation::NewGeneratedSet;
use boxiii_db::repositories::{ContentCardRepo, CreatorRepo, GenerationRepo};
use boxiii_db::StoreError;
use sqlx::PgPool;

fn draft(i: i32, title: &str) -> CardDraft {
    CardDraft {
        title: title.to_string(),
        summary: format!("Summary for {title}"),
        detailed_content: Some("Longer body".to_string()),
        order_index: i,
        domain_data: DomainMetadata {
            topic: Some("photosynthesis".to_string()),
            ai_provider: Some("claude".to_string()),
            ..Default::default()
        },
        media: vec![],
        tags: vec!["biology".to_string()],
    }
}

fn batch(creator_id: i64, cards: Vec<CardDraft>) -> NewGeneratedSet {
    NewGeneratedSet {
        creator_id,
        title: "Generated: photosynthesis".to_string(),
        description: "AI-generated content about: photosynthesis".to_string(),
        category: "science".to_string(),
        difficulty_level: "intermediate".to_string(),
        content_style: "educational".to_string(),
        language: "pt-BR".to_string(),
        tags: vec!["biology".to_string()],
        cards,
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_writes_set_and_cards_together(pool: PgPool) {
    let creator = CreatorRepo::create(
        &pool,
        &CreateCreator {
            display_name: "Ana".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let cards = (0..5).map(|i| draft(i, &format!("Card {i}"))).collect();
    let persisted = GenerationRepo::persist_generated_set(&pool, &batch(creator.id, cards), 3)
        .await
        .unwrap();

    assert_eq!(persisted.set.set_number, "s001");
    assert_eq!(persisted.set.card_count, 5);
    assert_eq!(persisted.set.estimated_time_minutes, 25);
    assert_eq!(persisted.set.status, "draft");
    assert_eq!(persisted.set.title, "Generated: photosynthesis");
    assert_eq!(persisted.cards.len(), 5);

    let stored = ContentCardRepo::list_by_set(&pool, persisted.set.id).await.unwrap();
    let orders: Vec<i32> = stored.iter().map(|c| c.order_index).collect();
    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    assert!(stored.iter().all(|c| c.creator_id == creator.id));
    assert_eq!(stored[0].domain_data.0.topic.as_deref(), Some("photosynthesis"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_creator_writes_nothing(pool: PgPool) {
    let err = GenerationRepo::persist_generated_set(&pool, &batch(31_337, vec![draft(0, "x")]), 3)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { entity: "Creator", .. }));
    assert_eq!(count(&pool, "content_sets").await, 0);
    assert_eq!(count(&pool, "content_cards").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failing_card_rolls_back_whole_batch(pool: PgPool) {
    let creator = CreatorRepo::create(
        &pool,
        &CreateCreator {
            display_name: "Ana".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Two cards share order_index 1; the second insert violates
    // uq_content_cards_set_order after the set and first cards were written.
    let cards = vec![draft(0, "A"), draft(1, "B"), draft(1, "C")];
    let result = GenerationRepo::persist_generated_set(&pool, &batch(creator.id, cards), 1).await;
    assert!(result.is_err());

    assert_eq!(count(&pool, "content_sets").await, 0);
    assert_eq!(count(&pool, "content_cards").await, 0);

    // The watermark advance was rolled back too.
    let next = GenerationRepo::persist_generated_set(&pool, &batch(creator.id, vec![draft(0, "A")]), 1)
        .await
        .unwrap();
    assert_eq!(next.set.set_number, "s001");
}
