//! HTTP-level tests for `POST /generate` and the provider catalogue.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use boxiii_llm::ProviderError;
use common::{body_json, create_creator, get, post_json, CannedProvider};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn generation_persists_a_numbered_set(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/generate",
        json!({
            "creator_id": creator_id,
            "topic": "photosynthesis",
            "provider": "claude",
            "card_count": 5,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["set_number"], "s001");
    assert_eq!(json["cards_generated"], 5);
    assert_eq!(json["warnings"], json!([]));
    assert!(json["error"].is_null());
    assert!(json["estimated_cost_usd"].as_f64().unwrap() > 0.0);
    let set_id = json["set_id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let set = body_json(get(app, &format!("/api/v1/sets/{set_id}")).await).await;
    assert_eq!(set["title"], "Generated: photosynthesis");
    assert_eq!(set["card_count"], 5);
    assert_eq!(set["estimated_time_minutes"], 25);
    assert_eq!(set["status"], "draft");

    let app = common::build_test_app(pool);
    let cards = body_json(get(app, &format!("/api/v1/sets/{set_id}/cards")).await).await;
    let cards = cards["data"].as_array().unwrap();
    let numbers: Vec<&str> = cards
        .iter()
        .map(|c| c["card_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["c001", "c002", "c003", "c004", "c005"]);
    assert_eq!(cards[0]["order_index"], 0);
    assert_eq!(cards[0]["creator_id"], creator_id);
    assert_eq!(cards[0]["domain_data"]["ai_provider"], "claude");
    assert_eq!(cards[0]["domain_data"]["topic"], "photosynthesis");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_creator_is_reported_in_body(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/generate",
        json!({
            "creator_id": 999999,
            "topic": "photosynthesis",
            "provider": "claude",
            "card_count": 5,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "invalid_creator");
    assert!(json["set_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_card_count_is_invalid_request(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/generate",
        json!({
            "creator_id": creator_id,
            "topic": "photosynthesis",
            "provider": "claude",
            "card_count": 25,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "invalid_request");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provider_failure_writes_nothing(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;

    let app = common::build_test_app_with(
        pool.clone(),
        vec![CannedProvider::failing(
            "claude",
            ProviderError::AuthFailure("invalid x-api-key".into()),
        )],
    );
    let response = post_json(
        app,
        "/api/v1/generate",
        json!({
            "creator_id": creator_id,
            "topic": "photosynthesis",
            "provider": "claude",
            "card_count": 5,
        }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "provider_auth_failure");
    assert_eq!(json["failed_stage"], "calling_provider");

    let app = common::build_test_app(pool);
    let summary = body_json(get(app, "/api/v1/summary").await).await;
    assert_eq!(summary["data"]["content_sets"], 0);
    assert_eq!(summary["data"]["content_cards"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn consecutive_generations_get_consecutive_set_numbers(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let body = json!({
        "creator_id": creator_id,
        "topic": "tides",
        "provider": "CLAUDE",
        "card_count": 3,
    });

    let mut numbers = Vec::new();
    for _ in 0..2 {
        let app = common::build_test_app(pool.clone());
        let json = body_json(post_json(app, "/api/v1/generate", body.clone()).await).await;
        assert_eq!(json["success"], true);
        numbers.push(json["set_number"].as_str().unwrap().to_string());
    }
    assert_eq!(numbers, vec!["s001", "s002"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn providers_endpoint_lists_registered_keys(pool: PgPool) {
    let app = common::build_test_app_with(
        pool,
        vec![
            CannedProvider::cards("claude", 5),
            CannedProvider::cards("gpt4", 5),
        ],
    );
    let json = body_json(get(app, "/api/v1/providers").await).await;
    let keys: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["claude", "gpt4"]);
    assert_eq!(json["data"][0]["model"], "canned-model");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generation_completes_after_the_caller_disconnects(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let app = common::build_test_app_with(
        pool.clone(),
        vec![CannedProvider::cards("claude", 5).delayed(Duration::from_millis(300))],
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/generate")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "creator_id": creator_id,
                "topic": "photosynthesis",
                "provider": "claude",
                "card_count": 5,
            })
            .to_string(),
        ))
        .unwrap();
    let abandoned = tokio::time::timeout(Duration::from_millis(50), app.oneshot(request)).await;
    assert!(abandoned.is_err(), "request should still be in flight when dropped");

    let mut sets = 0_i64;
    for _ in 0..40 {
        sets = sqlx::query_scalar("SELECT COUNT(*) FROM content_sets WHERE creator_id = $1")
            .bind(creator_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        if sets > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(sets, 1);

    let cards: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM content_cards")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(cards, 5);
}
