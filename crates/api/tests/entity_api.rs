//! HTTP-level tests for the creator, set, and card endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_creator, create_set, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Creators
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_creator_normalizes_platforms(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/creators",
        json!({
            "display_name": "  Ana Bio ",
            "platforms": [{ "platform": "YouTube", "handle": " anabio " }],
            "categories": ["science", "Science", " "],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["display_name"], "Ana Bio");
    assert_eq!(json["platforms"][0]["platform"], "youtube");
    assert_eq!(json["platforms"][0]["handle"], "anabio");
    assert_eq!(json["categories"], json!(["science"]));
    assert_eq!(json["content_style"], "educational");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_platform_handle_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/creators",
        json!({
            "display_name": "Ana",
            "platforms": [{ "platform": "youtube", "handle": "@ana" }],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_creator_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/creators/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_creator_changes_only_given_fields(pool: PgPool) {
    let id = create_creator(&pool, "Before").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/creators/{id}"),
        json!({ "verified": true, "follower_count": 1200 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["display_name"], "Before");
    assert_eq!(json["verified"], true);
    assert_eq!(json["follower_count"], 1200);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_creators_with_sets_only(pool: PgPool) {
    let with_set = create_creator(&pool, "Has Sets").await;
    create_creator(&pool, "No Sets").await;
    create_set(&pool, with_set, "Plants").await;

    let app = common::build_test_app(pool.clone());
    let all = body_json(get(app, "/api/v1/creators").await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let filtered = body_json(get(app, "/api/v1/creators?with_sets_only=true").await).await;
    let data = filtered["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], with_set);
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_set_assigns_number_and_defaults(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/sets",
        json!({ "creator_id": creator_id, "title": "Plants" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["set_number"], "s001");
    assert_eq!(json["status"], "draft");
    assert_eq!(json["difficulty_level"], "intermediate");
    assert_eq!(json["target_audience"], "general_public");
    assert_eq!(json["language"], "pt-BR");
    assert_eq!(json["card_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_for_unknown_creator_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/sets",
        json!({ "creator_id": 424242, "title": "Orphan" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_set_status_is_rejected(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let set_id = create_set(&pool, creator_id, "Plants").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/sets/{set_id}"),
        json!({ "status": "live" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_sets_filters_by_creator_and_status(pool: PgPool) {
    let ana = create_creator(&pool, "Ana").await;
    let bruno = create_creator(&pool, "Bruno").await;
    let published = create_set(&pool, ana, "Published").await;
    create_set(&pool, ana, "Draft").await;
    create_set(&pool, bruno, "Other").await;

    let app = common::build_test_app(pool.clone());
    put_json(
        app,
        &format!("/api/v1/sets/{published}"),
        json!({ "status": "published" }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let by_creator = body_json(get(app, &format!("/api/v1/sets?creator_id={ana}")).await).await;
    assert_eq!(by_creator["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let by_status = body_json(get(app, "/api/v1/sets?status=published").await).await;
    let data = by_status["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], published);
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cards_are_numbered_and_counted(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let set_id = create_set(&pool, creator_id, "Plants").await;

    for title in ["Roots", "Leaves"] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/v1/sets/{set_id}/cards"),
            json!({ "title": title, "summary": format!("About {title}") }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let cards = body_json(get(app, &format!("/api/v1/sets/{set_id}/cards")).await).await;
    let cards = cards["data"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["card_number"], "c001");
    assert_eq!(cards[0]["order_index"], 0);
    assert_eq!(cards[1]["card_number"], "c002");
    assert_eq!(cards[1]["order_index"], 1);
    assert_eq!(cards[1]["creator_id"], creator_id);

    let app = common::build_test_app(pool);
    let set = body_json(get(app, &format!("/api/v1/sets/{set_id}")).await).await;
    assert_eq!(set["card_count"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn card_with_mismatched_creator_is_rejected(pool: PgPool) {
    let ana = create_creator(&pool, "Ana").await;
    let bruno = create_creator(&pool, "Bruno").await;
    let set_id = create_set(&pool, ana, "Plants").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/sets/{set_id}/cards"),
        json!({ "creator_id": bruno, "title": "Roots", "summary": "Anchor plants" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn flat_card_listing_filters_by_creator(pool: PgPool) {
    let ana = create_creator(&pool, "Ana").await;
    let bruno = create_creator(&pool, "Bruno").await;
    let plants = create_set(&pool, ana, "Plants").await;
    let stars = create_set(&pool, bruno, "Stars").await;

    for (set_id, title) in [(plants, "Roots"), (plants, "Leaves"), (stars, "Nebulae")] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            &format!("/api/v1/sets/{set_id}/cards"),
            json!({ "title": title, "summary": format!("About {title}") }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/cards?creator_id={ana}&limit=10")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let cards = json["data"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert!(cards.iter().all(|c| c["creator_id"] == ana));

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/api/v1/cards?set_id={stars}")).await).await;
    assert_eq!(json["data"][0]["title"], "Nebulae");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/cards?limit=1").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_order_index_conflicts(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let set_id = create_set(&pool, creator_id, "Plants").await;

    let body = json!({ "title": "Roots", "summary": "Anchor plants", "order_index": 3 });
    let app = common::build_test_app(pool.clone());
    post_json(app, &format!("/api/v1/sets/{set_id}/cards"), body.clone()).await;

    let app = common::build_test_app(pool);
    let response = post_json(app, &format!("/api/v1/sets/{set_id}/cards"), body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn card_media_requires_http_url(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let set_id = create_set(&pool, creator_id, "Plants").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/sets/{set_id}/cards"),
        json!({
            "title": "Roots",
            "summary": "Anchor plants",
            "media": [{ "media_type": "video", "url": "ftp://example.com/roots.mp4" }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_card_updates_the_count(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let set_id = create_set(&pool, creator_id, "Plants").await;

    let app = common::build_test_app(pool.clone());
    let card = body_json(
        post_json(
            app,
            &format!("/api/v1/sets/{set_id}/cards"),
            json!({ "title": "Roots", "summary": "Anchor plants" }),
        )
        .await,
    )
    .await;
    let card_id = card["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/cards/{card_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let set = body_json(get(app, &format!("/api/v1/sets/{set_id}")).await).await;
    assert_eq!(set["card_count"], 0);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/cards/{card_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Cascading deletes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_with_cards_requires_cascade(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let set_id = create_set(&pool, creator_id, "Plants").await;
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/sets/{set_id}/cards"),
        json!({ "title": "Roots", "summary": "Anchor plants" }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/sets/{set_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "HAS_DEPENDENTS");

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/sets/{set_id}?cascade=true")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let summary = body_json(get(app, "/api/v1/summary").await).await;
    assert_eq!(summary["data"]["content_sets"], 0);
    assert_eq!(summary["data"]["content_cards"], 0);
    assert_eq!(summary["data"]["creators"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_cascade_removes_sets_and_cards(pool: PgPool) {
    let creator_id = create_creator(&pool, "Ana").await;
    let set_id = create_set(&pool, creator_id, "Plants").await;
    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/sets/{set_id}/cards"),
        json!({ "title": "Roots", "summary": "Anchor plants" }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/creators/{creator_id}")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/creators/{creator_id}?cascade=true")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let summary = body_json(get(app, "/api/v1/summary").await).await;
    assert_eq!(summary["data"]["creators"], 0);
    assert_eq!(summary["data"]["content_sets"], 0);
    assert_eq!(summary["data"]["content_cards"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_counts_rows(pool: PgPool) {
    let ana = create_creator(&pool, "Ana").await;
    create_creator(&pool, "Bruno").await;
    let set_id = create_set(&pool, ana, "Plants").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/sets/{set_id}/cards"),
        json!({ "title": "Roots", "summary": "Anchor plants" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let summary = body_json(get(app, "/api/v1/summary").await).await;
    assert_eq!(summary["data"]["creators"], 2);
    assert_eq!(summary["data"]["creators_with_sets"], 1);
    assert_eq!(summary["data"]["content_sets"], 1);
    assert_eq!(summary["data"]["published_sets"], 0);
    assert_eq!(summary["data"]["content_cards"], 1);
}
