//! HTTP-level integration tests for PRDs and their nested resources.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth, user_token,
};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_prd(app: axum::Router, token: &str, title: &str) -> Value {
    let body = json!({
        "title": title,
        "client_name": "Acme",
        "project_overview": "A booking platform",
    });
    let response = post_json_auth(app, "/api/v1/prd", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn create_category(app: axum::Router, token: &str, prd_id: i64, name: &str) -> Value {
    let response = post_json_auth(
        app,
        &format!("/api/v1/prd/{prd_id}/categories"),
        json!({ "name": name, "description": "" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// PRD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn prd_routes_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/prd").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn prd_crud_round_trip(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);

    let prd = create_prd(app.clone(), &token, "Booking").await;
    let id = prd["id"].as_i64().unwrap();
    assert_eq!(prd["client_name"], "Acme");
    assert!(prd["created_by"].is_i64());

    let response = get_auth(app.clone(), &format!("/api/v1/prd/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["title"], "Booking");
    assert_eq!(detail["roles"], json!([]));
    assert_eq!(detail["categories"], json!([]));
    assert_eq!(detail["references"], json!([]));

    // Blank fields are ignored.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/prd/{id}"),
        json!({ "title": "Booking v2", "client_name": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Booking v2");
    assert_eq!(updated["client_name"], "Acme");

    let response = delete_auth(app.clone(), &format!("/api/v1/prd/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    let response = get_auth(app, &format!("/api/v1/prd/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_prd_validates_required_fields(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/prd",
        json!({ "title": "  ", "client_name": "Acme" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_prd_is_404_everywhere(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);

    for uri in [
        "/api/v1/prd/999",
        "/api/v1/prd/999/roles",
        "/api/v1/prd/999/categories",
        "/api/v1/prd/999/references",
    ] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let response = put_json_auth(app.clone(), "/api/v1/prd/999", json!({ "title": "x" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, "/api/v1/prd/999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_paginated_newest_first(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);

    for title in ["First", "Second", "Third"] {
        create_prd(app.clone(), &token, title).await;
    }

    let response = get_auth(app.clone(), "/api/v1/prd?limit=2", &token).await;
    let page = body_json(response).await;
    assert_eq!(page["count"], 3);
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Third");
    assert!(items[0].get("project_overview").is_none());

    let response = get_auth(app, "/api/v1/prd?limit=2&offset=2", &token).await;
    let page = body_json(response).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["title"], "First");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn analyze_checks_existence_only(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);
    let id = create_prd(app.clone(), &token, "Analyze me").await["id"]
        .as_i64()
        .unwrap();

    let response = post_json_auth(app.clone(), &format!("/api/v1/prd/{id}/analyze"), json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["prd_id"], id);

    let response = post_json_auth(app, "/api/v1/prd/999/analyze", json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_crud_is_scoped_to_its_prd(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);
    let prd_a = create_prd(app.clone(), &token, "A").await["id"].as_i64().unwrap();
    let prd_b = create_prd(app.clone(), &token, "B").await["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/prd/{prd_a}/roles"),
        json!({ "name": "Admin", "description": "Runs the show" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let role_id = body_json(response).await["id"].as_i64().unwrap();

    // Addressed through the wrong PRD.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/prd/{prd_b}/roles/{role_id}"),
        json!({ "name": "Hijacked" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/prd/{prd_a}/roles/{role_id}"),
        json!({ "description": "Still runs the show" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let role = body_json(response).await;
    assert_eq!(role["name"], "Admin");
    assert_eq!(role["description"], "Still runs the show");

    let response = get_auth(app.clone(), &format!("/api/v1/prd/{prd_a}/roles"), &token).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = delete_auth(app.clone(), &format!("/api/v1/prd/{prd_b}/roles/{role_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, &format!("/api/v1/prd/{prd_a}/roles/{role_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Categories and features
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn feature_crud_with_acceptance_criteria(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);
    let prd_id = create_prd(app.clone(), &token, "Shop").await["id"].as_i64().unwrap();
    let category_id = create_category(app.clone(), &token, prd_id, "Checkout").await["id"]
        .as_i64()
        .unwrap();
    let features_uri = format!("/api/v1/prd/{prd_id}/categories/{category_id}/features");

    let response = post_json_auth(
        app.clone(),
        &features_uri,
        json!({
            "title": "Card payments",
            "description": "Pay by card",
            "priority": "HIGH",
            "estimate_hours": 12.5,
            "acceptance_criteria": [
                { "description": "Visa accepted" },
                { "description": "Declines are shown" },
            ],
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let feature = body_json(response).await;
    let feature_id = feature["id"].as_i64().unwrap();
    assert_eq!(feature["priority"], "high");
    assert_eq!(feature["estimate_hours"], 12.5);
    assert_eq!(feature["acceptance_criteria"][1]["description"], "Declines are shown");

    // Defaults.
    let response = post_json_auth(app.clone(), &features_uri, json!({ "title": "Receipts" }), &token).await;
    let defaults = body_json(response).await;
    assert_eq!(defaults["priority"], "medium");
    assert_eq!(defaults["estimate_hours"], 0.0);

    let response = put_json_auth(
        app.clone(),
        &format!("{features_uri}/{feature_id}"),
        json!({ "acceptance_criteria": [{ "description": "Mastercard accepted" }] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Card payments");
    let criteria = updated["acceptance_criteria"].as_array().unwrap();
    assert_eq!(criteria.len(), 1);
    assert_eq!(criteria[0]["description"], "Mastercard accepted");

    // Categories embed their features.
    let response = get_auth(app.clone(), &format!("/api/v1/prd/{prd_id}/categories"), &token).await;
    let categories = body_json(response).await;
    assert_eq!(categories[0]["features"].as_array().unwrap().len(), 2);

    let response = delete_auth(app.clone(), &format!("{features_uri}/{feature_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &format!("{features_uri}/{feature_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feature_input_is_validated(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);
    let prd_id = create_prd(app.clone(), &token, "Shop").await["id"].as_i64().unwrap();
    let category_id = create_category(app.clone(), &token, prd_id, "Checkout").await["id"]
        .as_i64()
        .unwrap();
    let features_uri = format!("/api/v1/prd/{prd_id}/categories/{category_id}/features");

    let response = post_json_auth(
        app.clone(),
        &features_uri,
        json!({ "title": "Bad", "priority": "urgent" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        &features_uri,
        json!({ "title": "Bad", "estimate_hours": -3 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_under_wrong_prd_is_404(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool);
    let prd_a = create_prd(app.clone(), &token, "A").await["id"].as_i64().unwrap();
    let prd_b = create_prd(app.clone(), &token, "B").await["id"].as_i64().unwrap();
    let category_id = create_category(app.clone(), &token, prd_a, "Core").await["id"]
        .as_i64()
        .unwrap();

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/prd/{prd_b}/categories/{category_id}/features"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        format!("Category with id {category_id} not found in PRD {prd_b}")
    );

    let response = put_json_auth(
        app,
        &format!("/api/v1/prd/{prd_b}/categories/{category_id}"),
        json!({ "name": "Moved" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_prd_cascades_to_children(pool: PgPool) {
    let token = user_token(&pool, "pm").await;
    let app = common::build_test_app(pool.clone());
    let prd_id = create_prd(app.clone(), &token, "Doomed").await["id"].as_i64().unwrap();
    let category_id = create_category(app.clone(), &token, prd_id, "Core").await["id"]
        .as_i64()
        .unwrap();

    post_json_auth(
        app.clone(),
        &format!("/api/v1/prd/{prd_id}/roles"),
        json!({ "name": "Guest" }),
        &token,
    )
    .await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/prd/{prd_id}/categories/{category_id}/features"),
        json!({ "title": "Login", "acceptance_criteria": [{ "description": "works" }] }),
        &token,
    )
    .await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/prd/{prd_id}/references"),
        json!({ "name": "Notes", "content_type": "meeting_notes", "content": "..." }),
        &token,
    )
    .await;

    let response = delete_auth(app, &format!("/api/v1/prd/{prd_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    for table in [
        "prd_roles",
        "prd_categories",
        "features",
        "feature_acceptance_criteria",
        "project_references",
    ] {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0, "{table} should be empty after cascade");
    }
}
