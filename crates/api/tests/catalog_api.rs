//! Database-backed tests for health, the fabric catalog and `fabric_id`
//! handling on generate.
//!
//! Each test gets a fresh database from `sqlx::test` (needs `DATABASE_URL`).

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app_with_pool, get, multipart_request, send, Part, TestApp,
    DESCRIPTION, RESULT_URL,
};
use reupholster_pipeline::testing::MemoryStore;
use sqlx::PgPool;

const GENERATE: &str = "/api/v1/simulations/generate";

fn app_with(pool: PgPool) -> TestApp {
    build_test_app_with_pool(pool, Ok(DESCRIPTION), Ok(RESULT_URL), MemoryStore::new())
}

async fn seed_fabric(pool: &PgPool, name: &str, image_url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO fabrics (name, color, image_url) VALUES ($1, 'grey', $2) RETURNING id",
    )
    .bind(name)
    .bind(image_url)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn source_part() -> Part<'static> {
    Part::File {
        name: "source",
        filename: "sofa.jpg",
        bytes: b"sofa",
    }
}

fn fabric_part() -> Part<'static> {
    Part::File {
        name: "fabric",
        filename: "velvet.png",
        bytes: b"velvet",
    }
}

// ---------------------------------------------------------------------------
// Test: GET /health reports a reachable database
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_reports_database(pool: PgPool) {
    let app = app_with(pool);

    let response = get(app.router.clone(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: GET /fabrics lists the catalog by name
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn fabrics_are_listed_by_name(pool: PgPool) {
    seed_fabric(&pool, "Velvet", "/uploads/velvet.png").await;
    seed_fabric(&pool, "Linen", "/uploads/linen.png").await;
    let app = app_with(pool);

    let json = body_json(get(app.router.clone(), "/api/v1/fabrics").await).await;
    let names: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Linen", "Velvet"]);
}

// ---------------------------------------------------------------------------
// Test: a catalog fabric stands in for a missing fabric upload
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn catalog_fabric_is_used_when_no_fabric_upload(pool: PgPool) {
    let id = seed_fabric(&pool, "Velvet", "/uploads/velvet.png").await;
    let app = app_with(pool);
    std::fs::write(app.upload_dir.path().join("velvet.png"), b"velvet").unwrap();

    let id_text = id.to_string();
    let parts = [
        source_part(),
        Part::Text {
            name: "fabric_id",
            value: &id_text,
        },
    ];
    let response = send(app.router.clone(), multipart_request(GENERATE, &parts)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["fabric_image_url"], "/uploads/velvet.png");
    assert_eq!(json["data"]["fabric_id"], id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_catalog_fabric_returns_404(pool: PgPool) {
    let app = app_with(pool);

    let parts = [
        source_part(),
        Part::Text {
            name: "fabric_id",
            value: "9999",
        },
    ];
    let response = send(app.router.clone(), multipart_request(GENERATE, &parts)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.describer.call_count(), 0);
    assert_eq!(app.stored_upload_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: fabric_id sent alongside an uploaded fabric photo
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn known_fabric_id_is_recorded_with_uploaded_fabric(pool: PgPool) {
    let id = seed_fabric(&pool, "Velvet", "/uploads/velvet.png").await;
    let app = app_with(pool);

    let id_text = format!(" {id} ");
    let parts = [
        source_part(),
        fabric_part(),
        Part::Text {
            name: "fabric_id",
            value: &id_text,
        },
    ];
    let response = send(app.router.clone(), multipart_request(GENERATE, &parts)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["fabric_id"], id);
    assert_ne!(json["data"]["fabric_image_url"], "/uploads/velvet.png");
    assert_eq!(app.store.rows()[0].fabric_id, Some(id));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_fabric_id_with_uploaded_fabric_returns_404(pool: PgPool) {
    let app = app_with(pool);

    let parts = [
        source_part(),
        fabric_part(),
        Part::Text {
            name: "fabric_id",
            value: "999",
        },
    ];
    let response = send(app.router.clone(), multipart_request(GENERATE, &parts)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Fabric with id 999 not found");
    assert_eq!(app.describer.call_count(), 0);
    assert_eq!(app.stored_upload_count(), 0);
    assert!(app.store.rows().is_empty());
}
