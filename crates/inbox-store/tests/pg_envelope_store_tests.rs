//! Integration tests for `PgEnvelopeStore`.
//!
//! Requires a running `PostgreSQL` instance with `DATABASE_URL` set.

use chrono::{DateTime, TimeZone, Utc};
use futures::TryStreamExt;
use inbox_core::envelope::{Document, Envelope, EnvelopeId, NewEnvelope};
use inbox_core::error::StoreError;
use inbox_core::store::EnvelopeStore;
use inbox_store::pg_envelope_store::PgEnvelopeStore;
use serde_json::json;
use sqlx::PgPool;
use tracing::Span;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn store(pool: PgPool) -> PgEnvelopeStore {
    PgEnvelopeStore::new(pool, Span::none())
}

/// Helper to build a `NewEnvelope` with a fixed timestamp.
fn new_envelope(discriminator: &str, document: serde_json::Value) -> NewEnvelope {
    NewEnvelope {
        discriminator: discriminator.to_owned(),
        document: Document::new(document),
        created_at: fixed_now(),
    }
}

// --- insert + get_by_id ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_and_get_round_trip(pool: PgPool) {
    let repo = store(pool);
    let document = json!({
        "name": "Maddy Montaquila",
        "contact": {
            "address": {"street": "1 Main St", "city": "Camberwick Green", "postcode": "CW1 5ZH", "country": "UK"},
            "phone": "01632 12345"
        }
    });

    let id = repo
        .insert(new_envelope("Author", document.clone()))
        .await
        .unwrap();
    let loaded = repo.get_by_id(id).await.unwrap();

    assert_eq!(loaded.id, id);
    assert_eq!(loaded.discriminator, "Author");
    assert_eq!(loaded.document.as_value(), &document);
    assert_eq!(loaded.created_at, fixed_now());
    assert_eq!(loaded.updated_at, fixed_now());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_assigns_distinct_ids(pool: PgPool) {
    let repo = store(pool);

    let first = repo.insert(new_envelope("EventA", json!({"name": "a"}))).await.unwrap();
    let second = repo.insert(new_envelope("EventA", json!({"name": "a"}))).await.unwrap();

    assert_ne!(first, second);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_get_missing_envelope_is_not_found(pool: PgPool) {
    let repo = store(pool);

    let result = repo.get_by_id(EnvelopeId::new(i64::MAX)).await;

    assert!(matches!(result, Err(StoreError::NotFound(id)) if id == EnvelopeId::new(i64::MAX)));
}

// --- discriminator isolation ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_query_by_discriminator_isolates_payload_types(pool: PgPool) {
    let repo = store(pool);
    let a_id = repo
        .insert(new_envelope("EventA", json!({"name": "Maddy Montaquila"})))
        .await
        .unwrap();
    repo.insert(new_envelope("EventB", json!({"name": "Jeremy Likness", "age": 43})))
        .await
        .unwrap();

    let rows: Vec<Envelope> = repo
        .query_by_discriminator("EventA")
        .try_collect()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, a_id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_query_by_discriminator_orders_by_id_and_rereads(pool: PgPool) {
    let repo = store(pool);
    let first = repo.insert(new_envelope("EventA", json!({"name": "1"}))).await.unwrap();

    let before: Vec<Envelope> = repo
        .query_by_discriminator("EventA")
        .try_collect()
        .await
        .unwrap();
    let second = repo.insert(new_envelope("EventA", json!({"name": "2"}))).await.unwrap();
    let after: Vec<Envelope> = repo
        .query_by_discriminator("EventA")
        .try_collect()
        .await
        .unwrap();

    assert_eq!(before.len(), 1);
    assert_eq!(
        after.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![first, second]
    );
}

// --- document field filter ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_query_by_field_matches_nested_value(pool: PgPool) {
    let repo = store(pool);
    let wanted = repo
        .insert(new_envelope(
            "Author",
            json!({"name": "a", "contact": {"address": {"city": "Camberwick Green"}}}),
        ))
        .await
        .unwrap();
    repo.insert(new_envelope(
        "Author",
        json!({"name": "b", "contact": {"address": {"city": "Trumpton"}}}),
    ))
    .await
    .unwrap();

    let path = ["contact", "address", "city"];
    let value = json!("Camberwick Green");
    let rows: Vec<Envelope> = repo
        .query_by_field("Author", &path, &value)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, wanted);
}

// --- replace ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_replace_swaps_document_and_stamps_update(pool: PgPool) {
    let repo = store(pool);
    let id = repo
        .insert(new_envelope("EventB", json!({"name": "Jeremy Likness", "age": 43})))
        .await
        .unwrap();
    let later = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();

    repo.replace(
        id,
        "EventB",
        Document::new(json!({"name": "Jeremy Likness", "age": 44})),
        later,
    )
    .await
    .unwrap();

    let loaded = repo.get_by_id(id).await.unwrap();
    assert_eq!(loaded.document.as_value()["age"], json!(44));
    assert_eq!(loaded.created_at, fixed_now());
    assert_eq!(loaded.updated_at, later);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_replace_with_other_discriminator_is_not_found(pool: PgPool) {
    let repo = store(pool);
    let id = repo
        .insert(new_envelope("EventB", json!({"name": "Jeremy Likness", "age": 43})))
        .await
        .unwrap();

    let result = repo
        .replace(id, "EventA", Document::new(json!({"name": "x"})), fixed_now())
        .await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
    let loaded = repo.get_by_id(id).await.unwrap();
    assert_eq!(loaded.document.as_value()["age"], json!(43));
}

// --- delete ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_removes_envelope(pool: PgPool) {
    let repo = store(pool);
    let id = repo.insert(new_envelope("EventA", json!({"name": "a"}))).await.unwrap();

    repo.delete(id).await.unwrap();

    assert!(matches!(repo.get_by_id(id).await, Err(StoreError::NotFound(_))));
    assert!(matches!(repo.delete(id).await, Err(StoreError::NotFound(_))));
}

// --- timestamp precision ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_timestamp_precision(pool: PgPool) {
    let repo = store(pool);
    let mut envelope = new_envelope("EventA", json!({"name": "a"}));
    envelope.created_at = Utc::now();
    let original = envelope.created_at;

    let id = repo.insert(envelope).await.unwrap();

    // PostgreSQL TIMESTAMPTZ has microsecond precision.
    let loaded = repo.get_by_id(id).await.unwrap();
    assert_eq!(
        original.timestamp_micros(),
        loaded.created_at.timestamp_micros()
    );
}
