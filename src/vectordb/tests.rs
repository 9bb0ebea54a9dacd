use super::*;

const TEST_COLLECTION: &str = "test_collection";
const TEST_VECTOR_SIZE: u64 = 8;

fn unit(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; TEST_VECTOR_SIZE as usize];
    v[i] = 1.0;
    v
}

fn point(id: u64, vector: Vec<f32>, generated_at: i64) -> VectorPoint {
    VectorPoint::new(id, vector, format!("prompt {id}"), format!("response {id}"))
        .with_dialect("postgresql")
        .with_generated_at(generated_at)
}

async fn store_with_collection() -> MockVectorStore {
    let store = MockVectorStore::new();
    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .expect("should create collection");
    store
}

#[tokio::test]
async fn test_ensure_collection_idempotent() {
    let store = store_with_collection().await;
    store.upsert(TEST_COLLECTION, point(1, unit(0), 0), WriteConsistency::Strong).await.unwrap();

    store
        .ensure_collection(TEST_COLLECTION, TEST_VECTOR_SIZE)
        .await
        .unwrap();

    assert_eq!(store.point_count(TEST_COLLECTION), Some(1));
}

#[tokio::test]
async fn test_upsert_replaces_existing() {
    let store = store_with_collection().await;

    store.upsert(TEST_COLLECTION, point(1, unit(0), 10), WriteConsistency::Strong).await.unwrap();
    let replacement = VectorPoint::new(1, unit(0), "prompt 1", "updated");
    store.upsert(TEST_COLLECTION, replacement, WriteConsistency::Strong).await.unwrap();

    assert_eq!(store.point_count(TEST_COLLECTION), Some(1));
    let results = store.search(TEST_COLLECTION, unit(0), 1).await.unwrap();
    assert_eq!(results[0].response, "updated");
}

#[tokio::test]
async fn test_upsert_to_nonexistent_collection() {
    let store = MockVectorStore::new();

    let result = store
        .upsert("nonexistent", point(1, unit(0), 0), WriteConsistency::Strong)
        .await;

    assert!(matches!(result, Err(VectorDbError::CollectionNotFound { .. })));
}

#[tokio::test]
async fn test_upsert_wrong_dimension() {
    let store = store_with_collection().await;

    let result = store
        .upsert(TEST_COLLECTION, point(1, vec![0.1; 3], 0), WriteConsistency::Strong)
        .await;

    assert!(matches!(
        result,
        Err(VectorDbError::InvalidDimension { expected: 8, actual: 3 })
    ));
}

#[tokio::test]
async fn test_search_orders_by_similarity() {
    let store = store_with_collection().await;
    let mut close = unit(0);
    close[1] = 0.5;

    store.upsert(TEST_COLLECTION, point(1, unit(1), 0), WriteConsistency::Strong).await.unwrap();
    store.upsert(TEST_COLLECTION, point(2, close, 0), WriteConsistency::Strong).await.unwrap();
    store.upsert(TEST_COLLECTION, point(3, unit(0), 0), WriteConsistency::Strong).await.unwrap();

    let results = store.search(TEST_COLLECTION, unit(0), 10).await.unwrap();

    let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert!(results[0].distance().abs() < 1e-6);
    assert!((results[2].distance() - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_search_ties_break_by_age_then_id() {
    let store = store_with_collection().await;

    store.upsert(TEST_COLLECTION, point(9, unit(0), 200), WriteConsistency::Strong).await.unwrap();
    store.upsert(TEST_COLLECTION, point(7, unit(0), 100), WriteConsistency::Strong).await.unwrap();
    store.upsert(TEST_COLLECTION, point(5, unit(0), 200), WriteConsistency::Strong).await.unwrap();

    let results = store.search(TEST_COLLECTION, unit(0), 10).await.unwrap();

    let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![7, 5, 9]);
}

#[tokio::test]
async fn test_search_respects_limit() {
    let store = store_with_collection().await;
    for id in 0..5 {
        store
            .upsert(TEST_COLLECTION, point(id, unit(id as usize), 0), WriteConsistency::Strong)
            .await
            .unwrap();
    }

    let results = store.search(TEST_COLLECTION, unit(0), 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 0);
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let store = store_with_collection().await;
    store.ensure_collection("other", TEST_VECTOR_SIZE).await.unwrap();

    store.upsert(TEST_COLLECTION, point(1, unit(0), 0), WriteConsistency::Strong).await.unwrap();

    assert!(store.search("other", unit(0), 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_store_fails() {
    let store = store_with_collection().await;
    store.set_unavailable(true);

    assert!(!store.is_ready().await);
    assert!(matches!(
        store.search(TEST_COLLECTION, unit(0), 1).await,
        Err(VectorDbError::SearchFailed { .. })
    ));
    assert!(
        store
            .upsert(TEST_COLLECTION, point(1, unit(0), 0), WriteConsistency::Strong)
            .await
            .is_err()
    );
}

#[test]
fn test_cosine_similarity() {
    assert!((cosine_similarity(&unit(0), &unit(0)) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&unit(0), &unit(1)).abs() < 1e-6);
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
}

#[test]
fn test_point_payload_fields() {
    let payload = point(4, unit(0), 1234).payload();

    let text = |field: &str| payload[field].as_str().map(|s| s.to_string());
    assert_eq!(text("prompt").as_deref(), Some("prompt 4"));
    assert_eq!(text("response").as_deref(), Some("response 4"));
    assert_eq!(payload["generated_at"].as_integer(), Some(1234));
}

#[test]
fn test_write_consistency_maps_to_wait_flag() {
    assert!(bool::from(WriteConsistency::Strong));
    assert!(!bool::from(WriteConsistency::Eventual));
}
