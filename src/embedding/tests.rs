use super::*;

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

mod config_tests {
    use super::*;

    #[test]
    fn test_embedder_config_default_is_stub() {
        let config = EmbedderConfig::default();
        assert!(config.is_stub());
        assert_eq!(config.embedding_dim, DEFAULT_EMBEDDING_DIM);
        assert_eq!(config.model, DEFAULT_EMBEDDING_MODEL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedder_config_rejects_zero_dim() {
        let config = EmbedderConfig::stub().embedding_dim(0);
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_embedder_config_rejects_non_http_endpoint() {
        let config = EmbedderConfig::http("ftp://example.com", "m");
        assert!(config.validate().is_err());

        let config = EmbedderConfig::http("https://api.openai.com/v1", "m");
        assert!(config.validate().is_ok());
        assert!(!config.is_stub());
    }
}

#[tokio::test]
async fn test_stub_embedding_has_configured_dimension() {
    let embedder = TextEmbedder::stub(64).unwrap();
    assert!(embedder.is_stub());

    let v = embedder.embed("list all users").await.unwrap();
    assert_eq!(v.len(), 64);
    assert_eq!(embedder.dimension(), 64);
}

#[tokio::test]
async fn test_stub_embedding_is_deterministic_and_normalized() {
    let embedder = TextEmbedder::stub(DEFAULT_EMBEDDING_DIM).unwrap();

    let a = embedder.embed("list all users older than 30").await.unwrap();
    let b = embedder.embed("list all users older than 30").await.unwrap();

    assert_eq!(a, b);
    assert!((cosine(&a, &a) - 1.0).abs() < 1e-5);
}

#[tokio::test]
async fn test_stub_embedding_ranks_near_duplicates_closer() {
    let embedder = TextEmbedder::stub(DEFAULT_EMBEDDING_DIM).unwrap();

    let base = embedder.embed("list all users older than 30").await.unwrap();
    let near = embedder.embed("list all users older than 40").await.unwrap();
    let far = embedder.embed("count orders per region").await.unwrap();

    assert!(cosine(&base, &near) > cosine(&base, &far));
}

#[tokio::test]
async fn test_stub_embedding_ignores_case_and_punctuation() {
    let embedder = TextEmbedder::stub(128).unwrap();

    let a = embedder.embed("List ALL users!").await.unwrap();
    let b = embedder.embed("list all users").await.unwrap();

    assert_eq!(a, b);
}

#[tokio::test]
async fn test_stub_embedding_of_empty_text_is_zero_vector() {
    let embedder = TextEmbedder::stub(16).unwrap();
    let v = embedder.embed("   ").await.unwrap();
    assert!(v.iter().all(|x| *x == 0.0));
}

#[test]
fn test_debug_output_names_backend() {
    let embedder = TextEmbedder::stub(8).unwrap();
    let debug = format!("{:?}", embedder);
    assert!(debug.contains("TextEmbedder"));
    assert!(debug.contains("Stub"));
}
