use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::GatewayError;
use super::state::HandlerState;
use super::{INACCURATE_OUTPUT_WARNING, SQLGEN_SOURCE_HEADER, SQLGEN_WARNING_HEADER};
use crate::cache::CacheStrategy;
use crate::generation::CompletionBackend;
use crate::kvstore::KeyValueStore;
use crate::pipeline::{Answer, AnswerSource};
use crate::schema::Dialect;
use crate::vectordb::VectorStore;

/// Body of `POST /v1/query`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueryRequest {
    pub query: String,
    pub dialect: Dialect,
    pub strategy: CacheStrategy,
    #[serde(default)]
    pub distance_threshold: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub text: String,
    pub elapsed_seconds: f64,
    pub source: AnswerSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

impl From<Answer> for QueryResponse {
    fn from(answer: Answer) -> Self {
        Self {
            elapsed_seconds: answer.elapsed_seconds(),
            text: answer.text,
            source: answer.source,
            distance: answer.distance,
        }
    }
}

#[instrument(
    skip(state, request),
    fields(dialect = tracing::field::Empty, strategy = tracing::field::Empty)
)]
pub async fn query_handler<K, V, C>(
    State(state): State<HandlerState<K, V, C>>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError>
where
    K: KeyValueStore + 'static,
    V: VectorStore + 'static,
    C: CompletionBackend + 'static,
{
    let request: QueryRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;

    let span = tracing::Span::current();
    span.record("dialect", tracing::field::display(request.dialect));
    span.record("strategy", tracing::field::display(request.strategy));
    debug!(query_len = request.query.len(), "Processing query request");

    let answer = state
        .pipeline
        .answer(
            &request.query,
            request.dialect,
            request.strategy,
            request.distance_threshold,
        )
        .await?;

    Ok(make_response(answer))
}

pub(crate) fn make_response(answer: Answer) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SQLGEN_SOURCE_HEADER,
        HeaderValue::from_static(answer.source.as_str()),
    );
    headers.insert(
        SQLGEN_WARNING_HEADER,
        HeaderValue::from_static(INACCURATE_OUTPUT_WARNING),
    );

    (StatusCode::OK, headers, Json(QueryResponse::from(answer))).into_response()
}
