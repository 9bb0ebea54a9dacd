use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::SQLGEN_STATUS_HEADER;
use crate::pipeline::{ErrorKind, PipelineError};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            GatewayError::Pipeline(err) => err.kind(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::UnsafeInput | ErrorKind::ValidationExhausted => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorKind::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind().as_str();

        let mut headers = HeaderMap::new();
        headers.insert(SQLGEN_STATUS_HEADER, HeaderValue::from_static(kind));

        let body = Json(ErrorResponse {
            kind,
            message: self.to_string(),
        });

        (status, headers, body).into_response()
    }
}
