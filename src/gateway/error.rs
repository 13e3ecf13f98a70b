use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::search::SearchError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Search(#[from] SearchError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Search(err) = self;
        let status = match &err {
            SearchError::Validation { .. } => StatusCode::BAD_REQUEST,
            SearchError::VectorStore(_) | SearchError::Embedding(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = Json(ErrorResponse {
            error: err.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
