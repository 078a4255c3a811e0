use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::quiz::ValidationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Invalid question id: {0}")]
    Path(#[from] PathRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Database(DatabaseError::QuestionNotFound(id)) => {
                warn!("Question {} not found", id);
                (StatusCode::NOT_FOUND, Json(json!({ "message": "Question not found" }))).into_response()
            }
            Self::Validation(_) | Self::Body(_) | Self::Path(_) => {
                warn!("Rejected request: {}", self);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": self.to_string() }))).into_response()
            }
            Self::Database(e) => {
                error!("Store failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
            }
        }
    }
}
