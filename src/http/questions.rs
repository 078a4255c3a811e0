use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, info};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::error::ApiError;
use crate::database::QuestionStore;
use crate::quiz::{present_all, PresentedQuestion, Question, QuestionDraft};

pub(crate) fn create_router<S: QuestionStore>() -> Router<Arc<S>> {
    Router::new()
        .route("/", get(list_questions::<S>).post(create_question::<S>))
        .route("/presented", get(presented_questions::<S>))
        .route(
            "/:id",
            get(get_question::<S>)
                .put(update_question::<S>)
                .delete(delete_question::<S>),
        )
}

#[derive(Serialize)]
struct ChangeResponse {
    message: &'static str,
    changes: u64,
}

async fn create_question<S: QuestionStore>(
    State(store): State<Arc<S>>,
    payload: Result<Json<QuestionDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(draft) = payload?;
    let draft = draft.validate()?;

    let id = store.create(&draft).await?;
    info!("Created question {}", id);

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
}

async fn list_questions<S: QuestionStore>(State(store): State<Arc<S>>) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = store.list().await?;
    debug!("Listing {} questions", questions.len());
    Ok(Json(questions))
}

/// Every stored question with freshly shuffled options. Each request is a
/// new shuffle.
async fn presented_questions<S: QuestionStore>(
    State(store): State<Arc<S>>,
) -> Result<Json<Vec<PresentedQuestion>>, ApiError> {
    let questions = store.list().await?;
    let presented = present_all(&questions, &mut rand::thread_rng());
    Ok(Json(presented))
}

async fn get_question<S: QuestionStore>(
    State(store): State<Arc<S>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Question>, ApiError> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

async fn update_question<S: QuestionStore>(
    State(store): State<Arc<S>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<QuestionDraft>, JsonRejection>,
) -> Result<Json<ChangeResponse>, ApiError> {
    let Path(id) = id?;
    let Json(draft) = payload?;
    let draft = draft.validate()?;

    let changes = store.update(id, &draft).await?;
    info!("Updated question {}", id);

    Ok(Json(ChangeResponse {
        message: "Question updated successfully",
        changes,
    }))
}

async fn delete_question<S: QuestionStore>(
    State(store): State<Arc<S>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ChangeResponse>, ApiError> {
    let Path(id) = id?;

    let changes = store.delete(id).await?;
    info!("Deleted question {}", id);

    Ok(Json(ChangeResponse {
        message: "Question deleted successfully",
        changes,
    }))
}
