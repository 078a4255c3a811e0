pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::StoredQuestion;
pub use postgres::DatabaseManager;

use std::future::Future;
use thiserror::Error;

use crate::quiz::{Question, ValidDraft};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Question not found: {0}")]
    QuestionNotFound(i64),
    #[error("Corrupt question row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Durable keyed collection of questions.
///
/// Writes take a [`ValidDraft`], so callers must validate before persisting.
/// `update` and `delete` return the number of changed rows and signal
/// [`DatabaseError::QuestionNotFound`] when nothing matched. Each call is a
/// single statement; there is no partial-field update and no retry.
pub trait QuestionStore: Send + Sync + 'static {
    fn create(&self, draft: &ValidDraft) -> impl Future<Output = Result<i64>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<Question>>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Question>> + Send;

    fn update(&self, id: i64, draft: &ValidDraft) -> impl Future<Output = Result<u64>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<u64>> + Send;
}
