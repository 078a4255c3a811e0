use log::info;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use super::models::StoredQuestion;
use super::{DatabaseError, QuestionStore, Result};
use crate::quiz::{Question, ValidDraft};

/// In-process store with the same contract as [`super::DatabaseManager`].
/// Rows are kept in their encoded form so reads go through the same decoding.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug)]
struct MemoryInner {
    next_id: i64,
    rows: BTreeMap<i64, StoredQuestion>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionStore for MemoryStore {
    async fn create(&self, draft: &ValidDraft) -> Result<i64> {
        let mut inner = self.inner.lock();
        let id = inner.next_id;
        let stored = StoredQuestion::encode(id, draft)?;
        inner.rows.insert(id, stored);
        inner.next_id += 1;

        info!("Inserted question {}", id);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Question>> {
        let rows: Vec<StoredQuestion> = self.inner.lock().rows.values().cloned().collect();
        rows.into_iter().map(StoredQuestion::decode).collect()
    }

    async fn get(&self, id: i64) -> Result<Question> {
        let row = self.inner.lock().rows.get(&id).cloned();
        row.ok_or(DatabaseError::QuestionNotFound(id))?.decode()
    }

    async fn update(&self, id: i64, draft: &ValidDraft) -> Result<u64> {
        let stored = StoredQuestion::encode(id, draft)?;
        let mut inner = self.inner.lock();
        match inner.rows.get_mut(&id) {
            Some(row) => {
                *row = stored;
                info!("Question {} updated", id);
                Ok(1)
            }
            None => Err(DatabaseError::QuestionNotFound(id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        match self.inner.lock().rows.remove(&id) {
            Some(_) => {
                info!("Question {} deleted", id);
                Ok(1)
            }
            None => Err(DatabaseError::QuestionNotFound(id)),
        }
    }
}
