use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{DatabaseError, Result};
use crate::quiz::{Question, QuestionType, ValidDraft};

/// Row shape of the `questions` table. `options` and `correct_answers` are
/// JSON text and get decoded on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub id: i64,
    pub text: String,
    pub question_type: String,
    pub options: String,
    pub correct_answers: String,
}

impl StoredQuestion {
    pub fn encode(id: i64, draft: &ValidDraft) -> Result<Self> {
        let options = serde_json::to_string(draft.options())
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to encode options: {}", e)))?;
        let correct_answers = serde_json::to_string(draft.correct_answers())
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to encode correct answers: {}", e)))?;

        Ok(StoredQuestion {
            id,
            text: draft.text().to_string(),
            question_type: draft.question_type().as_str().to_string(),
            options,
            correct_answers,
        })
    }

    pub fn decode(self) -> Result<Question> {
        let id = self.id;
        let corrupt = |reason: String| DatabaseError::CorruptRow { id, reason };

        let question_type = QuestionType::parse(&self.question_type)
            .ok_or_else(|| corrupt(format!("unknown question type '{}'", self.question_type)))?;
        let options: Vec<String> = serde_json::from_str(&self.options)
            .map_err(|e| corrupt(format!("options: {}", e)))?;
        let correct_answers: BTreeSet<usize> = serde_json::from_str(&self.correct_answers)
            .map_err(|e| corrupt(format!("correct_answers: {}", e)))?;

        if let Some(index) = correct_answers.iter().find(|&&i| i >= options.len()) {
            return Err(corrupt(format!(
                "correct answer {} out of range for {} options",
                index,
                options.len()
            )));
        }

        Ok(Question {
            id,
            text: self.text,
            question_type,
            options,
            correct_answers,
        })
    }
}
