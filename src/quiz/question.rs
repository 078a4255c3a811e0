use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use validator::Validate;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Single,
    Multiple,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Single => "single",
            QuestionType::Multiple => "multiple",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "single" => Some(QuestionType::Single),
            "multiple" => Some(QuestionType::Multiple),
            _ => None,
        }
    }
}

/// A stored question. `correct_answers` always indexes into `options`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answers: BTreeSet<usize>,
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid question: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("Option {0} is empty")]
    EmptyOption(usize),
    #[error("At least one correct answer is required")]
    NoCorrectAnswer,
    #[error("Correct answer index {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
    #[error("Single choice questions need exactly one correct answer, got {0}")]
    SingleRequiresOneAnswer(usize),
    #[error("Correct answer index {0} is listed more than once")]
    DuplicateCorrectAnswer(usize),
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Full replacement body for create and update, as sent by the authoring
/// and admin pages. Nothing is persisted until it passes [`QuestionDraft::validate`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[validate(custom = "not_blank")]
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(length(min = 1))]
    pub options: Vec<String>,
    pub correct_answers: Vec<usize>,
}

impl QuestionDraft {
    pub fn new(text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            text: text.into(),
            question_type,
            options: Vec::new(),
            correct_answers: Vec::new(),
        }
    }

    pub fn with_options<I, T>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_correct_answers(mut self, correct: impl IntoIterator<Item = usize>) -> Self {
        self.correct_answers = correct.into_iter().collect();
        self
    }

    /// Starts an edit from the stored record.
    pub fn from_question(question: &Question) -> Self {
        Self {
            text: question.text.clone(),
            question_type: question.question_type,
            options: question.options.clone(),
            correct_answers: question.correct_answers.iter().copied().collect(),
        }
    }

    pub fn add_option(&mut self, text: impl Into<String>) {
        self.options.push(text.into());
    }

    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.options.get_mut(index) {
            Some(option) => {
                *option = text.into();
                true
            }
            None => false,
        }
    }

    /// Removes an option and remaps the correct answers so they keep pointing
    /// at the same texts. A correct answer on the removed option is dropped.
    pub fn remove_option(&mut self, index: usize) -> Option<String> {
        if index >= self.options.len() {
            return None;
        }
        let removed = self.options.remove(index);
        self.correct_answers.retain(|&i| i != index);
        for i in self.correct_answers.iter_mut() {
            if *i > index {
                *i -= 1;
            }
        }
        Some(removed)
    }

    /// Marks or unmarks an option as correct. For single choice a newly
    /// marked option replaces the previous one.
    pub fn toggle_correct(&mut self, index: usize) {
        if let Some(pos) = self.correct_answers.iter().position(|&i| i == index) {
            self.correct_answers.remove(pos);
            return;
        }
        if self.question_type == QuestionType::Single {
            self.correct_answers.clear();
        }
        self.correct_answers.push(index);
    }

    pub fn set_type(&mut self, question_type: QuestionType) {
        self.question_type = question_type;
        if question_type == QuestionType::Single && self.correct_answers.len() > 1 {
            let lowest = self.correct_answers.iter().copied().min();
            self.correct_answers = lowest.into_iter().collect();
        }
    }

    pub fn validate(self) -> Result<ValidDraft, ValidationError> {
        Validate::validate(&self)?;

        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(ValidationError::EmptyOption(index));
        }

        let len = self.options.len();
        let mut correct_answers = BTreeSet::new();
        for &index in &self.correct_answers {
            if index >= len {
                return Err(ValidationError::CorrectAnswerOutOfRange { index, len });
            }
            if !correct_answers.insert(index) {
                return Err(ValidationError::DuplicateCorrectAnswer(index));
            }
        }

        if correct_answers.is_empty() {
            return Err(ValidationError::NoCorrectAnswer);
        }
        if self.question_type == QuestionType::Single && correct_answers.len() != 1 {
            return Err(ValidationError::SingleRequiresOneAnswer(correct_answers.len()));
        }

        Ok(ValidDraft {
            text: self.text,
            question_type: self.question_type,
            options: self.options,
            correct_answers,
        })
    }
}

/// A draft that passed validation. Store writes only accept this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidDraft {
    text: String,
    question_type: QuestionType,
    options: Vec<String>,
    correct_answers: BTreeSet<usize>,
}

impl ValidDraft {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answers(&self) -> &BTreeSet<usize> {
        &self.correct_answers
    }

    pub fn into_question(self, id: i64) -> Question {
        Question {
            id,
            text: self.text,
            question_type: self.question_type,
            options: self.options,
            correct_answers: self.correct_answers,
        }
    }
}
