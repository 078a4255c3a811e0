use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{PresentedQuestion, QuestionType};

/// Option indices a test-taker picked, in presented index space.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<usize>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single choice replaces the previous pick, multiple choice toggles.
    pub fn select(&mut self, question_type: QuestionType, index: usize) {
        match question_type {
            QuestionType::Single => {
                self.0.clear();
                self.0.insert(index);
            }
            QuestionType::Multiple => {
                if !self.0.remove(&index) {
                    self.0.insert(index);
                }
            }
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &BTreeSet<usize> {
        &self.0
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QuestionResult {
    pub question_id: i64,
    pub text: String,
    pub selected_answers: Vec<String>,
    pub correct_answers: Vec<String>,
    pub is_correct: bool,
}

/// Exact-match scoring: the selection must equal the correct set. Partial
/// overlap is wrong, and so is any out-of-range index.
pub fn score(question: &PresentedQuestion, selection: &Selection) -> QuestionResult {
    let is_correct = selection.indices() == &question.correct_answers;

    QuestionResult {
        question_id: question.id,
        text: question.text.clone(),
        selected_answers: option_texts(&question.options, selection.indices()),
        correct_answers: option_texts(&question.options, &question.correct_answers),
        is_correct,
    }
}

fn option_texts(options: &[String], indices: &BTreeSet<usize>) -> Vec<String> {
    indices.iter().filter_map(|&i| options.get(i).cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented(question_type: QuestionType, options: &[&str], correct: &[usize]) -> PresentedQuestion {
        PresentedQuestion {
            id: 1,
            text: "Pick".to_string(),
            question_type,
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answers: correct.iter().copied().collect(),
        }
    }

    fn sel(indices: &[usize]) -> Selection {
        indices.iter().copied().collect()
    }

    #[test]
    fn single_choice_scores_only_the_remapped_index() {
        // options shuffled from ["A", "B", "C"], "B" was correct
        let q = presented(QuestionType::Single, &["C", "A", "B"], &[2]);

        let result = score(&q, &sel(&[2]));
        assert!(result.is_correct);
        assert_eq!(result.selected_answers, vec!["B"]);
        assert_eq!(result.correct_answers, vec!["B"]);

        assert!(!score(&q, &sel(&[0])).is_correct);
        assert!(!score(&q, &sel(&[1])).is_correct);
    }

    #[test]
    fn multiple_choice_needs_exact_set() {
        let q = presented(QuestionType::Multiple, &["A", "B", "C", "D"], &[0, 2]);

        assert!(score(&q, &sel(&[0, 2])).is_correct);
        assert!(score(&q, &sel(&[2, 0])).is_correct);
        assert!(!score(&q, &sel(&[0])).is_correct);
        assert!(!score(&q, &sel(&[0, 1, 2])).is_correct);
        assert!(!score(&q, &sel(&[1, 3])).is_correct);
        assert!(!score(&q, &sel(&[])).is_correct);
    }

    #[test]
    fn out_of_range_selection_is_wrong_but_harmless() {
        let q = presented(QuestionType::Multiple, &["A", "B"], &[1]);

        let result = score(&q, &sel(&[1, 9]));
        assert!(!result.is_correct);
        assert_eq!(result.selected_answers, vec!["B"]);
        assert_eq!(result.correct_answers, vec!["B"]);
    }

    #[test]
    fn empty_sets_only_match_each_other() {
        let degenerate = presented(QuestionType::Multiple, &["A", "B"], &[]);
        assert!(score(&degenerate, &Selection::new()).is_correct);
        assert!(!score(&degenerate, &sel(&[0])).is_correct);
    }

    #[test]
    fn single_selection_replaces_previous_pick() {
        let mut selection = Selection::new();
        selection.select(QuestionType::Single, 0);
        selection.select(QuestionType::Single, 2);
        assert_eq!(selection, sel(&[2]));

        selection.select(QuestionType::Single, 2);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn multiple_selection_toggles() {
        let mut selection = Selection::new();
        selection.select(QuestionType::Multiple, 0);
        selection.select(QuestionType::Multiple, 3);
        selection.select(QuestionType::Multiple, 1);
        selection.select(QuestionType::Multiple, 0);
        assert_eq!(selection, sel(&[1, 3]));
        assert!(!selection.contains(0));

        selection.clear();
        assert!(selection.is_empty());
    }
}
