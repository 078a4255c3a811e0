use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Question, QuestionType};

/// A question as shown to one test-taker: options in display order and the
/// correct answers remapped to that order. Never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PresentedQuestion {
    pub id: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answers: BTreeSet<usize>,
}

/// Shuffles the options of `question` with a uniform (Fisher-Yates) permutation.
pub fn present<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> PresentedQuestion {
    let mut order: Vec<usize> = (0..question.options.len()).collect();
    order.shuffle(rng);

    // `order` is a permutation of the option indices by construction
    apply_permutation(question, &order).unwrap_or_else(|| identity(question))
}

pub fn present_all<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Vec<PresentedQuestion> {
    questions.iter().map(|q| present(q, rng)).collect()
}

/// Builds the presented form from an explicit display order, where `order[i]`
/// is the original index of the option shown at position `i`.
///
/// Returns `None` if `order` is not a permutation of `0..options.len()`.
pub fn apply_permutation(question: &Question, order: &[usize]) -> Option<PresentedQuestion> {
    let len = question.options.len();
    if order.len() != len {
        return None;
    }
    let mut seen = vec![false; len];
    for &original in order {
        if original >= len || std::mem::replace(&mut seen[original], true) {
            return None;
        }
    }

    let tagged: Vec<(usize, &String)> = order.iter().map(|&i| (i, &question.options[i])).collect();

    let options = tagged.iter().map(|(_, text)| (*text).clone()).collect();
    let correct_answers = tagged
        .iter()
        .enumerate()
        .filter(|(_, (original, _))| question.correct_answers.contains(original))
        .map(|(position, _)| position)
        .collect();

    Some(PresentedQuestion {
        id: question.id,
        text: question.text.clone(),
        question_type: question.question_type,
        options,
        correct_answers,
    })
}

fn identity(question: &Question) -> PresentedQuestion {
    PresentedQuestion {
        id: question.id,
        text: question.text.clone(),
        question_type: question.question_type,
        options: question.options.clone(),
        correct_answers: question.correct_answers.clone(),
    }
}
