use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::randomizer::{present_all, PresentedQuestion};
use super::scorer::{score, QuestionResult, Selection};
use super::Question;
use crate::database::{self, QuestionStore};

/// One test-taking pass. Owns its shuffled questions and the selections made
/// so far; nothing here is shared with other sessions or written back.
#[derive(Debug, Clone)]
pub struct TestSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    questions: Vec<PresentedQuestion>,
    selections: HashMap<i64, Selection>,
    cursor: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TestReport {
    pub session_id: Uuid,
    pub score: usize,
    pub total_questions: usize,
    pub results: Vec<QuestionResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TestSession {
    /// Fetches every stored question and shuffles each one for this session.
    /// A failed read is returned as is and no session is created.
    pub async fn start<S, R>(store: &S, rng: &mut R) -> database::Result<Self>
    where
        S: QuestionStore,
        R: Rng + ?Sized,
    {
        let questions = store.list().await?;
        Ok(Self::from_questions(&questions, rng))
    }

    pub fn from_questions<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Self {
        Self::from_presented(present_all(questions, rng))
    }

    pub fn from_presented(questions: Vec<PresentedQuestion>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            questions,
            selections: HashMap::new(),
            cursor: 0,
        };
        info!("Started test session {} with {} questions", session.id, session.questions.len());
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn questions(&self) -> &[PresentedQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&PresentedQuestion> {
        self.questions.get(self.cursor)
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.questions.len()
    }

    /// Moves to the next question. Returns `false` when already on the last one.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Records a pick on `question_id` with the capture rule of its type.
    /// Returns `false` if the question is not part of this session or
    /// `index` is not one of its options.
    pub fn select(&mut self, question_id: i64, index: usize) -> bool {
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            return false;
        };
        if index >= question.options.len() {
            return false;
        }
        self.selections
            .entry(question_id)
            .or_default()
            .select(question.question_type, index);
        true
    }

    pub fn selection(&self, question_id: i64) -> Option<&Selection> {
        self.selections.get(&question_id)
    }

    /// Scores every question in presentation order. Unanswered questions
    /// score with an empty selection.
    pub fn finish(self) -> TestReport {
        let empty = Selection::new();
        let results: Vec<QuestionResult> = self
            .questions
            .iter()
            .map(|q| score(q, self.selections.get(&q.id).unwrap_or(&empty)))
            .collect();
        let correct = results.iter().filter(|r| r.is_correct).count();

        info!(
            "Test session {} finished: {} of {} correct",
            self.id,
            correct,
            results.len()
        );

        TestReport {
            session_id: self.id,
            score: correct,
            total_questions: results.len(),
            results,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DatabaseError, MemoryStore};
    use crate::quiz::randomizer::apply_permutation;
    use crate::quiz::{QuestionDraft, QuestionType, ValidDraft};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::future::Future;

    fn question(id: i64, question_type: QuestionType, options: &[&str], correct: &[usize]) -> Question {
        Question {
            id,
            text: format!("Question {}", id),
            question_type,
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answers: correct.iter().copied().collect(),
        }
    }

    fn fixed_session() -> TestSession {
        let single = question(1, QuestionType::Single, &["A", "B", "C"], &[1]);
        let multiple = question(2, QuestionType::Multiple, &["A", "B", "C", "D"], &[0, 2]);
        TestSession::from_presented(vec![
            apply_permutation(&single, &[2, 0, 1]).unwrap(),
            apply_permutation(&multiple, &[0, 1, 2, 3]).unwrap(),
        ])
    }

    #[test]
    fn report_counts_exact_matches_only() {
        let mut session = fixed_session();
        assert!(session.select(1, 0));
        assert!(session.select(1, 2)); // single: replaces the pick on "C"
        assert!(session.select(2, 0));
        assert!(session.select(2, 1));
        assert!(session.select(2, 2));

        let report = session.finish();
        assert_eq!(report.total_questions, 2);
        assert_eq!(report.score, 1);
        assert!(report.results[0].is_correct);
        assert_eq!(report.results[0].selected_answers, vec!["B"]);
        assert!(!report.results[1].is_correct);
        assert_eq!(report.results[1].selected_answers, vec!["A", "B", "C"]);
        assert_eq!(report.results[1].correct_answers, vec!["A", "C"]);
    }

    #[test]
    fn toggling_off_a_wrong_pick_makes_it_correct() {
        let mut session = fixed_session();
        session.select(2, 0);
        session.select(2, 1);
        session.select(2, 2);
        session.select(2, 1);

        assert_eq!(session.selection(2).map(Selection::len), Some(2));
        let report = session.finish();
        assert!(report.results[1].is_correct);
        assert_eq!(report.score, 1);
    }

    #[test]
    fn skipped_questions_score_as_empty_selection() {
        let report = fixed_session().finish();
        assert_eq!(report.score, 0);
        assert!(report.results.iter().all(|r| r.selected_answers.is_empty()));
    }

    #[test]
    fn unknown_question_is_ignored() {
        let mut session = fixed_session();
        assert!(!session.select(99, 0));
        assert!(session.selection(99).is_none());
    }

    #[test]
    fn out_of_range_pick_is_refused() {
        let mut session = fixed_session();
        assert!(session.select(1, 2));
        assert!(!session.select(1, 3)); // single keeps its valid pick
        assert_eq!(session.selection(1).map(|s| s.contains(2)), Some(true));

        assert!(!session.select(2, 4));
        assert!(session.selection(2).is_none());
        for index in 0..4 {
            assert!(session.select(2, index));
        }
        assert!(!session.select(2, 7));
        assert_eq!(session.selection(2).map(Selection::len), Some(4));

        let report = session.finish();
        assert!(report.results[0].is_correct);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut session = fixed_session();
        assert_eq!(session.current().map(|q| q.id), Some(1));
        assert!(!session.previous());
        assert!(session.next());
        assert!(session.is_last());
        assert!(!session.next());
        assert_eq!(session.position(), 1);
        assert!(session.previous());
        assert_eq!(session.current().map(|q| q.id), Some(1));
    }

    #[tokio::test]
    async fn start_shuffles_what_the_store_holds() {
        let store = MemoryStore::new();
        let draft = QuestionDraft::new("Pick the vowels", QuestionType::Multiple)
            .with_options(["a", "b", "c", "e"])
            .with_correct_answers([0, 3])
            .validate()
            .unwrap();
        let id = store.create(&draft).await.unwrap();

        let mut rng = StdRng::seed_from_u64(8);
        let mut session = TestSession::start(&store, &mut rng).await.unwrap();
        assert_eq!(session.len(), 1);

        let presented = session.current().unwrap().clone();
        for &index in &presented.correct_answers {
            session.select(id, index);
        }
        let report = session.finish();
        assert_eq!(report.score, 1);
        let mut correct = report.results[0].correct_answers.clone();
        correct.sort();
        assert_eq!(correct, vec!["a", "e"]);
    }

    #[tokio::test]
    async fn empty_store_gives_an_empty_report() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        let session = TestSession::start(&store, &mut rng).await.unwrap();
        assert!(session.is_empty());
        assert!(session.current().is_none());

        let report = session.finish();
        assert_eq!((report.score, report.total_questions), (0, 0));
    }

    struct FailingStore;

    impl QuestionStore for FailingStore {
        fn create(&self, _: &ValidDraft) -> impl Future<Output = database::Result<i64>> + Send {
            async { Err(DatabaseError::ConnectionFailed("offline".to_string())) }
        }

        fn list(&self) -> impl Future<Output = database::Result<Vec<Question>>> + Send {
            async { Err(DatabaseError::ConnectionFailed("offline".to_string())) }
        }

        fn get(&self, id: i64) -> impl Future<Output = database::Result<Question>> + Send {
            async move { Err(DatabaseError::QuestionNotFound(id)) }
        }

        fn update(&self, id: i64, _: &ValidDraft) -> impl Future<Output = database::Result<u64>> + Send {
            async move { Err(DatabaseError::QuestionNotFound(id)) }
        }

        fn delete(&self, id: i64) -> impl Future<Output = database::Result<u64>> + Send {
            async move { Err(DatabaseError::QuestionNotFound(id)) }
        }
    }

    #[tokio::test]
    async fn store_failure_aborts_start() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = TestSession::start(&FailingStore, &mut rng).await;
        assert!(matches!(result, Err(DatabaseError::ConnectionFailed(_))));
    }
}
