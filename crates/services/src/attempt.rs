use std::sync::Arc;

use gateway::{AttemptSessionStore, AttemptSubmission, SessionSnapshot, TestGateway};
use quiz_core::Clock;
use quiz_core::model::{
    AnswerValue, AttemptReport, AttemptState, OpenCountPolicy, Question, QuestionId, Test, TestId,
};

use crate::error::AttemptError;

/// One in-progress attempt: the fetched definition plus mutable state.
///
/// Navigation and answer bookkeeping are synchronous; everything that talks
/// to the server or the session store goes through [`AttemptService`].
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    test: Test,
    state: AttemptState,
}

impl Attempt {
    #[must_use]
    pub fn new(test: Test, state: AttemptState) -> Self {
        Self { test, state }
    }

    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.test.total_questions()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.test.question(self.state.current_index())
    }

    #[must_use]
    pub fn answer(&self, question: QuestionId) -> Option<&AnswerValue> {
        self.state.answer(question)
    }

    #[must_use]
    pub fn is_answered(&self, question: QuestionId) -> bool {
        self.answer(question).is_some_and(AnswerValue::is_present)
    }

    pub fn record_answer(&mut self, question: QuestionId, value: AnswerValue) {
        self.state.record_answer(question, value);
    }

    pub fn jump_to(&mut self, index: usize) {
        self.state.jump_to(index, self.test.total_questions());
    }

    pub fn advance(&mut self) {
        self.state.advance(self.test.total_questions());
    }

    pub fn retreat(&mut self) {
        self.state.retreat();
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.state.answered_count()
    }

    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        self.state.progress_percent(self.test.total_questions())
    }

    #[must_use]
    pub fn unanswered_count(&self, policy: OpenCountPolicy) -> usize {
        self.state.unanswered_count(&self.test, policy)
    }

    #[must_use]
    pub fn elapsed_seconds(&self, now: chrono::DateTime<chrono::Utc>) -> u64 {
        self.state.elapsed_seconds(now)
    }

    #[must_use]
    pub fn submission(&self, time_spent: u64) -> AttemptSubmission {
        AttemptSubmission {
            answers: self.state.answers().clone(),
            time_spent,
        }
    }
}

/// Orchestrates the taking flow: fetch, per-change persistence, submission.
#[derive(Clone)]
pub struct AttemptService {
    clock: Clock,
    gateway: Arc<dyn TestGateway>,
    sessions: Arc<dyn AttemptSessionStore>,
    policy: OpenCountPolicy,
}

impl AttemptService {
    #[must_use]
    pub fn new(
        clock: Clock,
        gateway: Arc<dyn TestGateway>,
        sessions: Arc<dyn AttemptSessionStore>,
    ) -> Self {
        Self {
            clock,
            gateway,
            sessions,
            policy: OpenCountPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: OpenCountPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn policy(&self) -> OpenCountPolicy {
        self.policy
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Fetches the definition and opens a fresh attempt on its first
    /// question.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Gateway` when the definition cannot be loaded;
    /// the caller surfaces it as a retryable banner.
    pub async fn start(&self, id: TestId) -> Result<Attempt, AttemptError> {
        let test = match self.gateway.fetch_test(id).await {
            Ok(test) => test,
            Err(err) => {
                tracing::warn!(test_id = %id, error = %err, "could not load test");
                return Err(err.into());
            }
        };
        let attempt = Attempt::new(test, AttemptState::new(id, self.clock.now()));
        self.persist(&attempt);
        Ok(attempt)
    }

    /// Records (overwriting) an answer and persists the snapshot.
    pub fn record_answer(&self, attempt: &mut Attempt, question: QuestionId, value: AnswerValue) {
        attempt.record_answer(question, value);
        self.persist(attempt);
    }

    /// Bounds-checked jump; the new position is persisted.
    pub fn jump_to(&self, attempt: &mut Attempt, index: usize) {
        attempt.jump_to(index);
        self.persist(attempt);
    }

    pub fn advance(&self, attempt: &mut Attempt) {
        attempt.advance();
        self.persist(attempt);
    }

    pub fn retreat(&self, attempt: &mut Attempt) {
        attempt.retreat();
        self.persist(attempt);
    }

    /// Unanswered questions under the configured open-question policy.
    #[must_use]
    pub fn unanswered_count(&self, attempt: &Attempt) -> usize {
        attempt.unanswered_count(self.policy)
    }

    /// Elapsed seconds right now, recomputed from the start timestamp.
    #[must_use]
    pub fn elapsed_seconds(&self, attempt: &Attempt) -> u64 {
        attempt.elapsed_seconds(self.clock.now())
    }

    /// Submits for grading. On success the stored session is cleared; on
    /// failure the attempt is untouched so the caller can resume the timer
    /// and retry.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Gateway` when the server rejects or cannot be
    /// reached.
    pub async fn submit(&self, attempt: &Attempt) -> Result<AttemptReport, AttemptError> {
        let time_spent = attempt.elapsed_seconds(self.clock.now());
        let submission = attempt.submission(time_spent);
        let report = match self
            .gateway
            .submit_attempt(attempt.test().id, &submission)
            .await
        {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(test_id = %attempt.test().id, error = %err, "could not submit attempt");
                return Err(err.into());
            }
        };
        if let Err(err) = self.sessions.clear() {
            tracing::warn!(error = %err, "could not clear attempt session");
        }
        Ok(report)
    }

    /// TTL-checked peek at a previously stored session. Restoration is
    /// detected but intentionally not applied.
    #[must_use]
    pub fn resumable_session(&self) -> Option<SessionSnapshot> {
        match self.sessions.load(self.clock.now()) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "could not read attempt session");
                if let Err(err) = self.sessions.clear() {
                    tracing::warn!(error = %err, "could not clear attempt session");
                }
                None
            }
        }
    }

    fn persist(&self, attempt: &Attempt) {
        let snapshot = SessionSnapshot::from_state(attempt.state());
        if let Err(err) = self.sessions.save(&snapshot) {
            tracing::warn!(error = %err, "could not save attempt session");
        }
    }
}
