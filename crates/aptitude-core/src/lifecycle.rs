//! Stage controller: intake, quiz, completion and reset.
//!
//! The controller owns the record store and the question bank. Quiz
//! progress lives in an explicit [`QuizState`] value that the caller passes
//! back in for every action; the store is only touched at the save/load
//! boundaries.

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::bank::QuestionBank;
use crate::error::{QuizError, StoreError};
use crate::model::{Question, QuizResult, Session};
use crate::recorder::{AnswerSheet, Toggle};
use crate::scoring::aggregate;
use crate::store::{RecordKey, RecordStore};

/// Name used when intake is submitted blank.
pub const DEFAULT_DISPLAY_NAME: &str = "Baby";

/// Outcome of entering a stage that needs an upstream record.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate<T> {
    /// The upstream record exists.
    Open(T),
    /// The upstream record is missing; go back to intake.
    RedirectToIntake,
}

impl<T> Gate<T> {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Gate::RedirectToIntake)
    }

    pub fn open(self) -> Option<T> {
        match self {
            Gate::Open(value) => Some(value),
            Gate::RedirectToIntake => None,
        }
    }
}

/// Where the quiz went after `next`.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on to the question at this index.
    Question(usize),
    /// That was the last question; the result has been written.
    Completed(QuizResult),
}

/// In-flight quiz progress.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizState {
    pub session: Session,
    pub sheet: AnswerSheet,
    /// Index of the question on screen.
    pub index: usize,
}

impl QuizState {
    /// True once every question in a bank of `total` has been passed.
    pub fn is_past_end(&self, total: usize) -> bool {
        self.index >= total
    }
}

/// Drives a quiz run through its stages.
pub struct SessionController<S: RecordStore> {
    store: S,
    bank: QuestionBank,
    default_name: String,
}

impl<S: RecordStore> SessionController<S> {
    pub fn new(store: S, bank: QuestionBank) -> Self {
        Self {
            store,
            bank,
            default_name: DEFAULT_DISPLAY_NAME.to_string(),
        }
    }

    /// Override the name used for blank intake submissions.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Intake: create a session and drop any previous answers and result.
    pub fn start(&self, name: &str) -> Result<Session, StoreError> {
        let session = Session::new(name, &self.default_name);
        self.store.save(RecordKey::Session, &session)?;
        self.store.remove(RecordKey::Answers)?;
        self.store.remove(RecordKey::Result)?;
        tracing::info!(session = %session.id, name = %session.display_name, "session started");
        Ok(session)
    }

    /// Rebuild quiz progress from the persisted answers.
    ///
    /// The position is the number of stored answers, capped at the number
    /// of questions.
    pub fn resume(&self) -> Result<Gate<QuizState>, StoreError> {
        let Some(session) = self.load_upstream::<Session>(RecordKey::Session)? else {
            tracing::info!("no session found, redirecting to intake");
            return Ok(Gate::RedirectToIntake);
        };

        let sheet = self
            .load_upstream::<AnswerSheet>(RecordKey::Answers)?
            .unwrap_or_default();
        let index = sheet.len().min(self.bank.len());
        tracing::debug!(answered = sheet.len(), index, "quiz resumed");

        Ok(Gate::Open(QuizState {
            session,
            sheet,
            index,
        }))
    }

    /// The question currently on screen, if any remain.
    pub fn current_question(&self, state: &QuizState) -> Option<&Question> {
        self.bank.question_at(state.index)
    }

    /// Toggle option `option` on the current question and persist the sheet.
    pub fn select(&self, state: &mut QuizState, option: usize) -> Result<Toggle, QuizError> {
        let question = self
            .bank
            .question_at(state.index)
            .ok_or(QuizError::Finished)?;
        let outcome = state.sheet.record(question, option)?;
        self.store.save(RecordKey::Answers, &state.sheet)?;
        Ok(outcome)
    }

    /// Move forward; completes the quiz after the last question.
    pub fn next(&self, state: &mut QuizState) -> Result<Advance, QuizError> {
        let question = self
            .bank
            .question_at(state.index)
            .ok_or(QuizError::Finished)?;
        if state.sheet.selection(question.id).is_empty() {
            return Err(QuizError::NoSelection(question.id));
        }

        if state.index + 1 < self.bank.len() {
            state.index += 1;
            Ok(Advance::Question(state.index))
        } else {
            state.index = self.bank.len();
            Ok(Advance::Completed(self.complete(state)?))
        }
    }

    /// Step back one question. Returns `false` on the first question.
    pub fn back(&self, state: &mut QuizState) -> bool {
        if state.index == 0 {
            return false;
        }
        state.index = state.index.min(self.bank.len()) - 1;
        true
    }

    /// Score the answers and write the result in one step.
    pub fn complete(&self, state: &QuizState) -> Result<QuizResult, StoreError> {
        let scores = aggregate(state.sheet.answers(), &self.bank);
        let result = QuizResult {
            scores,
            session: state.session.clone(),
            answers: state.sheet.answers().to_vec(),
            completed_at: Utc::now(),
        };
        self.store.save(RecordKey::Result, &result)?;
        tracing::info!(
            session = %result.session.id,
            answers = result.answers.len(),
            "quiz completed"
        );
        Ok(result)
    }

    /// Report guard: the stored result, or a redirect when there is none.
    pub fn load_report(&self) -> Result<Gate<QuizResult>, StoreError> {
        match self.load_upstream::<QuizResult>(RecordKey::Result)? {
            Some(result) => Ok(Gate::Open(result)),
            None => {
                tracing::info!("no result found, redirecting to intake");
                Ok(Gate::RedirectToIntake)
            }
        }
    }

    /// Delete session, answers and result.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        tracing::info!("quiz state reset");
        Ok(())
    }

    /// Load an upstream record, treating a corrupt one as missing.
    fn load_upstream<T: DeserializeOwned>(&self, key: RecordKey) -> Result<Option<T>, StoreError> {
        match self.store.load::<T>(key) {
            Err(e) if e.is_corrupt() => {
                tracing::warn!(%key, error = %e, "ignoring corrupt record");
                Ok(None)
            }
            other => other,
        }
    }
}
