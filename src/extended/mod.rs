//! Controller for the paginated extended questionnaire.
//!
//! Orchestrates the page cursor, the answer store, and progress
//! persistence. Every answer and every page transition persists
//! immediately for identified sessions; anonymous sessions never touch the
//! store and live purely in memory.

use thiserror::Error;
use tracing::{debug, warn};

use crate::answers::AnswerStore;
use crate::content::{ExtendedQuestion, QuestionId, QuestionKind};
use crate::persistence::{ExtendedProgress, PersistError, ProgressStore};
use crate::report::Submission;

/// Default number of questions per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Errors raised while recording an answer.
#[derive(Error, Debug)]
pub enum AnswerError {
    /// The id does not belong to any extended question.
    #[error("unknown question id {0}")]
    UnknownQuestion(QuestionId),

    /// A choice answer was recorded for a non-choice question, or the other
    /// way around.
    #[error("question {id} takes {expected} answers")]
    KindMismatch { id: QuestionId, expected: &'static str },

    /// The value is not among the question's declared options.
    #[error("\"{value}\" is not an option of question {id}")]
    UnknownOption { id: QuestionId, value: String },

    /// Auto-save failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// What the controller exposes for the current page.
#[derive(Debug, PartialEq, Eq)]
pub enum PageView<'a> {
    /// A page of questions to render.
    Questions {
        /// Zero-based page index.
        index: usize,
        /// Total page count.
        total: usize,
        questions: &'a [ExtendedQuestion],
    },
    /// Every page has been exhausted; the next action is submission.
    ReadyToSubmit,
}

/// Outcome of a forward page transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAdvance {
    /// Moved to the given page index.
    Advanced(usize),
    /// All pages exhausted; submission is due.
    Completed,
}

/// Identified-session binding: who the answers belong to and where they
/// are persisted.
#[derive(Debug)]
struct Persisted<S> {
    identity: String,
    store: S,
}

/// The paginated questionnaire state machine.
#[derive(Debug)]
pub struct ExtendedTest<S: ProgressStore> {
    questions: Vec<ExtendedQuestion>,
    page_size: usize,
    page: usize,
    answers: AnswerStore,
    persisted: Option<Persisted<S>>,
}

impl<S: ProgressStore> ExtendedTest<S> {
    /// Fresh anonymous session over the given question table.
    pub fn new(questions: Vec<ExtendedQuestion>, page_size: usize) -> Self {
        Self {
            questions,
            page_size,
            page: 0,
            answers: AnswerStore::new(),
            persisted: None,
        }
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> usize {
        self.questions.len().div_ceil(self.page_size)
    }

    /// Current zero-based page index. Always in `[0, total_pages]`;
    /// equal to `total_pages` once every page has been exhausted.
    pub fn page(&self) -> usize {
        self.page
    }

    /// The answers recorded so far.
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    /// Begin an anonymous pass: pre-existing in-memory progress is kept
    /// unless it is completely empty, in which case state resets to page 0
    /// with an empty answer map. The store is never consulted.
    pub fn start_anonymous(&mut self) {
        if self.page == 0 && self.answers.is_empty() {
            self.page = 0;
            self.answers.clear();
        }
    }

    /// Resume an identified session.
    ///
    /// Loads the persisted record for the identity and overwrites in-memory
    /// state with it. An absent record keeps the in-memory state; a corrupt
    /// or unreadable record degrades to the same, never failing the
    /// session. All subsequent mutations auto-save under this identity.
    pub fn resume(&mut self, identity: impl Into<String>, store: S) {
        let identity = identity.into();
        match store.load(&identity) {
            Ok(Some(progress)) => {
                debug!(
                    identity = %identity,
                    page = progress.page,
                    answered = progress.answers.len(),
                    "resumed saved progress"
                );
                self.page = progress.page.min(self.total_pages());
                self.answers = progress.answers;
            }
            Ok(None) => {
                debug!(identity = %identity, "no saved progress");
            }
            Err(e) => {
                warn!(identity = %identity, error = %e, "ignoring unreadable progress record");
            }
        }
        self.persisted = Some(Persisted { identity, store });
    }

    /// The questions on the current page, or the submission signal once the
    /// slice is empty.
    pub fn current_page(&self) -> PageView<'_> {
        let start = self.page * self.page_size;
        let end = (start + self.page_size).min(self.questions.len());
        if start >= self.questions.len() {
            PageView::ReadyToSubmit
        } else {
            PageView::Questions {
                index: self.page,
                total: self.total_pages(),
                questions: &self.questions[start..end],
            }
        }
    }

    /// The recorded answer for a question, if any.
    pub fn saved_answer(&self, id: QuestionId) -> Option<&str> {
        self.answers.get(id)
    }

    /// Record a choice answer.
    ///
    /// The id must belong to a choice question and the value must be one of
    /// its declared options; single-select, so any prior value for the id
    /// is replaced. Persists immediately.
    pub fn record_choice(&mut self, id: QuestionId, value: &str) -> Result<(), AnswerError> {
        let question = self.question(id)?;
        if question.kind != QuestionKind::Choice {
            return Err(AnswerError::KindMismatch {
                id,
                expected: "free-text",
            });
        }
        if !question.options.iter().any(|option| option == value) {
            return Err(AnswerError::UnknownOption {
                id,
                value: value.to_string(),
            });
        }
        self.answers.record(id, value);
        self.autosave()?;
        Ok(())
    }

    /// Record a free-text answer.
    ///
    /// The raw value is stored as-is; empty text is permitted and never
    /// blocks navigation. Persists immediately.
    pub fn record_text(
        &mut self,
        id: QuestionId,
        value: impl Into<String>,
    ) -> Result<(), AnswerError> {
        let question = self.question(id)?;
        if question.kind != QuestionKind::FreeText {
            return Err(AnswerError::KindMismatch {
                id,
                expected: "choice",
            });
        }
        self.answers.record(id, value.into());
        self.autosave()?;
        Ok(())
    }

    /// Advance to the next page, persisting the transition.
    ///
    /// Reaching the page count signals submission exactly once; further
    /// calls keep reporting completion without moving the cursor past the
    /// page count.
    pub fn next_page(&mut self) -> Result<PageAdvance, PersistError> {
        if self.page >= self.total_pages() {
            return Ok(PageAdvance::Completed);
        }
        self.page += 1;
        self.autosave()?;
        if self.page >= self.total_pages() {
            Ok(PageAdvance::Completed)
        } else {
            Ok(PageAdvance::Advanced(self.page))
        }
    }

    /// Step back one page, persisting the transition. Returns whether the
    /// cursor moved; partial pages are freely navigable.
    pub fn prev_page(&mut self) -> Result<bool, PersistError> {
        if self.page == 0 {
            return Ok(false);
        }
        self.page -= 1;
        self.autosave()?;
        Ok(true)
    }

    /// Assemble the report handoff: all answers, unanswered ids as empty
    /// strings, keyed by question id.
    pub fn submission(&self) -> Submission {
        let identity = self.persisted.as_ref().map(|p| p.identity.as_str());
        Submission::assemble(identity, &self.questions, &self.answers)
    }

    /// Drop the persisted record after a completed submission.
    pub fn clear_saved(&self) -> Result<(), PersistError> {
        if let Some(persisted) = &self.persisted {
            persisted.store.clear(&persisted.identity)?;
        }
        Ok(())
    }

    fn question(&self, id: QuestionId) -> Result<&ExtendedQuestion, AnswerError> {
        self.questions
            .iter()
            .find(|q| q.id == id)
            .ok_or(AnswerError::UnknownQuestion(id))
    }

    /// Persist the state as of this mutation; a no-op for anonymous
    /// sessions.
    fn autosave(&self) -> Result<(), PersistError> {
        if let Some(persisted) = &self.persisted {
            let snapshot = ExtendedProgress::new(self.page, self.answers.clone());
            persisted.store.save(&persisted.identity, &snapshot)?;
        }
        Ok(())
    }
}
