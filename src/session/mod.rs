//! Intake quiz session: step counter plus trait-score recording.
//!
//! The intake step counter is deliberately independent from the extended
//! questionnaire's page cursor; the two flows never share a counter.

use thiserror::Error;

use crate::content::IntakeQuestion;
use crate::scoring::{classify, Classification, TraitScores};

/// Errors raised by intake session operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// An answer was recorded after the last question.
    #[error("the intake quiz is already complete")]
    AlreadyComplete,

    /// The selected option index does not exist for the current question.
    #[error("option index {0} out of range")]
    InvalidOption(usize),
}

/// Zero-based step counter over a fixed number of intake questions.
///
/// `step == total` is the terminal state: every question has been answered
/// and classification may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    step: usize,
    total: usize,
}

impl QuizProgress {
    /// Start at the first question of a quiz with `total` questions.
    pub fn new(total: usize) -> Self {
        Self { step: 0, total }
    }

    /// The current question index.
    pub fn current(&self) -> usize {
        self.step
    }

    /// Total number of questions.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Move to the next question after an answer has been recorded.
    pub fn advance(&mut self) {
        if self.step < self.total {
            self.step += 1;
        }
    }

    /// Step back one question. Only permitted above the first question;
    /// returns whether the step moved.
    pub fn retreat(&mut self) -> bool {
        if self.step > 0 && self.step < self.total {
            self.step -= 1;
            true
        } else {
            false
        }
    }

    /// Whether every question has been answered.
    pub fn is_complete(&self) -> bool {
        self.step >= self.total
    }
}

/// One run through the intake quiz: questions, step counter, and the
/// trait scores written by each answer.
#[derive(Debug, Clone)]
pub struct IntakeSession {
    questions: Vec<IntakeQuestion>,
    progress: QuizProgress,
    scores: TraitScores,
}

impl IntakeSession {
    /// Start a fresh session over the given question table.
    pub fn new(questions: Vec<IntakeQuestion>) -> Self {
        let progress = QuizProgress::new(questions.len());
        Self {
            questions,
            progress,
            scores: TraitScores::default(),
        }
    }

    /// The question awaiting an answer, or `None` once complete.
    pub fn current_question(&self) -> Option<&IntakeQuestion> {
        self.questions.get(self.progress.current())
    }

    /// The step counter.
    pub fn progress(&self) -> QuizProgress {
        self.progress
    }

    /// Record the answer for the current question by option index.
    ///
    /// Writes the option's value into the question's axis, then advances.
    /// Each step maps 1:1 to one question; there is no skipping.
    pub fn answer(&mut self, option_index: usize) -> Result<(), SessionError> {
        let question = self
            .current_question()
            .ok_or(SessionError::AlreadyComplete)?;
        let option = question
            .options
            .get(option_index)
            .ok_or(SessionError::InvalidOption(option_index))?;
        let axis = question.axis;
        let value = option.value;
        self.scores.set(axis, value);
        self.progress.advance();
        Ok(())
    }

    /// Step back one question; returns whether the step moved.
    pub fn back(&mut self) -> bool {
        self.progress.retreat()
    }

    /// The trait scores recorded so far.
    pub fn scores(&self) -> &TraitScores {
        &self.scores
    }

    /// Classify the recorded scores once every question is answered.
    pub fn classification(&self) -> Option<Classification> {
        if self.progress.is_complete() {
            Some(classify(&self.scores))
        } else {
            None
        }
    }
}
