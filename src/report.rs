//! Report handoff boundary.
//!
//! Once every questionnaire page has been exhausted, the controller hands a
//! [`Submission`] to the report generator. The generator itself (essay and
//! coaching-plan copy) is an external collaborator; this module only fixes
//! the shape of what crosses the boundary: all questionnaire answers,
//! possibly empty strings, keyed by question id.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::answers::AnswerStore;
use crate::content::{ExtendedQuestion, QuestionId};

/// Fixed simulated-analysis delay between submission and report display.
pub const ANALYSIS_DELAY: Duration = Duration::from_secs(3);

/// The completed questionnaire as handed to the report generator.
///
/// Every question id appears exactly once; unanswered questions carry an
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Identity the answers belong to, if the session was identified.
    pub identity: Option<String>,
    /// All answers, keyed by question id.
    pub answers: BTreeMap<QuestionId, String>,
}

impl Submission {
    /// Assemble a submission covering the full question table.
    pub fn assemble(
        identity: Option<&str>,
        questions: &[ExtendedQuestion],
        answers: &AnswerStore,
    ) -> Self {
        let answers = questions
            .iter()
            .map(|q| (q.id, answers.get(q.id).unwrap_or_default().to_string()))
            .collect();
        Self {
            identity: identity.map(str::to_string),
            answers,
        }
    }

    /// Number of questions with a non-empty answer.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|v| !v.is_empty()).count()
    }
}

/// Collaborator that consumes a completed submission.
pub trait ReportSink {
    fn submit(&mut self, submission: &Submission);
}
