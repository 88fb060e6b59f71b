//! Answer storage for the extended questionnaire.
//!
//! A plain map from question id to answer string. Keys are present only for
//! questions actually answered; revisiting a question overwrites its entry.
//! Validation of what may be written lives in the controller, which knows
//! the question table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::QuestionId;

/// Map from question id to recorded answer value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    entries: BTreeMap<QuestionId, String>,
}

impl AnswerStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, overwriting any prior value for the id.
    pub fn record(&mut self, id: QuestionId, value: impl Into<String>) {
        self.entries.insert(id, value.into());
    }

    /// The recorded answer for a question, if any.
    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    /// Whether a question has any recorded entry (possibly empty text).
    pub fn contains(&self, id: QuestionId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in ascending question-id order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &str)> {
        self.entries.iter().map(|(id, value)| (*id, value.as_str()))
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
