//! Static content tables: intake questions, result copy, extended
//! questionnaire.
//!
//! The tables ship as embedded JSON and are parsed once at startup into an
//! immutable [`Catalog`]. A malformed table is a startup error, never a
//! runtime condition.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::scoring::{Axis, ResultType};

/// Stable identifier for a question in either table.
pub type QuestionId = u32;

/// Embedded intake question table.
const INTAKE_JSON: &str = include_str!("data/intake.json");
/// Embedded result content table.
const RESULTS_JSON: &str = include_str!("data/results.json");
/// Embedded extended question table.
const EXTENDED_JSON: &str = include_str!("data/extended.json");

/// Errors raised while parsing or validating the content tables.
#[derive(Error, Debug)]
pub enum ContentError {
    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The result table is missing an entry for a result type.
    #[error("result content missing for type {0}")]
    MissingResult(u8),

    /// Two questions share the same identifier.
    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),

    /// A question that must offer options has none.
    #[error("question {0} has no options")]
    EmptyOptions(QuestionId),
}

/// One selectable intake answer: a label and the integer value it writes
/// into the question's axis.
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeOption {
    pub label: String,
    pub value: u8,
}

/// One intake question; answering it sets exactly one trait-score axis.
#[derive(Debug, Clone, Deserialize)]
pub struct IntakeQuestion {
    pub id: QuestionId,
    pub axis: Axis,
    pub title: String,
    pub subtitle: String,
    pub options: Vec<IntakeOption>,
}

/// Whether an extended question is answered by picking an option or by
/// entering free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    Choice,
    FreeText,
}

/// One question of the 50-item extended questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtendedQuestion {
    pub id: QuestionId,
    pub prompt: String,
    pub kind: QuestionKind,
    /// Ordered option labels; empty for free-text questions.
    #[serde(default)]
    pub options: Vec<String>,
}

/// Static copy shown for one result type.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultContent {
    #[serde(rename = "type")]
    pub result: ResultType,
    pub name: String,
    pub oneliner: String,
    pub description: String,
    pub symptoms: Vec<String>,
    pub advice: Vec<String>,
}

/// The full immutable content catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    intake: Vec<IntakeQuestion>,
    results: BTreeMap<u8, ResultContent>,
    extended: Vec<ExtendedQuestion>,
}

impl Catalog {
    /// Parse and validate the embedded content tables.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(INTAKE_JSON, RESULTS_JSON, EXTENDED_JSON)
    }

    /// Parse a catalog from raw JSON tables.
    pub fn from_json(
        intake_json: &str,
        results_json: &str,
        extended_json: &str,
    ) -> Result<Self, ContentError> {
        let intake: Vec<IntakeQuestion> = serde_json::from_str(intake_json)?;
        let result_list: Vec<ResultContent> = serde_json::from_str(results_json)?;
        let extended: Vec<ExtendedQuestion> = serde_json::from_str(extended_json)?;

        let mut results = BTreeMap::new();
        for content in result_list {
            results.insert(content.result.code(), content);
        }
        for result in ResultType::ALL {
            if !results.contains_key(&result.code()) {
                return Err(ContentError::MissingResult(result.code()));
            }
        }

        let mut seen = std::collections::BTreeSet::new();
        for question in &intake {
            if !seen.insert(question.id) {
                return Err(ContentError::DuplicateQuestion(question.id));
            }
            if question.options.is_empty() {
                return Err(ContentError::EmptyOptions(question.id));
            }
        }
        let mut seen = std::collections::BTreeSet::new();
        for question in &extended {
            if !seen.insert(question.id) {
                return Err(ContentError::DuplicateQuestion(question.id));
            }
            if question.kind == QuestionKind::Choice && question.options.is_empty() {
                return Err(ContentError::EmptyOptions(question.id));
            }
        }

        Ok(Self {
            intake,
            results,
            extended,
        })
    }

    /// The intake questions, in presentation order.
    pub fn intake(&self) -> &[IntakeQuestion] {
        &self.intake
    }

    /// The extended questionnaire, in presentation order.
    pub fn extended(&self) -> &[ExtendedQuestion] {
        &self.extended
    }

    /// Look up an extended question by id.
    pub fn extended_question(&self, id: QuestionId) -> Option<&ExtendedQuestion> {
        self.extended.iter().find(|q| q.id == id)
    }

    /// The content record for a result type.
    ///
    /// Validation at parse time guarantees every type has an entry.
    pub fn result(&self, result: ResultType) -> &ResultContent {
        &self.results[&result.code()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().expect("embedded tables must parse");
        assert_eq!(catalog.intake().len(), 6);
        assert_eq!(catalog.extended().len(), 50);
    }

    #[test]
    fn test_every_axis_has_exactly_one_intake_question() {
        let catalog = Catalog::builtin().unwrap();
        for axis in Axis::ALL {
            let count = catalog
                .intake()
                .iter()
                .filter(|q| q.axis == axis)
                .count();
            assert_eq!(count, 1, "axis {axis:?} must appear exactly once");
        }
    }

    #[test]
    fn test_intake_option_values_in_supported_range() {
        let catalog = Catalog::builtin().unwrap();
        for question in catalog.intake() {
            for option in &question.options {
                assert!(
                    (1..=5).contains(&option.value),
                    "question {} option value {} out of range",
                    question.id,
                    option.value
                );
            }
        }
    }

    #[test]
    fn test_every_result_type_has_content() {
        let catalog = Catalog::builtin().unwrap();
        for result in ResultType::ALL {
            let content = catalog.result(result);
            assert!(!content.name.is_empty());
            assert!(!content.symptoms.is_empty());
            assert!(!content.advice.is_empty());
        }
    }

    #[test]
    fn test_choice_questions_declare_options() {
        let catalog = Catalog::builtin().unwrap();
        for question in catalog.extended() {
            match question.kind {
                QuestionKind::Choice => assert!(!question.options.is_empty()),
                QuestionKind::FreeText => assert!(question.options.is_empty()),
            }
        }
    }

    #[test]
    fn test_missing_result_entry_is_rejected() {
        let err = Catalog::from_json("[]", "[]", "[]").unwrap_err();
        assert!(matches!(err, ContentError::MissingResult(1)));
    }

    #[test]
    fn test_duplicate_extended_id_is_rejected() {
        let results_json = RESULTS_JSON;
        let extended_json = r#"[
            {"id": 1, "prompt": "a", "kind": "free-text"},
            {"id": 1, "prompt": "b", "kind": "free-text"}
        ]"#;
        let err = Catalog::from_json("[]", results_json, extended_json).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateQuestion(1)));
    }
}
