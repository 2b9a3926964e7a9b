use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::form::{QuestionId, QuestionKind};

/// Options currently selected for one question.
///
/// Serialized as a bare option id for radio questions and as a list for
/// checkbox questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Selection {
    Single(String),
    Multiple(BTreeSet<String>),
}

impl Selection {
    pub fn contains(&self, option_id: &str) -> bool {
        match self {
            Selection::Single(selected) => selected == option_id,
            Selection::Multiple(selected) => selected.contains(option_id),
        }
    }

    pub fn option_ids(&self) -> Vec<&str> {
        match self {
            Selection::Single(selected) => vec![selected.as_str()],
            Selection::Multiple(selected) => selected.iter().map(String::as_str).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Single(_) => 1,
            Selection::Multiple(selected) => selected.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-session record of the selected options, keyed by question id.
///
/// A question without an entry is unanswered; empty checkbox selections are
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: BTreeMap<QuestionId, Selection>,
}

impl AnswerSet {
    /// Creates an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_id: &str) -> Option<&Selection> {
        self.entries.get(question_id)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.entries.contains_key(question_id)
    }

    pub fn is_selected(&self, question_id: &str, option_id: &str) -> bool {
        self.get(question_id)
            .is_some_and(|selection| selection.contains(option_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Selection)> {
        self.entries.iter()
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.entries.keys()
    }

    pub(crate) fn insert(&mut self, question_id: QuestionId, selection: Selection) {
        if selection.is_empty() {
            self.entries.remove(&question_id);
        } else {
            self.entries.insert(question_id, selection);
        }
    }

    pub(crate) fn remove(&mut self, question_id: &str) -> Option<Selection> {
        self.entries.remove(question_id)
    }

    /// Serializes the answer set as indented JSON for debugging.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Rejected answer mutation. The answer set is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("unknown question '{0}'")]
    UnknownQuestion(QuestionId),
    #[error("question '{0}' is not currently visible")]
    Hidden(QuestionId),
    #[error("option '{option}' does not belong to question '{question}'")]
    UnknownOption { question: QuestionId, option: String },
    #[error("radio question '{question}' accepts a single option, got {count}")]
    MultipleSelections { question: QuestionId, count: usize },
    #[error("'{question}' is a {actual} question, operation expects {expected}")]
    KindMismatch {
        question: QuestionId,
        expected: QuestionKind,
        actual: QuestionKind,
    },
}
