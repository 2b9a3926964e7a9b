use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::condition::Condition;

/// Identifier of a question, derived from the topic prefix of its option ids.
pub type QuestionId = String;

/// Supported answer shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Single-select.
    Radio,
    /// Multi-select.
    Checkbox,
}

impl QuestionKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "radio" => Some(Self::Radio),
            "checkbox" => Some(Self::Checkbox),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable choice of a loaded question.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    pub score: i32,
    pub feedback: Option<String>,
    pub feedback_if: Option<Condition>,
}

/// A loaded question with its conditions resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    /// Index in the form's canonical order.
    pub position: usize,
    /// Index of the owning section.
    pub section: usize,
    pub kind: QuestionKind,
    pub text: String,
    pub visible_if: Option<Condition>,
    pub options: Vec<ChoiceOption>,
}

impl Question {
    pub fn option(&self, option_id: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|option| option.id == option_id)
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.option(option_id).is_some()
    }

    /// Best achievable contribution of this question when it is visible.
    ///
    /// Radio: the highest option score. Checkbox: the sum of strictly positive
    /// option scores, so zero or negative options never raise the ceiling.
    pub fn max_score(&self) -> i64 {
        match self.kind {
            QuestionKind::Radio => self
                .options
                .iter()
                .map(|option| i64::from(option.score))
                .max()
                .unwrap_or(0),
            QuestionKind::Checkbox => self
                .options
                .iter()
                .map(|option| i64::from(option.score))
                .filter(|score| *score > 0)
                .sum(),
        }
    }
}

/// Titled slice of the canonical question list.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub(crate) questions: Range<usize>,
}

impl Section {
    /// Canonical positions covered by this section.
    pub fn question_range(&self) -> Range<usize> {
        self.questions.clone()
    }
}

/// Where an option lives inside a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionLocation {
    pub question: usize,
    pub option: usize,
}

/// Immutable, validated questionnaire. Built only by the loader.
#[derive(Debug, Clone)]
pub struct Form {
    pub(crate) sections: Vec<Section>,
    pub(crate) questions: Vec<Question>,
    pub(crate) option_index: HashMap<String, OptionLocation>,
    pub(crate) question_index: HashMap<QuestionId, usize>,
}

impl Form {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All questions in canonical order (section order, then declared order).
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn section_questions(&self, section: &Section) -> &[Question] {
        self.questions
            .get(section.question_range())
            .unwrap_or_default()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.question_index
            .get(id)
            .and_then(|position| self.questions.get(*position))
    }

    pub fn locate_option(&self, option_id: &str) -> Option<OptionLocation> {
        self.option_index.get(option_id).copied()
    }

    /// Resolves an option id to its owning question and the option itself.
    pub fn option(&self, option_id: &str) -> Option<(&Question, &ChoiceOption)> {
        let location = self.locate_option(option_id)?;
        let question = self.questions.get(location.question)?;
        let option = question.options.get(location.option)?;
        Some((question, option))
    }

    pub fn option_count(&self) -> usize {
        self.option_index.len()
    }
}
