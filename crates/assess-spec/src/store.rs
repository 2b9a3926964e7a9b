use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::{AnswerError, AnswerSet, Selection};
use crate::spec::form::{Form, Question, QuestionKind};
use crate::visibility::{Visibility, is_shown};

/// Single answer mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum AnswerOp {
    /// Replace the whole selection. Radio questions accept at most one id;
    /// an empty list clears the question.
    Select(Vec<String>),
    /// Add one option to a checkbox selection.
    Add(String),
    /// Remove one option from a checkbox selection.
    Remove(String),
    /// Drop every recorded answer of the question.
    Clear,
}

/// Answers together with the visibility they imply. Never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    answers: AnswerSet,
    visibility: Visibility,
}

impl Snapshot {
    /// Empty answers with the initial visibility of the form.
    pub fn initial(form: &Form) -> Self {
        settle(form, AnswerSet::new())
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn into_answers(self) -> AnswerSet {
        self.answers
    }
}

/// Computes the snapshot that results from applying `op` to `question_id`.
///
/// On error `current` is the valid state; nothing is partially applied.
pub fn apply(
    form: &Form,
    current: &Snapshot,
    question_id: &str,
    op: &AnswerOp,
) -> Result<Snapshot, AnswerError> {
    let question = form
        .question(question_id)
        .ok_or_else(|| AnswerError::UnknownQuestion(question_id.to_string()))?;

    let mut answers = current.answers.clone();
    if matches!(op, AnswerOp::Clear) {
        answers.remove(&question.id);
    } else {
        if !current.visibility.is_visible(question.position) {
            return Err(AnswerError::Hidden(question.id.clone()));
        }
        match next_selection(question, answers.get(&question.id), op)? {
            Some(selection) => answers.insert(question.id.clone(), selection),
            None => {
                answers.remove(&question.id);
            }
        }
    }

    debug!(question = %question.id, ?op, "applied answer");
    Ok(settle(form, answers))
}

fn next_selection(
    question: &Question,
    previous: Option<&Selection>,
    op: &AnswerOp,
) -> Result<Option<Selection>, AnswerError> {
    match (question.kind, op) {
        (_, AnswerOp::Clear) => Ok(None),
        (QuestionKind::Radio, AnswerOp::Select(ids)) => match ids.as_slice() {
            [] => Ok(None),
            [id] => {
                ensure_option(question, id)?;
                Ok(Some(Selection::Single(id.clone())))
            }
            _ => Err(AnswerError::MultipleSelections {
                question: question.id.clone(),
                count: ids.len(),
            }),
        },
        (QuestionKind::Checkbox, AnswerOp::Select(ids)) => {
            for id in ids {
                ensure_option(question, id)?;
            }
            Ok(Some(Selection::Multiple(ids.iter().cloned().collect())))
        }
        (QuestionKind::Checkbox, AnswerOp::Add(id)) => {
            ensure_option(question, id)?;
            let mut selected = checkbox_members(previous);
            selected.insert(id.clone());
            Ok(Some(Selection::Multiple(selected)))
        }
        (QuestionKind::Checkbox, AnswerOp::Remove(id)) => {
            ensure_option(question, id)?;
            let mut selected = checkbox_members(previous);
            selected.remove(id);
            Ok(Some(Selection::Multiple(selected)))
        }
        (QuestionKind::Radio, AnswerOp::Add(_) | AnswerOp::Remove(_)) => {
            Err(AnswerError::KindMismatch {
                question: question.id.clone(),
                expected: QuestionKind::Checkbox,
                actual: QuestionKind::Radio,
            })
        }
    }
}

fn ensure_option(question: &Question, option_id: &str) -> Result<(), AnswerError> {
    if question.has_option(option_id) {
        Ok(())
    } else {
        Err(AnswerError::UnknownOption {
            question: question.id.clone(),
            option: option_id.to_string(),
        })
    }
}

fn checkbox_members(previous: Option<&Selection>) -> BTreeSet<String> {
    match previous {
        Some(Selection::Multiple(selected)) => selected.clone(),
        Some(Selection::Single(selected)) => BTreeSet::from([selected.clone()]),
        None => BTreeSet::new(),
    }
}

/// Recomputes visibility in canonical order and drops the answers of every
/// question that is no longer shown.
///
/// A question's condition only reads answers of earlier questions, which are
/// already settled when it is evaluated, so clears cascade within one pass.
pub(crate) fn settle(form: &Form, mut answers: AnswerSet) -> Snapshot {
    let mut flags = Vec::with_capacity(form.questions().len());
    for question in form.questions() {
        let visible = is_shown(form, question, &answers);
        if !visible && answers.remove(&question.id).is_some() {
            debug!(question = %question.id, "cleared answer of hidden question");
        }
        flags.push(visible);
    }
    Snapshot {
        answers,
        visibility: Visibility::from_flags(flags),
    }
}
