use crate::answers::AnswerSet;
use crate::spec::form::{Form, Question, QuestionId};

/// Visibility flags indexed by canonical question position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visibility {
    flags: Vec<bool>,
}

impl Visibility {
    pub(crate) fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    pub fn is_visible(&self, position: usize) -> bool {
        self.flags.get(position).copied().unwrap_or(false)
    }

    pub fn visible_count(&self) -> usize {
        self.flags.iter().filter(|visible| **visible).count()
    }

    /// Number of questions covered, visible or not.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn visible_questions<'a>(&'a self, form: &'a Form) -> impl Iterator<Item = &'a Question> {
        form.questions()
            .iter()
            .filter(move |question| self.is_visible(question.position))
    }

    /// Ids of the visible questions, in canonical order.
    pub fn visible_ids(&self, form: &Form) -> Vec<QuestionId> {
        self.visible_questions(form)
            .map(|question| question.id.clone())
            .collect()
    }
}

/// Resolves which questions are visible for the given answers.
///
/// Conditions only target earlier questions, so one forward pass is enough.
pub fn resolve_visibility(form: &Form, answers: &AnswerSet) -> Visibility {
    let flags = form
        .questions()
        .iter()
        .map(|question| is_shown(form, question, answers))
        .collect();
    Visibility::from_flags(flags)
}

pub(crate) fn is_shown(form: &Form, question: &Question, answers: &AnswerSet) -> bool {
    question
        .visible_if
        .as_ref()
        .is_none_or(|condition| condition.is_satisfied(form, answers))
}
