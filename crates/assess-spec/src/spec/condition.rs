use crate::answers::AnswerSet;
use crate::spec::form::Form;

/// Reference to a single option of an earlier question, resolved at load time.
///
/// The same value backs both `showIf` on questions and `showFeedbackIf` on
/// options; only the field holding it decides what it gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    option_id: String,
    question: usize,
}

impl Condition {
    pub(crate) fn new(option_id: impl Into<String>, question: usize) -> Self {
        Self {
            option_id: option_id.into(),
            question,
        }
    }

    /// Target option id.
    pub fn option_id(&self) -> &str {
        &self.option_id
    }

    /// Canonical position of the question owning the target option.
    pub fn question_position(&self) -> usize {
        self.question
    }

    /// True when the target option is among the recorded answers of its question.
    pub fn is_satisfied(&self, form: &Form, answers: &AnswerSet) -> bool {
        form.questions()
            .get(self.question)
            .and_then(|question| answers.get(&question.id))
            .is_some_and(|selection| selection.contains(&self.option_id))
    }
}
