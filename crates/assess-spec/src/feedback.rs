use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;
use crate::spec::form::{Form, QuestionId};

/// Advisory text attached to a selected option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackMessage {
    pub question_id: QuestionId,
    pub option_id: String,
    pub text: String,
}

/// Collects the feedback of every selected option whose `showFeedbackIf`
/// target, if any, is currently selected.
///
/// Evaluated against the whole answer set, independently of visibility, and
/// never consulted by scoring.
pub fn select_feedback(form: &Form, answers: &AnswerSet) -> Vec<FeedbackMessage> {
    let mut messages = Vec::new();
    for question in form.questions() {
        let Some(selection) = answers.get(&question.id) else {
            continue;
        };
        for option in &question.options {
            if !selection.contains(&option.id) {
                continue;
            }
            let Some(text) = &option.feedback else {
                continue;
            };
            let gated_in = option
                .feedback_if
                .as_ref()
                .is_none_or(|condition| condition.is_satisfied(form, answers));
            if gated_in {
                messages.push(FeedbackMessage {
                    question_id: question.id.clone(),
                    option_id: option.id.clone(),
                    text: text.clone(),
                });
            }
        }
    }
    messages
}
