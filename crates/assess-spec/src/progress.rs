use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;
use crate::spec::form::{Form, Question, QuestionId};
use crate::visibility::Visibility;

/// Answered/visible counts for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SectionProgress {
    pub title: String,
    pub answered: usize,
    pub visible: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProgressSummary {
    pub answered: usize,
    pub visible: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<QuestionId>,
    pub sections: Vec<SectionProgress>,
}

/// Encapsulates runtime state for progress evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ProgressContext<'a> {
    answers: &'a AnswerSet,
    visibility: &'a Visibility,
}

impl<'a> ProgressContext<'a> {
    pub fn new(answers: &'a AnswerSet, visibility: &'a Visibility) -> Self {
        Self {
            answers,
            visibility,
        }
    }

    fn is_pending(&self, question: &Question) -> bool {
        self.visibility.is_visible(question.position) && !self.answers.is_answered(&question.id)
    }

    fn count_in(&self, questions: &[Question]) -> (usize, usize) {
        questions
            .iter()
            .filter(|question| self.visibility.is_visible(question.position))
            .fold((0, 0), |(answered, visible), question| {
                let done = usize::from(self.answers.is_answered(&question.id));
                (answered + done, visible + 1)
            })
    }

    pub fn answered_count(&self, form: &Form) -> usize {
        self.count_in(form.questions()).0
    }

    pub fn visible_count(&self) -> usize {
        self.visibility.visible_count()
    }

    pub fn sections(&self, form: &Form) -> Vec<SectionProgress> {
        form.sections()
            .iter()
            .map(|section| {
                let (answered, visible) = self.count_in(form.section_questions(section));
                SectionProgress {
                    title: section.title.clone(),
                    answered,
                    visible,
                }
            })
            .collect()
    }

    pub fn summary(&self, form: &Form) -> ProgressSummary {
        ProgressSummary {
            answered: self.answered_count(form),
            visible: self.visible_count(),
            next_question: next_question(form, self).map(|question| question.id.clone()),
            sections: self.sections(form),
        }
    }
}

/// First visible question without a recorded answer, in canonical order.
pub fn next_question<'f>(form: &'f Form, ctx: &ProgressContext<'_>) -> Option<&'f Question> {
    form.questions()
        .iter()
        .find(|question| ctx.is_pending(question))
}
