use std::ops::AddAssign;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;
use crate::spec::form::{Form, Question};
use crate::visibility::Visibility;

/// Achieved score against the achievable maximum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreTally {
    pub actual: i64,
    pub max: i64,
}

impl ScoreTally {
    /// `actual / max`, or `None` when nothing can be scored.
    pub fn ratio(&self) -> Option<f64> {
        (self.max != 0).then(|| self.actual as f64 / self.max as f64)
    }
}

impl AddAssign for ScoreTally {
    fn add_assign(&mut self, other: Self) {
        self.actual += other.actual;
        self.max += other.max;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionScore {
    pub title: String,
    pub score: ScoreTally,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreReport {
    pub sections: Vec<SectionScore>,
    pub total: ScoreTally,
}

/// Aggregates per-section and per-form scores.
///
/// Hidden questions count for neither actual nor max. Visible but unanswered
/// questions add their full maximum to the denominator.
pub fn score(form: &Form, answers: &AnswerSet, visibility: &Visibility) -> ScoreReport {
    let mut total = ScoreTally::default();
    let sections = form
        .sections()
        .iter()
        .map(|section| {
            let mut tally = ScoreTally::default();
            for question in form.section_questions(section) {
                if visibility.is_visible(question.position) {
                    tally += ScoreTally {
                        actual: question_score(question, answers),
                        max: question.max_score(),
                    };
                }
            }
            total += tally;
            SectionScore {
                title: section.title.clone(),
                score: tally,
            }
        })
        .collect();
    ScoreReport { sections, total }
}

/// Score earned by the options currently selected for `question`.
pub fn question_score(question: &Question, answers: &AnswerSet) -> i64 {
    answers.get(&question.id).map_or(0, |selection| {
        question
            .options
            .iter()
            .filter(|option| selection.contains(&option.id))
            .map(|option| i64::from(option.score))
            .sum()
    })
}
