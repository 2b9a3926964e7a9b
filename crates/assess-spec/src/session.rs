use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::answers::{AnswerError, AnswerSet};
use crate::feedback::{FeedbackMessage, select_feedback};
use crate::progress::{ProgressContext, ProgressSummary};
use crate::scoring::{ScoreTally, SectionScore, score};
use crate::spec::form::{Form, QuestionId, QuestionKind};
use crate::store::{AnswerOp, Snapshot, apply};
use crate::visibility::Visibility;

/// Opaque handle of an answering session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}

/// Everything a caller needs to render the current state of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Results {
    pub sections: Vec<SectionScore>,
    pub total: ScoreTally,
    pub visible_question_ids: Vec<QuestionId>,
    pub feedback: Vec<FeedbackMessage>,
    pub progress: ProgressSummary,
}

/// One respondent's answers against a shared form.
#[derive(Debug, Clone)]
pub struct Session {
    form: Arc<Form>,
    snapshot: Snapshot,
}

impl Session {
    pub fn new(form: Arc<Form>) -> Self {
        let snapshot = Snapshot::initial(&form);
        Self { form, snapshot }
    }

    /// Rebuilds a session from exported answers.
    ///
    /// Entries are replayed in canonical order; the first entry that would be
    /// rejected by a live mutation rejects the whole answer set.
    pub fn resume(form: Arc<Form>, answers: &AnswerSet) -> Result<Self, AnswerError> {
        if let Some(unknown) = answers
            .question_ids()
            .find(|question_id| form.question(question_id).is_none())
        {
            return Err(AnswerError::UnknownQuestion(unknown.clone()));
        }

        let mut session = Self::new(form);
        let form = Arc::clone(&session.form);
        for question in form.questions() {
            let Some(selection) = answers.get(&question.id) else {
                continue;
            };
            let ids = selection
                .option_ids()
                .into_iter()
                .map(str::to_string)
                .collect();
            session.apply(&question.id, AnswerOp::Select(ids))?;
        }
        Ok(session)
    }

    pub fn form(&self) -> &Arc<Form> {
        &self.form
    }

    pub fn answers(&self) -> &AnswerSet {
        self.snapshot.answers()
    }

    pub fn visibility(&self) -> &Visibility {
        self.snapshot.visibility()
    }

    pub fn visible_question_ids(&self) -> Vec<QuestionId> {
        self.visibility().visible_ids(&self.form)
    }

    /// Applies one mutation and returns the visible question ids afterwards.
    pub fn apply(
        &mut self,
        question_id: &str,
        op: AnswerOp,
    ) -> Result<Vec<QuestionId>, AnswerError> {
        match apply(&self.form, &self.snapshot, question_id, &op) {
            Ok(next) => {
                self.snapshot = next;
                Ok(self.visible_question_ids())
            }
            Err(err) => {
                debug!(question = question_id, error = %err, "rejected answer");
                Err(err)
            }
        }
    }

    pub fn set_radio(
        &mut self,
        question_id: &str,
        option_id: &str,
    ) -> Result<Vec<QuestionId>, AnswerError> {
        self.expect_kind(question_id, QuestionKind::Radio)?;
        self.apply(question_id, AnswerOp::Select(vec![option_id.to_string()]))
    }

    pub fn add_checkbox(
        &mut self,
        question_id: &str,
        option_id: &str,
    ) -> Result<Vec<QuestionId>, AnswerError> {
        self.expect_kind(question_id, QuestionKind::Checkbox)?;
        self.apply(question_id, AnswerOp::Add(option_id.to_string()))
    }

    pub fn remove_checkbox(
        &mut self,
        question_id: &str,
        option_id: &str,
    ) -> Result<Vec<QuestionId>, AnswerError> {
        self.expect_kind(question_id, QuestionKind::Checkbox)?;
        self.apply(question_id, AnswerOp::Remove(option_id.to_string()))
    }

    pub fn clear(&mut self, question_id: &str) -> Result<Vec<QuestionId>, AnswerError> {
        self.apply(question_id, AnswerOp::Clear)
    }

    pub fn results(&self) -> Results {
        let answers = self.answers();
        let visibility = self.visibility();
        let report = score(&self.form, answers, visibility);
        Results {
            sections: report.sections,
            total: report.total,
            visible_question_ids: self.visible_question_ids(),
            feedback: select_feedback(&self.form, answers),
            progress: ProgressContext::new(answers, visibility).summary(&self.form),
        }
    }

    fn expect_kind(&self, question_id: &str, expected: QuestionKind) -> Result<(), AnswerError> {
        let question = self
            .form
            .question(question_id)
            .ok_or_else(|| AnswerError::UnknownQuestion(question_id.to_string()))?;
        if question.kind == expected {
            Ok(())
        } else {
            Err(AnswerError::KindMismatch {
                question: question.id.clone(),
                expected,
                actual: question.kind,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Session registry over one shared form.
///
/// Distinct sessions can be driven from different threads; calls on the same
/// session are serialised by the map's per-entry guard.
#[derive(Debug)]
pub struct Engine {
    form: Arc<Form>,
    sessions: DashMap<SessionId, Session>,
}

impl Engine {
    pub fn new(form: Arc<Form>) -> Self {
        Self {
            form,
            sessions: DashMap::new(),
        }
    }

    pub fn form(&self) -> &Arc<Form> {
        &self.form
    }

    pub fn new_session(&self) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, Session::new(Arc::clone(&self.form)));
        debug!(session = %id, "session started");
        id
    }

    /// Starts a session from a previously exported answer set.
    pub fn resume(&self, answers: &AnswerSet) -> Result<SessionId, EngineError> {
        let session = Session::resume(Arc::clone(&self.form), answers)?;
        let id = SessionId::new();
        self.sessions.insert(id, session);
        debug!(session = %id, answers = answers.len(), "session resumed");
        Ok(id)
    }

    pub fn answer(
        &self,
        id: &SessionId,
        question_id: &str,
        op: AnswerOp,
    ) -> Result<Vec<QuestionId>, EngineError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or(EngineError::UnknownSession(*id))?;
        Ok(session.apply(question_id, op)?)
    }

    pub fn results(&self, id: &SessionId) -> Result<Results, EngineError> {
        self.sessions
            .get(id)
            .map(|session| session.results())
            .ok_or(EngineError::UnknownSession(*id))
    }

    /// Current answers of a session, for external persistence.
    pub fn export(&self, id: &SessionId) -> Result<AnswerSet, EngineError> {
        self.sessions
            .get(id)
            .map(|session| session.answers().clone())
            .ok_or(EngineError::UnknownSession(*id))
    }

    /// Discards a session. Returns false when the id was unknown.
    pub fn end_session(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            debug!(session = %id, "session ended");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
