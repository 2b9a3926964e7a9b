#![allow(missing_docs)]

pub mod answers;
pub mod feedback;
pub mod loader;
pub mod progress;
pub mod scoring;
pub mod session;
pub mod spec;
pub mod store;
pub mod visibility;

pub use answers::{AnswerError, AnswerSet, Selection};
pub use feedback::{FeedbackMessage, select_feedback};
pub use loader::{Catalog, SchemaError, document_schema, load, load_catalog, load_document};
pub use progress::{ProgressContext, ProgressSummary, SectionProgress, next_question};
pub use scoring::{ScoreReport, ScoreTally, SectionScore, score};
pub use session::{Engine, EngineError, Results, Session, SessionId};
pub use spec::{
    CatalogDocument, ChoiceOption, Condition, Form, FormDocument, Question, QuestionId,
    QuestionKind, Section,
};
pub use store::{AnswerOp, Snapshot, apply};
pub use visibility::{Visibility, resolve_visibility};
