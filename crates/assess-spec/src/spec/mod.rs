pub mod condition;
pub mod document;
pub mod form;

pub use condition::Condition;
pub use document::{
    CatalogDocument, FormDocument, OptionDocument, QuestionDocument, SectionDocument,
};
pub use form::{ChoiceOption, Form, OptionLocation, Question, QuestionId, QuestionKind, Section};
