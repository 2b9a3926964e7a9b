use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use schemars::{Schema, schema_for};
use thiserror::Error;
use tracing::info;

use crate::spec::condition::Condition;
use crate::spec::document::{CatalogDocument, FormDocument};
use crate::spec::form::{
    ChoiceOption, Form, OptionLocation, Question, QuestionId, QuestionKind, Section,
};

/// Fatal load-time errors. A form that fails any check is rejected wholesale.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question {position} ('{text}') has no options")]
    EmptyOptions { position: usize, text: String },
    #[error("question {position} ('{text}') has no type")]
    MissingKind { position: usize, text: String },
    #[error("question {position} has unrecognised type '{kind}'")]
    UnknownKind { position: usize, kind: String },
    #[error("option {index} of question {position} has no id")]
    MissingOptionId { position: usize, index: usize },
    #[error("option id '{0}' is declared more than once")]
    DuplicateOption(String),
    #[error("question id '{0}' is shared by more than one question")]
    DuplicateQuestion(QuestionId),
    #[error("{field} on '{referrer}' references unknown option '{target}'")]
    UnknownReference {
        referrer: String,
        field: &'static str,
        target: String,
    },
    #[error("{field} on '{referrer}' references '{target}', which is not in an earlier question")]
    ForwardReference {
        referrer: String,
        field: &'static str,
        target: String,
    },
    #[error("form '{name}': {source}")]
    InForm {
        name: String,
        #[source]
        source: Box<SchemaError>,
    },
}

/// Named forms loaded from a single content document.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    forms: BTreeMap<String, Arc<Form>>,
}

impl Catalog {
    pub fn form(&self, name: &str) -> Option<&Arc<Form>> {
        self.forms.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Form>)> {
        self.forms.iter().map(|(name, form)| (name.as_str(), form))
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

/// Parses and validates a single-form JSON document.
pub fn load(raw: &str) -> Result<Form, SchemaError> {
    let document: FormDocument = serde_json::from_str(raw)?;
    load_document(&document)
}

/// Parses and validates a JSON document holding several named forms.
pub fn load_catalog(raw: &str) -> Result<Catalog, SchemaError> {
    let document: CatalogDocument = serde_json::from_str(raw)?;
    let mut forms = BTreeMap::new();
    for (name, form) in &document {
        let loaded = load_document(form).map_err(|source| SchemaError::InForm {
            name: name.clone(),
            source: Box::new(source),
        })?;
        forms.insert(name.clone(), Arc::new(loaded));
    }
    info!(forms = forms.len(), "loaded assessment catalog");
    Ok(Catalog { forms })
}

/// JSON Schema describing a single-form document.
pub fn document_schema() -> Schema {
    schema_for!(FormDocument)
}

/// Question data gathered in the first pass, before references are resolved.
struct PendingQuestion<'a> {
    id: QuestionId,
    kind: QuestionKind,
    section: usize,
    text: &'a str,
    show_if: Option<&'a str>,
    options: Vec<PendingOption<'a>>,
}

struct PendingOption<'a> {
    id: &'a str,
    text: &'a str,
    score: i32,
    feedback: Option<&'a str>,
    show_feedback_if: Option<&'a str>,
}

/// Validates an already-deserialized document and builds the resolution indices.
pub fn load_document(document: &FormDocument) -> Result<Form, SchemaError> {
    let mut sections = Vec::with_capacity(document.len());
    let mut pending = Vec::new();
    let mut option_index = HashMap::new();
    let mut question_index = HashMap::new();

    for (section_idx, section) in document.iter().enumerate() {
        let start = pending.len();
        for question in &section.questions {
            let position = pending.len();
            let kind = match question.kind.as_deref() {
                None => {
                    return Err(SchemaError::MissingKind {
                        position,
                        text: question.text.clone(),
                    });
                }
                Some(tag) => {
                    QuestionKind::from_tag(tag).ok_or_else(|| SchemaError::UnknownKind {
                        position,
                        kind: tag.to_string(),
                    })?
                }
            };
            if question.options.is_empty() {
                return Err(SchemaError::EmptyOptions {
                    position,
                    text: question.text.clone(),
                });
            }

            let mut options = Vec::with_capacity(question.options.len());
            for (index, option) in question.options.iter().enumerate() {
                let id = option
                    .id
                    .as_deref()
                    .filter(|id| !id.trim().is_empty())
                    .ok_or(SchemaError::MissingOptionId { position, index })?;
                let location = OptionLocation {
                    question: position,
                    option: index,
                };
                if option_index.insert(id.to_string(), location).is_some() {
                    return Err(SchemaError::DuplicateOption(id.to_string()));
                }
                options.push(PendingOption {
                    id,
                    text: &option.text,
                    score: option.score,
                    feedback: option.feedback.as_deref(),
                    show_feedback_if: option.show_feedback_if.as_deref(),
                });
            }

            let question_id = topic_of(options[0].id).to_string();
            if question_index.insert(question_id.clone(), position).is_some() {
                return Err(SchemaError::DuplicateQuestion(question_id));
            }

            pending.push(PendingQuestion {
                id: question_id,
                kind,
                section: section_idx,
                text: &question.text,
                show_if: question.show_if.as_deref(),
                options,
            });
        }
        sections.push(Section {
            title: section.text.clone(),
            questions: start..pending.len(),
        });
    }

    let mut questions = Vec::with_capacity(pending.len());
    for (position, question) in pending.into_iter().enumerate() {
        let visible_if = question
            .show_if
            .map(|target| resolve(&option_index, position, &question.id, "showIf", target))
            .transpose()?;

        let mut options = Vec::with_capacity(question.options.len());
        for option in question.options {
            let feedback_if = option
                .show_feedback_if
                .map(|target| {
                    resolve(&option_index, position, option.id, "showFeedbackIf", target)
                })
                .transpose()?;
            options.push(ChoiceOption {
                id: option.id.to_string(),
                text: option.text.to_string(),
                score: option.score,
                feedback: option.feedback.map(str::to_string),
                feedback_if,
            });
        }

        questions.push(Question {
            id: question.id,
            position,
            section: question.section,
            kind: question.kind,
            text: question.text.to_string(),
            visible_if,
            options,
        });
    }

    let form = Form {
        sections,
        questions,
        option_index,
        question_index,
    };
    info!(
        sections = form.sections().len(),
        questions = form.questions().len(),
        options = form.option_count(),
        "loaded assessment form"
    );
    Ok(form)
}

/// Resolves a condition target, enforcing that it lives in a strictly earlier question.
fn resolve(
    index: &HashMap<String, OptionLocation>,
    position: usize,
    referrer: &str,
    field: &'static str,
    target: &str,
) -> Result<Condition, SchemaError> {
    let location = index
        .get(target)
        .ok_or_else(|| SchemaError::UnknownReference {
            referrer: referrer.to_string(),
            field,
            target: target.to_string(),
        })?;
    if location.question >= position {
        return Err(SchemaError::ForwardReference {
            referrer: referrer.to_string(),
            field,
            target: target.to_string(),
        });
    }
    Ok(Condition::new(target, location.question))
}

fn topic_of(option_id: &str) -> &str {
    option_id
        .split_once('/')
        .map_or(option_id, |(topic, _)| topic)
}
