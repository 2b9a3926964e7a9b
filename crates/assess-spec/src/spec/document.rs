use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw single-form document: the ordered list of its sections.
pub type FormDocument = Vec<SectionDocument>;

/// Raw multi-form document keyed by form name (`climateForm`, `rseForm`, ...).
pub type CatalogDocument = BTreeMap<String, FormDocument>;

/// A titled group of questions displayed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionDocument {
    pub text: String,
    #[serde(default)]
    pub questions: Vec<QuestionDocument>,
}

/// Question as authored. `type` stays a free string so that a missing or
/// unknown tag surfaces as a schema error instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub text: String,
    /// Option id that must be selected for this question to be shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionDocument>,
}

/// Selectable choice as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionDocument {
    /// Globally unique, conventionally `<topic>/<variant>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub score: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// Option id that must be selected for `feedback` to be shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_feedback_if: Option<String>,
}
