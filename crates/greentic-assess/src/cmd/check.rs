use std::path::PathBuf;

use anyhow::Result;
use assess_spec::{Form, Snapshot, score};
use clap::Args;
use serde::Serialize;

use super::read_forms;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Questionnaire document (a catalog keyed by form name, or one form with --single)
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,
    /// Only check the named form of a catalog
    #[arg(long, value_name = "NAME", conflicts_with = "single")]
    pub form: Option<String>,
    /// Treat the document as a single form instead of a catalog
    #[arg(long)]
    pub single: bool,
    /// Emit the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Shape of one loaded form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub name: String,
    pub sections: usize,
    pub questions: usize,
    pub options: usize,
    pub conditional: usize,
    pub initially_visible: usize,
    /// Maximum score with nothing answered.
    pub initial_max: i64,
}

impl FormSummary {
    pub fn of(name: &str, form: &Form) -> Self {
        let initial = Snapshot::initial(form);
        let report = score(form, initial.answers(), initial.visibility());
        Self {
            name: name.to_string(),
            sections: form.sections().len(),
            questions: form.questions().len(),
            options: form.option_count(),
            conditional: form
                .questions()
                .iter()
                .filter(|question| question.visible_if.is_some())
                .count(),
            initially_visible: initial.visibility().visible_count(),
            initial_max: report.total.max,
        }
    }
}

pub fn run(args: &CheckArgs) -> Result<()> {
    let forms = read_forms(&args.document, args.single, args.form.as_deref())?;
    let summaries: Vec<FormSummary> = forms
        .iter()
        .map(|(name, form)| FormSummary::of(name, form))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for summary in &summaries {
        println!(
            "{}: {} sections, {} questions ({} conditional, {} shown initially), {} options, max score {}",
            summary.name,
            summary.sections,
            summary.questions,
            summary.conditional,
            summary.initially_visible,
            summary.options,
            summary.initial_max,
        );
    }
    Ok(())
}
