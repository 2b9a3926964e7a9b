use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use assess_spec::{AnswerSet, Session};
use clap::Args;
use tracing::info;

use super::read_forms;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Questionnaire document
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,
    /// Form of the catalog to score against
    #[arg(long, value_name = "NAME", required_unless_present = "single")]
    pub form: Option<String>,
    /// Treat the document as a single form instead of a catalog
    #[arg(long)]
    pub single: bool,
    /// Exported answers (`{"<question>": "<option>" | ["<option>", ...]}`); empty when omitted
    #[arg(long, value_name = "answers.json")]
    pub answers: Option<PathBuf>,
}

pub fn run(args: &ScoreArgs) -> Result<()> {
    let mut forms = read_forms(&args.document, args.single, args.form.as_deref())?;
    let Some((name, form)) = forms.pop() else {
        bail!("{} contains no form", args.document.display());
    };

    let answers = match &args.answers {
        Some(path) => read_answers(path)?,
        None => AnswerSet::new(),
    };
    let session = Session::resume(form, &answers)
        .with_context(|| format!("answers do not fit form `{name}`"))?;
    let results = session.results();
    info!(
        form = %name,
        actual = results.total.actual,
        max = results.total.max,
        "scored answers"
    );
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn read_answers(path: &Path) -> Result<AnswerSet> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid answers in {}", path.display()))
}
