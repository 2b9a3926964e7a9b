pub mod check;
pub mod schema;
pub mod score;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use assess_spec::{Catalog, Form, load, load_catalog};
use tracing::debug;

/// Name used for a `--single` document: the file stem, or `form`.
fn single_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("form")
        .to_string()
}

/// Reads `path` and returns the selected forms in catalog order.
///
/// A catalog yields every form unless `only` names one; a single-form document
/// yields exactly one form and ignores `only`.
pub(crate) fn read_forms(
    path: &Path,
    single: bool,
    only: Option<&str>,
) -> Result<Vec<(String, Arc<Form>)>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    if single {
        let form = load(&raw).with_context(|| format!("invalid form in {}", path.display()))?;
        debug!(path = %path.display(), "loaded single form");
        return Ok(vec![(single_name(path), Arc::new(form))]);
    }

    let catalog =
        load_catalog(&raw).with_context(|| format!("invalid catalog in {}", path.display()))?;
    match only {
        Some(name) => Ok(vec![(name.to_string(), pick(&catalog, name)?)]),
        None => Ok(catalog
            .iter()
            .map(|(name, form)| (name.to_string(), Arc::clone(form)))
            .collect()),
    }
}

fn pick(catalog: &Catalog, name: &str) -> Result<Arc<Form>> {
    catalog.form(name).map(Arc::clone).ok_or_else(|| {
        let known: Vec<&str> = catalog.names().collect();
        anyhow!("no form named `{name}` (available: {})", known.join(", "))
    })
}
