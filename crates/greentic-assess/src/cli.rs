use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::cmd::{self, check::CheckArgs, schema::SchemaArgs, score::ScoreArgs};
use crate::logging;

#[derive(Parser, Debug)]
#[command(
    name = "greentic-assess",
    about = "Lint self-assessment questionnaires and replay answers against them",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Tracing filter directive, e.g. `debug` or `assess_spec=debug`. Overrides RUST_LOG.
    #[arg(long = "log-level", value_name = "FILTER", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a questionnaire document and summarise each form
    Check(CheckArgs),
    /// Resume answers against a form and print scores, feedback and progress
    Score(ScoreArgs),
    /// Print the JSON Schema of a single-form document
    Schema(SchemaArgs),
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;
    match cli.command {
        Commands::Check(args) => cmd::check::run(&args),
        Commands::Score(args) => cmd::score::run(&args),
        Commands::Schema(args) => cmd::schema::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "greentic-assess",
            "--log-level",
            "debug",
            "check",
            "forms.json",
            "--form",
            "climateForm",
            "--json",
        ])
        .expect("expected CLI to parse");
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.document.to_str(), Some("forms.json"));
                assert_eq!(args.form.as_deref(), Some("climateForm"));
                assert!(args.json);
                assert!(!args.single);
            }
            other => panic!("expected check args, got {other:?}"),
        }
    }

    #[test]
    fn score_requires_form_unless_single() {
        let err = Cli::try_parse_from(["greentic-assess", "score", "forms.json"])
            .expect_err("form name is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "greentic-assess",
            "score",
            "form.json",
            "--single",
            "--answers",
            "answers.json",
        ])
        .expect("single documents need no form name");
        match cli.command {
            Commands::Score(args) => {
                assert!(args.single);
                assert!(args.form.is_none());
                assert!(args.answers.is_some());
            }
            other => panic!("expected score args, got {other:?}"),
        }
    }

    #[test]
    fn log_level_is_global() {
        let cli = Cli::try_parse_from(["greentic-assess", "schema", "--log-level", "info"])
            .expect("expected CLI to parse");
        assert_eq!(cli.log_level.as_deref(), Some("info"));
        assert!(matches!(cli.command, Commands::Schema(_)));
    }
}
