use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// Print the schema on a single line
    #[arg(long)]
    pub compact: bool,
}

pub fn run(args: &SchemaArgs) -> Result<()> {
    let schema = assess_spec::document_schema();
    let rendered = if args.compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };
    println!("{rendered}");
    Ok(())
}
