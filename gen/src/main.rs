//! `generate-model`: emit typed Rust bindings for a Replicate model.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use replicate_client::{Client, ModelId};
use replicate_gen::GeneratorError;
use tracing_subscriber::EnvFilter;

/// Generates a typed Rust binding for a hosted model from its schema.
#[derive(Debug, Parser)]
#[command(name = "generate-model", version)]
struct Cli {
    /// The model to generate a binding for, as `owner/name`.
    model: String,

    /// The model version to read the schema from. Defaults to the model's
    /// latest version.
    version: Option<String>,

    /// Override the generated type name.
    #[arg(long)]
    name: Option<String>,

    /// Write the generated source to this file instead of stdout. Refuses
    /// to overwrite an existing file.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), GeneratorError> {
    let token = std::env::var("REPLICATE_API_TOKEN")
        .ok()
        .filter(|t| !t.is_empty())
        .ok_or(GeneratorError::MissingToken)?;

    let model_id: ModelId = cli
        .model
        .parse()
        .map_err(GeneratorError::Client)?;

    let client = Client::new(token);
    let source = replicate_gen::generate(
        &client,
        &model_id,
        cli.version.as_deref(),
        cli.name.as_deref(),
    )
    .await?;

    match cli.output {
        Some(path) => replicate_gen::generate::write_binding(&path, &source)?,
        None => print!("{source}"),
    }

    Ok(())
}
