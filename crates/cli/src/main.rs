use crate::{
    commands::{BackendKind, Commands},
    error::CliError,
};
use clap::Parser;
use compiler::{CompileContext, DirectoryBackend, DocumentBackend};
use model::{Filter, config::SchemaConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "filterc",
    version = "0.1.0",
    about = "Compiles backend-neutral filters into native query expressions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            filter,
            schema,
            backend,
            json,
        } => {
            info!(
                "Compiling filter: {}, schema: {:?}, backend: {:?}",
                filter, schema, backend
            );

            let filter = load_filter(&filter).await?;
            let config = load_schema(schema.as_deref()).await?;
            let (schema, resolver) = (config.schema(), config.resolver());
            let ctx = CompileContext::new(&schema, &resolver);

            match backend {
                BackendKind::Document => {
                    output::print_compiled(&DocumentBackend, &filter, &ctx, json)?
                }
                BackendKind::Directory => {
                    output::print_compiled(&DirectoryBackend, &filter, &ctx, json)?
                }
            }
        }
        Commands::Explain { filter, schema } => {
            let filter = load_filter(&filter).await?;
            let config = load_schema(schema.as_deref()).await?;
            output::print_tree(&filter, &config.schema());
        }
    }

    Ok(())
}

async fn load_filter(path: &str) -> Result<Filter, CliError> {
    let source = tokio::fs::read_to_string(path).await?;
    let filter = serde_json::from_str(&source)?;
    Ok(filter)
}

async fn load_schema(path: Option<&str>) -> Result<SchemaConfig, CliError> {
    match path {
        Some(path) => {
            let source = tokio::fs::read_to_string(path).await?;
            Ok(SchemaConfig::from_json(&source)?)
        }
        None => Ok(SchemaConfig::default()),
    }
}
