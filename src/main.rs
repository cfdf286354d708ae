use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use gqlplan::config::CompilerConfig;
use gqlplan::model_catalog::{CatalogDefinition, ModelCatalog};
use gqlplan::query_compiler::{compile, compile_aggregate, FieldSource, ModelAdapter};
use gqlplan::selection_parser::{
    parse_info, parse_query_document, parse_schema_document, Arguments, ResolveInfo,
};

/// gqlplan - compile GraphQL selections into relational query descriptors
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model catalog definition (YAML)
    #[arg(long)]
    catalog: PathBuf,

    /// Compiler settings (YAML); GQLPLAN_* environment variables are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile one root field of a GraphQL request
    Compile {
        /// Schema SDL the request is written against
        #[arg(long)]
        schema: PathBuf,

        /// GraphQL request document
        #[arg(long)]
        query: PathBuf,

        /// Response key of the root field to compile
        #[arg(long)]
        field: String,

        /// Operation to use when the document holds several
        #[arg(long)]
        operation: Option<String>,

        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,

        /// Model to compile against; defaults to the field's return type
        #[arg(long)]
        model: Option<String>,
    },

    /// Compile a standalone aggregate, e.g. '{"fn": "sum", "field": "age"}'
    Aggregate {
        #[arg(long)]
        model: String,

        /// Aggregate arguments as a JSON object
        #[arg(long)]
        args: String,
    },

    /// Print model metadata
    Metadata {
        /// Single model; all models when omitted
        #[arg(long)]
        model: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CompilerConfig::from_yaml_file(path)?,
        None => CompilerConfig::from_env()?,
    };
    let catalog = load_catalog(&cli.catalog)?;
    log::info!("loaded {} models from {}", catalog.len(), cli.catalog.display());

    let output = match cli.command {
        Command::Compile {
            schema,
            query,
            field,
            operation,
            variables,
            model,
        } => {
            let schema_text = read(&schema)?;
            let query_text = read(&query)?;
            let schema_doc = parse_schema_document(&schema_text)?;
            let query_doc = parse_query_document(&query_text)?;
            let variables = parse_json_object(variables.as_deref().unwrap_or("{}"))
                .context("Invalid --variables")?;

            let info = ResolveInfo::for_root_field(
                &query_doc,
                &schema_doc,
                &variables,
                operation.as_deref(),
                &field,
            );
            let root = parse_info(&info)
                .ok_or_else(|| anyhow!("Field `{}` is not selected by the request", field))?;
            let model = model.unwrap_or_else(|| root.type_name.clone());

            let adapter = ModelAdapter::new(&catalog, &model, &config)?;
            let compiled = compile(&adapter, &root.args, FieldSource::Info(&info))?;
            serde_json::to_string_pretty(&compiled)?
        }
        Command::Aggregate { model, args } => {
            let args = parse_json_object(&args).context("Invalid --args")?;
            let descriptor = compile_aggregate(catalog.get_model(&model)?, &args)?;
            serde_json::to_string_pretty(&descriptor)?
        }
        Command::Metadata { model: Some(model) } => {
            serde_json::to_string_pretty(&catalog.metadata(&model)?)?
        }
        Command::Metadata { model: None } => serde_json::to_string_pretty(&catalog.metadata_list())?,
    };

    println!("{}", output);
    Ok(())
}

fn load_catalog(path: &Path) -> anyhow::Result<ModelCatalog> {
    let definition = CatalogDefinition::from_yaml_file(path)?;
    Ok(definition.into_catalog()?)
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_json_object(text: &str) -> anyhow::Result<Arguments> {
    match serde_json::from_str(text)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected a JSON object, got {}", other)),
    }
}
