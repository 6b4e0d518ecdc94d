use anyhow::{Context, Result};
use pipeline_rewrite::changes::{ChangeSetProvider, StaticChangeSet};
use pipeline_rewrite::cli::commands::{ConvertCommand, ValidateCommand};
use pipeline_rewrite::cli::output::*;
use pipeline_rewrite::cli::{Cli, Command};
use pipeline_rewrite::core::codec;
use pipeline_rewrite::{conversion_chain, PluginContext, Settings};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();
    let settings = Settings::from_env().context("Failed to load settings")?;

    // Initialize logging
    let log_level = if cli.verbose || settings.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Convert(cmd) => convert_pipeline(cmd, &settings).await?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
    }

    Ok(())
}

async fn convert_pipeline(cmd: &ConvertCommand, settings: &Settings) -> Result<()> {
    let data = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("Failed to read pipeline file {}", cmd.file))?;
    let request = cmd.to_request(data);

    let provider: Arc<dyn ChangeSetProvider> = if cmd.changed.is_empty() {
        let client = settings
            .github_client()
            .context("Failed to set up change set lookups")?;
        debug!(endpoint = client.endpoint(), "using GitHub change sets");
        Arc::new(client)
    } else {
        Arc::new(StaticChangeSet::new(cmd.changed.clone()))
    };

    let chain = conversion_chain(provider);
    let cx = PluginContext::new().with_handler(|event| eprintln!("{}", format_rule_event(&event)));

    let result = chain
        .apply(&cx, request)
        .await
        .context("Conversion chain failed")?;

    let Some(config) = result else {
        eprintln!(
            "{} {} produced no result, the original definition stays in effect",
            CROSS,
            style(&cmd.file).bold()
        );
        std::process::exit(1);
    };

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &config.data)
                .with_context(|| format!("Failed to write {}", path))?;
            eprintln!("{} Wrote {}", CHECK, style(path).bold());
        }
        None => print!("{}", config.data),
    }

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let data = std::fs::read_to_string(&cmd.file)
        .with_context(|| format!("Failed to read pipeline file {}", cmd.file))?;

    let documents = match codec::parse(&data).and_then(|documents| {
        codec::serialize(&documents)?;
        Ok(documents)
    }) {
        Ok(documents) => documents,
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(&e).red());
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let pipelines = documents.iter().filter(|d| d.is_pipeline()).count();
    println!("{} Pipeline definition is valid!", CHECK);
    println!("  Documents: {}", style(documents.len()).cyan());
    println!("  Pipelines: {}", style(pipelines).cyan());
    for document in &documents {
        println!("    {}", format_document(document));
    }

    if pipelines == 0 {
        println!("{} No pipeline documents, nothing will be rewritten", WARN);
    }

    if cmd.json {
        let summary: Vec<_> = documents
            .iter()
            .map(|document| {
                serde_json::json!({
                    "name": document.name,
                    "kind": document.kind,
                    "steps": document.steps.len(),
                    "cache": document.cache.len(),
                    "deploy": document.deploy.is_some(),
                })
            })
            .collect();
        let data = serde_json::json!({ "documents": summary });
        println!("\n{}", serde_json::to_string_pretty(&data)?);
    }

    Ok(())
}
