//! CLI command definitions

use crate::plugin::{Build, Config, ConvertRequest, Repo};
use clap::Args;

/// Run a pipeline definition through the conversion chain
#[derive(Debug, Args, Clone)]
pub struct ConvertCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Commit the push started from (empty or all zeros on a new branch)
    #[arg(long, default_value = "")]
    pub before: String,

    /// Commit the push ended at
    #[arg(long, default_value = "")]
    pub after: String,

    /// Repository owner
    #[arg(long)]
    pub namespace: String,

    /// Repository name
    #[arg(long)]
    pub name: String,

    /// Changed files; skips the GitHub lookup when given
    #[arg(long)]
    pub changed: Vec<String>,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

impl ConvertCommand {
    /// Build the conversion request for the given pipeline definition
    pub fn to_request(&self, data: String) -> ConvertRequest {
        ConvertRequest {
            build: Build {
                before: self.before.clone(),
                after: self.after.clone(),
                ..Default::default()
            },
            repo: Repo {
                namespace: self.namespace.clone(),
                name: self.name.clone(),
                slug: format!("{}/{}", self.namespace, self.name),
                config: self.file.clone(),
                ..Default::default()
            },
            config: Config { data },
        }
    }
}

/// Check that a pipeline definition decodes and re-encodes
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
