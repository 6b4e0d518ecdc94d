//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ConvertCommand, ValidateCommand};
use std::ffi::OsString;

/// Rewrites Drone pipeline definitions through the conversion chain
#[derive(Debug, Parser, Clone)]
#[command(name = "pipeline-rewrite")]
#[command(version)]
#[command(about = "Rewrite pipeline definitions with cache, deploy and path filter rules", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline definition through the conversion chain
    Convert(ConvertCommand),

    /// Check that a pipeline definition decodes and re-encodes
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
