//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ListCommand, RunCommand, ValidateCommand};
use std::ffi::OsString;

/// Multi-agent content pipelines driven by YAML documents
#[derive(Debug, Parser, Clone)]
#[command(name = "crewline")]
#[command(version)]
#[command(about = "Run multi-agent content pipelines from YAML role and task documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the configuration documents
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: String,

    /// Directory results are written under
    #[arg(long, global = true, default_value = "results")]
    pub results_dir: String,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline
    Run(RunCommand),

    /// Check that pipeline types can be built and assembled
    Validate(ValidateCommand),

    /// List registered pipeline types
    List(ListCommand),
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
