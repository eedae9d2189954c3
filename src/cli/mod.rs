pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser)]
#[clap(name = "cloudshift")]
#[clap(author = "CloudShift Contributors")]
#[clap(version = "1.0.0")]
#[clap(about = "Industrial-grade cloud-SDK migration engine (AWS/Azure to GCP)", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    #[clap(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a source tree as a codebase
    Init {
        #[clap(value_parser)]
        path: PathBuf,

        #[clap(short, long)]
        language: String,
    },

    /// Report source-cloud service usage per file
    Analyze {
        #[clap(value_parser)]
        codebase_id: String,

        #[clap(long)]
        json: bool,
    },

    /// Create a migration plan for a codebase
    Plan {
        #[clap(value_parser)]
        codebase_id: String,
    },

    /// Execute a migration plan
    Migrate {
        #[clap(value_parser)]
        plan_id: String,

        #[clap(long)]
        backup: bool,
    },

    /// Translate a single file and print or write the result
    Translate {
        #[clap(value_parser)]
        input: PathBuf,

        #[clap(short, long)]
        language: String,

        #[clap(short, long)]
        service: String,

        #[clap(short, long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Show the service catalog
    Catalog {
        #[clap(long)]
        provider: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Executor(#[from] crate::executor::ExecutorError),
}
