//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, init::InitArgs, project::ProjectCommands, task::TaskCommands,
    user::UserCommands,
};

#[derive(Parser)]
#[command(name = "ptrack")]
#[command(author, version, about = "Personal project tracker")]
#[command(long_about = "Track users, their projects and project tasks from the command line. Everything is kept in three plain JSON documents.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory holding users.json, projects.json and tasks.json
    #[arg(long, global = true, env = "PTRACK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a ptrack workspace in a directory
    Init(InitArgs),

    /// User management
    #[command(subcommand)]
    User(UserCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default (a table if unset)
    #[default]
    Auto,
    /// Human-readable table
    Table,
    /// JSON records (same shape as the data files)
    Json,
    /// YAML records
    Yaml,
    /// CSV (for spreadsheets)
    Csv,
    /// Just IDs, one per line
    Id,
}
