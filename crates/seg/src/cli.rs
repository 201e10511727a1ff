//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the seg CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// seg - Compile catalog segment rules into filter expressions
#[derive(Parser, Debug)]
#[command(name = "seg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile rules into a filter expression
    #[command(alias = "c")]
    Compile {
        /// Rule lines (each argument is one line; reads stdin when omitted)
        rules: Vec<String>,

        /// Read rules from a file
        #[arg(short, long, conflicts_with = "rules")]
        file: Option<PathBuf>,

        /// Page number to pass through (default: from config, then 1)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,

        /// Page size to pass through (default: from config, then 50)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },

    /// Check rules without printing the expression
    #[command(alias = "v")]
    Validate {
        /// Rule lines (each argument is one line; reads stdin when omitted)
        rules: Vec<String>,

        /// Read rules from a file
        #[arg(short, long, conflicts_with = "rules")]
        file: Option<PathBuf>,
    },

    /// Evaluate a JSON request body ({"rules": ..., "page": ..., "limit": ...})
    Request {
        /// Path to the request body (reads stdin when omitted)
        path: Option<PathBuf>,
    },

    /// Show allowed fields, operators and example rules
    Meta,

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., pagination.limit)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}
