//! Command implementations for the seg CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod compile;
pub mod completions;
pub mod config;
pub mod meta;
pub mod request;
pub mod validate;

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use segment_rules::RuleError;

use crate::cli::Cli;
use self::config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Rule parsing, validation or compilation error.
    #[error("{0}")]
    Rules(#[from] RuleError),

    /// Missing or unreadable command input.
    #[error("input error: {0}")]
    Input(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Loaded configuration.
    pub config: Config,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and loaded config.
    ///
    /// Colors are off when `--no-color` is given, `NO_COLOR` is set, or the
    /// config sets `output.color = false`.
    pub fn from_cli(cli: &Cli, config: Config) -> Self {
        let use_colors = !cli.no_color
            && env::var_os("NO_COLOR").is_none()
            && config.output.color.unwrap_or(true);

        Self {
            json_output: cli.json,
            use_colors,
            quiet: cli.quiet,
            config,
        }
    }
}

/// Where a command reads its rule text from.
#[derive(Debug, Clone, Copy)]
pub struct RuleSource<'a> {
    /// Rule lines given as arguments.
    pub lines: &'a [String],
    /// File given with `--file`.
    pub file: Option<&'a Path>,
}

impl<'a> RuleSource<'a> {
    pub fn new(lines: &'a [String], file: Option<&'a Path>) -> Self {
        Self { lines, file }
    }

    /// Reads the rule text: the file if given, else the argument lines joined
    /// by newlines, else standard input.
    pub fn read(&self) -> Result<String> {
        if let Some(path) = self.file {
            tracing::debug!(path = %path.display(), "reading rules from file");
            return read_file(path);
        }
        if !self.lines.is_empty() {
            return Ok(self.lines.join("\n"));
        }
        read_stdin("rules")
    }
}

/// Reads a file, naming it in the error.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| CommandError::Input(format!("Failed to read {}: {}", path.display(), e)))
}

/// Reads all of standard input.
///
/// Refuses to block on an interactive terminal.
pub(crate) fn read_stdin(what: &str) -> Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CommandError::Input(format!(
            "no {what} given on the command line or stdin"
        )));
    }
    tracing::debug!("reading {} from stdin", what);
    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;
    Ok(buffer)
}
