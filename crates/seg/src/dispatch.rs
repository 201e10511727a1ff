//! Command dispatch module for routing CLI commands to their handlers.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::compile::CompileOptions;
use crate::commands::config::ConfigSetOptions;
use crate::commands::{self, CommandContext, CommandError, Result, RuleSource};

/// A parsed command, borrowing its arguments from the CLI.
pub enum Dispatch<'a> {
    Compile {
        source: RuleSource<'a>,
        page: Option<u32>,
        limit: Option<u32>,
    },
    Validate(RuleSource<'a>),
    Request(Option<&'a std::path::Path>),
    Meta,
    Config(&'a Option<ConfigCommands>),
    Completions(Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Creates a dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Compile {
                rules,
                file,
                page,
                limit,
            }) => Self::Compile {
                source: RuleSource::new(rules, file.as_deref()),
                page: *page,
                limit: *limit,
            },
            Some(Commands::Validate { rules, file }) => {
                Self::Validate(RuleSource::new(rules, file.as_deref()))
            }
            Some(Commands::Request { path }) => Self::Request(path.as_deref()),
            Some(Commands::Meta) => Self::Meta,
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(*shell),
            None => Self::Help,
        }
    }

    /// Executes the command.
    pub fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Compile {
                source,
                page,
                limit,
            } => {
                let opts = CompileOptions {
                    source: *source,
                    page: *page,
                    limit: *limit,
                };
                commands::compile::execute(ctx, &opts)
            }
            Self::Validate(source) => commands::validate::execute(ctx, *source),
            Self::Request(path) => commands::request::execute(ctx, *path),
            Self::Meta => commands::meta::execute(ctx),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(*shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("seg - segment rule compiler");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}
