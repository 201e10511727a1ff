//! Validate command implementation.

use segment_rules::request::validate_rules;

use super::{CommandContext, Result, RuleSource};
use crate::output::{format_validation_json, format_validation_table};

/// Executes the validate command.
///
/// Succeeds only when every line parses and passes validation; the first
/// problem is reported as the command error.
pub fn execute(ctx: &CommandContext, source: RuleSource) -> Result<()> {
    let text = source.read()?;
    let validation = validate_rules(&text)?;

    if ctx.json_output {
        println!("{}", format_validation_json(&validation)?);
    } else if !ctx.quiet {
        print!("{}", format_validation_table(&validation, ctx.use_colors));
    }

    Ok(())
}
