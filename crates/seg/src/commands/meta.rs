//! Meta command implementation.
//!
//! Shows the fields and operators rules may use, plus example rule texts.

use segment_rules::request::metadata;

use super::{CommandContext, Result};
use crate::output::{format_metadata_json, format_metadata_table};

/// Executes the meta command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let meta = metadata();

    if ctx.json_output {
        println!("{}", format_metadata_json(&meta)?);
    } else if !ctx.quiet {
        print!("{}", format_metadata_table(&meta, ctx.use_colors));
    }

    Ok(())
}
