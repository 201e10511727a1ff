//! Compile command implementation.
//!
//! Compiles rule text into a filter expression with pagination attached.

use segment_rules::request::{evaluate, SegmentRequest, DEFAULT_LIMIT, DEFAULT_PAGE};

use super::{CommandContext, Result, RuleSource};
use crate::output::{format_evaluation_json, format_evaluation_table};

/// Options for the compile command.
#[derive(Debug)]
pub struct CompileOptions<'a> {
    /// Where to read rules from.
    pub source: RuleSource<'a>,
    /// Page number, overriding the config default.
    pub page: Option<u32>,
    /// Page size, overriding the config default.
    pub limit: Option<u32>,
}

/// Executes the compile command.
///
/// # Errors
///
/// Returns an error if the rules cannot be read, parsed or validated.
pub fn execute(ctx: &CommandContext, opts: &CompileOptions) -> Result<()> {
    let text = opts.source.read()?;
    let request = build_request(ctx, opts, text);
    let evaluation = evaluate(&request)?;

    if ctx.json_output {
        println!("{}", format_evaluation_json(&evaluation)?);
    } else if !ctx.quiet {
        print!("{}", format_evaluation_table(&evaluation, ctx.use_colors)?);
    }

    Ok(())
}

/// Builds the request, resolving pagination as flag, then config, then default.
fn build_request(ctx: &CommandContext, opts: &CompileOptions, text: String) -> SegmentRequest {
    let pagination = &ctx.config.pagination;
    let page = opts.page.or(pagination.page).unwrap_or(DEFAULT_PAGE);
    let limit = opts.limit.or(pagination.limit).unwrap_or(DEFAULT_LIMIT);
    SegmentRequest::new(text).with_pagination(page, limit)
}
