//! Request command implementation.
//!
//! Evaluates a JSON request body of the form
//! `{"rules": "...", "page": 1, "limit": 50}`.

use std::path::Path;

use segment_rules::request::{evaluate, SegmentRequest};

use super::{read_file, read_stdin, CommandContext, Result};
use crate::output::{format_evaluation_json, format_evaluation_table};

/// Executes the request command.
///
/// Reads the body from `path`, or from stdin when no path is given.
pub fn execute(ctx: &CommandContext, path: Option<&Path>) -> Result<()> {
    let body = match path {
        Some(path) => read_file(path)?,
        None => read_stdin("request body")?,
    };
    let request = parse_request(&body)?;
    let evaluation = evaluate(&request)?;

    if ctx.json_output {
        println!("{}", format_evaluation_json(&evaluation)?);
    } else if !ctx.quiet {
        print!("{}", format_evaluation_table(&evaluation, ctx.use_colors)?);
    }

    Ok(())
}

fn parse_request(body: &str) -> Result<SegmentRequest> {
    Ok(serde_json::from_str(body)?)
}
