//! Output formatting utilities for the seg CLI.
//!
//! This module provides functions for formatting results as tables or JSON.
//!
//! - [`rules`] - Compile and validate results (conditions, filter expression)
//! - [`meta`] - Allowed fields, operators and examples
//! - [`helpers`] - Common formatting utilities (truncation, headers)

pub mod helpers;
mod meta;
mod rules;

pub use meta::{format_metadata_json, format_metadata_table};
pub use rules::{
    format_evaluation_json, format_evaluation_table, format_validation_json,
    format_validation_table,
};
