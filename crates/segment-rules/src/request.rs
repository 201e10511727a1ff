//! Request and response shapes for callers that front the compiler.
//!
//! The compiler never executes queries. [`evaluate`] returns the parsed
//! conditions, the compiled expression and the pagination the caller asked
//! for; the caller runs the query and attaches results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compiler::{compile, compile_rules, CompiledRules};
use crate::error::{LineFailure, RuleError, RuleResult};
use crate::registry;
use crate::rule_text::parse_rule_value;

/// Default page number when a request omits it.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when a request omits it.
pub const DEFAULT_LIMIT: u32 = 50;

/// Example rule text for simple filters.
pub const EXAMPLE_BASIC: &str = "price > 100\nstock_status = instock";

/// Example rule text combining a range with other constraints.
pub const EXAMPLE_COMPLEX: &str =
    "price >= 50\nprice <= 500\nstock_status = instock\non_sale = true";

/// A request to compile rules.
///
/// `rules` is kept untyped so that a missing, `null` or non-string value is
/// reported as an input shape error rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SegmentRequest {
    #[serde(default)]
    pub rules: Option<Value>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl SegmentRequest {
    /// Creates a request for rule text with default pagination.
    pub fn new(rules: impl Into<String>) -> Self {
        Self {
            rules: Some(Value::String(rules.into())),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Sets the pagination parameters.
    pub fn with_pagination(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }
}

/// Pagination parameters, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

/// Successful result of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    #[serde(flatten)]
    pub compiled: CompiledRules,
    pub pagination: Pagination,
}

/// Compiles the rules of a request.
///
/// # Errors
///
/// Returns `RuleError::InputShape` if `rules` is absent, `null`, not a string,
/// or empty; otherwise any parse or validation error.
pub fn evaluate(request: &SegmentRequest) -> RuleResult<Evaluation> {
    let conditions = parse_rule_value(request.rules.as_ref())?;
    let filter_expression = compile(&conditions)?;

    tracing::debug!(
        conditions = conditions.len(),
        page = request.page,
        limit = request.limit,
        "evaluated segment request"
    );

    Ok(Evaluation {
        compiled: CompiledRules {
            conditions,
            filter_expression,
        },
        pagination: Pagination {
            page: request.page,
            limit: request.limit,
        },
    })
}

/// Successful result of [`validate_rules`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    #[serde(flatten)]
    pub compiled: CompiledRules,
    pub valid: bool,
}

/// Checks rule text without anything further happening to the result.
///
/// # Errors
///
/// Any error from [`compile_rules`].
pub fn validate_rules(text: &str) -> RuleResult<Validation> {
    Ok(Validation {
        compiled: compile_rules(text)?,
        valid: true,
    })
}

/// Example rule texts shown to editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Examples {
    pub basic: &'static str,
    pub complex: &'static str,
}

/// Read-only description of what rules may contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub allowed_fields: Vec<&'static str>,
    pub allowed_operators: Vec<&'static str>,
    pub field_types: BTreeMap<&'static str, &'static str>,
    pub examples: Examples,
}

/// Returns the metadata for the allowed fields and operators.
pub fn metadata() -> Metadata {
    Metadata {
        allowed_fields: registry::allowed_field_names(),
        allowed_operators: registry::allowed_operator_symbols(),
        field_types: registry::allowed_fields()
            .map(|spec| (spec.name, spec.value_type.as_str()))
            .collect(),
        examples: Examples {
            basic: EXAMPLE_BASIC,
            complex: EXAMPLE_COMPLEX,
        },
    }
}

/// Structured error body for a failed request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "no_lines")]
    pub lines: &'a [LineFailure],
}

fn no_lines(lines: &&[LineFailure]) -> bool {
    lines.is_empty()
}

impl<'a> From<&'a RuleError> for ErrorBody<'a> {
    fn from(err: &'a RuleError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            lines: err.line_failures(),
        }
    }
}
