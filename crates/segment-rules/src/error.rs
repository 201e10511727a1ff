//! Error types for rule parsing, validation and compilation.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A specialized Result type for rule operations.
pub type RuleResult<T> = Result<T, RuleError>;

/// Why a single line failed to parse as a condition.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxError {
    /// The line is empty after trimming.
    #[error("empty condition")]
    Empty,

    /// No operator occurs after the first character.
    #[error("no valid operator found")]
    NoOperator,

    /// The only operator found sits at the start of the line.
    #[error("no field specified")]
    NoField,

    /// Nothing follows the operator.
    #[error("no value specified")]
    NoValue,
}

/// One failing line of a multi-line rule text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFailure {
    /// 1-based position among the non-blank, non-comment lines.
    pub line: usize,
    /// The trimmed text of the line.
    pub condition: String,
    /// The reason the line was rejected.
    pub error: SyntaxError,
}

impl fmt::Display for LineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: invalid condition \"{}\": {}",
            self.line, self.condition, self.error
        )
    }
}

/// Errors that can occur while turning rule text into a filter expression.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuleError {
    /// The rule input is missing, not a string, or empty.
    #[error("rule text must be a non-empty string")]
    InputShape,

    /// A single condition could not be parsed.
    #[error("invalid condition \"{text}\": {kind}")]
    Syntax {
        /// The offending text.
        text: String,
        /// What was wrong with it.
        kind: SyntaxError,
    },

    /// One or more lines of a rule text could not be parsed.
    #[error("rule parsing errors:\n{}", format_failures(failures))]
    AggregateSyntax {
        /// Every failing line, in input order.
        failures: Vec<LineFailure>,
    },

    /// No conditions were supplied, or the text held only comments and blank lines.
    #[error("no valid conditions found")]
    EmptyInput,

    /// The field is not on the allow-list.
    #[error("{}", format_field_not_allowed(field, suggestion.as_deref(), allowed))]
    FieldNotAllowed {
        /// The rejected field name.
        field: String,
        /// A close allowed field name, if any.
        suggestion: Option<String>,
        /// The allowed field names.
        allowed: Vec<&'static str>,
    },

    /// The operator is not on the allow-list.
    #[error(
        "operator \"{operator}\" is not allowed. Allowed operators: {}",
        allowed.join(", ")
    )]
    OperatorNotAllowed {
        /// The rejected operator text.
        operator: String,
        /// The allowed operator symbols.
        allowed: Vec<&'static str>,
    },

    /// The value does not match the field's declared type.
    #[error("field \"{field}\" requires {expected} value, got: {value}")]
    TypeMismatch {
        /// The field being constrained.
        field: String,
        /// Human-readable name of the expected value shape.
        expected: &'static str,
        /// The raw value that was supplied.
        value: String,
    },
}

impl RuleError {
    /// Creates a single-line syntax error.
    pub fn syntax(text: impl Into<String>, kind: SyntaxError) -> Self {
        RuleError::Syntax {
            text: text.into(),
            kind,
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        value: impl Into<String>,
    ) -> Self {
        RuleError::TypeMismatch {
            field: field.into(),
            expected,
            value: value.into(),
        }
    }

    /// Returns a stable, machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            RuleError::InputShape => "INPUT_SHAPE",
            RuleError::Syntax { .. } | RuleError::AggregateSyntax { .. } => "SYNTAX",
            RuleError::EmptyInput => "EMPTY_INPUT",
            RuleError::FieldNotAllowed { .. } => "FIELD_NOT_ALLOWED",
            RuleError::OperatorNotAllowed { .. } => "OPERATOR_NOT_ALLOWED",
            RuleError::TypeMismatch { .. } => "TYPE_MISMATCH",
        }
    }

    /// Returns the per-line failures of an aggregate syntax error.
    pub fn line_failures(&self) -> &[LineFailure] {
        match self {
            RuleError::AggregateSyntax { failures } => failures,
            _ => &[],
        }
    }
}

fn format_failures(failures: &[LineFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_field_not_allowed(field: &str, suggestion: Option<&str>, allowed: &[&str]) -> String {
    let base = format!(
        "field \"{}\" is not allowed. Allowed fields: {}",
        field,
        allowed.join(", ")
    );
    match suggestion {
        Some(s) => format!("{} Did you mean '{}'?", base, s),
        None => base,
    }
}
