//! Multi-line rule text parsing.

use serde_json::Value;

use crate::condition::{parse_condition, Condition};
use crate::error::{LineFailure, RuleError, RuleResult};

/// Marks a line as a comment when it is the first non-space character.
const COMMENT_PREFIX: char = '#';

/// Parses rule text, one condition per line.
///
/// Lines are trimmed; blank lines and `#` comments are skipped. Either every
/// remaining line parses or the whole call fails.
///
/// # Errors
///
/// - `RuleError::InputShape` if `text` is empty.
/// - `RuleError::EmptyInput` if only blank lines and comments remain.
/// - `RuleError::AggregateSyntax` listing every line that failed to parse.
///
/// # Example
///
/// ```
/// use segment_rules::parse_rule_text;
///
/// let conditions = parse_rule_text("# in stock, over 100\nprice > 100\n\nstock_status = instock").unwrap();
/// assert_eq!(conditions.len(), 2);
/// assert_eq!(conditions[1].field(), "stock_status");
/// ```
pub fn parse_rule_text(text: &str) -> RuleResult<Vec<Condition>> {
    if text.is_empty() {
        return Err(RuleError::InputShape);
    }

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .collect();

    if lines.is_empty() {
        return Err(RuleError::EmptyInput);
    }

    let mut conditions = Vec::with_capacity(lines.len());
    let mut failures = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        match parse_condition(line) {
            Ok(condition) => conditions.push(condition),
            Err(RuleError::Syntax { kind, .. }) => failures.push(LineFailure {
                line: index + 1,
                condition: line.to_string(),
                error: kind,
            }),
            Err(other) => return Err(other),
        }
    }

    if !failures.is_empty() {
        tracing::debug!(failed = failures.len(), total = lines.len(), "rule text rejected");
        return Err(RuleError::AggregateSyntax { failures });
    }

    tracing::debug!(count = conditions.len(), "parsed rule text");
    Ok(conditions)
}

/// Parses rules supplied as an untyped JSON value, such as a request body field.
///
/// # Errors
///
/// Returns `RuleError::InputShape` if the value is absent, `null`, or not a
/// string, before any line is looked at. Otherwise behaves like
/// [`parse_rule_text`].
pub fn parse_rule_value(value: Option<&Value>) -> RuleResult<Vec<Condition>> {
    match value {
        Some(Value::String(text)) => parse_rule_text(text),
        _ => Err(RuleError::InputShape),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::SyntaxError;

    #[test]
    fn test_single_line() {
        let conditions = parse_rule_text("price > 100").unwrap();
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].field(), "price");
        assert_eq!(conditions[0].value(), "100");
    }

    #[test]
    fn test_blank_lines_and_comments_skipped() {
        let text = "\n# Filter expensive in-stock products\nprice > 500\n\nstock_status = instock\n  # End of rules\n";
        let conditions = parse_rule_text(text).unwrap();
        let fields: Vec<&str> = conditions.iter().map(Condition::field).collect();
        assert_eq!(fields, vec!["price", "stock_status"]);
    }

    #[test]
    fn test_windows_line_endings() {
        let conditions = parse_rule_text("price > 100\r\non_sale = true\r\n").unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].value(), "100");
        assert_eq!(conditions[1].value(), "true");
    }

    #[test]
    fn test_empty_string_is_input_shape_error() {
        assert_eq!(parse_rule_text(""), Err(RuleError::InputShape));
    }

    #[test]
    fn test_only_comments_is_empty_input() {
        assert_eq!(
            parse_rule_text("# Comment only\n\n  # Another comment"),
            Err(RuleError::EmptyInput)
        );
        assert_eq!(parse_rule_text("   \n\t\n"), Err(RuleError::EmptyInput));
    }

    #[test]
    fn test_failures_are_aggregated() {
        let err = parse_rule_text("price > 100\nbadline\nstock_status =").unwrap_err();
        assert_eq!(
            err,
            RuleError::AggregateSyntax {
                failures: vec![
                    LineFailure {
                        line: 2,
                        condition: "badline".to_string(),
                        error: SyntaxError::NoOperator,
                    },
                    LineFailure {
                        line: 3,
                        condition: "stock_status =".to_string(),
                        error: SyntaxError::NoValue,
                    },
                ],
            }
        );
    }

    #[test]
    fn test_line_numbers_count_condition_lines() {
        let err = parse_rule_text("# header\n\nprice > 1\n= 5").unwrap_err();
        let failures = err.line_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].line, 2);
        assert_eq!(failures[0].error, SyntaxError::NoField);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let text = "price >= 100\nprice <= 500\non_sale = TRUE";
        assert_eq!(parse_rule_text(text), parse_rule_text(text));
    }

    #[test]
    fn test_json_value_shapes() {
        assert_eq!(parse_rule_value(None), Err(RuleError::InputShape));
        assert_eq!(parse_rule_value(Some(&json!(null))), Err(RuleError::InputShape));
        assert_eq!(parse_rule_value(Some(&json!(123))), Err(RuleError::InputShape));
        assert_eq!(parse_rule_value(Some(&json!(""))), Err(RuleError::InputShape));
        assert_eq!(
            parse_rule_value(Some(&json!(["price > 1"]))),
            Err(RuleError::InputShape)
        );
        assert_eq!(parse_rule_value(Some(&json!("price > 1"))).unwrap().len(), 1);
    }
}
