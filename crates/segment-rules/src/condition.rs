//! Conditions and the single-line condition parser.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult, SyntaxError};
use crate::registry;

/// A comparison operator between a field and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Operator {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
}

impl Operator {
    /// Operators in the order a line is scanned for them.
    ///
    /// Two-character operators come first so that `=` never matches inside `>=`.
    pub const SCAN_ORDER: [Operator; 6] = [
        Operator::Ge,
        Operator::Le,
        Operator::Ne,
        Operator::Eq,
        Operator::Gt,
        Operator::Lt,
    ];

    /// Returns the textual symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::SCAN_ORDER
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| RuleError::OperatorNotAllowed {
                operator: s.to_string(),
                allowed: registry::allowed_operator_symbols(),
            })
    }
}

impl TryFrom<String> for Operator {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.symbol().to_string()
    }
}

/// One parsed `field operator value` triple.
///
/// The value is kept exactly as written; it is only interpreted later, against
/// the declared type of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    field: String,
    operator: Operator,
    value: String,
    #[serde(default)]
    original: String,
}

impl Condition {
    /// Builds a condition from already separated parts.
    ///
    /// The original text is reconstructed as `field operator value`.
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        let original = format!("{} {} {}", field, operator, value);
        Self {
            field,
            operator,
            value,
            original,
        }
    }

    /// The field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The raw, uninterpreted value text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The trimmed source text the condition was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }
}

impl FromStr for Condition {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_condition(s)
    }
}

/// Parses one line of rule text into a [`Condition`].
///
/// # Errors
///
/// Returns `RuleError::Syntax` with:
/// - `SyntaxError::Empty` if the line is blank,
/// - `SyntaxError::NoField` if the only operator found starts the line,
/// - `SyntaxError::NoOperator` if there is no operator at all,
/// - `SyntaxError::NoValue` if nothing follows the operator.
///
/// # Example
///
/// ```
/// use segment_rules::{parse_condition, Operator};
///
/// let condition = parse_condition("  price   >=   100  ").unwrap();
/// assert_eq!(condition.field(), "price");
/// assert_eq!(condition.operator(), Operator::Ge);
/// assert_eq!(condition.value(), "100");
/// assert_eq!(condition.original(), "price   >=   100");
/// ```
pub fn parse_condition(line: &str) -> RuleResult<Condition> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(RuleError::syntax(trimmed, SyntaxError::Empty));
    }

    let Some((operator, index)) = find_operator(trimmed) else {
        let kind = if Operator::SCAN_ORDER
            .iter()
            .any(|op| trimmed.starts_with(op.symbol()))
        {
            SyntaxError::NoField
        } else {
            SyntaxError::NoOperator
        };
        return Err(RuleError::syntax(trimmed, kind));
    };

    let field = trimmed[..index].trim();
    let value = trimmed[index + operator.symbol().len()..].trim();

    if field.is_empty() {
        return Err(RuleError::syntax(trimmed, SyntaxError::NoField));
    }
    if value.is_empty() {
        return Err(RuleError::syntax(trimmed, SyntaxError::NoValue));
    }

    Ok(Condition {
        field: field.to_string(),
        operator,
        value: value.to_string(),
        original: trimmed.to_string(),
    })
}

/// Finds the first operator, in scan order, whose first occurrence is past index 0.
fn find_operator(text: &str) -> Option<(Operator, usize)> {
    Operator::SCAN_ORDER
        .into_iter()
        .find_map(|op| match text.find(op.symbol()) {
            Some(index) if index > 0 => Some((op, index)),
            _ => None,
        })
}
