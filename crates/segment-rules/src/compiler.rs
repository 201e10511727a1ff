//! Folding of validated conditions into a [`FilterExpression`].

use std::collections::HashMap;

use serde::Serialize;

use crate::coerce;
use crate::condition::Condition;
use crate::error::{RuleError, RuleResult};
use crate::expression::{FilterExpression, Leaf};
use crate::rule_text::parse_rule_text;
use crate::validator;

/// Where a field's constraints currently live in the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    /// Constrained once, stored as a direct key.
    Direct,
    /// Constrained more than once, stored only in the conjunction list.
    Conjoined,
}

/// Compiles conditions into a filter expression.
///
/// Each condition is validated and its value coerced before it is folded in.
/// The first constraint on a field becomes a direct key. The second moves that
/// key into the shared conjunction list together with the new constraint, and
/// later ones are appended to the same list. The list keeps arrival order across
/// all fields.
///
/// # Errors
///
/// - `RuleError::EmptyInput` if `conditions` is empty.
/// - The first validation error encountered; later conditions are not checked.
///
/// # Example
///
/// ```
/// use segment_rules::{compile, parse_rule_text};
///
/// let conditions = parse_rule_text("price >= 100\nprice <= 500\non_sale = true").unwrap();
/// let expression = compile(&conditions).unwrap();
/// assert!(expression.get("price").is_none());
/// assert_eq!(expression.conjunction().unwrap().len(), 2);
/// ```
pub fn compile(conditions: &[Condition]) -> RuleResult<FilterExpression> {
    if conditions.is_empty() {
        return Err(RuleError::EmptyInput);
    }

    let mut expression = FilterExpression::default();
    let mut states: HashMap<&str, FieldState> = HashMap::new();

    for condition in conditions {
        let spec = validator::checked_field(condition)?;
        let value = coerce::coerce_as(spec.value_type, spec.name, condition.value())?;
        let leaf = Leaf::new(condition.operator(), value);
        let field = condition.field();

        tracing::debug!(field, operator = %condition.operator(), "compiling condition");

        match states.get(field).copied() {
            None => {
                expression.set_direct(field, leaf);
                states.insert(field, FieldState::Direct);
            }
            Some(FieldState::Direct) => {
                if let Some(previous) = expression.take_direct(field) {
                    expression.conjoin(field, previous);
                }
                expression.conjoin(field, leaf);
                states.insert(field, FieldState::Conjoined);
            }
            Some(FieldState::Conjoined) => expression.conjoin(field, leaf),
        }
    }

    Ok(expression)
}

/// Parsed conditions together with the expression compiled from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledRules {
    pub conditions: Vec<Condition>,
    pub filter_expression: FilterExpression,
}

/// Parses, validates and compiles rule text in one step.
///
/// # Errors
///
/// Any error from [`parse_rule_text`] or [`compile`].
pub fn compile_rules(text: &str) -> RuleResult<CompiledRules> {
    let conditions = parse_rule_text(text)?;
    let filter_expression = compile(&conditions)?;
    Ok(CompiledRules {
        conditions,
        filter_expression,
    })
}
