//! Allow-list and value-type checks for parsed conditions.

use crate::coerce::{self, EXPECTED_BOOLEAN, EXPECTED_NUMBER};
use crate::condition::Condition;
use crate::error::{RuleError, RuleResult};
use crate::registry::{self, FieldSpec, ValueType};

/// Checks a condition against the field and operator allow-lists and the
/// field's declared value type.
///
/// Field and operator are checked before the value is looked at.
///
/// # Errors
///
/// - `RuleError::FieldNotAllowed` if the field is not an allowed registry entry.
/// - `RuleError::OperatorNotAllowed` if the operator is not allowed.
/// - `RuleError::TypeMismatch` if the value is not a literal of the field's type.
pub fn validate(condition: &Condition) -> RuleResult<()> {
    checked_field(condition).map(|_| ())
}

/// Validates a condition and returns the registry entry of its field.
pub(crate) fn checked_field(condition: &Condition) -> RuleResult<&'static FieldSpec> {
    let field = condition.field();

    let spec = registry::allowed_field(field).ok_or_else(|| RuleError::FieldNotAllowed {
        field: field.to_string(),
        suggestion: registry::find_similar_field(field).map(str::to_string),
        allowed: registry::allowed_field_names(),
    })?;

    if !registry::is_operator_allowed(condition.operator()) {
        return Err(RuleError::OperatorNotAllowed {
            operator: condition.operator().to_string(),
            allowed: registry::allowed_operator_symbols(),
        });
    }

    validate_value(spec, condition.value())?;
    Ok(spec)
}

fn validate_value(spec: &FieldSpec, raw: &str) -> RuleResult<()> {
    match spec.value_type {
        ValueType::Number if coerce::parse_number(raw).is_none() => Err(
            RuleError::type_mismatch(spec.name, EXPECTED_NUMBER, raw),
        ),
        ValueType::Boolean if coerce::parse_bool(raw).is_none() => Err(
            RuleError::type_mismatch(spec.name, EXPECTED_BOOLEAN, raw),
        ),
        _ => Ok(()),
    }
}
