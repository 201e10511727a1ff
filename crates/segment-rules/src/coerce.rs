//! Conversion of raw value text into a field's native representation.
//!
//! Numbers and booleans are recognised by exact literal grammars:
//!
//! ```text
//! number  ::= sign? ( digits ( "." digits? )? | "." digits ) exponent?
//! sign    ::= "+" | "-"
//! exponent::= ( "e" | "E" ) sign? digits
//! boolean ::= "true" | "false"        (ASCII case-insensitive)
//! ```

use crate::error::{RuleError, RuleResult};
use crate::expression::Scalar;
use crate::registry::{self, ValueType};

/// Description of a numeric value, used in type mismatch errors.
pub(crate) const EXPECTED_NUMBER: &str = "a numeric";

/// Description of a boolean value, used in type mismatch errors.
pub(crate) const EXPECTED_BOOLEAN: &str = "a boolean (true/false)";

/// Converts a raw value for `field` into its native representation.
///
/// Fields without a declared type, and plain string fields, get the text back
/// unchanged.
///
/// # Errors
///
/// Returns `RuleError::TypeMismatch` if the field is numeric or boolean and the
/// text is not a literal of that type.
///
/// # Example
///
/// ```
/// use segment_rules::{coerce, Scalar};
///
/// assert_eq!(coerce("stock_quantity", "-10").unwrap(), Scalar::Number(-10.0));
/// assert_eq!(coerce("on_sale", "TRUE").unwrap(), Scalar::Bool(true));
/// assert_eq!(
///     coerce("category", r#"{"$gt":0}"#).unwrap(),
///     Scalar::Text(r#"{"$gt":0}"#.to_string())
/// );
/// ```
pub fn coerce(field: &str, raw: &str) -> RuleResult<Scalar> {
    coerce_as(registry::value_type_of(field), field, raw)
}

/// Converts a raw value according to an explicit value type.
pub fn coerce_as(value_type: ValueType, field: &str, raw: &str) -> RuleResult<Scalar> {
    match value_type {
        ValueType::Number => parse_number(raw)
            .map(Scalar::Number)
            .ok_or_else(|| RuleError::type_mismatch(field, EXPECTED_NUMBER, raw)),
        ValueType::Boolean => parse_bool(raw)
            .map(Scalar::Bool)
            .ok_or_else(|| RuleError::type_mismatch(field, EXPECTED_BOOLEAN, raw)),
        ValueType::PlainString => Ok(Scalar::Text(raw.to_string())),
    }
}

/// Parses a decimal literal. Rejects anything outside the grammar and non-finite results.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    if !is_number_literal(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses `true` or `false`, ignoring ASCII case.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn is_number_literal(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits + frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
