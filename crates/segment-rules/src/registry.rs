//! The fixed field and operator allow-lists.
//!
//! Lookups are by exact name only. Nothing here is mutable at runtime.

use serde::Serialize;
use strsim::levenshtein;

use crate::condition::Operator;

/// Maximum Levenshtein distance to consider a field name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// The declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Decimal numbers.
    Number,
    /// `true` or `false`, case-insensitive.
    Boolean,
    /// Any text, bound verbatim.
    #[serde(rename = "string")]
    PlainString,
}

impl ValueType {
    /// Returns the name used in metadata output.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Boolean => "boolean",
            ValueType::PlainString => "string",
        }
    }
}

/// A registry entry describing one catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as written in rules and stored in documents.
    pub name: &'static str,
    /// Declared value type.
    pub value_type: ValueType,
    /// Whether rules may constrain this field.
    pub allowed: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, value_type: ValueType, allowed: bool) -> Self {
        Self {
            name,
            value_type,
            allowed,
        }
    }
}

/// Every known catalog field.
///
/// `id` is typed but not selectable.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("title", ValueType::PlainString, true),
    FieldSpec::new("price", ValueType::PlainString, true),
    FieldSpec::new("stock_status", ValueType::PlainString, true),
    FieldSpec::new("stock_quantity", ValueType::Number, true),
    FieldSpec::new("category", ValueType::PlainString, true),
    FieldSpec::new("tags", ValueType::PlainString, true),
    FieldSpec::new("on_sale", ValueType::Boolean, true),
    FieldSpec::new("id", ValueType::Number, false),
];

/// Operators accepted in rules, in display order.
pub const ALLOWED_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Gt,
    Operator::Lt,
    Operator::Ge,
    Operator::Le,
    Operator::Ne,
];

/// Looks up a field by exact name, whether or not it is allowed.
pub fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

/// Looks up a field by exact name, returning it only if rules may use it.
pub fn allowed_field(name: &str) -> Option<&'static FieldSpec> {
    lookup(name).filter(|spec| spec.allowed)
}

/// Returns the declared type of a field; unknown fields are plain strings.
pub fn value_type_of(name: &str) -> ValueType {
    lookup(name).map_or(ValueType::PlainString, |spec| spec.value_type)
}

/// Iterates over the fields rules may use, in registry order.
pub fn allowed_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(|spec| spec.allowed)
}

/// Returns the names of the fields rules may use.
pub fn allowed_field_names() -> Vec<&'static str> {
    allowed_fields().map(|spec| spec.name).collect()
}

/// Returns the symbols of the allowed operators.
pub fn allowed_operator_symbols() -> Vec<&'static str> {
    ALLOWED_OPERATORS.iter().map(|op| op.symbol()).collect()
}

/// Returns true if the operator is on the allow-list.
pub fn is_operator_allowed(operator: Operator) -> bool {
    ALLOWED_OPERATORS.contains(&operator)
}

/// Finds the closest allowed field name using Levenshtein distance.
///
/// Comparison ignores case, so a wrongly cased name still gets a suggestion.
/// Returns `None` for exact matches and for names farther than the threshold.
pub fn find_similar_field(query: &str) -> Option<&'static str> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = allowed_fields()
        .map(|spec| (spec.name, levenshtein(&query_lower, spec.name)))
        .min_by_key(|(_, d)| *d)?;

    if best_match != query && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match)
    } else {
        None
    }
}
