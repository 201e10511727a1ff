//! The compiled filter expression.
//!
//! A [`FilterExpression`] serializes to the document-store query shape:
//!
//! ```text
//! {
//!   "stock_status": "instock",
//!   "on_sale": true,
//!   "$and": [ { "price": { "$gte": "100" } }, { "price": { "$lte": "500" } } ]
//! }
//! ```
//!
//! Keys are emitted in the order they were inserted.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::condition::Operator;

/// Key under which overflow constraints are grouped.
pub const CONJUNCTION_KEY: &str = "$and";

/// A coerced, opaque value bound into a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A finite decimal number.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// Verbatim text. Never interpreted, even if it looks like structured data.
    Text(String),
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Integral values are written as integers: `100`, not `100.0`.
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            Scalar::Number(n) => serializer.serialize_f64(*n),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// A non-equality comparison inside a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Comparator {
    /// Returns the query-language key for this comparator.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Ne => "$ne",
            Comparator::Gt => "$gt",
            Comparator::Lt => "$lt",
            Comparator::Gte => "$gte",
            Comparator::Lte => "$lte",
        }
    }
}

/// A single constraint on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// Equality, written as the bare value.
    Equals(Scalar),
    /// Any other comparison, written as `{comparator: value}`.
    Compare {
        comparator: Comparator,
        value: Scalar,
    },
}

impl Leaf {
    /// Builds the leaf for `field <operator> value`.
    pub fn new(operator: Operator, value: Scalar) -> Self {
        let comparator = match operator {
            Operator::Eq => return Leaf::Equals(value),
            Operator::Ne => Comparator::Ne,
            Operator::Gt => Comparator::Gt,
            Operator::Lt => Comparator::Lt,
            Operator::Ge => Comparator::Gte,
            Operator::Le => Comparator::Lte,
        };
        Leaf::Compare { comparator, value }
    }

    /// The value bound by this leaf.
    pub fn value(&self) -> &Scalar {
        match self {
            Leaf::Equals(value) | Leaf::Compare { value, .. } => value,
        }
    }

    /// The comparator, or `None` for equality.
    pub fn comparator(&self) -> Option<Comparator> {
        match self {
            Leaf::Equals(_) => None,
            Leaf::Compare { comparator, .. } => Some(*comparator),
        }
    }
}

impl Serialize for Leaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Leaf::Equals(value) => value.serialize(serializer),
            Leaf::Compare { comparator, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(comparator.as_str(), value)?;
                map.end()
            }
        }
    }
}

/// One `{field: leaf}` entry of the conjunction list.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub leaf: Leaf,
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.leaf)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Field { field: String, leaf: Leaf },
    Conjunction(Vec<Clause>),
}

/// A compiled rule set: direct field constraints plus an optional conjunction list.
///
/// A field is either a direct key or present only inside the conjunction list,
/// never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpression {
    entries: Vec<Entry>,
}

impl FilterExpression {
    /// Returns the direct leaf for a field.
    pub fn get(&self, field: &str) -> Option<&Leaf> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Field { field: name, leaf } if name == field => Some(leaf),
            _ => None,
        })
    }

    /// Returns true if the field is a direct key.
    pub fn contains_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Iterates over direct keys and their leaves, in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Leaf)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Field { field, leaf } => Some((field.as_str(), leaf)),
            Entry::Conjunction(_) => None,
        })
    }

    /// Returns the shared conjunction list, if any field was constrained more than once.
    pub fn conjunction(&self) -> Option<&[Clause]> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Conjunction(clauses) => Some(clauses.as_slice()),
            Entry::Field { .. } => None,
        })
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets a direct key, appending it after existing keys.
    pub(crate) fn set_direct(&mut self, field: &str, leaf: Leaf) {
        self.entries.push(Entry::Field {
            field: field.to_string(),
            leaf,
        });
    }

    /// Removes a direct key and returns its leaf.
    pub(crate) fn take_direct(&mut self, field: &str) -> Option<Leaf> {
        let index = self.entries.iter().position(
            |entry| matches!(entry, Entry::Field { field: name, .. } if name == field),
        )?;
        match self.entries.remove(index) {
            Entry::Field { leaf, .. } => Some(leaf),
            Entry::Conjunction(_) => None,
        }
    }

    /// Appends a clause to the conjunction list, creating it at the end if absent.
    pub(crate) fn conjoin(&mut self, field: &str, leaf: Leaf) {
        let clause = Clause {
            field: field.to_string(),
            leaf,
        };
        for entry in &mut self.entries {
            if let Entry::Conjunction(clauses) = entry {
                clauses.push(clause);
                return;
            }
        }
        self.entries.push(Entry::Conjunction(vec![clause]));
    }
}

impl Serialize for FilterExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            match entry {
                Entry::Field { field, leaf } => map.serialize_entry(field, leaf)?,
                Entry::Conjunction(clauses) => {
                    map.serialize_entry(CONJUNCTION_KEY, &ClauseList(clauses))?
                }
            }
        }
        map.end()
    }
}

struct ClauseList<'a>(&'a [Clause]);

impl Serialize for ClauseList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for clause in self.0 {
            seq.serialize_element(clause)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_integral_numbers_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&Scalar::Number(100.0)).unwrap(), "100");
        assert_eq!(serde_json::to_string(&Scalar::Number(-10.0)).unwrap(), "-10");
        assert_eq!(serde_json::to_string(&Scalar::Number(10.5)).unwrap(), "10.5");
        assert_eq!(serde_json::to_string(&Scalar::Number(0.0)).unwrap(), "0");
    }

    #[test]
    fn test_text_scalar_stays_a_string() {
        let scalar = Scalar::from(r#"{"$gt":0}"#);
        assert_eq!(
            serde_json::to_string(&scalar).unwrap(),
            r#""{\"$gt\":0}""#
        );
    }

    #[test]
    fn test_leaf_shapes() {
        let eq = Leaf::new(Operator::Eq, Scalar::from("instock"));
        assert_eq!(serde_json::to_string(&eq).unwrap(), r#""instock""#);
        assert_eq!(eq.comparator(), None);

        let cases = [
            (Operator::Ne, "$ne"),
            (Operator::Gt, "$gt"),
            (Operator::Lt, "$lt"),
            (Operator::Ge, "$gte"),
            (Operator::Le, "$lte"),
        ];
        for (op, key) in cases {
            let leaf = Leaf::new(op, Scalar::Number(5.0));
            assert_eq!(
                serde_json::to_string(&leaf).unwrap(),
                format!(r#"{{"{key}":5}}"#)
            );
        }
    }

    #[test]
    fn test_conjunction_created_in_place() {
        let mut expr = FilterExpression::default();
        expr.set_direct("price", Leaf::new(Operator::Ge, Scalar::from("100")));
        expr.set_direct("title", Leaf::Equals(Scalar::from("Lamp")));

        let previous = expr.take_direct("price").unwrap();
        expr.conjoin("price", previous);
        expr.conjoin("price", Leaf::new(Operator::Le, Scalar::from("500")));
        expr.set_direct("on_sale", Leaf::Equals(Scalar::Bool(true)));

        assert!(!expr.contains_field("price"));
        assert_eq!(expr.conjunction().map(<[Clause]>::len), Some(2));
        assert_eq!(
            serde_json::to_string(&expr).unwrap(),
            r#"{"title":"Lamp","$and":[{"price":{"$gte":"100"}},{"price":{"$lte":"500"}}],"on_sale":true}"#
        );
    }

    #[test]
    fn test_empty_expression() {
        let expr = FilterExpression::default();
        assert!(expr.is_empty());
        assert!(expr.conjunction().is_none());
        assert_eq!(serde_json::to_string(&expr).unwrap(), "{}");
    }
}
