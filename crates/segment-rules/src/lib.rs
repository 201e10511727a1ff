//! Compiler for line-oriented catalog segment rules.
//!
//! This crate turns human-written rules such as `price > 100` into a validated
//! filter expression for a document store. Each rule is one line:
//!
//! ```text
//! # comments and blank lines are ignored
//! price >= 100
//! price <= 500
//! stock_status = instock
//! on_sale = true
//! ```
//!
//! # Pipeline
//!
//! 1. [`parse_rule_text`] splits the text into lines and parses each with
//!    [`parse_condition`]. Syntax errors are collected for the whole text.
//! 2. [`validate`] checks each [`Condition`] against the field and operator
//!    allow-lists in [`registry`] and the field's declared [`ValueType`].
//! 3. [`coerce`] converts the raw value to a [`Scalar`].
//! 4. [`compile`] folds everything into a [`FilterExpression`].
//!
//! Values are never parsed as structure: `category = {"$gt":0}` compiles to
//! an equality against that literal string.
//!
//! # Operators
//! - `=` - equal
//! - `!=` - not equal
//! - `>`, `<`, `>=`, `<=` - comparisons
//!
//! # Example
//!
//! ```
//! use segment_rules::compile_rules;
//!
//! let compiled = compile_rules("price >= 100\nprice <= 500\nstock_status = instock").unwrap();
//! assert_eq!(compiled.conditions.len(), 3);
//!
//! let json = serde_json::to_string(&compiled.filter_expression).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"$and":[{"price":{"$gte":"100"}},{"price":{"$lte":"500"}}],"stock_status":"instock"}"#
//! );
//! ```

mod coerce;
mod compiler;
mod condition;
mod error;
mod expression;
pub mod registry;
pub mod request;
mod rule_text;
mod validator;

pub use coerce::{coerce, coerce_as};
pub use compiler::{compile, compile_rules, CompiledRules};
pub use condition::{parse_condition, Condition, Operator};
pub use error::{LineFailure, RuleError, RuleResult, SyntaxError};
pub use expression::{Clause, Comparator, FilterExpression, Leaf, Scalar, CONJUNCTION_KEY};
pub use registry::{FieldSpec, ValueType};
pub use rule_text::{parse_rule_text, parse_rule_value};
pub use validator::validate;
