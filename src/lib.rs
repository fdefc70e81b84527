//! Structural assertions over JSON values.
//!
//! Describe the expected *shape* of a `serde_json::Value` with a [`Schema`]
//! and check an actual value against it. Plain JSON is its own schema
//! (objects are partial, arrays positional, scalars literal). [`TypeTag`]s,
//! regex [`Pattern`]s and the combinators [`one_of`], [`list_of`] and
//! [`list_containing`] loosen the rule at any position.
//!
//! ```
//! use serde_json::json;
//! use structure_match::{check, list_containing, list_of, mapping, TypeTag};
//!
//! let item = mapping! { "id" => TypeTag::Integer, "type" => TypeTag::String };
//! let value = json!([
//!     {"id": 123, "type": "aType"},
//!     {"id": 555, "type": "anotherType"},
//! ]);
//! assert!(check(&list_of([item]).into(), &value).is_ok());
//!
//! let two_of_a_kind = list_containing(json!({"type": "aType"})).exactly(2);
//! let failure = check(&two_of_a_kind.into(), &value).unwrap_err();
//! assert!(failure.is_size());
//! ```
//!
//! A failed check returns the first mismatch found, depth-first, as a
//! [`MatchFailure`] carrying the path, the expected schema subtree and the
//! actual value subtree. [`Report`] turns it into text.
pub mod combinator;
pub mod config;
pub mod error;
pub mod matcher;
pub mod report;
pub mod schema;

pub use combinator::{
    DEFAULT_MAX, Descend, ListContains, ListOf, OneOf, Quantifier, StagedListOf, list_containing,
    list_of, one_of,
};
pub use config::MatchConfig;
pub use error::{FailureKind, MatchFailure, Path, PathSegment, Reason, UsageError};
pub use matcher::{Matcher, check};
pub use report::Report;
pub use schema::{Pattern, Schema, TypeTag, pattern, type_of};
pub use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// MACROS
// ————————————————————————————————————————————————————————————————————————————

/// [`OneOf`] over candidates of mixed kinds.
///
/// ```
/// use structure_match::{one_of, TypeTag};
/// let id = one_of![TypeTag::Integer, "none"];
/// ```
#[macro_export]
macro_rules! one_of {
    ($($alternative:expr),* $(,)?) => {{
        let alternatives: ::std::vec::Vec<$crate::Schema> =
            ::std::vec![$($crate::Schema::from($alternative)),*];
        $crate::OneOf::new(alternatives)
    }};
}

/// [`ListOf`] over element schemas of mixed kinds.
#[macro_export]
macro_rules! list_of {
    ($($element:expr),* $(,)?) => {{
        let element_schemas: ::std::vec::Vec<$crate::Schema> =
            ::std::vec![$($crate::Schema::from($element)),*];
        $crate::ListOf::new(element_schemas)
    }};
}

/// [`Schema::Mapping`] with values of mixed kinds, in declaration order.
///
/// ```
/// use structure_match::{mapping, pattern, TypeTag};
/// let user = mapping! {
///     "id" => TypeTag::Integer,
///     "email" => pattern(r"[^@]+@[^@]+").unwrap(),
///     "role" => "admin",
/// };
/// ```
#[macro_export]
macro_rules! mapping {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let fields: ::std::vec::Vec<(::std::string::String, $crate::Schema)> =
            ::std::vec![$((::std::string::String::from($key), $crate::Schema::from($value))),*];
        $crate::Schema::mapping(fields)
    }};
}

/// Panics with a [`Report`] unless `value` matches `schema`.
#[macro_export]
macro_rules! assert_structure {
    ($value:expr, $schema:expr $(,)?) => {{
        let value: &$crate::Value = &$value;
        let schema: $crate::Schema = ::std::convert::Into::into($schema);
        if let ::std::result::Result::Err(failure) = $crate::check(&schema, value) {
            ::std::panic!("{}", $crate::Report::new(&schema, value, &failure));
        }
    }};
}

/// Panics if `value` matches `schema`.
#[macro_export]
macro_rules! assert_not_structure {
    ($value:expr, $schema:expr $(,)?) => {{
        let value: &$crate::Value = &$value;
        let schema: $crate::Schema = ::std::convert::Into::into($schema);
        if $crate::check(&schema, value).is_ok() {
            ::std::panic!("{}", $crate::report::unexpected_match(&schema, value));
        }
    }};
}
