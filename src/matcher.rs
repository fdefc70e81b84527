//! Structural comparator.
//!
//! Walks the schema and the value in lockstep. The first applicable rule
//! wins, in this order:
//!
//! 1. type tag: the value's runtime tag must be admitted;
//! 2. pattern against a string: the whole string must match;
//! 3. combinator: the combinator decides, re-entering through [`Descend`];
//! 4. object value: mapping schema, key by key in declaration order;
//! 5. array value: sequence schema, same length then pairwise;
//! 6. scalar value: literal equality.
//!
//! A pattern against a non-string skips rule 2 and fails further down on
//! shape. Every rule fails fast; exactly one failure comes back.
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::combinator::Descend;
use crate::config::MatchConfig;
use crate::error::{MatchFailure, Path, PathSegment, Reason};
use crate::schema::{Schema, TypeTag};

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn check(&self, schema: &Schema, value: &Value) -> Result<(), MatchFailure> {
        let mut walker = Walker { config: &self.config, path: Path::root(), depth: 0 };
        let outcome = walker.explore(schema, value);
        if let Err(failure) = &outcome {
            debug!(
                path = %failure.path,
                kind = ?failure.kind(),
                reason = %failure.reason,
                "value does not match structure"
            );
        }
        outcome
    }

    pub fn is_match(&self, schema: &Schema, value: &Value) -> bool {
        self.check(schema, value).is_ok()
    }
}

/// Checks `value` against `schema` with the default [`MatchConfig`].
pub fn check(schema: &Schema, value: &Value) -> Result<(), MatchFailure> {
    Matcher::default().check(schema, value)
}

// ————————————————————————————————————————————————————————————————————————————
// WALKER
// ————————————————————————————————————————————————————————————————————————————

struct Walker<'c> {
    config: &'c MatchConfig,
    path: Path,
    depth: usize,
}

impl Walker<'_> {
    fn explore(&mut self, schema: &Schema, value: &Value) -> Result<(), MatchFailure> {
        match (schema, value) {
            (Schema::Type(tag), _) => {
                let found = TypeTag::of(value);
                if tag.admits(found) {
                    Ok(())
                } else {
                    Err(self.fail(Reason::TypeMismatch { expected: *tag, found }, schema, value))
                }
            }
            (Schema::Pattern(pattern), Value::String(text)) => {
                if pattern.is_full_match(text) {
                    Ok(())
                } else {
                    let reason = Reason::PatternMismatch { pattern: pattern.as_str().to_owned() };
                    Err(self.fail(reason, schema, value))
                }
            }
            (Schema::OneOf(combinator), _) => combinator.matches(value, self),
            (Schema::ListOf(combinator), _) => combinator.matches(value, self),
            (Schema::ListContains(combinator), _) => combinator.matches(value, self),
            (_, Value::Object(fields)) => self.explore_mapping(schema, fields, value),
            (_, Value::Array(items)) => self.explore_sequence(schema, items, value),
            (Schema::Literal(expected), _) => self.explore_literal(schema, expected, value),
            (Schema::Pattern(_), _) => Err(self.fail(Reason::NotAString, schema, value)),
            (Schema::Mapping(_), _) => {
                let reason = Reason::TypeMismatch { expected: TypeTag::Object, found: TypeTag::of(value) };
                Err(self.fail(reason, schema, value))
            }
            (Schema::Sequence(_), _) => {
                let reason = Reason::TypeMismatch { expected: TypeTag::Array, found: TypeTag::of(value) };
                Err(self.fail(reason, schema, value))
            }
        }
    }

    fn explore_mapping(
        &mut self,
        schema: &Schema,
        fields: &Map<String, Value>,
        value: &Value,
    ) -> Result<(), MatchFailure> {
        match schema {
            Schema::Mapping(expected) => {
                let actual = normalized_fields(fields);
                for (key, sub_schema) in expected {
                    let segment = PathSegment::Key(key.clone());
                    let Some(sub_value) = actual.get(normalize_key(key)) else {
                        let reason = Reason::MissingKey { key: key.clone() };
                        return Err(self.fail(reason, schema, value).within(segment));
                    };
                    self.nested(Some(segment), sub_schema, sub_value)?;
                }
                Ok(())
            }
            Schema::Literal(expected @ Value::Object(_)) => {
                self.explore_literal(schema, expected, value)
            }
            _ => Err(self.fail(Reason::NotAMapping, schema, value)),
        }
    }

    fn explore_sequence(
        &mut self,
        schema: &Schema,
        items: &[Value],
        value: &Value,
    ) -> Result<(), MatchFailure> {
        match schema {
            Schema::Sequence(expected) => {
                if expected.len() != items.len() {
                    let reason = Reason::LengthMismatch { expected: expected.len(), actual: items.len() };
                    return Err(self.fail(reason, schema, value));
                }
                for (index, (sub_schema, item)) in expected.iter().zip(items).enumerate() {
                    self.nested(Some(PathSegment::Index(index)), sub_schema, item)?;
                }
                Ok(())
            }
            Schema::Literal(expected @ Value::Array(expected_items)) => {
                if expected_items.len() != items.len() {
                    let reason = Reason::LengthMismatch {
                        expected: expected_items.len(),
                        actual: items.len(),
                    };
                    return Err(self.fail(reason, schema, value));
                }
                self.explore_literal(schema, expected, value)
            }
            _ => Err(self.fail(Reason::NotASequence, schema, value)),
        }
    }

    /// Deep equality against a literal, sharing the walker's depth budget.
    fn explore_literal(
        &self,
        schema: &Schema,
        expected: &Value,
        value: &Value,
    ) -> Result<(), MatchFailure> {
        let budget = self.config.max_depth.saturating_sub(self.depth);
        match literal_eq(expected, value, budget) {
            Some(true) => Ok(()),
            Some(false) => Err(self.fail(Reason::LiteralMismatch, schema, value)),
            None => Err(self.too_deep(schema, value)),
        }
    }

    /// Depth failure carrying only the top level of both subtrees. Anything
    /// below the limit is never cloned.
    fn too_deep(&self, schema: &Schema, value: &Value) -> MatchFailure {
        MatchFailure::new(
            Reason::DepthExceeded { limit: self.config.max_depth },
            self.path.clone(),
            schema.shallow(),
            shallow(value),
        )
    }

    /// Descends one level, optionally under a path segment, enforcing the
    /// depth limit.
    fn nested(
        &mut self,
        segment: Option<PathSegment>,
        schema: &Schema,
        value: &Value,
    ) -> Result<(), MatchFailure> {
        let pushed = segment.is_some();
        if let Some(segment) = segment {
            self.path.push(segment);
        }
        let outcome = if self.depth >= self.config.max_depth {
            Err(self.too_deep(schema, value))
        } else {
            self.depth += 1;
            let outcome = self.explore(schema, value);
            self.depth -= 1;
            outcome
        };
        if pushed {
            self.path.pop();
        }
        outcome
    }
}

impl Descend for Walker<'_> {
    fn descend(&mut self, schema: &Schema, value: &Value) -> Result<(), MatchFailure> {
        self.nested(None, schema, value)
    }

    fn descend_index(
        &mut self,
        index: usize,
        schema: &Schema,
        value: &Value,
    ) -> Result<(), MatchFailure> {
        self.nested(Some(PathSegment::Index(index)), schema, value)
    }

    fn fail(&self, reason: Reason, expected: &Schema, actual: &Value) -> MatchFailure {
        MatchFailure::new(reason, self.path.clone(), expected.clone(), actual.clone())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// String and symbol key forms name the same key: `"id"` and `":id"`.
pub(crate) fn normalize_key(key: &str) -> &str {
    key.strip_prefix(':').unwrap_or(key)
}

/// Value object re-keyed by normalized key. On collisions the later entry
/// wins.
fn normalized_fields(fields: &Map<String, Value>) -> IndexMap<&str, &Value> {
    fields.iter().map(|(k, v)| (normalize_key(k), v)).collect()
}

/// Deep equality where numbers compare by value (`1 == 1.0`).
///
/// Each step into a container spends one unit of `budget`; `None` when the
/// comparison would go deeper than the budget allows.
pub(crate) fn literal_eq(expected: &Value, actual: &Value, budget: usize) -> Option<bool> {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => Some(numbers_eq(a, b)),
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(false);
            }
            if a.is_empty() {
                return Some(true);
            }
            let budget = budget.checked_sub(1)?;
            for (x, y) in a.iter().zip(b) {
                if !literal_eq(x, y, budget)? {
                    return Some(false);
                }
            }
            Some(true)
        }
        (Value::Object(a), Value::Object(b)) => {
            if a.len() != b.len() {
                return Some(false);
            }
            if a.is_empty() {
                return Some(true);
            }
            let budget = budget.checked_sub(1)?;
            for (key, x) in a {
                let Some(y) = b.get(key) else {
                    return Some(false);
                };
                if !literal_eq(x, y, budget)? {
                    return Some(false);
                }
            }
            Some(true)
        }
        // differing variants compare unequal without recursing
        _ => Some(expected == actual),
    }
}

fn numbers_eq(a: &Number, b: &Number) -> bool {
    match (a.as_i64(), a.as_u64(), b.as_i64(), b.as_u64()) {
        (Some(x), _, Some(y), _) => x == y,
        (_, Some(x), _, Some(y)) => x == y,
        // one negative, one above i64::MAX
        (Some(_), _, _, Some(_)) | (_, Some(_), Some(_), _) => false,
        (Some(x), _, None, None) => float_is_integer(b, i128::from(x)),
        (_, Some(x), None, None) => float_is_integer(b, i128::from(x)),
        (None, None, Some(y), _) => float_is_integer(a, i128::from(y)),
        (None, None, _, Some(y)) => float_is_integer(a, i128::from(y)),
        (None, None, None, None) => a.as_f64() == b.as_f64(),
    }
}

/// True when `float` is integral and converts back to exactly `int`.
/// Casting through `f64` alone would equate neighbours above 2^53.
fn float_is_integer(float: &Number, int: i128) -> bool {
    const LIMIT: f64 = 18_446_744_073_709_551_616.0; // 2^64
    let Some(f) = float.as_f64() else {
        return false;
    };
    f.fract() == 0.0 && f >= -LIMIT && f < LIMIT && f as i128 == int
}

/// Top level of `value`: scalars as is, containers emptied.
fn shallow(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Object(_) => Value::Object(Map::new()),
        scalar => scalar.clone(),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::{list_containing, list_of, one_of};
    use crate::error::FailureKind;
    use crate::schema::pattern;
    use serde_json::json;

    fn check_json(schema: Value, value: Value) -> Result<(), MatchFailure> {
        check(&Schema::from(schema), &value)
    }

    #[test]
    fn empty_object_matches_empty_schema() {
        assert!(check_json(json!({}), json!({})).is_ok());
        assert!(check_json(json!({}), json!({"anything": 1})).is_ok());
    }

    #[test]
    fn scalars_match_by_equality() {
        assert!(check_json(json!(3), json!(3)).is_ok());
        assert!(check_json(json!("a"), json!("a")).is_ok());
        assert!(check_json(json!(null), json!(null)).is_ok());
        let failure = check_json(json!(3), json!(4)).unwrap_err();
        assert_eq!(failure.reason, Reason::LiteralMismatch);
        assert_eq!(failure.expected.to_string(), "3");
        assert_eq!(failure.actual, json!(4));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(check_json(json!(1), json!(1.0)).is_ok());
        assert!(check_json(json!(-2.0), json!(-2)).is_ok());
        assert!(check_json(json!(1), json!(1.5)).is_err());
        assert!(check_json(json!(u64::MAX), json!(u64::MAX)).is_ok());
    }

    #[test]
    fn integers_and_floats_compare_exactly_past_f64_precision() {
        assert!(check_json(json!(9007199254740993_i64), json!(9007199254740992.0)).is_err());
        assert!(check_json(json!(9007199254740992.0), json!(9007199254740993_i64)).is_err());
        assert!(check_json(json!(9007199254740992_i64), json!(9007199254740992.0)).is_ok());
        assert!(check_json(json!(u64::MAX), json!(18446744073709551615.0)).is_err());
        assert!(check_json(json!(i64::MIN), json!(-9223372036854775808.0)).is_ok());
        assert!(check_json(json!(-1), json!(u64::MAX)).is_err());
        assert!(check_json(json!(3), json!(3.5)).is_err());
    }

    #[test]
    fn type_tag_checks_runtime_type() {
        let schema = Schema::mapping([
            ("id", Schema::from(TypeTag::String)),
            ("type", Schema::from(TypeTag::String)),
        ]);
        assert!(check(&schema, &json!({"id": "33", "type": "ciaone"})).is_ok());
        let failure = check(&schema, &json!({"id": 123, "type": "aType"})).unwrap_err();
        assert_eq!(failure.reason, Reason::TypeMismatch { expected: TypeTag::String, found: TypeTag::Integer });
        assert_eq!(failure.path.to_string(), "root.id");
    }

    #[test]
    fn type_and_literal_mix() {
        let schema = Schema::mapping([
            ("id", Schema::from(TypeTag::String)),
            ("type", Schema::from("hello")),
        ]);
        assert!(check(&schema, &json!({"id": "33", "type": "hello"})).is_ok());
        assert!(check(&schema, &json!({"id": "33", "type": "bye"})).is_err());
    }

    #[test]
    fn missing_key_points_at_the_key() {
        let failure = check_json(json!({"id": 1, "name": "x"}), json!({"id": 1})).unwrap_err();
        assert_eq!(failure.reason, Reason::MissingKey { key: "name".into() });
        assert_eq!(failure.path.to_string(), "root.name");
        assert_eq!(failure.actual, json!({"id": 1}));
    }

    #[test]
    fn first_failing_key_in_declaration_order_wins() {
        let failure = check_json(json!({"b": 1, "a": 1}), json!({"a": 2, "b": 2})).unwrap_err();
        assert_eq!(failure.path.to_string(), "root.b");
    }

    #[test]
    fn symbol_and_string_keys_are_the_same_key() {
        assert!(check_json(json!({"id": 1}), json!({":id": 1})).is_ok());
        assert!(check_json(json!({":id": 1}), json!({"id": 1})).is_ok());
        assert!(check_json(json!({"Id": 1}), json!({"id": 1})).is_err());
    }

    #[test]
    fn mapping_schema_against_other_shapes() {
        let failure = check_json(json!({"a": 1}), json!([1])).unwrap_err();
        assert_eq!(failure.reason, Reason::NotASequence);
        let failure = check_json(json!({"a": 1}), json!(1)).unwrap_err();
        assert_eq!(failure.reason, Reason::TypeMismatch { expected: TypeTag::Object, found: TypeTag::Integer });
        let failure = check_json(json!(1), json!({"a": 1})).unwrap_err();
        assert_eq!(failure.reason, Reason::NotAMapping);
    }

    #[test]
    fn sequences_are_positional_and_sized() {
        assert!(check_json(json!([1, 2, 3]), json!([1, 2, 3])).is_ok());

        let failure = check_json(json!([1, 2]), json!([1, 2, 3])).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Size);
        assert_eq!(failure.reason, Reason::LengthMismatch { expected: 2, actual: 3 });
        assert_eq!(failure.to_string(), "wrong size: 3 != 2 at root");

        let failure = check_json(json!([1, 2, 3]), json!([3, 2, 1])).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Structural);
        assert_eq!(failure.path.to_string(), "root[0]");
    }

    #[test]
    fn sequence_schema_against_scalar() {
        let failure = check_json(json!([1]), json!("1")).unwrap_err();
        assert_eq!(failure.reason, Reason::TypeMismatch { expected: TypeTag::Array, found: TypeTag::String });
    }

    #[test]
    fn patterns_match_whole_strings_only() {
        let schema = pattern("f[o]+bar").unwrap();
        assert!(check(&schema, &json!("foobar")).is_ok());
        let failure = check(&schema, &json!("foobarbaz")).unwrap_err();
        assert_eq!(failure.reason, Reason::PatternMismatch { pattern: "f[o]+bar".into() });
    }

    #[test]
    fn pattern_against_non_string_falls_through() {
        let schema = pattern("1").unwrap();
        let failure = check(&schema, &json!(1)).unwrap_err();
        assert_eq!(failure.reason, Reason::NotAString);
        assert_eq!(failure.kind(), FailureKind::Structural);
        let failure = check(&schema, &json!(["1"])).unwrap_err();
        assert_eq!(failure.reason, Reason::NotASequence);
        let failure = check(&schema, &json!({"1": 1})).unwrap_err();
        assert_eq!(failure.reason, Reason::NotAMapping);
    }

    #[test]
    fn literal_containers_compare_deeply() {
        let object = Schema::literal(json!({"a": 1}));
        assert!(check(&object, &json!({"a": 1.0})).is_ok());
        assert!(check(&object, &json!({"a": 1, "b": 2})).is_err());

        let array = Schema::literal(json!([1, [2]]));
        assert!(check(&array, &json!([1, [2]])).is_ok());
        let failure = check(&array, &json!([1])).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Size);
        let failure = check(&array, &json!([1, [3]])).unwrap_err();
        assert_eq!(failure.reason, Reason::LiteralMismatch);
    }

    #[test]
    fn nested_failure_path_runs_through_combinators() {
        let schema = Schema::mapping([(
            "data",
            Schema::from(list_of([Schema::mapping([
                ("id", Schema::from(TypeTag::Integer)),
                ("tags", list_containing("x").into()),
            ])])),
        )]);
        let value = json!({"data": [
            {"id": 1, "tags": ["x"]},
            {"id": 2, "tags": ["y"]}
        ]});
        let failure = check(&schema, &value).unwrap_err();
        assert_eq!(failure.path.to_string(), "root.data[1].tags");
        assert_eq!(failure.kind(), FailureKind::Size);
    }

    #[test]
    fn depth_limit_is_a_dedicated_failure() {
        let value = json!({"a": {"b": {"c": {"d": 1}}}});
        let matcher = Matcher::new(MatchConfig::default().with_max_depth(3));
        let failure = matcher.check(&Schema::from(&value), &value).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::DepthExceeded);
        assert_eq!(failure.reason, Reason::DepthExceeded { limit: 3 });
        assert_eq!(failure.path.to_string(), "root.a.b.c.d");

        let roomy = Matcher::new(MatchConfig::default().with_max_depth(4));
        assert!(roomy.is_match(&Schema::from(&value), &value));
    }

    #[test]
    fn literal_containers_share_the_depth_limit() {
        let mut value = json!(1);
        for _ in 0..10 {
            value = json!([value]);
        }
        let matcher = Matcher::new(MatchConfig::default().with_max_depth(2));
        let failure = matcher.check(&Schema::literal(value.clone()), &value).unwrap_err();
        assert_eq!(failure.reason, Reason::DepthExceeded { limit: 2 });
        assert!(failure.path.is_root());

        let roomy = Matcher::new(MatchConfig::default().with_max_depth(10));
        assert!(roomy.is_match(&Schema::literal(value.clone()), &value));
    }

    #[test]
    fn depth_failure_keeps_only_the_top_of_each_subtree() {
        let mut value = json!({"leaf": true});
        for _ in 0..1_000 {
            value = json!([value]);
        }
        let matcher = Matcher::new(MatchConfig::default().with_max_depth(16));

        let failure = matcher.check(&Schema::from(&value), &value).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::DepthExceeded);
        assert_eq!(failure.path.segments().len(), 17);
        assert_eq!(failure.actual, json!([]));
        assert_eq!(failure.expected.to_string(), "[]");

        let failure = matcher.check(&Schema::literal(value.clone()), &value).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::DepthExceeded);
        assert_eq!(failure.actual, json!([]));
        assert_eq!(failure.expected.to_string(), "[]");
    }

    #[test]
    fn depth_failure_escapes_alternation() {
        let value = json!([[[1]]]);
        let schema: Schema = one_of([Schema::from(&value), Schema::from(TypeTag::Any)]).into();
        let matcher = Matcher::new(MatchConfig::default().with_max_depth(2));
        let failure = matcher.check(&schema, &value).unwrap_err();
        assert_eq!(failure.kind(), FailureKind::DepthExceeded);
    }

    #[test]
    fn checks_are_repeatable() {
        let schema = Schema::from(json!({"a": [1, 2]}));
        let value = json!({"a": [1, 3]});
        let first = check(&schema, &value).unwrap_err();
        let second = check(&schema, &value).unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn normalized_fields_prefers_later_duplicate() {
        let value = json!({"id": 1, ":id": 2});
        let Value::Object(fields) = &value else { unreachable!() };
        let index = normalized_fields(fields);
        assert_eq!(index.len(), 1);
        assert_eq!(index["id"], &json!(2));
    }
}
