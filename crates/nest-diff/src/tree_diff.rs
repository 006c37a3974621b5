//! Structural diff of JSON-like trees.
//!
//! Arrays are aligned on their longest common subsequence before their
//! elements are compared, objects are compared key by key, and anything else
//! is compared as a whole. The resulting [`Diff`] mirrors the shape of the
//! compared values.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::entry::DiffEntry;
use crate::lcs::{align, Step};

/// A recursive description of the differences between two values.
#[derive(Clone, Debug, PartialEq)]
pub enum Diff {
    /// A leaf comparison: scalars, shape changes, or one-sided values.
    Entry(DiffEntry<Value>),
    /// Two arrays, in alignment order (not index order).
    Array(Vec<Diff>),
    /// Two objects: base keys first, then keys only present on the new side.
    Object(Vec<(String, Diff)>),
}

impl Diff {
    /// Returns `true` if every leaf in the diff is [`DiffEntry::Common`].
    pub fn is_unchanged(&self) -> bool {
        match self {
            Diff::Entry(entry) => entry.is_common(),
            Diff::Array(items) => items.iter().all(Diff::is_unchanged),
            Diff::Object(fields) => fields.iter().all(|(_, d)| d.is_unchanged()),
        }
    }

    /// Returns `true` if the diff holds at least one added, removed or
    /// updated leaf.
    pub fn is_modified(&self) -> bool {
        !self.is_unchanged()
    }

    /// Look up the diff of an object field.
    pub fn field(&self, key: &str) -> Option<&Diff> {
        match self {
            Diff::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, d)| d),
            _ => None,
        }
    }

    /// Rebuild the new (actual) side of the comparison.
    ///
    /// Returns `None` only when the diff itself is a removal.
    pub fn actual(&self) -> Option<Value> {
        match self {
            Diff::Entry(entry) => entry.actual().cloned(),
            Diff::Array(items) => Some(Value::Array(items.iter().filter_map(Diff::actual).collect())),
            Diff::Object(fields) => Some(Value::Object(
                fields
                    .iter()
                    .filter_map(|(k, d)| d.actual().map(|v| (k.clone(), v)))
                    .collect(),
            )),
        }
    }

    /// Rebuild the old (base) side of the comparison.
    ///
    /// Returns `None` only when the diff itself is an addition.
    pub fn base(&self) -> Option<Value> {
        match self {
            Diff::Entry(entry) => entry.base().cloned(),
            Diff::Array(items) => Some(Value::Array(items.iter().filter_map(Diff::base).collect())),
            Diff::Object(fields) => Some(Value::Object(
                fields
                    .iter()
                    .filter_map(|(k, d)| d.base().map(|v| (k.clone(), v)))
                    .collect(),
            )),
        }
    }
}

impl Serialize for Diff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Diff::Entry(entry) => entry.serialize(serializer),
            Diff::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Diff::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, diff) in fields {
                    map.serialize_entry(key, diff)?;
                }
                map.end()
            }
        }
    }
}

/// Structural equality: tags match and children are equal.
///
/// Numbers compare by numeric value, so `1` equals `1.0`. Object equality
/// ignores key order; array equality is positional.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => objects_equal(x, y),
        _ => false,
    }
}

fn objects_equal(x: &Map<String, Value>, y: &Map<String, Value>) -> bool {
    x.len() == y.len()
        && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
}

/// Compute the diff between `actual` (new) and `base` (old).
pub fn diff_values(actual: &Value, base: &Value) -> Diff {
    match (actual, base) {
        (Value::Array(actual), Value::Array(base)) => Diff::Array(diff_arrays(actual, base)),
        (Value::Object(actual), Value::Object(base)) => Diff::Object(diff_objects(actual, base)),
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            // A shape change is never decomposed.
            Diff::Entry(DiffEntry::updated(actual.clone(), base.clone()))
        }
        _ if values_equal(actual, base) => Diff::Entry(DiffEntry::common(actual.clone())),
        _ => Diff::Entry(DiffEntry::updated(actual.clone(), base.clone())),
    }
}

fn diff_arrays(actual: &[Value], base: &[Value]) -> Vec<Diff> {
    align(actual, base, values_equal)
        .into_iter()
        .map(|step| match step {
            Step::Common { actual: i, .. } => Diff::Entry(DiffEntry::common(actual[i].clone())),
            Step::Paired { actual: i, base: j } => diff_values(&actual[i], &base[j]),
            Step::Added(i) => Diff::Entry(DiffEntry::added(actual[i].clone())),
            Step::Removed(j) => Diff::Entry(DiffEntry::removed(base[j].clone())),
        })
        .collect()
}

fn diff_objects(actual: &Map<String, Value>, base: &Map<String, Value>) -> Vec<(String, Diff)> {
    let mut fields = Vec::with_capacity(base.len().max(actual.len()));

    for (key, base_value) in base {
        let diff = match actual.get(key) {
            Some(actual_value) => diff_values(actual_value, base_value),
            None => Diff::Entry(DiffEntry::removed(base_value.clone())),
        };
        fields.push((key.clone(), diff));
    }

    for (key, actual_value) in actual {
        if !base.contains_key(key) {
            fields.push((key.clone(), Diff::Entry(DiffEntry::added(actual_value.clone()))));
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn equal_scalars_are_common() {
        let diff = diff_values(&json!("x"), &json!("x"));
        assert_eq!(diff, Diff::Entry(DiffEntry::common(json!("x"))));
        assert!(diff.is_unchanged());
    }

    #[test]
    fn different_scalars_are_updated() {
        let diff = diff_values(&json!(2), &json!(1));
        assert_eq!(diff, Diff::Entry(DiffEntry::updated(json!(2), json!(1))));
        assert!(diff.is_modified());
    }

    #[test]
    fn integer_and_float_compare_numerically() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(diff_values(&json!([1, 2]), &json!([1.0, 2.0])).is_unchanged());
    }

    #[test]
    fn object_equality_ignores_key_order() {
        let a = json!({"a": 1, "b": [1, {"c": null}]});
        let b: Value = serde_json::from_str(r#"{"b": [1, {"c": null}], "a": 1}"#).unwrap();
        assert!(values_equal(&a, &b));
        assert!(!values_equal(&a, &json!({"a": 1})));
    }

    #[test]
    fn null_is_a_value_not_absence() {
        let diff = diff_values(&json!({"a": null}), &json!({}));
        assert_eq!(diff.field("a"), Some(&Diff::Entry(DiffEntry::added(json!(null)))));
    }

    #[test]
    fn shape_change_is_not_decomposed() {
        let diff = diff_values(&json!([1]), &json!({"0": 1}));
        assert_eq!(diff, Diff::Entry(DiffEntry::updated(json!([1]), json!({"0": 1}))));

        let diff = diff_values(&json!({"a": 1}), &json!("a"));
        assert!(matches!(diff, Diff::Entry(DiffEntry::Updated { .. })));

        let diff = diff_values(&json!(3), &json!([3]));
        assert!(matches!(diff, Diff::Entry(DiffEntry::Updated { .. })));
    }

    #[test]
    fn object_fields_added_removed_updated() {
        let base = json!({"keep": true, "modify": "old", "remove": 42});
        let actual = json!({"keep": true, "modify": "new", "added": [1, 2, 3]});

        let diff = diff_values(&actual, &base);
        let Diff::Object(fields) = &diff else {
            panic!("expected object diff, got {diff:?}");
        };
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        // Base keys in base order, then new keys.
        assert_eq!(keys, ["keep", "modify", "remove", "added"]);

        assert_eq!(diff.field("keep"), Some(&Diff::Entry(DiffEntry::common(json!(true)))));
        assert_eq!(
            diff.field("modify"),
            Some(&Diff::Entry(DiffEntry::updated(json!("new"), json!("old"))))
        );
        assert_eq!(diff.field("remove"), Some(&Diff::Entry(DiffEntry::removed(json!(42)))));
        assert_eq!(diff.field("added"), Some(&Diff::Entry(DiffEntry::added(json!([1, 2, 3])))));
    }

    #[test]
    fn nested_objects_recurse() {
        let base = json!({"config": {"debug": false, "port": 8080}});
        let actual = json!({"config": {"debug": true, "port": 8080}});

        let diff = diff_values(&actual, &base);
        let config = diff.field("config").unwrap();
        assert_eq!(
            config.field("debug"),
            Some(&Diff::Entry(DiffEntry::updated(json!(true), json!(false))))
        );
        assert!(config.field("port").unwrap().is_unchanged());
    }

    #[test]
    fn array_replacement_is_nested_not_remove_add() {
        let base = json!([{"id": 1, "v": "a"}, "tail"]);
        let actual = json!([{"id": 1, "v": "b"}, "tail"]);

        let diff = diff_values(&actual, &base);
        let Diff::Array(items) = &diff else {
            panic!("expected array diff, got {diff:?}");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].field("v"),
            Some(&Diff::Entry(DiffEntry::updated(json!("b"), json!("a"))))
        );
        assert_eq!(items[1], Diff::Entry(DiffEntry::common(json!("tail"))));
    }

    #[test]
    fn array_insertions_and_deletions() {
        let diff = diff_values(&json!([0, 1, 2, 3]), &json!([1, 3, 4]));
        assert_eq!(
            diff,
            Diff::Array(vec![
                Diff::Entry(DiffEntry::added(json!(0))),
                Diff::Entry(DiffEntry::common(json!(1))),
                Diff::Entry(DiffEntry::added(json!(2))),
                Diff::Entry(DiffEntry::common(json!(3))),
                Diff::Entry(DiffEntry::removed(json!(4))),
            ])
        );
    }

    #[test]
    fn empty_arrays_and_objects_are_unchanged() {
        assert_eq!(diff_values(&json!([]), &json!([])), Diff::Array(vec![]));
        assert_eq!(diff_values(&json!({}), &json!({})), Diff::Object(vec![]));
        assert!(diff_values(&json!({}), &json!({})).is_unchanged());
    }

    #[test]
    fn deep_change_is_detected() {
        let base = json!({"f": [{"a": "same", "b": [{"a": "same"}, {"c": "create"}]}, 0, 1]});
        let actual = json!({"f": [{"a": "same", "b": [{"a": "same"}, {"c": "changed"}]}, 0, 1]});
        let diff = diff_values(&actual, &base);
        assert!(diff.is_modified());
        assert!(diff_values(&base, &base).is_unchanged());
    }

    #[test]
    fn reconstructs_both_sides() {
        let base = json!({"name": "x", "tags": ["a", "b", "c"], "gone": 1});
        let actual = json!({"name": "y", "tags": ["a", "c", "d"], "new": {"k": []}});
        let diff = diff_values(&actual, &base);
        assert!(values_equal(&diff.actual().unwrap(), &actual));
        assert!(values_equal(&diff.base().unwrap(), &base));
    }

    #[test]
    fn serializes_shape_of_values() {
        let diff = diff_values(&json!({"a": [1, 2]}), &json!({"a": [1]}));
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(
            json,
            json!({"a": [
                {"type": "common", "value": 1},
                {"type": "added", "value": 2},
            ]})
        );
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-5i64..5).prop_map(|n| json!(n)),
            "[a-d]{0,2}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::btree_map("[a-e]", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn diff_with_self_is_unchanged(v in arb_value()) {
            prop_assert!(diff_values(&v, &v).is_unchanged());
        }

        #[test]
        fn actual_side_round_trips(actual in arb_value(), base in arb_value()) {
            let diff = diff_values(&actual, &base);
            let rebuilt = diff.actual().expect("top-level diff always has an actual side");
            prop_assert!(values_equal(&rebuilt, &actual), "{rebuilt} != {actual}");
        }

        #[test]
        fn base_side_round_trips(actual in arb_value(), base in arb_value()) {
            let diff = diff_values(&actual, &base);
            let rebuilt = diff.base().expect("top-level diff always has a base side");
            prop_assert!(values_equal(&rebuilt, &base), "{rebuilt} != {base}");
        }
    }
}
