//! Apply a tree diff onto an independently changed value.
//!
//! The diff is computed as `diff_values(local, last_synced)` and applied onto
//! the freshly fetched remote value. Array positions where the remote moved to
//! a third value keep both versions and flag a conflict. Scalar object fields
//! take the local edit unconditionally and never flag a conflict.

use std::collections::HashMap;

use nest_diff::{values_equal, Diff, DiffEntry};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::sequence::SequenceMerge;
use crate::Merged;

/// Apply `diff` onto `target`.
///
/// A top-level removal yields `Value::Null`. Fails with
/// [`MergeError::PatchTargetMismatch`] when a container diff meets a target of
/// another shape.
pub fn apply(diff: &Diff, target: &Value) -> MergeResult<Merged<Value>> {
    let mut applier = Applier::default();
    let value = applier.node(diff, Some(target))?.unwrap_or(Value::Null);
    if applier.conflict {
        debug!("tree merge finished with conflicts");
    }
    Ok(Merged {
        value,
        conflict: applier.conflict,
    })
}

#[derive(Default)]
struct Applier {
    conflict: bool,
}

impl Applier {
    /// Apply one node. `None` on either side means "absent".
    fn node(&mut self, diff: &Diff, target: Option<&Value>) -> MergeResult<Option<Value>> {
        match diff {
            Diff::Entry(entry) => Ok(leaf(entry, target)),
            // The remote dropped the whole container.
            Diff::Array(_) | Diff::Object(_) if target.is_none() => Ok(None),
            Diff::Array(items) => match target {
                Some(Value::Array(target)) => self.array(items, target).map(Some),
                other => Err(mismatch("array", other)),
            },
            Diff::Object(fields) => match target {
                Some(Value::Object(target)) => self.object(fields, target).map(Some),
                other => Err(mismatch("object", other)),
            },
        }
    }

    fn array(&mut self, items: &[Diff], target: &[Value]) -> MergeResult<Value> {
        let mut merge = SequenceMerge::new(target);

        for item in items {
            match item {
                Diff::Entry(entry) => merge.entry(entry, values_equal),
                nested => match merge.current() {
                    // The remote array ran out under a locally edited element.
                    None if nested.is_modified() => {
                        if let Some(value) = nested.actual() {
                            merge.push(value);
                        }
                        debug!("array merge kept a local element past the end of the target");
                        self.conflict = true;
                    }
                    current => {
                        if let Some(value) = self.node(nested, current)? {
                            merge.push(value);
                        }
                        merge.advance();
                    }
                },
            }
        }

        let (out, conflict) = merge.finish();
        if conflict {
            debug!(len = out.len(), "array merge kept both sides of a conflicting position");
            self.conflict = true;
        }
        Ok(Value::Array(out))
    }

    fn object(&mut self, fields: &[(String, Diff)], target: &Map<String, Value>) -> MergeResult<Value> {
        let by_key: HashMap<&str, &Diff> = fields.iter().map(|(k, d)| (k.as_str(), d)).collect();
        let mut out = Map::new();

        // Remote keys keep their order; keys the remote lacks follow in diff order.
        for (key, value) in target {
            match by_key.get(key.as_str()) {
                Some(diff) => {
                    if let Some(merged) = self.node(diff, Some(value))? {
                        out.insert(key.clone(), merged);
                    }
                }
                None => {
                    out.insert(key.clone(), value.clone());
                }
            }
        }
        for (key, diff) in fields {
            if target.contains_key(key) {
                continue;
            }
            if let Some(merged) = self.node(diff, None)? {
                out.insert(key.clone(), merged);
            }
        }

        Ok(Value::Object(out))
    }
}

/// Leaf rule: local edits win, removals delete, common positions keep the target.
fn leaf(entry: &DiffEntry<Value>, target: Option<&Value>) -> Option<Value> {
    match entry {
        DiffEntry::Common { .. } => target.cloned(),
        DiffEntry::Updated { value, .. } | DiffEntry::Added { value } => Some(value.clone()),
        DiffEntry::Removed { .. } => None,
    }
}

fn mismatch(expected: &'static str, found: Option<&Value>) -> MergeError {
    MergeError::PatchTargetMismatch {
        expected,
        found: found.map_or("nothing", kind_name),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nest_diff::diff_values;
    use serde_json::json;

    fn merge(local: Value, base: Value, remote: Value) -> Merged<Value> {
        apply(&diff_values(&local, &base), &remote).unwrap()
    }

    #[test]
    fn disjoint_edits_merge_cleanly() {
        let base = json!({"name": "x", "desc": "d"});
        let local = json!({"name": "y", "desc": "d"});
        let remote = json!({"name": "x", "desc": "d2"});

        let diff = diff_values(&local, &base);
        assert_eq!(
            diff,
            Diff::Object(vec![
                ("name".into(), Diff::Entry(DiffEntry::updated(json!("y"), json!("x")))),
                ("desc".into(), Diff::Entry(DiffEntry::common(json!("d")))),
            ])
        );

        let merged = apply(&diff, &remote).unwrap();
        assert_eq!(merged.value, json!({"name": "y", "desc": "d2"}));
        assert!(!merged.conflict);
    }

    #[test]
    fn scalar_field_takes_local_without_conflict() {
        // Both sides changed `a`; the object level does not detect this.
        let merged = merge(json!({"a": 2}), json!({"a": 1}), json!({"a": 3}));
        assert_eq!(merged.value, json!({"a": 2}));
        assert!(!merged.conflict);
    }

    #[test]
    fn array_position_conflict_keeps_both() {
        let merged = merge(json!({"a": [2]}), json!({"a": [1]}), json!({"a": [3]}));
        assert!(merged.conflict);
        assert_eq!(merged.value, json!({"a": [3, 2]}));
    }

    #[test]
    fn merge_with_identical_remote_is_identity() {
        let v = json!({"k": [1, {"x": null}], "s": "t"});
        let merged = merge(v.clone(), v.clone(), v.clone());
        assert_eq!(merged.value, v);
        assert!(!merged.conflict);
    }

    #[test]
    fn local_addition_lands_in_remote() {
        let merged = merge(
            json!({"a": 1, "keywords": ["x"]}),
            json!({"a": 1}),
            json!({"a": 1, "license": "MIT"}),
        );
        assert_eq!(merged.value, json!({"a": 1, "license": "MIT", "keywords": ["x"]}));
        assert!(!merged.conflict);
    }

    #[test]
    fn local_removal_deletes_key() {
        let merged = merge(json!({"a": 1}), json!({"a": 1, "b": 2}), json!({"a": 5, "b": 2}));
        assert_eq!(merged.value, json!({"a": 5}));
    }

    #[test]
    fn remote_only_keys_survive() {
        let merged = merge(json!({"a": 2}), json!({"a": 1}), json!({"a": 1, "z": true}));
        assert_eq!(merged.value, json!({"a": 2, "z": true}));
    }

    #[test]
    fn remote_key_order_is_kept() {
        let remote: Value = serde_json::from_str(r#"{"z": 1, "a": 1}"#).unwrap();
        let merged = merge(json!({"a": 2, "z": 1}), json!({"a": 1, "z": 1}), remote);
        let keys: Vec<&String> = merged.value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn remote_dropped_container_stays_dropped() {
        let merged = merge(
            json!({"hooks": {"presync": "a"}, "n": 1}),
            json!({"hooks": {"presync": "a"}, "n": 1}),
            json!({"n": 1}),
        );
        assert_eq!(merged.value, json!({"n": 1}));
    }

    #[test]
    fn array_local_edits_survive_remote_append() {
        let merged = merge(json!(["a", "B", "c"]), json!(["a", "b", "c"]), json!(["a", "b", "c", "d"]));
        assert_eq!(merged.value, json!(["a", "B", "c", "d"]));
        assert!(!merged.conflict);
    }

    #[test]
    fn nested_element_diff_recurses_into_target_element() {
        let merged = merge(
            json!([{"id": 1, "v": "local"}]),
            json!([{"id": 1, "v": "base"}]),
            json!([{"id": 1, "v": "base", "extra": true}]),
        );
        assert_eq!(merged.value, json!([{"id": 1, "v": "local", "extra": true}]));
    }

    #[test]
    fn edited_element_past_end_of_target_is_kept_as_conflict() {
        let merged = merge(json!([0, {"k": 2}]), json!([0, {"k": 1}]), json!([{"k": 1}]));
        assert_eq!(merged.value, json!([{"k": 1}, {"k": 2}]));
        assert!(merged.conflict);
    }

    #[test]
    fn unchanged_element_past_end_of_target_is_dropped() {
        let diff = Diff::Array(vec![
            Diff::Entry(DiffEntry::common(json!(0))),
            Diff::Array(vec![Diff::Entry(DiffEntry::common(json!(1)))]),
        ]);
        let merged = apply(&diff, &json!([0])).unwrap();
        assert_eq!(merged.value, json!([0]));
        assert!(!merged.conflict);
    }

    #[test]
    fn object_diff_onto_scalar_is_a_mismatch() {
        let diff = diff_values(&json!({"a": 1}), &json!({"a": 0}));
        let err = apply(&diff, &json!(5)).unwrap_err();
        assert_eq!(
            err,
            MergeError::PatchTargetMismatch {
                expected: "object",
                found: "number",
            }
        );
    }

    #[test]
    fn array_diff_onto_object_is_a_mismatch() {
        let diff = diff_values(&json!({"k": [1, 2]}), &json!({"k": [1]}));
        let err = apply(&diff, &json!({"k": {"0": 1}})).unwrap_err();
        assert!(matches!(
            err,
            MergeError::PatchTargetMismatch { expected: "array", found: "object" }
        ));
    }

    #[test]
    fn top_level_removal_is_null() {
        let diff = Diff::Entry(DiffEntry::removed(json!(1)));
        assert_eq!(apply(&diff, &json!(1)).unwrap().value, Value::Null);
    }
}
