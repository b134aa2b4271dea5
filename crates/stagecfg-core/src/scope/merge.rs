//! Layering of variable scopes

use super::Variables;
use serde_json::{Map, Value};

/// Overlay variable scopes from widest to narrowest.
///
/// Later scopes win per key. When both sides hold an object under the same
/// key the objects are merged recursively; any other value replaces the
/// earlier one outright (arrays are not concatenated). The result is a fresh
/// map and none of the inputs are modified.
pub fn merge_scopes<'a>(scopes: impl IntoIterator<Item = &'a Variables>) -> Map<String, Value> {
    let mut merged = Value::Object(Map::new());
    for scope in scopes {
        deep_merge_value(&mut merged, &Value::Object(scope.to_object()));
    }
    match merged {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Deep merge two JSON values
///
/// If both values are objects, merge them recursively with `other` taking precedence.
/// Otherwise, `other` replaces `base`.
pub fn deep_merge_value(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Object(base_map), Value::Object(other_map)) => {
            for (key, other_val) in other_map {
                match base_map.get_mut(key) {
                    Some(base_val) => deep_merge_value(base_val, other_val),
                    None => {
                        base_map.insert(key.clone(), other_val.clone());
                    }
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn vars(value: Value) -> Variables {
        match value {
            Value::Object(map) => Variables::from_object(map),
            _ => unreachable!("test helper takes objects"),
        }
    }

    #[test]
    fn narrower_scope_wins() {
        let project = vars(json!({"bucket": "global", "retries": 3}));
        let stage = vars(json!({"bucket": "prod-default"}));
        let region = vars(json!({"bucket": "prod-east"}));

        let merged = merge_scopes([&project, &stage, &region]);
        assert_eq!(merged["bucket"], "prod-east");
        assert_eq!(merged["retries"], 3);
    }

    #[test]
    fn nested_objects_merge_and_arrays_replace() {
        let project = vars(json!({"db": {"host": "db.internal", "port": 5432}, "zones": ["a", "b"]}));
        let region = vars(json!({"db": {"host": "db.east"}, "zones": ["c"]}));

        let merged = merge_scopes([&project, &region]);
        assert_eq!(
            Value::Object(merged),
            json!({"db": {"host": "db.east", "port": 5432}, "zones": ["c"]})
        );
    }

    #[test]
    fn inputs_are_untouched() {
        let project = vars(json!({"db": {"host": "a"}}));
        let region = vars(json!({"db": {"host": "b"}}));

        let _ = merge_scopes([&project, &region]);
        assert_eq!(project.get("db"), Some(&json!({"host": "a"})));
    }
}
