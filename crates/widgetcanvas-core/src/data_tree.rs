//! Evaluated data tree produced by the binding evaluator.
//!
//! The evaluator itself lives outside this crate; the canvas only reads the
//! evaluation errors recorded on each widget entity.

use serde_json::Value;
use std::collections::HashMap;

/// Evaluated entities keyed by widget name.
pub type DataTree = HashMap<String, Value>;

/// Location of the evaluation errors inside an entity.
pub const EVAL_ERROR_PATH: &str = "__evaluation__.errors";

/// Look up a dotted path inside a JSON value.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Count the errors in an evaluation error collection.
///
/// The collection maps property paths to arrays of errors. Entries that are
/// not arrays contribute nothing.
pub fn get_error_count(errors: &Value) -> usize {
    match errors {
        Value::Object(map) => map
            .values()
            .filter_map(Value::as_array)
            .map(Vec::len)
            .sum(),
        _ => 0,
    }
}

/// Number of evaluation errors recorded on an entity.
pub fn entity_error_count(entity: &Value) -> usize {
    get_path(entity, EVAL_ERROR_PATH).map_or(0, get_error_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_path() {
        let value = json!({ "a": { "b": [10, { "c": true }] } });
        assert_eq!(get_path(&value, "a.b.0"), Some(&json!(10)));
        assert_eq!(get_path(&value, "a.b.1.c"), Some(&json!(true)));
        assert_eq!(get_path(&value, "a.x"), None);
        assert_eq!(get_path(&value, "a.b.c"), None);
    }

    #[test]
    fn test_error_count_sums_property_errors() {
        let entity = json!({
            "text": "hello",
            "__evaluation__": {
                "errors": {
                    "text": [{ "errorMessage": "bad binding" }],
                    "isVisible": [],
                    "tableData": [{ "errorMessage": "a" }, { "errorMessage": "b" }]
                }
            }
        });
        assert_eq!(entity_error_count(&entity), 3);
    }

    #[test]
    fn test_error_count_without_errors() {
        assert_eq!(entity_error_count(&json!({ "text": "hello" })), 0);
        assert_eq!(entity_error_count(&json!({ "__evaluation__": {} })), 0);
        assert_eq!(get_error_count(&json!("not an object")), 0);
        assert_eq!(get_error_count(&json!({ "text": "not an array" })), 0);
    }
}
