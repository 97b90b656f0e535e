// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Helpers for the loosely typed JSON data of the Oelo controller.

use serde_json::{Map, Value};

/// Convert a JSON value to a `setPattern` query parameter value.
///
/// The controller firmware is not consistent with value types: numbers and strings are both used
/// for the same field. Arrays are joined with a comma.
///
/// Returns `None` for `null` and objects.
pub fn json_param(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(a) => Some(
            a.iter()
                .filter_map(json_param)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Null | Value::Object(_) => None,
    }
}

/// Evaluate a JSON value as boolean.
///
/// `false`, `0`, empty strings and `null` are false. Strings `false` and `0` are also false.
pub fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or_default(),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

/// Get an unsigned integer field which might be encoded as number or string.
pub fn json_u64(map: &Map<String, Value>, key: &str) -> Option<u64> {
    match map.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("F"), Some("F"))]
    #[case(json!(" 3 "), Some("3"))]
    #[case(json!(5), Some("5"))]
    #[case(json!(true), Some("true"))]
    #[case(json!([255, "0", 12]), Some("255,0,12"))]
    #[case(json!(null), None)]
    #[case(json!({"a": 1}), None)]
    fn json_param_conversion(#[case] value: Value, #[case] expected: Option<&str>) {
        assert_eq!(expected.map(String::from), json_param(&value));
    }

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!(false), false)]
    #[case(json!(1), true)]
    #[case(json!(0), false)]
    #[case(json!("on"), true)]
    #[case(json!(""), false)]
    #[case(json!("false"), false)]
    #[case(json!(null), false)]
    fn json_truthy_evaluation(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(expected, json_truthy(&value));
    }

    #[test]
    fn json_u64_accepts_number_and_string() {
        let map = json!({"a": 3, "b": "4", "c": "x", "d": -1})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(Some(3), json_u64(&map, "a"));
        assert_eq!(Some(4), json_u64(&map, "b"));
        assert_eq!(None, json_u64(&map, "c"));
        assert_eq!(None, json_u64(&map, "d"));
        assert_eq!(None, json_u64(&map, "missing"));
    }
}
