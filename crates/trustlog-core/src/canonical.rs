//! Canonical JSON encoding for deterministic serialization.
//!
//! Both the signature and the hash chain are computed over the canonical
//! encoding of a transaction, so it must be injective and stable across
//! calls: object keys sorted, no non-deterministic map ordering, non-finite
//! numbers collapsed to `null`.
//!
//! Caller-supplied changes JSON is normalized through [`stable_stringify`]
//! once at append time; afterwards it is carried as an opaque string.

use serde_json::Value as JsonValue;

use crate::error::CoreError;

/// Serialize a JSON value with sorted object keys.
///
/// Output is deterministic: the same logical value always produces the same
/// string, regardless of the key order of the input.
pub fn stable_stringify(value: &JsonValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Parse a changes payload and return its canonical string form.
pub fn canonicalize_json(json: &str) -> Result<String, CoreError> {
    let value: JsonValue = serde_json::from_str(json)
        .map_err(|e| CoreError::MalformedTransaction(e.to_string()))?;
    Ok(stable_stringify(&value))
}

fn write_value(out: &mut String, value: &JsonValue) {
    match value {
        JsonValue::Null => out.push_str("null"),

        JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),

        JsonValue::Number(n) => {
            // Non-finite floats have no JSON form; collapse to null.
            match n.as_f64() {
                Some(f) if !f.is_finite() => out.push_str("null"),
                _ => out.push_str(&n.to_string()),
            }
        }

        JsonValue::String(s) => {
            // serde_json escapes and quotes deterministically.
            out.push_str(&serde_json::to_string(s).expect("string serialization is infallible"));
        }

        JsonValue::Array(arr) => {
            out.push('[');
            for (i, item) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }

        JsonValue::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(
                    &serde_json::to_string(key).expect("string serialization is infallible"),
                );
                out.push(':');
                write_value(out, &obj[*key]);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(stable_stringify(&JsonValue::Null), "null");
        assert_eq!(stable_stringify(&json!(true)), "true");
        assert_eq!(stable_stringify(&json!(42)), "42");
        assert_eq!(stable_stringify(&json!(3.5)), "3.5");
        assert_eq!(stable_stringify(&json!("hello")), "\"hello\"");
    }

    #[test]
    fn test_object_keys_sorted() {
        let value = json!({"zebra": 1, "apple": 2, "banana": 3});
        assert_eq!(
            stable_stringify(&value),
            r#"{"apple":2,"banana":3,"zebra":1}"#
        );
    }

    #[test]
    fn test_nested_sorting() {
        let value = json!({"outer": {"b": 2, "a": 1}, "arr": [{"y": 0, "x": 0}]});
        assert_eq!(
            stable_stringify(&value),
            r#"{"arr":[{"x":0,"y":0}],"outer":{"a":1,"b":2}}"#
        );
    }

    #[test]
    fn test_empty_structures() {
        assert_eq!(stable_stringify(&json!({})), "{}");
        assert_eq!(stable_stringify(&json!([])), "[]");
    }

    #[test]
    fn test_non_finite_collapses_to_null() {
        assert_eq!(stable_stringify(&json!(f64::INFINITY)), "null");
        assert_eq!(stable_stringify(&json!(f64::NAN)), "null");
    }

    #[test]
    fn test_escaped_strings_roundtrip() {
        let value = json!("hello \"world\"\n");
        let s = stable_stringify(&value);
        let parsed: JsonValue = serde_json::from_str(&s).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_canonicalize_independent_of_input_order() {
        let a = canonicalize_json(r#"{"b":2,"a":1}"#).unwrap();
        let b = canonicalize_json(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonicalize_rejects_invalid_json() {
        assert!(matches!(
            canonicalize_json("not json"),
            Err(CoreError::MalformedTransaction(_))
        ));
    }
}
