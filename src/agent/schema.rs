//! JSON schemas for OpenAI strict structured outputs.
//!
//! Strict mode wants `additionalProperties: false` and every property listed
//! in `required` on each object, no `$ref`s, and no `format` on non-string
//! types. schemars output is rewritten to match.

use schemars::{schema_for, JsonSchema};
use serde_json::Value;

/// Strict-mode schema for `T`.
pub fn strict_schema<T: JsonSchema>() -> Value {
    let mut root = serde_json::to_value(schema_for!(T)).unwrap_or_default();

    let definitions = match &mut root {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions").unwrap_or_default()
        }
        _ => Value::Null,
    };
    tighten(&mut root, &definitions);
    root
}

/// One pass over the schema tree: resolve `#/definitions/*` refs in place,
/// close every object, drop numeric `format` hints.
fn tighten(node: &mut Value, definitions: &Value) {
    let target = node
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| r.strip_prefix("#/definitions/"))
        .and_then(|name| definitions.get(name))
        .cloned();
    if let Some(def) = target {
        *node = def;
    }

    match node {
        Value::Object(map) => {
            match map.get("type").and_then(Value::as_str) {
                Some("object") => {
                    let required: Vec<Value> = map
                        .get("properties")
                        .and_then(Value::as_object)
                        .map(|props| props.keys().cloned().map(Value::String).collect())
                        .unwrap_or_default();
                    map.insert("additionalProperties".into(), Value::Bool(false));
                    map.insert("required".into(), Value::Array(required));
                }
                Some("string") | None => {}
                Some(_) => {
                    map.remove("format");
                }
            }
            if let Some(Value::Object(props)) = map.get_mut("properties") {
                props.values_mut().for_each(|p| tighten(p, definitions));
            }
            for key in ["items", "anyOf", "allOf", "oneOf"] {
                if let Some(child) = map.get_mut(key) {
                    tighten(child, definitions);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| tighten(v, definitions)),
        _ => {}
    }
}
