//! Re-attaches original inputs to flow responses.
//!
//! The flow service does not echo the part it evaluated and its response
//! shape depends on how the flow was authored: a plain object, an array of
//! objects, or a bare scalar. Every shape is turned back into records that
//! carry the originating part under `input`.

use serde::Serialize;
use serde_json::{Map, Value};

/// Objects get `input` inserted (overwriting any existing key); every other
/// value is boxed as `{ "input": .., "value": .. }`.
pub fn attach_input(value: Value, input: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            object.insert("input".to_string(), input);
            Value::Object(object)
        }
        other => {
            let mut object = Map::new();
            object.insert("input".to_string(), input);
            object.insert("value".to_string(), other);
            Value::Object(object)
        }
    }
}

/// Merged flow output.
///
/// A response that collapses to one record goes back to the caller as a
/// bare object; every other shape becomes a list with one entry per input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Merged {
    One(Value),
    Many(Vec<Value>),
}

impl Merged {
    pub fn as_slice(&self) -> &[Value] {
        match self {
            Merged::One(value) => std::slice::from_ref(value),
            Merged::Many(values) => values,
        }
    }
}

/// A one-element array holding a plain object.
///
/// Some flows wrap a singleton result this way. Treating it as the result
/// itself is a heuristic over observed behaviour, not a contract of the
/// remote service.
fn singleton_object(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.len() == 1 && items[0].is_object())
}

fn unwrap_singleton(value: Value) -> Value {
    if singleton_object(&value) {
        if let Value::Array(mut items) = value {
            return items.remove(0);
        }
    }
    value
}

/// Merge per-part responses, position by position.
///
/// Each response is first unwrapped when it is a one-element array holding an
/// object. The element rule of [`merge_batch`] alone would box such a
/// response as `{ "input": .., "value": [..] }`; unwrapping it here goes
/// further than that rule and rests on the same heuristic as the batch
/// collapse. The unwrapped responses are then merged as one array, so a
/// single part whose flow answers with an object comes back as a bare object.
pub fn merge_per_part(inputs: Vec<Value>, values: Vec<Value>) -> Merged {
    let values = values.into_iter().map(unwrap_singleton).collect();
    merge_batch(inputs, Value::Array(values))
}

/// Merge one aggregate response covering the whole batch.
pub fn merge_batch(inputs: Vec<Value>, value: Value) -> Merged {
    if singleton_object(&value) {
        let input = if inputs.len() == 1 {
            inputs.into_iter().next().unwrap_or(Value::Null)
        } else {
            Value::Array(inputs)
        };
        return Merged::One(attach_input(unwrap_singleton(value), input));
    }

    match value {
        Value::Array(items) => {
            if items.len() != inputs.len() {
                tracing::warn!(
                    "Flow response has {} items for {} inputs; pairing by position",
                    items.len(),
                    inputs.len()
                );
            }

            let mut items = items.into_iter();
            Merged::Many(
                inputs
                    .into_iter()
                    .map(|input| attach_input(items.next().unwrap_or(Value::Null), input))
                    .collect(),
            )
        }
        shared => Merged::Many(
            inputs
                .into_iter()
                .map(|input| attach_input(shared.clone(), input))
                .collect(),
        ),
    }
}
