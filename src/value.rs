//! The tagged value representation produced and consumed by the editor.
//!
//! `Value` mirrors JSON types plus a distinct `undefined`, and uses
//! `Vec<(String, Value)>` for objects to maintain insertion order. Numbers are
//! IEEE doubles; a failed numeric parse surfaces as `NaN`, which is a valid,
//! representable value rather than an error.

use crate::Tag;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A dynamically typed, arbitrarily nested value.
///
/// Equality is structural. `Number` follows IEEE semantics, so `NaN` is not
/// equal to itself; change detection inherits this deliberately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    /// Absent value, the default state of a fresh node.
    Undefined,
    /// Literal null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Double-precision number. `NaN` marks a failed buffer parse.
    Number(f64),
    /// Text.
    String(String),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Key-value pairs in insertion order. Duplicate keys are representable;
    /// aggregation resolves them last-write-wins.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Build an object value from label/value pairs.
    pub fn object<I, K, V>(pairs: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Build an array value from elements.
    pub fn array<I, V>(items: I) -> Value
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Get the type name of this value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        Tag::of(self).name()
    }

    /// Look up an object field by label. Later pairs shadow earlier ones
    /// sharing the same label; returns `None` for non-objects.
    pub fn get(&self, label: &str) -> Option<&Value> {
        match self {
            Value::Object(pairs) => pairs.iter().rev().find(|(k, _)| k == label).map(|(_, v)| v),
            _ => None,
        }
    }

    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert into a `serde_json::Value`.
    ///
    /// Returns `None` for `undefined` at the top level. Inside containers,
    /// an undefined array element becomes JSON `null` and an undefined object
    /// field is dropped. Object duplicates resolve last-write-wins.
    pub fn to_json(&self) -> Option<Json> {
        match self {
            Value::Undefined => None,
            Value::Null => Some(Json::Null),
            Value::Bool(b) => Some(Json::Bool(*b)),
            Value::Number(n) => Some(
                serde_json::Number::from_f64(*n)
                    .map(Json::Number)
                    .unwrap_or(Json::Null),
            ),
            Value::String(s) => Some(Json::String(s.clone())),
            Value::Array(items) => Some(Json::Array(
                items
                    .iter()
                    .map(|v| v.to_json().unwrap_or(Json::Null))
                    .collect(),
            )),
            Value::Object(pairs) => {
                let mut map = serde_json::Map::new();
                for (k, v) in pairs {
                    match v.to_json() {
                        Some(json) => {
                            map.insert(k.clone(), json);
                        }
                        None => {
                            map.remove(k);
                        }
                    }
                }
                Some(Json::Object(map))
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Undefined
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(v as f64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Number(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        Value::from(json.clone())
    }
}
