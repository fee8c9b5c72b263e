//! Dynamically shaped attribute values.
//!
//! Plan attributes can be any JSON shape, nested arbitrarily. They are held
//! in [`AttributeValue`], whose equality is a single structural comparison
//! over every variant.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute name to value mapping, as found in a plan's before/after blocks.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// An untyped attribute value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// JSON null, also used for an attribute absent on one side.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number, kept as written so integers stay integers on output.
    /// Numbers compare by numeric value, so `1` equals `1.0`.
    Number(serde_json::Number),
    /// String.
    String(String),
    /// Ordered list.
    List(Vec<AttributeValue>),
    /// String-keyed map.
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Deep structural equality across all variants.
    #[must_use]
    pub fn deep_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_eq(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_eq(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.deep_eq(y)))
            }
            _ => false,
        }
    }

    /// Returns true for [`AttributeValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Numeric equality across integer and float representations.
#[allow(clippy::float_cmp)]
fn numbers_eq(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    if a == b {
        return true;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.deep_eq(other)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(fields) => Self::Map(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "<nil>"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}={value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(v: serde_json::Value) -> AttributeValue {
        AttributeValue::from(v)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(value(json!("a")), value(json!("a")));
        assert_ne!(value(json!("a")), value(json!("b")));
        assert_eq!(value(json!(true)), value(json!(true)));
        assert_ne!(value(json!(true)), value(json!(false)));
        assert_eq!(value(json!(null)), AttributeValue::Null);
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(value(json!(1)), value(json!(1.0)));
        assert_ne!(value(json!(1)), value(json!(2)));
    }

    #[test]
    fn test_different_variants_are_unequal() {
        assert_ne!(value(json!("1")), value(json!(1)));
        assert_ne!(value(json!(null)), value(json!("")));
        assert_ne!(value(json!([])), value(json!({})));
        assert_ne!(value(json!(false)), value(json!(null)));
    }

    #[test]
    fn test_lists_are_ordered() {
        assert_eq!(value(json!([1, "a"])), value(json!([1, "a"])));
        assert_ne!(value(json!([1, 2])), value(json!([2, 1])));
        assert_ne!(value(json!([1, 2])), value(json!([1, 2, 3])));
    }

    #[test]
    fn test_nested_maps() {
        let a = value(json!({"tags": {"env": "prod", "team": ["infra"]}}));
        let b = value(json!({"tags": {"team": ["infra"], "env": "prod"}}));
        let c = value(json!({"tags": {"env": "prod", "team": ["platform"]}}));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, value(json!({"tags": {"env": "prod"}})));
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeValue::Null.to_string(), "<nil>");
        assert_eq!(value(json!("ami-123")).to_string(), "ami-123");
        assert_eq!(value(json!(3)).to_string(), "3");
        assert_eq!(value(json!(0.5)).to_string(), "0.5");
        assert_eq!(value(json!(["a", true])).to_string(), "[a, true]");
        assert_eq!(value(json!({"b": 1, "a": null})).to_string(), "{a=<nil>, b=1}");
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let v = value(json!({"ports": [80, 443], "name": "web", "extra": null}));
        let out = serde_json::to_value(&v).expect("Failed to serialize");
        assert_eq!(out, json!({"extra": null, "name": "web", "ports": [80, 443]}));
    }

    #[test]
    fn test_integers_are_not_widened_to_floats() {
        let out = serde_json::to_string(&value(json!({"port": 80, "ratio": 0.5})))
            .expect("Failed to serialize");
        assert_eq!(out, r#"{"port":80,"ratio":0.5}"#);
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        assert_eq!(value(json!(u64::MAX)), value(json!(u64::MAX)));
        assert_eq!(value(json!(-7)), value(json!(-7.0)));
    }
}
