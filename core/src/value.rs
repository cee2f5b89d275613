//! Dynamic values shared by controls and the command framework.
//!
//! A [`Value`] is both what a control holds (its *raw* content) and what
//! conversion produces. Raw content is typically a [`Value::Str`], a number
//! or a boolean; conversion may additionally produce dates, paths and UUIDs.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A raw or converted parameter value.
///
/// Deserialization only produces the literal variants (`Bool`, `Int`,
/// `Float`, `Str`, `List`); the richer variants are the output of
/// [`ParamType::convert`](crate::ParamType::convert).
///
/// # Examples
///
/// ```
/// use command_form_core::Value;
///
/// let v: Value = serde_json::from_str(r#"[1, "two", true]"#).unwrap();
/// assert_eq!(v, Value::List(vec![1.into(), "two".into(), true.into()]));
/// assert!(Value::from("").is_empty_sentinel());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    #[serde(skip_deserializing)]
    DateTime(NaiveDateTime),
    #[serde(skip_deserializing)]
    Path(PathBuf),
    #[serde(skip_deserializing)]
    Uuid(Uuid),
}

impl Value {
    /// Returns `true` for the empty string, the "nothing entered" marker of
    /// text-based controls.
    pub fn is_empty_sentinel(&self) -> bool {
        matches!(self, Value::Str(s) if s.is_empty())
    }

    /// Turns a list into its elements; any other value becomes a
    /// one-element list.
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Value::List(items) => items,
            other => vec![other],
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view of the value. Floats qualify only when integral and
    /// within `i64`'s range.
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            // i64::MAX as f64 rounds up to 2^63, which is already out of range
            Value::Float(x)
                if x.is_finite() && x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 =>
            {
                Some(*x as i64)
            }
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::DateTime(_) => "datetime",
            Value::Path(_) => "path",
            Value::Uuid(_) => "uuid",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Uuid(u) => write!(f, "{u}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Value::Path(p)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_literals() {
        let v: Value = serde_json::from_str("3").unwrap();
        assert_eq!(v, Value::Int(3));
        let v: Value = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, Value::Float(3.5));
        let v: Value = serde_yaml::from_str("[a, 2]").unwrap();
        assert_eq!(v, Value::List(vec!["a".into(), 2.into()]));
    }

    #[test]
    fn test_into_list_wraps_scalars() {
        assert_eq!(Value::from(1).into_list(), vec![Value::Int(1)]);
        assert_eq!(
            Value::from(vec![1, 2]).into_list(),
            vec![Value::Int(1), Value::Int(2)]
        );
    }

    #[test]
    fn test_as_integral_rejects_out_of_range_floats() {
        assert_eq!(Value::Float(42.0).as_integral(), Some(42));
        assert_eq!(Value::Float(-1e18).as_integral(), Some(-1_000_000_000_000_000_000));
        assert_eq!(Value::Float(1e20).as_integral(), None);
        assert_eq!(Value::Float(-1e20).as_integral(), None);
        assert_eq!(Value::Float(9_223_372_036_854_775_807.0).as_integral(), None);
        assert_eq!(Value::Float(2.5).as_integral(), None);
        assert_eq!(Value::Float(f64::NAN).as_integral(), None);
    }

    #[test]
    fn test_display_list() {
        let v = Value::from(vec!["a", "b"]);
        assert_eq!(v.to_string(), "[a, b]");
    }

    #[test]
    fn test_empty_sentinel_only_for_empty_strings() {
        assert!(Value::from("").is_empty_sentinel());
        assert!(!Value::from(" ").is_empty_sentinel());
        assert!(!Value::Int(0).is_empty_sentinel());
        assert!(!Value::List(vec![]).is_empty_sentinel());
    }
}
