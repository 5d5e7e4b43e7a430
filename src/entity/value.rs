//! Literal values carried by filters and assignments.

use std::cmp::Ordering;

use uuid::Uuid;

/// A value bound to a positional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Unicode text.
    Text(String),
    /// Text bound as a non-Unicode database string.
    AnsiText(String),
    Guid(Uuid),
    /// Enumeration discriminant; binds as an integer.
    Enum(i64),
}

impl Value {
    /// Wrap text so it binds as an ANSI (non-Unicode) string.
    pub fn ansi(s: impl Into<String>) -> Self {
        Value::AnsiText(s.into())
    }

    /// Enumeration value from its discriminant.
    pub fn enumeration(discriminant: i64) -> Self {
        Value::Enum(discriminant)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual values compare with LIKE rather than `=`.
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_) | Value::AnsiText(_))
    }

    /// Natural ordering between two values of compatible kinds.
    ///
    /// Integers and floats compare numerically; text compares across the
    /// Unicode/ANSI split. Null and mismatched kinds have no ordering.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Text(a) | Value::AnsiText(a), Value::Text(b) | Value::AnsiText(b)) => {
                Some(a.cmp(b))
            }
            (Value::Guid(a), Value::Guid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Guid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
