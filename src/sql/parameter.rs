//! Positional parameters.
//!
//! [`ParameterList`] hands out placeholder tokens while recording the bound
//! value, so the value sequence always matches placeholder order in the
//! emitted text. [`BoundParameter`] is the execution-side view of one value
//! after dialect coercion.

use std::fmt;

use super::token::Token;
use crate::entity::Value;

/// Values bound while a statement is emitted, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterList {
    values: Vec<Value>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` and return the placeholder for it.
    pub fn bind(&mut self, value: &Value) -> Token {
        let index = self.values.len();
        self.values.push(value.clone());
        Token::Param(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Database type a parameter is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Untyped null.
    Null,
    Boolean,
    Int64,
    Double,
    /// Unicode string.
    String,
    /// Non-Unicode string.
    AnsiString,
    /// Fixed-length non-Unicode string.
    AnsiStringFixedLength,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A named parameter ready to bind to a command.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    pub name: String,
    pub value: Value,
    pub parameter_type: ParameterType,
    /// Declared size for string types.
    pub size: Option<usize>,
}

/// Length of a hyphenated GUID string.
pub const GUID_STRING_LENGTH: usize = 36;

/// Declared string sizes used when binding text.
///
/// Strings are sized to a fixed maximum rather than their own length so the
/// database sees one parameter signature and reuses its cached plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringSizes {
    pub max_string_length: usize,
    pub max_ansi_string_length: usize,
}

impl Default for StringSizes {
    fn default() -> Self {
        Self {
            max_string_length: 4000,
            max_ansi_string_length: 8000,
        }
    }
}

/// Coerce `value` for binding under `name`.
///
/// Enumerations bind as integers and GUIDs as fixed-length strings. Text
/// longer than the configured maximum is sized to its own length.
pub fn create_parameter(name: String, value: &Value, sizes: StringSizes) -> BoundParameter {
    let (value, parameter_type, size) = match value {
        Value::Null => (Value::Null, ParameterType::Null, None),
        Value::Bool(b) => (Value::Bool(*b), ParameterType::Boolean, None),
        Value::Int(n) | Value::Enum(n) => (Value::Int(*n), ParameterType::Int64, None),
        Value::Float(f) => (Value::Float(*f), ParameterType::Double, None),
        Value::Text(s) => {
            let size = sizes.max_string_length.max(s.chars().count());
            (Value::Text(s.clone()), ParameterType::String, Some(size))
        }
        Value::AnsiText(s) => {
            let size = sizes.max_ansi_string_length.max(s.len());
            (Value::AnsiText(s.clone()), ParameterType::AnsiString, Some(size))
        }
        Value::Guid(g) => (
            Value::AnsiText(g.hyphenated().to_string()),
            ParameterType::AnsiStringFixedLength,
            Some(GUID_STRING_LENGTH),
        ),
    };

    BoundParameter {
        name,
        value,
        parameter_type,
        size,
    }
}
