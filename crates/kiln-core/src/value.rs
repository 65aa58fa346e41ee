//! Dynamically typed values carried by the attribute bus

use crate::error::{KilnError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value read from or written to an attribute.
///
/// The set of variants is closed. Numbers are normalized on the way in:
/// 64-bit floats narrow to `Float(f32)`, and any integer width widens to
/// `Int(i64)`. There is no coercion between text and numbers.
///
/// In TOML and JSON the value is written untagged, so `true`, `3`, `0.5`
/// and `"walk"` all deserialize to the obvious variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
}

impl AttributeValue {
    /// Short name of the variant, used in type mismatch errors
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::Text(_) => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AttributeValue::Int(_) | AttributeValue::Float(_))
    }

    /// Numeric view; integers widen to f32
    pub fn as_f32(&self) -> Option<f32> {
        match *self {
            AttributeValue::Float(v) => Some(v),
            AttributeValue::Int(v) => Some(v as f32),
            _ => None,
        }
    }

    /// Integer view; floats truncate toward zero
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            AttributeValue::Int(v) => Some(v),
            AttributeValue::Float(v) => Some(v as i64),
            _ => None,
        }
    }

    /// Boolean view; numbers count as true when nonzero
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            AttributeValue::Bool(v) => Some(v),
            AttributeValue::Int(v) => Some(v != 0),
            AttributeValue::Float(v) => Some(v != 0.0),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to f32 or report a `TypeMismatch` for `key`
    pub fn coerce_f32(&self, key: &str) -> Result<f32> {
        self.as_f32().ok_or_else(|| self.mismatch(key, "float"))
    }

    /// Coerce to i32 or report a `TypeMismatch` for `key`
    pub fn coerce_i32(&self, key: &str) -> Result<i32> {
        self.as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| self.mismatch(key, "int"))
    }

    /// Coerce to bool or report a `TypeMismatch` for `key`
    pub fn coerce_bool(&self, key: &str) -> Result<bool> {
        self.as_bool().ok_or_else(|| self.mismatch(key, "bool"))
    }

    /// Borrow the text or report a `TypeMismatch` for `key`
    pub fn coerce_str(&self, key: &str) -> Result<&str> {
        self.as_str().ok_or_else(|| self.mismatch(key, "string"))
    }

    fn mismatch(&self, key: &str, expected: &str) -> KilnError {
        KilnError::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            got: self.type_name().to_string(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Text(v) => write!(f, "\"{}\"", v),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v as f32)
    }
}

impl From<i32> for AttributeValue {
    fn from(v: i32) -> Self {
        AttributeValue::Int(v as i64)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<u32> for AttributeValue {
    fn from(v: u32) -> Self {
        AttributeValue::Int(v as i64)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl TryFrom<&toml::Value> for AttributeValue {
    type Error = KilnError;

    fn try_from(value: &toml::Value) -> Result<Self> {
        match value {
            toml::Value::Boolean(b) => Ok(AttributeValue::Bool(*b)),
            toml::Value::Integer(i) => Ok(AttributeValue::Int(*i)),
            toml::Value::Float(f) => Ok(AttributeValue::from(*f)),
            toml::Value::String(s) => Ok(AttributeValue::Text(s.clone())),
            other => Err(KilnError::TypeMismatch {
                key: "value".to_string(),
                expected: "bool, number or string".to_string(),
                got: other.type_str().to_string(),
            }),
        }
    }
}
