//! Placeholder values
//!
//! Every producer yields one of three kinds, fixed when the producer is
//! looked up. Comparisons are resolved against the kind at compile time.

use std::fmt;

/// Kind of value a producer yields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 64-bit float
    Number,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
        })
    }
}

/// A produced value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Number
    Number(f64),
    /// String
    String(String),
    /// Boolean
    Boolean(bool),
}

impl Value {
    /// Kind of this value
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Numeric view, `None` for other kinds
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view, `None` for other kinds
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view, `None` for other kinds
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Fallback value of a kind, used when an attribute is missing
    pub fn fallback(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Number => Self::Number(0.0),
            ValueKind::String => Self::String("<none>".to_string()),
            ValueKind::Boolean => Self::Boolean(false),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
