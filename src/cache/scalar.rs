//! Scalar values and read conversions
//!
//! A [`Scalar`] is what callers store; a [`Conversion`] names how stored bytes
//! are read back.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

// == Scalar ==
/// A value accepted by [`Cache::store`](crate::cache::Cache::store).
///
/// JSON input maps strings to `Text`, integers to `Int`, other numbers to
/// `Float` and arrays of bytes to `Bytes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
}

impl Scalar {
    /// Encodes the value the way it is written to the store.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Scalar::Text(text) => text.as_bytes().to_vec(),
            Scalar::Bytes(raw) => raw.clone(),
            Scalar::Int(value) => value.to_string().into_bytes(),
            Scalar::Float(value) => format!("{:?}", value).into_bytes(),
        }
    }

    /// Renders the value as a call argument, e.g. `"foo"`, `b"\x00"`, `42`.
    pub fn repr(&self) -> String {
        match self {
            Scalar::Text(text) => format!("{:?}", text),
            Scalar::Bytes(raw) => format!("b\"{}\"", raw.escape_ascii()),
            Scalar::Int(value) => value.to_string(),
            Scalar::Float(value) => format!("{:?}", value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&[u8]> for Scalar {
    fn from(value: &[u8]) -> Self {
        Scalar::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(value: Vec<u8>) -> Self {
        Scalar::Bytes(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

/// Renders positional arguments as a tuple: `("a",)`, `("a", 1)`, `()`.
pub fn render_args(args: &[Scalar]) -> String {
    match args {
        [] => "()".to_string(),
        [single] => format!("({},)", single.repr()),
        many => {
            let parts: Vec<String> = many.iter().map(Scalar::repr).collect();
            format!("({})", parts.join(", "))
        }
    }
}

// == Conversion ==
/// How stored bytes are interpreted on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conversion {
    /// Bytes as stored
    #[default]
    Raw,
    /// UTF-8 text
    Text,
    /// Base-10 integer
    #[serde(alias = "integer")]
    Int,
    Float,
}

impl Conversion {
    /// Applies the conversion to raw stored bytes.
    pub fn apply(self, raw: Vec<u8>) -> Result<Value> {
        match self {
            Conversion::Raw => Ok(Value::Raw(raw)),
            Conversion::Text => decode_text(raw).map(Value::Text),
            Conversion::Int => decode_int(&raw).map(Value::Int),
            Conversion::Float => decode_float(&raw).map(Value::Float),
        }
    }
}

// == Value ==
/// A stored value after conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Raw(Vec<u8>),
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn into_raw(self) -> Option<Vec<u8>> {
        match self {
            Value::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_float(self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(value),
            _ => None,
        }
    }
}

// == Decoders ==
/// Decodes bytes as UTF-8 text; invalid sequences are a decode error.
pub fn decode_text(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw).map_err(|e| CacheError::Decode(format!("Invalid UTF-8: {}", e)))
}

/// Parses bytes as a base-10 integer, ignoring surrounding whitespace.
pub fn decode_int(raw: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| CacheError::Decode(format!("Invalid UTF-8: {}", e)))?;
    text.trim()
        .parse()
        .map_err(|e| CacheError::Decode(format!("Invalid integer {:?}: {}", text, e)))
}

pub fn decode_float(raw: &[u8]) -> Result<f64> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| CacheError::Decode(format!("Invalid UTF-8: {}", e)))?;
    text.trim()
        .parse()
        .map_err(|e| CacheError::Decode(format!("Invalid float {:?}: {}", text, e)))
}
