//! The property-list value model shared by every container.
//!
//! [`Value`] is the common currency between bridges and backends: scalar
//! and collection operations exchange `Value`s, and backends decide how a
//! `Value` is laid out on their medium.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::url::Url;

/// A property-list style value.
///
/// Binary payloads serialize as lowercase hex strings so that text-based
/// documents stay readable. In text formats, non-finite floats serialize as
/// `"NaN"`, `"inf"` or `"-inf"`, since JSON has no number for them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(#[serde(with = "float_repr")] f64),
    Bool(bool),
    Date(DateTime<Utc>),
    Data(#[serde(with = "hex_bytes")] Vec<u8>),
    Url(Url),
    Array(Vec<Value>),
    Dictionary(BTreeMap<String, Value>),
}

/// The discriminant of a [`Value`], used for diagnostics and literal parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Float,
    Bool,
    Date,
    Data,
    Url,
    Array,
    Dictionary,
}

impl ValueKind {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Data => "data",
            Self::Url => "url",
            Self::Array => "array",
            Self::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = TypeError;

    fn from_str(s: &str) -> TypeResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(Self::String),
            "int" | "integer" => Ok(Self::Integer),
            "float" | "double" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Bool),
            "date" => Ok(Self::Date),
            "data" | "bytes" => Ok(Self::Data),
            "url" => Ok(Self::Url),
            "array" => Ok(Self::Array),
            "dictionary" | "dict" => Ok(Self::Dictionary),
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Date(_) => ValueKind::Date,
            Self::Data(_) => ValueKind::Data,
            Self::Url(_) => ValueKind::Url,
            Self::Array(_) => ValueKind::Array,
            Self::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    /// Returns `true` for every kind except arrays and dictionaries.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Dictionary(_))
    }

    /// Parse a textual literal as the given kind.
    ///
    /// Dates are RFC 3339, data is hex, arrays and dictionaries are JSON.
    pub fn parse_as(kind: ValueKind, input: &str) -> TypeResult<Self> {
        let invalid = || TypeError::InvalidLiteral {
            input: input.to_string(),
            kind: kind.to_string(),
        };
        match kind {
            ValueKind::String => Ok(Self::String(input.to_string())),
            ValueKind::Integer => input.trim().parse().map(Self::Integer).map_err(|_| invalid()),
            ValueKind::Float => input.trim().parse().map(Self::Float).map_err(|_| invalid()),
            ValueKind::Bool => match input.trim() {
                "true" | "yes" | "1" => Ok(Self::Bool(true)),
                "false" | "no" | "0" => Ok(Self::Bool(false)),
                _ => Err(invalid()),
            },
            ValueKind::Date => DateTime::parse_from_rfc3339(input.trim())
                .map(|d| Self::Date(d.with_timezone(&Utc)))
                .map_err(|_| invalid()),
            ValueKind::Data => hex::decode(input.trim())
                .map(Self::Data)
                .map_err(|e| TypeError::InvalidHex(e.to_string())),
            ValueKind::Url => Url::parse(input.trim()).map(Self::Url),
            ValueKind::Array | ValueKind::Dictionary => {
                let json: serde_json::Value =
                    serde_json::from_str(input).map_err(|_| invalid())?;
                let value = Self::from_json(json);
                if value.kind() == kind {
                    Ok(value)
                } else {
                    Err(invalid())
                }
            }
        }
    }

    /// Convert plain JSON into a value. `null` entries become empty strings.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::String(String::new()),
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::Dictionary(
                map.into_iter().map(|(k, v)| (k, Self::from_json(v))).collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Self::Data(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Url(url) => write!(f, "{url}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Dictionary(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A platform scalar that maps losslessly onto a primitive [`Value`].
///
/// `from_value` applies the same lenient coercions a preferences store
/// does (an integral float reads back as an integer, a string reads back
/// as a URL or date when it parses as one). It returns `None` when the
/// stored value cannot represent `Self`.
pub trait Primitive: Sized {
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Option<Self>;
}

impl Primitive for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            Value::Url(url) => Some(url.into()),
            _ => None,
        }
    }
}

impl Primitive for i64 {
    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(i),
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            Value::Float(x)
                if x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64 =>
            {
                Some(x as i64)
            }
            _ => None,
        }
    }
}

impl Primitive for i32 {
    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        i64::from_value(value).and_then(|i| i32::try_from(i).ok())
    }
}

impl Primitive for u32 {
    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        i64::from_value(value).and_then(|i| u32::try_from(i).ok())
    }
}

impl Primitive for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(x),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }
}

impl Primitive for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl Primitive for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            Value::Integer(0) => Some(false),
            Value::Integer(1) => Some(true),
            _ => None,
        }
    }
}

impl Primitive for DateTime<Utc> {
    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(d),
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            _ => None,
        }
    }
}

impl Primitive for Bytes {
    fn to_value(&self) -> Value {
        Value::Data(self.to_vec())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Data(bytes) => Some(Bytes::from(bytes)),
            _ => None,
        }
    }
}

impl Primitive for Url {
    fn to_value(&self) -> Value {
        Value::Url(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Url(url) => Some(url),
            Value::String(s) => Url::parse(&s).ok(),
            _ => None,
        }
    }
}

mod float_repr {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Number(f64),
        Word(String),
    }

    pub fn serialize<S: Serializer>(x: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if x.is_finite() || !serializer.is_human_readable() {
            serializer.serialize_f64(*x)
        } else if x.is_nan() {
            serializer.serialize_str("NaN")
        } else if x.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        if !deserializer.is_human_readable() {
            return f64::deserialize(deserializer);
        }
        match Text::deserialize(deserializer)? {
            Text::Number(x) => Ok(x),
            Text::Word(word) => match word.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid float {other:?}"))),
            },
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
