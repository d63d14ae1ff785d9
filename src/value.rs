//! Dynamic value tree.
//!
//! [`Value`] holds data whose shape is only known at runtime: a parsed
//! document, a configuration blob, a heterogeneous payload. It is a dynamic
//! declared type, so every node is written with the procedure of the value it
//! holds.
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, number, string, array or object
//! - [`Number`]: an integer or a float
//! - [`ValueMap`](crate::ValueMap): insertion-ordered object members
//!
//! ## Creating Values
//!
//! ```rust
//! use typetext::{value, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = value!({
//!     "name": "Alice",
//!     "tags": ["admin", "ops"]
//! });
//! assert!(obj.is_object());
//! ```
//!
//! ## Writing Values
//!
//! ```rust
//! use typetext::{to_json, to_jsv, value};
//!
//! let doc = value!({ "id": 7, "ok": true, "note": null });
//! assert_eq!(to_json(&doc).unwrap(), r#"{"id":7,"ok":true}"#);
//! assert_eq!(to_jsv(&doc).unwrap(), "{id:7,ok:True}");
//! ```
//!
//! ## Reading JSON Into Values
//!
//! `Value` implements serde's `Deserialize`, so any serde format can produce one:
//!
//! ```rust
//! use typetext::{to_jsv, Value};
//!
//! let value: Value = serde_json::from_str(r#"{"a":[1,2.5,"x"]}"#).unwrap();
//! assert_eq!(to_jsv(&value).unwrap(), "{a:[1,2.5,x]}");
//! ```

use crate::reflect::{downcast, PolymorphicKind, Reflect, TypeDescriptor};
use crate::ValueMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed value.
///
/// # Examples
///
/// ```rust
/// use typetext::{Number, Value};
///
/// let null = Value::Null;
/// let num = Value::Number(Number::Integer(42));
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(ValueMap),
}

/// An integer or floating point number.
///
/// # Examples
///
/// ```rust
/// use typetext::Number;
///
/// let integer = Number::Integer(42);
/// let float = Number::Float(3.5);
///
/// assert!(integer.is_integer());
/// assert_eq!(integer.as_i64(), Some(42));
/// assert_eq!(float.as_f64(), 3.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns the value as `i64` for integers and whole floats in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typetext::Number;
    ///
    /// assert_eq!(Number::Float(42.0).as_i64(), Some(42));
    /// assert_eq!(Number::Float(42.5).as_i64(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }

    fn as_reflect(&self) -> &dyn Reflect {
        match self {
            Number::Integer(i) => i,
            Number::Float(f) => f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{}", fl),
        }
    }
}

macro_rules! number_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Number::$variant(value.into())
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(Number::from(value))
                }
            }
        )*
    };
}

number_from!(Integer: i8, i16, i32, i64, u8, u16, u32);
number_from!(Float: f32, f64);

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// # Examples
    ///
    /// ```rust
    /// use typetext::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The runtime value this node holds, or `None` for null.
    #[must_use]
    pub fn inner(&self) -> Option<&dyn Reflect> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b),
            Value::Number(n) => Some(n.as_reflect()),
            Value::String(s) => Some(s),
            Value::Array(items) => Some(items),
            Value::Object(map) => Some(map),
        }
    }
}

fn resolve_value(value: &dyn Reflect) -> crate::Result<Option<&dyn Reflect>> {
    Ok(downcast::<Value>(value)?.inner())
}

impl Reflect for Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::polymorphic::<Value>(PolymorphicKind::Dynamic, resolve_value)
    }

    fn is_null(&self) -> bool {
        Value::is_null(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match crate::to_json(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Integer(value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Number(Number::Integer(i))),
                    Err(_) => Ok(Value::Number(Number::Float(value as f64))),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::Float(value)))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ValueMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value.as_i64() {
            Some(i) => Ok(i),
            None => Err(crate::Error::type_mismatch("i64", &format!("{:?}", value))),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value.as_f64() {
            Some(f) => Ok(f),
            None => Err(crate::Error::type_mismatch("f64", &format!("{:?}", value))),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(crate::Error::type_mismatch("bool", &format!("{:?}", value))),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(crate::Error::type_mismatch(
                "string",
                &format!("{:?}", value),
            )),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{to_json, to_jsv};

    #[test]
    fn test_tryfrom_i64() {
        let result: i64 = TryFrom::try_from(Value::Number(Number::Integer(42))).unwrap();
        assert_eq!(result, 42);
        let result: i64 = TryFrom::try_from(Value::Number(Number::Float(42.0))).unwrap();
        assert_eq!(result, 42);
        assert!(i64::try_from(Value::String("test".to_string())).is_err());
    }

    #[test]
    fn test_tryfrom_other_scalars() {
        assert_eq!(f64::try_from(Value::from(42)).unwrap(), 42.0);
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert!(bool::try_from(Value::from(1)).is_err());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert!(matches!(
            String::try_from(Value::Null),
            Err(crate::Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42u8), Value::Number(Number::Integer(42)));
        assert_eq!(Value::from(3.5f64), Value::Number(Number::Float(3.5)));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
    }

    #[test]
    fn test_writes_inner_values() {
        assert_eq!(to_json(&Value::Null).unwrap(), "null");
        assert_eq!(to_jsv(&Value::Null).unwrap(), "");
        assert_eq!(to_json(&Value::from(1.5)).unwrap(), "1.5");
        assert_eq!(to_json(&Value::from("a\"b")).unwrap(), r#""a\"b""#);
        assert_eq!(
            to_json(&Value::Array(vec![Value::from(1), Value::Null, Value::from(false)])).unwrap(),
            "[1,null,false]"
        );
    }

    #[test]
    fn test_objects_have_no_discriminator() {
        let mut map = ValueMap::new();
        map.insert("k".to_string(), Value::from("v"));
        assert_eq!(to_json(&Value::Object(map)).unwrap(), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_serde_round_trip() {
        let value: Value = serde_json::from_str(r#"{"a":[1,2.5,"x",null,true]}"#).unwrap();
        let back = serde_json::to_string(&value).unwrap();
        assert_eq!(back, r#"{"a":[1,2.5,"x",null,true]}"#);
        assert_eq!(to_json(&value).unwrap(), back);
    }

    #[test]
    fn test_display_is_json() {
        assert_eq!(Value::from(vec![Value::from(1)]).to_string(), "[1]");
    }
}
