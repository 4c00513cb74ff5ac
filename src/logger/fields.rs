//! Structured field values and keyed field sets.
//!
//! # Design Decisions
//! - Values are a closed set of primitive variants converted at the call
//!   boundary, so backends never format arbitrary types
//! - `Fields` keeps insertion order for readable output; a key that is
//!   overridden keeps its original position
//! - Flat key/value sequences with a dangling key are a programming error:
//!   `from_flat` panics, `try_from_flat` returns `OddFieldCount`

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LoggingError, LoggingResult};

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::UInt(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::Str(v.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(v: $t) -> Self {
                FieldValue::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

/// An insertion-ordered set of uniquely keyed fields.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flat `key, value, key, value, ...` sequence.
    ///
    /// # Panics
    /// Panics if the sequence has odd length.
    pub fn from_flat(values: Vec<FieldValue>) -> Self {
        match Self::try_from_flat(values) {
            Ok(fields) => fields,
            Err(e) => panic!("{}", e),
        }
    }

    /// Build from a flat `key, value, ...` sequence, rejecting odd lengths.
    pub fn try_from_flat(values: Vec<FieldValue>) -> LoggingResult<Self> {
        if values.len() % 2 != 0 {
            return Err(LoggingError::OddFieldCount(values.len()));
        }
        let mut fields = Self::new();
        let mut iter = values.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            let key = match key {
                FieldValue::Str(s) => s,
                other => other.to_string(),
            };
            fields.insert(key, value);
        }
        Ok(fields)
    }

    /// Insert a field, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Add every field of `other`; `other` wins on key collision.
    pub fn extend(&mut self, other: Fields) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// Return a new set with `other` merged over `self`.
    pub fn merge(&self, other: &Fields) -> Fields {
        let mut merged = self.clone();
        merged.extend(other.clone());
        merged
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render every value to a string, for label-only backends.
    pub fn to_labels(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

/// Equality ignores insertion order.
impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl<K: Into<String>, V: Into<FieldValue>, const N: usize> From<[(K, V); N]> for Fields {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to primitive values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Fields, A::Error> {
                let mut fields = Fields::new();
                while let Some((k, v)) = access.next_entry::<String, FieldValue>()? {
                    fields.insert(k, v);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// A flat `key, value, key, value, ...` sequence, usually built with [`kv!`].
///
/// Converting an odd-length sequence into [`Fields`] panics.
///
/// [`kv!`]: crate::kv
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValues(pub Vec<FieldValue>);

/// Anything accepted where a log call takes fields.
pub trait IntoFields {
    fn into_fields(self) -> Fields;
}

impl IntoFields for () {
    fn into_fields(self) -> Fields {
        Fields::new()
    }
}

impl IntoFields for Fields {
    fn into_fields(self) -> Fields {
        self
    }
}

impl IntoFields for &Fields {
    fn into_fields(self) -> Fields {
        self.clone()
    }
}

impl IntoFields for KeyValues {
    fn into_fields(self) -> Fields {
        Fields::from_flat(self.0)
    }
}

impl<K: Into<String>, V: Into<FieldValue>, const N: usize> IntoFields for [(K, V); N] {
    fn into_fields(self) -> Fields {
        self.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> IntoFields for Vec<(K, V)> {
    fn into_fields(self) -> Fields {
        self.into_iter().collect()
    }
}

impl<K, V> IntoFields for &[(K, V)]
where
    K: Clone + Into<String>,
    V: Clone + Into<FieldValue>,
{
    fn into_fields(self) -> Fields {
        self.iter().cloned().collect()
    }
}

/// Build a flat key/value sequence from mixed value types.
///
/// ```
/// use cloud_logging::kv;
/// let kvs = kv!["user", "alice", "attempt", 3, "admin", false];
/// assert_eq!(kvs.0.len(), 6);
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        $crate::KeyValues(::std::vec::Vec::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::KeyValues(::std::vec![$($crate::FieldValue::from($value)),+])
    };
}

/// Build a [`Fields`] set from `key => value` pairs.
///
/// ```
/// use cloud_logging::fields;
/// let f = fields! { "user" => "alice", "attempt" => 3 };
/// assert_eq!(f.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($key, $crate::FieldValue::from($value));)+
        fields
    }};
}
