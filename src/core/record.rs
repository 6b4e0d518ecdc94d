//! Open records
//!
//! Pipeline documents carry far more keys than the rewrite rules care about.
//! An [`Open`] record decodes the keys a type knows into that type and keeps
//! every other key, in its original position, in an ordered overflow mapping.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use std::ops::{Deref, DerefMut};

/// Keys recognized by a record type
pub trait Fields {
    /// Every key the type decodes itself. Anything else goes to the overflow.
    const NAMES: &'static [&'static str];
}

/// A typed record plus the keys it does not recognize
///
/// Dereferences to the typed fields, so `document.steps` reads the known
/// `steps` field while `document.attrs` holds the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Open<T> {
    fields: T,

    /// Unrecognized keys, in input order
    pub attrs: Mapping,

    /// Key order of the decoded mapping (known and overflow keys interleaved)
    order: Vec<Value>,
}

impl<T> Open<T> {
    /// Wrap typed fields with an empty overflow
    pub fn new(fields: T) -> Self {
        Self {
            fields,
            attrs: Mapping::new(),
            order: Vec::new(),
        }
    }

    /// Add an overflow attribute, keeping insertion order
    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(Value::from(key), value.into());
        self
    }

    /// Look up an overflow attribute by key
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }
}

impl<T: Fields + DeserializeOwned> Open<T> {
    /// Split a mapping into known fields and overflow, remembering key order
    pub fn from_mapping(mapping: Mapping) -> Result<Self, serde_yaml::Error> {
        let mut known = Mapping::new();
        let mut attrs = Mapping::new();
        let mut order = Vec::with_capacity(mapping.len());

        for (key, value) in mapping {
            order.push(key.clone());
            if is_known::<T>(&key) {
                known.insert(key, value);
            } else {
                attrs.insert(key, value);
            }
        }

        let fields = serde_yaml::from_value(Value::Mapping(known))?;
        Ok(Self {
            fields,
            attrs,
            order,
        })
    }
}

impl<T: Serialize> Open<T> {
    /// Merge known fields and overflow back into one flat mapping
    ///
    /// Keys present at decode time keep their position. Keys that appeared
    /// since (a field set by a rewrite, a new overflow attribute) follow,
    /// known fields first in declaration order.
    pub fn to_mapping(&self) -> Result<Mapping, serde_yaml::Error> {
        let known = match serde_yaml::to_value(&self.fields)? {
            Value::Mapping(known) => known,
            _ => Mapping::new(),
        };

        let mut merged = Mapping::with_capacity(known.len() + self.attrs.len());
        for key in &self.order {
            if let Some(value) = known.get(key).or_else(|| self.attrs.get(key)) {
                merged.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in known.iter().chain(self.attrs.iter()) {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }

        Ok(merged)
    }
}

fn is_known<T: Fields>(key: &Value) -> bool {
    key.as_str().is_some_and(|key| T::NAMES.contains(&key))
}

impl<T> Deref for Open<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.fields
    }
}

impl<T> DerefMut for Open<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.fields
    }
}

impl<'de, T: Fields + DeserializeOwned> Deserialize<'de> for Open<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mapping = Mapping::deserialize(deserializer)?;
        Open::from_mapping(mapping).map_err(D::Error::custom)
    }
}

impl<T: Serialize> Serialize for Open<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_mapping()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

/// Build a YAML mapping from string keys, keeping the given order
pub fn mapping<'a>(entries: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    Value::Mapping(
        entries
            .into_iter()
            .map(|(key, value)| (Value::from(key), value))
            .collect(),
    )
}

/// Build a YAML sequence
pub fn sequence<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Value {
    Value::Sequence(items.into_iter().map(Into::into).collect())
}
