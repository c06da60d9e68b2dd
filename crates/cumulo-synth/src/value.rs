//! Property values of declared resources.
//!
//! A value is either a literal (string, number, boolean, array, object) or a
//! reference into the stack: a plain reference to another resource, an
//! attribute lookup on one, or a string joined from mixed parts. References
//! serialize to the intrinsic-function form the provisioning engine expects
//! and are what the dependency graph is built from.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use cumulo_common::types::LogicalId;

/// A single property value within a resource declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfnValue {
    /// Literal string.
    String(String),
    /// Literal boolean.
    Bool(bool),
    /// Literal integer.
    Number(i64),
    /// Ordered list of values.
    Array(Vec<CfnValue>),
    /// String-keyed map of values, ordered by key.
    Object(BTreeMap<String, CfnValue>),
    /// Reference to another resource, yielding its return value.
    Ref(LogicalId),
    /// Attribute lookup on another resource.
    GetAtt {
        /// Resource the attribute is read from.
        target: LogicalId,
        /// Attribute name, e.g. `Arn` or `DNSName`.
        attribute: String,
    },
    /// String concatenation of mixed literal and reference parts.
    Join {
        /// Separator placed between parts.
        delimiter: String,
        /// Parts to concatenate.
        parts: Vec<CfnValue>,
    },
}

impl CfnValue {
    /// Creates a reference to the resource with the given logical ID.
    #[must_use]
    pub const fn reference(target: LogicalId) -> Self {
        Self::Ref(target)
    }

    /// Creates an attribute lookup on the resource with the given logical ID.
    #[must_use]
    pub fn get_att(target: LogicalId, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            target,
            attribute: attribute.into(),
        }
    }

    /// Creates a join of `parts` separated by `delimiter`.
    #[must_use]
    pub fn join(delimiter: impl Into<String>, parts: impl IntoIterator<Item = Self>) -> Self {
        Self::Join {
            delimiter: delimiter.into(),
            parts: parts.into_iter().collect(),
        }
    }

    /// Creates an array value from any iterator of values.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Creates an object value from key-value pairs.
    #[must_use]
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Returns every logical ID this value refers to, in encounter order.
    ///
    /// Nested arrays, objects, and joins are walked recursively.
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<&LogicalId> {
        let mut ids = Vec::new();
        self.collect_refs(&mut ids);
        ids
    }

    fn collect_refs<'a>(&'a self, ids: &mut Vec<&'a LogicalId>) {
        match self {
            Self::Ref(id) => ids.push(id),
            Self::GetAtt { target, .. } => ids.push(target),
            Self::Array(items) | Self::Join { parts: items, .. } => {
                for item in items {
                    item.collect_refs(ids);
                }
            }
            Self::Object(map) => {
                for value in map.values() {
                    value.collect_refs(ids);
                }
            }
            Self::String(_) | Self::Bool(_) | Self::Number(_) => {}
        }
    }
}

impl Serialize for CfnValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_i64(*n),
            Self::Array(items) => items.serialize(serializer),
            Self::Object(map) => map.serialize(serializer),
            Self::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id.as_str())?;
                map.end()
            }
            Self::GetAtt { target, attribute } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[target.as_str(), attribute.as_str()])?;
                map.end()
            }
            Self::Join { delimiter, parts } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &(delimiter, parts))?;
                map.end()
            }
        }
    }
}

impl From<&str> for CfnValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for CfnValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for CfnValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CfnValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u16> for CfnValue {
    fn from(value: u16) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<u32> for CfnValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}
