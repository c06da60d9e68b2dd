//! A single declared resource and its properties.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use cumulo_common::types::LogicalId;

use crate::value::CfnValue;

/// One resource declaration within a stack.
///
/// Built fluently, then registered with a [`crate::stack::Stack`]. The
/// declaration owns its logical ID, its provider type name, its properties,
/// and any explicit ordering dependencies beyond those implied by value
/// references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfnResource {
    logical_id: LogicalId,
    resource_type: String,
    properties: BTreeMap<String, CfnValue>,
    depends_on: Vec<LogicalId>,
    retain: bool,
}

impl CfnResource {
    /// Creates a resource of the given provider type, e.g. `AWS::EC2::VPC`.
    #[must_use]
    pub fn new(logical_id: LogicalId, resource_type: impl Into<String>) -> Self {
        Self {
            logical_id,
            resource_type: resource_type.into(),
            properties: BTreeMap::new(),
            depends_on: Vec::new(),
            retain: false,
        }
    }

    /// Sets a property, replacing any previous value under the same name.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<CfnValue>) -> Self {
        let _ = self.properties.insert(name.into(), value.into());
        self
    }

    /// Adds an explicit ordering dependency on another resource.
    #[must_use]
    pub fn with_depends_on(mut self, dependency: LogicalId) -> Self {
        self.depends_on.push(dependency);
        self
    }

    /// Marks the resource as retained when the stack is deleted or the
    /// resource is replaced.
    #[must_use]
    pub const fn retain_on_delete(mut self) -> Self {
        self.retain = true;
        self
    }

    /// Returns the logical ID.
    #[must_use]
    pub const fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    /// Returns the provider type name.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the property with the given name, if set.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&CfnValue> {
        self.properties.get(name)
    }

    /// Returns all properties, ordered by name.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, CfnValue> {
        &self.properties
    }

    /// Returns the explicit ordering dependencies.
    #[must_use]
    pub fn depends_on(&self) -> &[LogicalId] {
        &self.depends_on
    }

    /// Returns whether the resource survives stack deletion.
    #[must_use]
    pub const fn is_retained(&self) -> bool {
        self.retain
    }

    /// Returns every logical ID this resource depends on: explicit
    /// dependencies first, then IDs referenced from property values.
    /// Duplicates are removed.
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<&LogicalId> {
        let mut ids: Vec<&LogicalId> = self.depends_on.iter().collect();
        for value in self.properties.values() {
            for id in value.referenced_ids() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

impl Serialize for CfnResource {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("Type", &self.resource_type)?;
        if !self.properties.is_empty() {
            map.serialize_entry("Properties", &self.properties)?;
        }
        if !self.depends_on.is_empty() {
            let ids: Vec<&str> = self.depends_on.iter().map(LogicalId::as_str).collect();
            map.serialize_entry("DependsOn", &ids)?;
        }
        if self.retain {
            map.serialize_entry("DeletionPolicy", "Retain")?;
            map.serialize_entry("UpdateReplacePolicy", "Retain")?;
        }
        map.end()
    }
}
