//! Stack registry: the set of declared resources and outputs.

use std::collections::BTreeMap;

use serde::Serialize;

use cumulo_common::error::{CumuloError, Result};
use cumulo_common::types::LogicalId;

use crate::resource::CfnResource;
use crate::template::Template;
use crate::value::CfnValue;

/// A named value exported from the stack after provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    /// Human-readable description, omitted from the template when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Exported value, usually a reference into the stack.
    pub value: CfnValue,
}

impl Output {
    /// Creates an output with no description.
    #[must_use]
    pub const fn new(value: CfnValue) -> Self {
        Self {
            description: None,
            value,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered registry of resources and outputs under one stack name.
///
/// Logical IDs are unique across the stack. Registration order does not
/// matter; resources are kept sorted by ID and ordering for provisioning
/// is recovered from the dependency graph.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    account: String,
    region: String,
    resources: BTreeMap<LogicalId, CfnResource>,
    outputs: BTreeMap<LogicalId, Output>,
}

impl Stack {
    /// Creates an empty stack bound to an account and region.
    #[must_use]
    pub fn new(name: impl Into<String>, account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            account: account.into(),
            region: region.into(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Returns the stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the account the stack deploys into.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Returns the region the stack deploys into.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Registers a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource with the same logical ID is already
    /// registered.
    pub fn add_resource(&mut self, resource: CfnResource) -> Result<()> {
        let id = resource.logical_id().clone();
        if self.resources.contains_key(&id) {
            return Err(CumuloError::DuplicateId {
                id: id.to_string(),
            });
        }
        tracing::debug!(id = %id, resource_type = resource.resource_type(), "registering resource");
        let _ = self.resources.insert(id, resource);
        Ok(())
    }

    /// Registers an output under the given logical ID.
    ///
    /// # Errors
    ///
    /// Returns an error if an output with the same logical ID is already
    /// registered.
    pub fn add_output(&mut self, id: LogicalId, output: Output) -> Result<()> {
        if self.outputs.contains_key(&id) {
            return Err(CumuloError::DuplicateId {
                id: id.to_string(),
            });
        }
        let _ = self.outputs.insert(id, output);
        Ok(())
    }

    /// Returns the resource with the given logical ID, if registered.
    #[must_use]
    pub fn resource(&self, id: &LogicalId) -> Option<&CfnResource> {
        self.resources.get(id)
    }

    /// Returns whether a resource with the given logical ID is registered.
    #[must_use]
    pub fn contains(&self, id: &LogicalId) -> bool {
        self.resources.contains_key(id)
    }

    /// Iterates all resources, ordered by logical ID.
    pub fn resources(&self) -> impl Iterator<Item = &CfnResource> {
        self.resources.values()
    }

    /// Iterates all outputs, ordered by logical ID.
    pub fn outputs(&self) -> impl Iterator<Item = (&LogicalId, &Output)> {
        self.outputs.iter()
    }

    /// Returns the number of registered resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns the number of registered outputs.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Checks that every reference in the stack points at a registered
    /// resource.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing target.
    pub fn validate(&self) -> Result<()> {
        for resource in self.resources.values() {
            for id in resource.referenced_ids() {
                if !self.resources.contains_key(id) {
                    return Err(CumuloError::NotFound {
                        kind: "resource",
                        id: format!("{id} (referenced by {})", resource.logical_id()),
                    });
                }
            }
        }
        for (output_id, output) in &self.outputs {
            for id in output.value.referenced_ids() {
                if !self.resources.contains_key(id) {
                    return Err(CumuloError::NotFound {
                        kind: "resource",
                        id: format!("{id} (referenced by output {output_id})"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Consumes the stack and synthesizes its template.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the dependency graph is
    /// cyclic.
    pub fn into_template(self) -> Result<Template> {
        Template::from_stack(&self)
    }
}
