//! Rendering a stack into a provisioning template document.

use std::collections::BTreeMap;

use cumulo_common::constants::TEMPLATE_FORMAT_VERSION;
use cumulo_common::error::Result;

use crate::graph::DependencyGraph;
use crate::inspect::TemplateQuery;
use crate::stack::Stack;

/// A fully rendered template.
///
/// Produced from a validated [`Stack`]; holds the final JSON document and
/// serializes it on demand. Rendering fails rather than emit a template
/// with dangling references or dependency cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    document: serde_json::Value,
}

impl Template {
    /// Validates the stack and renders it.
    ///
    /// # Errors
    ///
    /// Returns an error if a reference points at an unregistered resource,
    /// the dependency graph contains a cycle, or serialization fails.
    pub fn from_stack(stack: &Stack) -> Result<Self> {
        tracing::info!(
            stack = stack.name(),
            resources = stack.resource_count(),
            outputs = stack.output_count(),
            "rendering template"
        );
        stack.validate()?;
        let _ = DependencyGraph::from_stack(stack).resolve_order()?;

        let resources: BTreeMap<&str, &crate::resource::CfnResource> = stack
            .resources()
            .map(|resource| (resource.logical_id().as_str(), resource))
            .collect();
        let mut document = serde_json::Map::new();
        let _ = document.insert(
            "AWSTemplateFormatVersion".to_string(),
            serde_json::Value::String(TEMPLATE_FORMAT_VERSION.to_string()),
        );
        let _ = document.insert("Resources".to_string(), serde_json::to_value(&resources)?);
        if stack.output_count() > 0 {
            let outputs: BTreeMap<&str, &crate::stack::Output> = stack
                .outputs()
                .map(|(id, output)| (id.as_str(), output))
                .collect();
            let _ = document.insert("Outputs".to_string(), serde_json::to_value(&outputs)?);
        }
        Ok(Self {
            document: serde_json::Value::Object(document),
        })
    }

    /// Returns the rendered document.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.document
    }

    /// Returns a query handle over the rendered document.
    #[must_use]
    pub const fn query(&self) -> TemplateQuery<'_> {
        TemplateQuery::new(&self.document)
    }

    /// Serializes the template as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }

    /// Serializes the template as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    /// Serializes the template as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.document)?)
    }
}
