//! Read-side queries over rendered templates.
//!
//! Used by the CLI to summarize what a synthesis produced and by tests to
//! assert on template contents without string-matching raw JSON.

/// A borrowed view over a rendered template document.
#[derive(Debug, Clone, Copy)]
pub struct TemplateQuery<'a> {
    document: &'a serde_json::Value,
}

impl<'a> TemplateQuery<'a> {
    /// Wraps a rendered document.
    #[must_use]
    pub const fn new(document: &'a serde_json::Value) -> Self {
        Self { document }
    }

    /// Returns the resource body registered under the given logical ID.
    #[must_use]
    pub fn resource(&self, logical_id: &str) -> Option<&'a serde_json::Value> {
        self.document.pointer(&format!("/Resources/{logical_id}"))
    }

    /// Returns `(logical_id, body)` for every resource of the given type,
    /// ordered by logical ID.
    #[must_use]
    pub fn resources_of_type(&self, resource_type: &str) -> Vec<(&'a str, &'a serde_json::Value)> {
        let Some(resources) = self
            .document
            .pointer("/Resources")
            .and_then(serde_json::Value::as_object)
        else {
            return Vec::new();
        };
        resources
            .iter()
            .filter(|(_, body)| {
                body.get("Type").and_then(serde_json::Value::as_str) == Some(resource_type)
            })
            .map(|(id, body)| (id.as_str(), body))
            .collect()
    }

    /// Returns how many resources of the given type the template declares.
    #[must_use]
    pub fn count_of_type(&self, resource_type: &str) -> usize {
        self.resources_of_type(resource_type).len()
    }

    /// Returns the total number of declared resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.document
            .pointer("/Resources")
            .and_then(serde_json::Value::as_object)
            .map_or(0, serde_json::Map::len)
    }

    /// Returns whether some resource of the given type declares at least the
    /// given properties.
    ///
    /// Objects match when every expected key is present and matches
    /// recursively; arrays match element by element and must have equal
    /// length; scalars must be equal.
    #[must_use]
    pub fn has_resource_properties(
        &self,
        resource_type: &str,
        expected: &serde_json::Value,
    ) -> bool {
        let empty = serde_json::json!({});
        self.resources_of_type(resource_type)
            .iter()
            .any(|(_, body)| is_subset(expected, body.get("Properties").unwrap_or(&empty)))
    }

    /// Returns the output registered under the given name.
    #[must_use]
    pub fn output(&self, name: &str) -> Option<&'a serde_json::Value> {
        self.document.pointer(&format!("/Outputs/{name}"))
    }

    /// Returns the total number of declared outputs.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.document
            .pointer("/Outputs")
            .and_then(serde_json::Value::as_object)
            .map_or(0, serde_json::Map::len)
    }
}

/// Checks `expected` against `actual` structurally: object keys may be a
/// subset, array elements are compared pairwise, scalars must be equal.
fn is_subset(expected: &serde_json::Value, actual: &serde_json::Value) -> bool {
    match (expected, actual) {
        (serde_json::Value::Object(expected_map), serde_json::Value::Object(actual_map)) => {
            expected_map.iter().all(|(key, expected_value)| {
                actual_map
                    .get(key)
                    .is_some_and(|actual_value| is_subset(expected_value, actual_value))
            })
        }
        (serde_json::Value::Array(expected_items), serde_json::Value::Array(actual_items)) => {
            expected_items.len() == actual_items.len()
                && expected_items
                    .iter()
                    .zip(actual_items)
                    .all(|(e, a)| is_subset(e, a))
        }
        _ => expected == actual,
    }
}
