//! Parameter-store entries for publishing stack identifiers.

use cumulo_common::types::LogicalId;
use cumulo_synth::{CfnResource, CfnValue};

/// Declares a string parameter holding the given value.
///
/// The value is usually a reference into the stack so the stored string is
/// resolved at provisioning time.
#[must_use]
pub fn string_parameter(id: LogicalId, name: &str, value: CfnValue) -> CfnResource {
    CfnResource::new(id, "AWS::SSM::Parameter")
        .with_property("Name", name)
        .with_property("Type", "String")
        .with_property("Value", value)
}
