//! Log groups for container output.

use cumulo_common::types::LogicalId;
use cumulo_synth::CfnResource;

/// Declares a named log group with bounded retention.
///
/// Log groups are retained on stack deletion so history survives teardown.
#[must_use]
pub fn log_group(id: LogicalId, name: &str, retention_days: u32) -> CfnResource {
    CfnResource::new(id, "AWS::Logs::LogGroup")
        .with_property("LogGroupName", name)
        .with_property("RetentionInDays", retention_days)
        .retain_on_delete()
}
