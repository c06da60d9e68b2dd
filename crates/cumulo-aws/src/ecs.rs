//! Container service cluster.

use cumulo_common::types::LogicalId;
use cumulo_synth::CfnResource;

/// Declares a named container service cluster.
#[must_use]
pub fn cluster(id: LogicalId, name: &str) -> CfnResource {
    CfnResource::new(id, "AWS::ECS::Cluster").with_property("ClusterName", name)
}
