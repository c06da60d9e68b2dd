//! Task execution role for the container service.

use cumulo_common::types::LogicalId;
use cumulo_synth::{CfnResource, CfnValue};

/// Declares a role assumable by the container task service, carrying the
/// given managed policies by name.
#[must_use]
pub fn service_role(id: LogicalId, service: &str, managed_policies: &[&str]) -> CfnResource {
    let assume_role = CfnValue::object([
        (
            "Statement",
            CfnValue::array([CfnValue::object([
                ("Action", CfnValue::from("sts:AssumeRole")),
                ("Effect", CfnValue::from("Allow")),
                (
                    "Principal",
                    CfnValue::object([("Service", CfnValue::from(service))]),
                ),
            ])]),
        ),
        ("Version", CfnValue::from("2012-10-17")),
    ]);
    let policy_arns = CfnValue::array(
        managed_policies
            .iter()
            .map(|name| CfnValue::String(format!("arn:aws:iam::aws:policy/{name}"))),
    );
    CfnResource::new(id, "AWS::IAM::Role")
        .with_property("AssumeRolePolicyDocument", assume_role)
        .with_property("ManagedPolicyArns", policy_arns)
}
