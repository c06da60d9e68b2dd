//! Container image repositories with bounded image history.

use cumulo_common::types::LogicalId;
use cumulo_synth::{CfnResource, CfnValue};

/// Declares an image repository that expires the oldest images once more
/// than `max_image_count` are stored.
///
/// The lifecycle policy is carried as an embedded JSON document, which is
/// how the provider expects it.
#[must_use]
pub fn repository(id: LogicalId, name: &str, max_image_count: u32) -> CfnResource {
    let policy_text = serde_json::json!({
        "rules": [
            {
                "rulePriority": 1,
                "description": format!("hold {max_image_count} images"),
                "selection": {
                    "tagStatus": "any",
                    "countType": "imageCountMoreThan",
                    "countNumber": max_image_count,
                },
                "action": {"type": "expire"},
            }
        ]
    });
    CfnResource::new(id, "AWS::ECR::Repository")
        .with_property("RepositoryName", name)
        .with_property(
            "LifecyclePolicy",
            CfnValue::object([(
                "LifecyclePolicyText",
                CfnValue::String(policy_text.to_string()),
            )]),
        )
}
