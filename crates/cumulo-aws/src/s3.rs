//! Object storage for access logs.

use cumulo_common::types::LogicalId;
use cumulo_synth::{CfnResource, CfnValue};

/// Builder for a named bucket.
#[derive(Debug)]
pub struct BucketBuilder {
    id: LogicalId,
    name: String,
    expire_after_days: Option<u32>,
    retain: bool,
}

impl BucketBuilder {
    /// Creates a bucket builder for the given bucket name.
    #[must_use]
    pub fn new(id: LogicalId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            expire_after_days: None,
            retain: false,
        }
    }

    /// Expires objects after the given number of days.
    #[must_use]
    pub const fn expire_after_days(mut self, days: u32) -> Self {
        self.expire_after_days = Some(days);
        self
    }

    /// Keeps the bucket and its contents when the stack is deleted.
    #[must_use]
    pub const fn retained(mut self) -> Self {
        self.retain = true;
        self
    }

    /// Builds the bucket declaration.
    #[must_use]
    pub fn build(self) -> CfnResource {
        let mut resource = CfnResource::new(self.id, "AWS::S3::Bucket")
            .with_property("BucketName", self.name);
        if let Some(days) = self.expire_after_days {
            resource = resource.with_property(
                "LifecycleConfiguration",
                CfnValue::object([(
                    "Rules",
                    CfnValue::array([CfnValue::object([
                        ("ExpirationInDays", CfnValue::from(days)),
                        ("Status", CfnValue::from("Enabled")),
                    ])]),
                )]),
            );
        }
        if self.retain {
            resource = resource.retain_on_delete();
        }
        resource
    }
}

/// Declares the bucket policy that lets the load balancer log delivery
/// principal write access logs under `AWSLogs/<account>/`.
#[must_use]
pub fn access_log_delivery_policy(id: LogicalId, bucket: &LogicalId, account: &str) -> CfnResource {
    let log_prefix_arn = CfnValue::join(
        "",
        [
            CfnValue::get_att(bucket.clone(), "Arn"),
            CfnValue::String(format!("/AWSLogs/{account}/*")),
        ],
    );
    let delivery_principal = CfnValue::object([(
        "Service",
        CfnValue::from("logdelivery.elasticloadbalancing.amazonaws.com"),
    )]);
    let statements = CfnValue::array([
        CfnValue::object([
            ("Action", CfnValue::from("s3:PutObject")),
            ("Effect", CfnValue::from("Allow")),
            ("Principal", delivery_principal.clone()),
            ("Resource", log_prefix_arn),
        ]),
        CfnValue::object([
            ("Action", CfnValue::from("s3:GetBucketAcl")),
            ("Effect", CfnValue::from("Allow")),
            ("Principal", delivery_principal),
            ("Resource", CfnValue::get_att(bucket.clone(), "Arn")),
        ]),
    ]);
    CfnResource::new(id, "AWS::S3::BucketPolicy")
        .with_property("Bucket", CfnValue::reference(bucket.clone()))
        .with_property(
            "PolicyDocument",
            CfnValue::object([
                ("Statement", statements),
                ("Version", CfnValue::from("2012-10-17")),
            ]),
        )
}
