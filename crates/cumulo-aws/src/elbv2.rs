//! Load balancing: balancer, target group, listeners, and listener rules.

use std::fmt;

use cumulo_common::types::LogicalId;
use cumulo_synth::{CfnResource, CfnValue};

/// Application-layer protocol spoken by a listener or target group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Protocol {
    /// Returns the default port for the protocol.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "HTTP"),
            Self::Https => write!(f, "HTTPS"),
        }
    }
}

/// Builder for an internet-facing application load balancer.
#[derive(Debug)]
pub struct LoadBalancerBuilder {
    id: LogicalId,
    security_groups: Vec<CfnValue>,
    subnets: Vec<CfnValue>,
    attributes: Vec<(String, String)>,
}

impl LoadBalancerBuilder {
    /// Creates a load balancer builder with deletion protection disabled.
    #[must_use]
    pub fn new(id: LogicalId) -> Self {
        Self {
            id,
            security_groups: Vec::new(),
            subnets: Vec::new(),
            attributes: vec![("deletion_protection.enabled".to_string(), "false".to_string())],
        }
    }

    /// Attaches a security group.
    #[must_use]
    pub fn security_group(mut self, group: &LogicalId) -> Self {
        self.security_groups
            .push(CfnValue::get_att(group.clone(), "GroupId"));
        self
    }

    /// Places the balancer in a subnet. Call once per zone.
    #[must_use]
    pub fn subnet(mut self, subnet: &LogicalId) -> Self {
        self.subnets.push(CfnValue::reference(subnet.clone()));
        self
    }

    /// Sets a raw balancer attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Enables access logging into the named bucket.
    #[must_use]
    pub fn access_logs_to(self, bucket_name: &str) -> Self {
        self.attribute("access_logs.s3.enabled", "true")
            .attribute("access_logs.s3.bucket", bucket_name)
    }

    /// Builds the load balancer declaration.
    #[must_use]
    pub fn build(self) -> CfnResource {
        let attributes = CfnValue::array(self.attributes.into_iter().map(|(key, value)| {
            CfnValue::object([
                ("Key", CfnValue::String(key)),
                ("Value", CfnValue::String(value)),
            ])
        }));
        CfnResource::new(self.id, "AWS::ElasticLoadBalancingV2::LoadBalancer")
            .with_property("LoadBalancerAttributes", attributes)
            .with_property("Scheme", "internet-facing")
            .with_property("SecurityGroups", CfnValue::Array(self.security_groups))
            .with_property("Subnets", CfnValue::Array(self.subnets))
            .with_property("Type", "application")
    }
}

/// Builder for a target group routing to addressable container tasks.
#[derive(Debug)]
pub struct TargetGroupBuilder {
    id: LogicalId,
    vpc: LogicalId,
    port: u16,
    protocol: Protocol,
    attributes: Vec<(String, String)>,
}

impl TargetGroupBuilder {
    /// Creates a target group builder serving plain HTTP on port 80.
    #[must_use]
    pub fn new(id: LogicalId, vpc: &LogicalId) -> Self {
        Self {
            id,
            vpc: vpc.clone(),
            port: Protocol::Http.default_port(),
            protocol: Protocol::Http,
            attributes: Vec::new(),
        }
    }

    /// Sets the port targets receive traffic on.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the protocol targets are spoken to with.
    #[must_use]
    pub const fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Enables cookie-based session stickiness with the given lifetime.
    #[must_use]
    pub fn stickiness(mut self, duration_seconds: u32) -> Self {
        self.attributes
            .push(("stickiness.enabled".to_string(), "true".to_string()));
        self.attributes.push((
            "stickiness.lb_cookie.duration_seconds".to_string(),
            duration_seconds.to_string(),
        ));
        self.attributes
            .push(("stickiness.type".to_string(), "lb_cookie".to_string()));
        self
    }

    /// Builds the target group declaration.
    #[must_use]
    pub fn build(self) -> CfnResource {
        let mut resource = CfnResource::new(self.id, "AWS::ElasticLoadBalancingV2::TargetGroup")
            .with_property("Port", self.port)
            .with_property("Protocol", self.protocol.to_string())
            .with_property("TargetType", "ip")
            .with_property("VpcId", CfnValue::reference(self.vpc));
        if !self.attributes.is_empty() {
            let attributes = CfnValue::array(self.attributes.into_iter().map(|(key, value)| {
                CfnValue::object([
                    ("Key", CfnValue::String(key)),
                    ("Value", CfnValue::String(value)),
                ])
            }));
            resource = resource.with_property("TargetGroupAttributes", attributes);
        }
        resource
    }
}

/// Builder for a listener on a load balancer.
#[derive(Debug)]
pub struct ListenerBuilder {
    id: LogicalId,
    load_balancer: LogicalId,
    protocol: Protocol,
    port: u16,
    certificate: Option<LogicalId>,
    default_target_group: Option<LogicalId>,
}

impl ListenerBuilder {
    /// Creates a listener builder on the protocol's default port.
    #[must_use]
    pub fn new(id: LogicalId, load_balancer: &LogicalId, protocol: Protocol) -> Self {
        Self {
            id,
            load_balancer: load_balancer.clone(),
            protocol,
            port: protocol.default_port(),
            certificate: None,
            default_target_group: None,
        }
    }

    /// Overrides the listening port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Attaches a server certificate. Required for HTTPS listeners.
    #[must_use]
    pub fn certificate(mut self, certificate: &LogicalId) -> Self {
        self.certificate = Some(certificate.clone());
        self
    }

    /// Forwards unmatched traffic to the given target group.
    #[must_use]
    pub fn forward_to(mut self, target_group: &LogicalId) -> Self {
        self.default_target_group = Some(target_group.clone());
        self
    }

    /// Builds the listener declaration.
    #[must_use]
    pub fn build(self) -> CfnResource {
        let mut resource = CfnResource::new(self.id, "AWS::ElasticLoadBalancingV2::Listener")
            .with_property(
                "LoadBalancerArn",
                CfnValue::reference(self.load_balancer),
            )
            .with_property("Port", self.port)
            .with_property("Protocol", self.protocol.to_string());
        if let Some(certificate) = self.certificate {
            resource = resource.with_property(
                "Certificates",
                CfnValue::array([CfnValue::object([(
                    "CertificateArn",
                    CfnValue::reference(certificate),
                )])]),
            );
        }
        if let Some(target_group) = self.default_target_group {
            resource = resource.with_property(
                "DefaultActions",
                CfnValue::array([CfnValue::object([
                    ("TargetGroupArn", CfnValue::reference(target_group)),
                    ("Type", CfnValue::from("forward")),
                ])]),
            );
        }
        resource
    }
}

/// Declares a listener rule that permanently redirects matched paths to
/// HTTPS on the standard port.
#[must_use]
pub fn https_redirect_rule(
    id: LogicalId,
    listener: &LogicalId,
    priority: i64,
    path_patterns: &[&str],
) -> CfnResource {
    let paths = CfnValue::array(path_patterns.iter().map(|pattern| CfnValue::from(*pattern)));
    CfnResource::new(id, "AWS::ElasticLoadBalancingV2::ListenerRule")
        .with_property(
            "Actions",
            CfnValue::array([CfnValue::object([
                (
                    "RedirectConfig",
                    CfnValue::object([
                        ("Port", CfnValue::from("443")),
                        ("Protocol", CfnValue::from("HTTPS")),
                        ("StatusCode", CfnValue::from("HTTP_301")),
                    ]),
                ),
                ("Type", CfnValue::from("redirect")),
            ])]),
        )
        .with_property(
            "Conditions",
            CfnValue::array([CfnValue::object([
                ("Field", CfnValue::from("path-pattern")),
                ("PathPatternConfig", CfnValue::object([("Values", paths)])),
            ])]),
        )
        .with_property("ListenerArn", CfnValue::reference(listener.clone()))
        .with_property("Priority", priority)
}
