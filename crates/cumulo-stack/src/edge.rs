//! Edge construct: certificate, load balancer, listeners, and DNS aliases.

use tracing::debug;

use cumulo_aws::{acm, ec2, elbv2, route53};
use cumulo_common::constants::{HTTP_PORT, HTTPS_PORT, STICKINESS_DURATION_SECONDS};
use cumulo_common::error::Result;
use cumulo_common::types::{DomainName, LogicalId};
use cumulo_synth::Stack;

use crate::network::Network;

/// Inputs the edge construct needs from its surroundings.
#[derive(Debug)]
pub struct EdgeProps<'a> {
    /// Public name the application answers on.
    pub domain: &'a DomainName,
    /// Hosted zone the certificate validates through and records land in.
    pub hosted_zone_id: &'a str,
    /// Bucket receiving load balancer access logs.
    pub log_bucket_name: &'a str,
    /// Bucket policy granting log delivery; the balancer waits for it.
    pub log_bucket_policy: &'a LogicalId,
    /// Network to place the balancer in.
    pub network: &'a Network,
}

/// Identifiers of the edge resources other constructs attach to.
#[derive(Debug, Clone)]
pub struct Edge {
    /// DNS-validated server certificate.
    pub certificate: LogicalId,
    /// Security group guarding the load balancer.
    pub security_group: LogicalId,
    /// The internet-facing load balancer.
    pub load_balancer: LogicalId,
    /// Target group the listeners forward to.
    pub target_group: LogicalId,
}

impl Edge {
    /// Declares the public entry point into `stack`.
    ///
    /// Traffic terminates TLS at the balancer using a DNS-validated
    /// certificate, plain HTTP is permanently redirected to HTTPS, and
    /// both listeners otherwise forward to one sticky target group. The
    /// domain gets an A and an AAAA alias onto the balancer.
    ///
    /// # Errors
    ///
    /// Returns an error if a derived logical ID is invalid or a logical ID
    /// collides with one already in the stack.
    pub fn compose(stack: &mut Stack, props: &EdgeProps<'_>) -> Result<Self> {
        let scope = stack.name().to_string();
        debug!(domain = %props.domain, "declaring edge resources");

        let certificate = LogicalId::from_path(&["Alb", "Certificate"])?;
        stack.add_resource(acm::dns_validated_certificate(
            certificate.clone(),
            props.domain,
            props.hosted_zone_id,
        ))?;

        let security_group = LogicalId::from_path(&["Alb", "SecurityGroup"])?;
        stack.add_resource(
            ec2::SecurityGroupBuilder::new(
                security_group.clone(),
                &props.network.vpc,
                format!("{scope}/Alb/SecurityGroup"),
            )
            .ingress_cidr(HTTP_PORT, "0.0.0.0/0", "Allow HTTP from anywhere")
            .ingress_cidr(HTTPS_PORT, "0.0.0.0/0", "Allow HTTPS from anywhere")
            .build(),
        )?;

        let load_balancer = LogicalId::from_path(&["Alb", "Alb"])?;
        let mut balancer = elbv2::LoadBalancerBuilder::new(load_balancer.clone())
            .security_group(&security_group)
            .access_logs_to(props.log_bucket_name);
        for subnet in &props.network.public_subnets {
            balancer = balancer.subnet(subnet);
        }
        // Log delivery must be granted before the balancer starts writing.
        stack.add_resource(
            balancer
                .build()
                .with_depends_on(props.log_bucket_policy.clone()),
        )?;

        let target_group = LogicalId::from_path(&["Alb", "TargetGroup"])?;
        stack.add_resource(
            elbv2::TargetGroupBuilder::new(target_group.clone(), &props.network.vpc)
                .stickiness(STICKINESS_DURATION_SECONDS)
                .build(),
        )?;

        stack.add_resource(
            elbv2::ListenerBuilder::new(
                LogicalId::from_path(&["Alb", "Alb", "HttpsListener"])?,
                &load_balancer,
                elbv2::Protocol::Https,
            )
            .certificate(&certificate)
            .forward_to(&target_group)
            .build(),
        )?;

        let http_listener = LogicalId::from_path(&["Alb", "Alb", "HttpListener"])?;
        stack.add_resource(
            elbv2::ListenerBuilder::new(
                http_listener.clone(),
                &load_balancer,
                elbv2::Protocol::Http,
            )
            .forward_to(&target_group)
            .build(),
        )?;
        stack.add_resource(elbv2::https_redirect_rule(
            LogicalId::from_path(&["Alb", "HttpListenerRule"])?,
            &http_listener,
            1,
            &["*"],
        ))?;

        stack.add_resource(route53::load_balancer_alias(
            LogicalId::from_path(&["Alb", "ARecord"])?,
            route53::RecordType::A,
            props.domain,
            props.hosted_zone_id,
            &load_balancer,
        ))?;
        stack.add_resource(route53::load_balancer_alias(
            LogicalId::from_path(&["Alb", "AaaaRecord"])?,
            route53::RecordType::Aaaa,
            props.domain,
            props.hosted_zone_id,
            &load_balancer,
        ))?;

        Ok(Self {
            certificate,
            security_group,
            load_balancer,
            target_group,
        })
    }
}
