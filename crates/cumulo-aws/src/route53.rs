//! DNS records pointing at stack resources.

use std::fmt;

use cumulo_common::types::{DomainName, LogicalId};
use cumulo_synth::{CfnResource, CfnValue};

/// Address family of an alias record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// IPv4 alias.
    A,
    /// IPv6 alias.
    Aaaa,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Aaaa => write!(f, "AAAA"),
        }
    }
}

/// Declares an alias record for `domain` pointing at a load balancer.
///
/// The record name is the absolute domain name (with trailing dot). The
/// alias targets the balancer's dualstack name so both address families
/// resolve, and the balancer's own canonical zone.
#[must_use]
pub fn load_balancer_alias(
    id: LogicalId,
    record_type: RecordType,
    domain: &DomainName,
    hosted_zone_id: &str,
    load_balancer: &LogicalId,
) -> CfnResource {
    let dns_name = CfnValue::join(
        "",
        [
            CfnValue::from("dualstack."),
            CfnValue::get_att(load_balancer.clone(), "DNSName"),
        ],
    );
    CfnResource::new(id, "AWS::Route53::RecordSet")
        .with_property("Name", domain.fqdn())
        .with_property("Type", record_type.to_string())
        .with_property("HostedZoneId", hosted_zone_id)
        .with_property(
            "AliasTarget",
            CfnValue::object([
                ("DNSName", dns_name),
                (
                    "HostedZoneId",
                    CfnValue::get_att(load_balancer.clone(), "CanonicalHostedZoneID"),
                ),
            ]),
        )
}
