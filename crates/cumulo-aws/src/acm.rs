//! Server certificates validated over DNS.

use cumulo_common::types::{DomainName, LogicalId};
use cumulo_synth::{CfnResource, CfnValue};

/// Declares a certificate for `domain`, validated by records written into
/// the given hosted zone.
#[must_use]
pub fn dns_validated_certificate(
    id: LogicalId,
    domain: &DomainName,
    hosted_zone_id: &str,
) -> CfnResource {
    CfnResource::new(id, "AWS::CertificateManager::Certificate")
        .with_property("DomainName", domain.as_str())
        .with_property(
            "DomainValidationOptions",
            CfnValue::array([CfnValue::object([
                ("DomainName", CfnValue::from(domain.as_str())),
                ("HostedZoneId", CfnValue::from(hosted_zone_id)),
            ])]),
        )
        .with_property("ValidationMethod", "DNS")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_binds_domain_to_zone() {
        let domain = DomainName::new("app.example.org").expect("should build domain");
        let resource = dns_validated_certificate(
            LogicalId::new("Certificate").expect("should build logical ID"),
            &domain,
            "Z1EXAMPLE",
        );
        let json = serde_json::to_value(&resource).expect("should serialize");
        assert_eq!(
            json.pointer("/Properties/DomainName"),
            Some(&serde_json::json!("app.example.org"))
        );
        assert_eq!(
            json.pointer("/Properties/DomainValidationOptions"),
            Some(&serde_json::json!([
                {"DomainName": "app.example.org", "HostedZoneId": "Z1EXAMPLE"}
            ]))
        );
        assert_eq!(
            json.pointer("/Properties/ValidationMethod"),
            Some(&serde_json::json!("DNS"))
        );
    }
}
