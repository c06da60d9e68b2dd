//! Network building blocks: VPC, subnets, gateways, routing, security groups.

use cumulo_common::types::{CidrBlock, LogicalId};
use cumulo_synth::{CfnResource, CfnValue};

/// Builds a `Tags` property value carrying a single `Name` tag.
#[must_use]
pub fn name_tag(name: impl Into<String>) -> CfnValue {
    CfnValue::array([CfnValue::object([
        ("Key", CfnValue::from("Name")),
        ("Value", CfnValue::String(name.into())),
    ])])
}

/// Declares a VPC with DNS support and hostnames enabled.
#[must_use]
pub fn vpc(id: LogicalId, cidr: CidrBlock) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::VPC")
        .with_property("CidrBlock", cidr.to_string())
        .with_property("EnableDnsHostnames", true)
        .with_property("EnableDnsSupport", true)
        .with_property("InstanceTenancy", "default")
}

/// Declares an internet gateway.
#[must_use]
pub fn internet_gateway(id: LogicalId) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::InternetGateway")
}

/// Attaches an internet gateway to a VPC.
#[must_use]
pub fn vpc_gateway_attachment(
    id: LogicalId,
    vpc: &LogicalId,
    gateway: &LogicalId,
) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::VPCGatewayAttachment")
        .with_property("VpcId", CfnValue::reference(vpc.clone()))
        .with_property("InternetGatewayId", CfnValue::reference(gateway.clone()))
}

/// Declares a route table within a VPC.
#[must_use]
pub fn route_table(id: LogicalId, vpc: &LogicalId) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::RouteTable")
        .with_property("VpcId", CfnValue::reference(vpc.clone()))
}

/// Declares a default route through an internet gateway.
///
/// The returned resource still needs an explicit dependency on the gateway
/// attachment so the route is never created against a detached gateway.
#[must_use]
pub fn internet_route(id: LogicalId, table: &LogicalId, gateway: &LogicalId) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::Route")
        .with_property("RouteTableId", CfnValue::reference(table.clone()))
        .with_property("DestinationCidrBlock", "0.0.0.0/0")
        .with_property("GatewayId", CfnValue::reference(gateway.clone()))
}

/// Declares a default route through a NAT gateway.
#[must_use]
pub fn nat_route(id: LogicalId, table: &LogicalId, nat: &LogicalId) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::Route")
        .with_property("RouteTableId", CfnValue::reference(table.clone()))
        .with_property("DestinationCidrBlock", "0.0.0.0/0")
        .with_property("NatGatewayId", CfnValue::reference(nat.clone()))
}

/// Associates a subnet with a route table.
#[must_use]
pub fn subnet_route_table_association(
    id: LogicalId,
    subnet: &LogicalId,
    table: &LogicalId,
) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::SubnetRouteTableAssociation")
        .with_property("SubnetId", CfnValue::reference(subnet.clone()))
        .with_property("RouteTableId", CfnValue::reference(table.clone()))
}

/// Declares an elastic IP scoped to VPC usage.
#[must_use]
pub fn elastic_ip(id: LogicalId) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::EIP").with_property("Domain", "vpc")
}

/// Declares a NAT gateway in a subnet, addressed by an elastic IP.
#[must_use]
pub fn nat_gateway(id: LogicalId, subnet: &LogicalId, eip: &LogicalId) -> CfnResource {
    CfnResource::new(id, "AWS::EC2::NatGateway")
        .with_property("SubnetId", CfnValue::reference(subnet.clone()))
        .with_property("AllocationId", CfnValue::get_att(eip.clone(), "AllocationId"))
}

/// Builder for a subnet declaration.
#[derive(Debug)]
pub struct SubnetBuilder {
    id: LogicalId,
    vpc: LogicalId,
    cidr: CidrBlock,
    availability_zone: String,
    map_public_ip: bool,
    name: Option<String>,
}

impl SubnetBuilder {
    /// Creates a subnet builder for the given VPC, address range, and zone.
    #[must_use]
    pub fn new(
        id: LogicalId,
        vpc: &LogicalId,
        cidr: CidrBlock,
        availability_zone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            vpc: vpc.clone(),
            cidr,
            availability_zone: availability_zone.into(),
            map_public_ip: false,
            name: None,
        }
    }

    /// Sets whether instances launched here receive public addresses.
    #[must_use]
    pub const fn map_public_ip(mut self, enabled: bool) -> Self {
        self.map_public_ip = enabled;
        self
    }

    /// Sets the `Name` tag.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the subnet declaration.
    #[must_use]
    pub fn build(self) -> CfnResource {
        let mut resource = CfnResource::new(self.id, "AWS::EC2::Subnet")
            .with_property("VpcId", CfnValue::reference(self.vpc))
            .with_property("CidrBlock", self.cidr.to_string())
            .with_property("AvailabilityZone", self.availability_zone)
            .with_property("MapPublicIpOnLaunch", self.map_public_ip);
        if let Some(name) = self.name {
            resource = resource.with_property("Tags", name_tag(name));
        }
        resource
    }
}

/// Builder for a security group declaration.
///
/// Egress is always the provider default of allowing all outbound traffic;
/// only ingress is accumulated rule by rule.
#[derive(Debug)]
pub struct SecurityGroupBuilder {
    id: LogicalId,
    vpc: LogicalId,
    description: String,
    ingress: Vec<CfnValue>,
}

impl SecurityGroupBuilder {
    /// Creates a security group builder with the given group description.
    #[must_use]
    pub fn new(id: LogicalId, vpc: &LogicalId, description: impl Into<String>) -> Self {
        Self {
            id,
            vpc: vpc.clone(),
            description: description.into(),
            ingress: Vec::new(),
        }
    }

    /// Allows inbound TCP on `port` from an address range.
    #[must_use]
    pub fn ingress_cidr(
        mut self,
        port: u16,
        cidr: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.ingress.push(CfnValue::object([
            ("CidrIp", CfnValue::String(cidr.into())),
            ("Description", CfnValue::String(description.into())),
            ("FromPort", CfnValue::from(port)),
            ("IpProtocol", CfnValue::from("tcp")),
            ("ToPort", CfnValue::from(port)),
        ]));
        self
    }

    /// Allows inbound TCP on `port` from members of another security group.
    #[must_use]
    pub fn ingress_security_group(
        mut self,
        port: u16,
        source: &LogicalId,
        description: impl Into<String>,
    ) -> Self {
        self.ingress.push(CfnValue::object([
            ("Description", CfnValue::String(description.into())),
            ("FromPort", CfnValue::from(port)),
            ("IpProtocol", CfnValue::from("tcp")),
            (
                "SourceSecurityGroupId",
                CfnValue::get_att(source.clone(), "GroupId"),
            ),
            ("ToPort", CfnValue::from(port)),
        ]));
        self
    }

    /// Builds the security group declaration.
    #[must_use]
    pub fn build(self) -> CfnResource {
        let egress = CfnValue::array([CfnValue::object([
            ("CidrIp", CfnValue::from("0.0.0.0/0")),
            (
                "Description",
                CfnValue::from("Allow all outbound traffic by default"),
            ),
            ("IpProtocol", CfnValue::from("-1")),
        ])]);
        let mut resource = CfnResource::new(self.id, "AWS::EC2::SecurityGroup")
            .with_property("GroupDescription", self.description)
            .with_property("SecurityGroupEgress", egress)
            .with_property("VpcId", CfnValue::reference(self.vpc));
        if !self.ingress.is_empty() {
            resource = resource.with_property("SecurityGroupIngress", CfnValue::Array(self.ingress));
        }
        resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> LogicalId {
        LogicalId::new(value).expect("should build logical ID")
    }

    fn cidr(value: &str) -> CidrBlock {
        value.parse().expect("should parse CIDR")
    }

    #[test]
    fn vpc_enables_dns() {
        let resource = vpc(id("Vpc"), cidr("192.168.0.0/16"));
        assert_eq!(resource.resource_type(), "AWS::EC2::VPC");
        assert_eq!(
            resource.property("CidrBlock"),
            Some(&CfnValue::from("192.168.0.0/16"))
        );
        assert_eq!(resource.property("EnableDnsSupport"), Some(&CfnValue::Bool(true)));
        assert_eq!(
            resource.property("EnableDnsHostnames"),
            Some(&CfnValue::Bool(true))
        );
    }

    #[test]
    fn subnet_carries_zone_and_visibility() {
        let resource = SubnetBuilder::new(
            id("PublicSubnet1"),
            &id("Vpc"),
            cidr("192.168.0.0/24"),
            "ap-northeast-1a",
        )
        .map_public_ip(true)
        .named("TestStack/Vpc/PublicSubnet1")
        .build();
        let json = serde_json::to_value(&resource).expect("should serialize");
        assert_eq!(
            json.pointer("/Properties/AvailabilityZone"),
            Some(&serde_json::json!("ap-northeast-1a"))
        );
        assert_eq!(
            json.pointer("/Properties/MapPublicIpOnLaunch"),
            Some(&serde_json::json!(true))
        );
        assert_eq!(
            json.pointer("/Properties/Tags/0/Value"),
            Some(&serde_json::json!("TestStack/Vpc/PublicSubnet1"))
        );
    }

    #[test]
    fn nat_gateway_uses_eip_allocation() {
        let resource = nat_gateway(id("Nat"), &id("PublicSubnet1"), &id("Eip"));
        assert_eq!(
            resource.property("AllocationId"),
            Some(&CfnValue::get_att(id("Eip"), "AllocationId"))
        );
        let referenced: Vec<&str> = resource
            .referenced_ids()
            .iter()
            .map(|logical_id| logical_id.as_str())
            .collect();
        assert_eq!(referenced, vec!["Eip", "PublicSubnet1"]);
    }

    #[test]
    fn routes_target_the_right_gateway_kind() {
        let igw = internet_route(id("PublicRoute"), &id("Rt"), &id("Igw"));
        assert!(igw.property("GatewayId").is_some());
        assert!(igw.property("NatGatewayId").is_none());

        let nat = nat_route(id("PrivateRoute"), &id("Rt"), &id("Nat"));
        assert!(nat.property("NatGatewayId").is_some());
        assert!(nat.property("GatewayId").is_none());
    }

    #[test]
    fn security_group_collects_ingress_in_order() {
        let resource = SecurityGroupBuilder::new(id("AlbSg"), &id("Vpc"), "TestStack/Alb/SecurityGroup")
            .ingress_cidr(80, "0.0.0.0/0", "Allow HTTP from anywhere")
            .ingress_cidr(443, "0.0.0.0/0", "Allow HTTPS from anywhere")
            .build();
        let json = serde_json::to_value(&resource).expect("should serialize");
        assert_eq!(
            json.pointer("/Properties/GroupDescription"),
            Some(&serde_json::json!("TestStack/Alb/SecurityGroup"))
        );
        assert_eq!(
            json.pointer("/Properties/SecurityGroupIngress/0/FromPort"),
            Some(&serde_json::json!(80))
        );
        assert_eq!(
            json.pointer("/Properties/SecurityGroupIngress/1/ToPort"),
            Some(&serde_json::json!(443))
        );
        assert_eq!(
            json.pointer("/Properties/SecurityGroupEgress/0/IpProtocol"),
            Some(&serde_json::json!("-1"))
        );
    }

    #[test]
    fn security_group_peer_rule_references_source_group() {
        let resource = SecurityGroupBuilder::new(id("EcsSg"), &id("Vpc"), "TestStack/EcsSecurityGroup")
            .ingress_security_group(8080, &id("AlbSg"), "Allow app traffic from the load balancer")
            .build();
        let json = serde_json::to_value(&resource).expect("should serialize");
        assert_eq!(
            json.pointer("/Properties/SecurityGroupIngress/0/SourceSecurityGroupId"),
            Some(&serde_json::json!({"Fn::GetAtt": ["AlbSg", "GroupId"]}))
        );
        assert_eq!(
            json.pointer("/Properties/SecurityGroupIngress/0/FromPort"),
            Some(&serde_json::json!(8080))
        );
    }

    #[test]
    fn omits_ingress_when_no_rules_declared() {
        let resource = SecurityGroupBuilder::new(id("Sg"), &id("Vpc"), "empty group").build();
        assert!(resource.property("SecurityGroupIngress").is_none());
        assert!(resource.property("SecurityGroupEgress").is_some());
    }
}
