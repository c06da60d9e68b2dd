//! Network construct: VPC, subnet plan, routing, and NAT egress.

use tracing::debug;

use cumulo_aws::ec2;
use cumulo_common::constants::{AVAILABILITY_ZONE_COUNT, SUBNET_PREFIX};
use cumulo_common::error::Result;
use cumulo_common::types::{CidrBlock, LogicalId};
use cumulo_synth::Stack;

/// Zone letters appended to the region, one per spanned availability zone.
const ZONE_SUFFIXES: [char; AVAILABILITY_ZONE_COUNT] = ['a', 'b'];

/// Identifiers of the network resources later constructs attach to.
#[derive(Debug, Clone)]
pub struct Network {
    /// The VPC everything else lives in.
    pub vpc: LogicalId,
    /// Public subnets, one per availability zone, in zone order.
    pub public_subnets: Vec<LogicalId>,
    /// Private subnets with NAT egress, one per availability zone, in zone order.
    pub private_subnets: Vec<LogicalId>,
}

impl Network {
    /// Declares the VPC, its subnets, and their routing into `stack`.
    ///
    /// The address range is carved into consecutive subnets of equal size,
    /// public ones first, one public and one private per availability zone.
    /// Public subnets share an internet gateway; private subnets route
    /// through a single NAT gateway placed in the first public subnet.
    ///
    /// # Errors
    ///
    /// Returns an error if the address range is too small for the subnet
    /// plan or a derived logical ID is invalid.
    pub fn compose(stack: &mut Stack, cidr: CidrBlock) -> Result<Self> {
        let scope = stack.name().to_string();
        let region = stack.region().to_string();
        debug!(%cidr, zones = AVAILABILITY_ZONE_COUNT, "declaring network resources");

        let blocks = cidr.subnets(SUBNET_PREFIX, 2 * AVAILABILITY_ZONE_COUNT)?;
        let vpc = LogicalId::from_path(&["Vpc"])?;
        stack.add_resource(
            ec2::vpc(vpc.clone(), cidr).with_property("Tags", ec2::name_tag(format!("{scope}/Vpc"))),
        )?;

        let gateway = LogicalId::from_path(&["Vpc", "IGW"])?;
        stack.add_resource(ec2::internet_gateway(gateway.clone()))?;
        let attachment = LogicalId::from_path(&["Vpc", "VPCGW"])?;
        stack.add_resource(ec2::vpc_gateway_attachment(attachment.clone(), &vpc, &gateway))?;

        let mut public_subnets = Vec::with_capacity(AVAILABILITY_ZONE_COUNT);
        for (index, suffix) in ZONE_SUFFIXES.iter().enumerate() {
            let name = format!("PublicSubnet{}", index + 1);
            let subnet = LogicalId::from_path(&["Vpc", &name])?;
            stack.add_resource(
                ec2::SubnetBuilder::new(
                    subnet.clone(),
                    &vpc,
                    blocks[index],
                    format!("{region}{suffix}"),
                )
                .map_public_ip(true)
                .named(format!("{scope}/Vpc/{name}"))
                .build(),
            )?;

            let table = LogicalId::from_path(&["Vpc", &name, "RouteTable"])?;
            stack.add_resource(ec2::route_table(table.clone(), &vpc))?;
            stack.add_resource(ec2::subnet_route_table_association(
                LogicalId::from_path(&["Vpc", &name, "RouteTableAssociation"])?,
                &subnet,
                &table,
            ))?;
            // The route must not outrun the gateway attachment.
            stack.add_resource(
                ec2::internet_route(
                    LogicalId::from_path(&["Vpc", &name, "DefaultRoute"])?,
                    &table,
                    &gateway,
                )
                .with_depends_on(attachment.clone()),
            )?;
            public_subnets.push(subnet);
        }

        let eip = LogicalId::from_path(&["Vpc", "PublicSubnet1", "EIP"])?;
        stack.add_resource(ec2::elastic_ip(eip.clone()))?;
        let nat = LogicalId::from_path(&["Vpc", "PublicSubnet1", "NATGateway"])?;
        stack.add_resource(ec2::nat_gateway(nat.clone(), &public_subnets[0], &eip))?;

        let mut private_subnets = Vec::with_capacity(AVAILABILITY_ZONE_COUNT);
        for (index, suffix) in ZONE_SUFFIXES.iter().enumerate() {
            let name = format!("PrivateSubnet{}", index + 1);
            let subnet = LogicalId::from_path(&["Vpc", &name])?;
            stack.add_resource(
                ec2::SubnetBuilder::new(
                    subnet.clone(),
                    &vpc,
                    blocks[AVAILABILITY_ZONE_COUNT + index],
                    format!("{region}{suffix}"),
                )
                .named(format!("{scope}/Vpc/{name}"))
                .build(),
            )?;

            let table = LogicalId::from_path(&["Vpc", &name, "RouteTable"])?;
            stack.add_resource(ec2::route_table(table.clone(), &vpc))?;
            stack.add_resource(ec2::subnet_route_table_association(
                LogicalId::from_path(&["Vpc", &name, "RouteTableAssociation"])?,
                &subnet,
                &table,
            ))?;
            stack.add_resource(ec2::nat_route(
                LogicalId::from_path(&["Vpc", &name, "DefaultRoute"])?,
                &table,
                &nat,
            ))?;
            private_subnets.push(subnet);
        }

        Ok(Self {
            vpc,
            public_subnets,
            private_subnets,
        })
    }
}
