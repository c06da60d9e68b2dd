//! Stack composer: wires network, edge, registry, and compute together.

use tracing::info;

use cumulo_aws::{ec2, ecr, ecs, iam, logs, s3, ssm};
use cumulo_common::config::{AppConfig, PublishMode};
use cumulo_common::constants::{
    APP_PORT, AVAILABILITY_ZONE_COUNT, LOG_BUCKET_EXPIRATION_DAYS, LOG_RETENTION_DAYS,
    MAX_IMAGE_COUNT,
};
use cumulo_common::error::{CumuloError, Result};
use cumulo_common::types::{CidrBlock, DomainName, LogicalId};
use cumulo_synth::{CfnValue, Output, Stack, Template};

use crate::edge::{Edge, EdgeProps};
use crate::network::Network;

/// Managed policy granted to the task execution role.
const TASK_ROLE_POLICY: &str = "PowerUserAccess";

/// Principal allowed to assume the task execution role.
const TASK_SERVICE_PRINCIPAL: &str = "ecs-tasks.amazonaws.com";

/// Log groups provisioned per service, as (construct ID, stream) pairs.
const LOG_STREAMS: [(&str, &str); 3] = [
    ("EcsNginxLogGroup", "nginx"),
    ("EcsAppServerLogGroup", "app-server"),
    ("EcsAppBatchLogGroup", "app-batch"),
];

/// Inputs parsed out of the raw configuration during validation.
struct Inputs {
    domain: DomainName,
    cidr: CidrBlock,
}

/// Composes the complete web application stack from one configuration.
///
/// The composer owns the declaration order: storage for access logs first,
/// then the network, the public edge, the image registries, and finally
/// the compute plumbing. Identifiers downstream deployments need are
/// published last, either as template outputs or as parameter-store
/// entries depending on [`PublishMode`].
#[derive(Debug, Clone)]
pub struct StackComposer {
    config: AppConfig,
}

impl StackComposer {
    /// Creates a composer over the given configuration.
    #[must_use]
    pub const fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this composer works from.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Checks the raw configuration and parses its typed inputs.
    fn validate(config: &AppConfig) -> Result<Inputs> {
        if config.account.len() != 12 || !config.account.chars().all(|c| c.is_ascii_digit()) {
            return Err(CumuloError::Config {
                message: format!("account must be a 12-digit account ID: {:?}", config.account),
            });
        }
        for (field, value) in [
            ("region", &config.region),
            ("stack name", &config.stack_name),
            ("application name", &config.app_name),
            ("hosted zone ID", &config.hosted_zone_id),
            ("cluster name", &config.cluster_name),
            ("service name", &config.service_name),
        ] {
            if value.trim().is_empty() {
                return Err(CumuloError::Config {
                    message: format!("{field} must not be empty"),
                });
            }
        }
        let zone = DomainName::new(&config.hosted_zone_name)?;
        let domain = DomainName::new(&config.domain_name)?;
        if !domain.is_within(&zone) {
            return Err(CumuloError::Config {
                message: format!("domain {domain} is not inside hosted zone {zone}"),
            });
        }
        if !is_valid_bucket_name(&config.log_bucket_name) {
            return Err(CumuloError::Config {
                message: format!(
                    "bucket name must be 3-63 lowercase characters: {:?}",
                    config.log_bucket_name
                ),
            });
        }
        for spec in &config.repositories {
            spec.validate()?;
        }
        let cidr: CidrBlock = config.vpc_cidr.parse()?;
        Ok(Inputs { domain, cidr })
    }

    /// Declares every resource of the stack and returns the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the network
    /// plan does not produce one private subnet per availability zone.
    pub fn compose(&self) -> Result<Stack> {
        let config = &self.config;
        let inputs = Self::validate(config)?;
        info!(stack = %config.stack_name, domain = %inputs.domain, "composing stack");

        let mut stack = Stack::new(&config.stack_name, &config.account, &config.region);

        let bucket = LogicalId::from_path(&["LogBucket"])?;
        stack.add_resource(
            s3::BucketBuilder::new(bucket.clone(), &config.log_bucket_name)
                .expire_after_days(LOG_BUCKET_EXPIRATION_DAYS)
                .retained()
                .build(),
        )?;
        let bucket_policy = LogicalId::from_path(&["LogBucket", "Policy"])?;
        stack.add_resource(s3::access_log_delivery_policy(
            bucket_policy.clone(),
            &bucket,
            stack.account(),
        ))?;

        let network = Network::compose(&mut stack, inputs.cidr)?;
        // Downstream deployments address one private subnet per zone by
        // position, so the plan must have produced exactly that many.
        if network.private_subnets.len() != AVAILABILITY_ZONE_COUNT {
            return Err(CumuloError::Invariant {
                message: format!(
                    "expected exactly {AVAILABILITY_ZONE_COUNT} private subnets, found {}",
                    network.private_subnets.len()
                ),
            });
        }

        let edge = Edge::compose(
            &mut stack,
            &EdgeProps {
                domain: &inputs.domain,
                hosted_zone_id: &config.hosted_zone_id,
                log_bucket_name: &config.log_bucket_name,
                log_bucket_policy: &bucket_policy,
                network: &network,
            },
        )?;

        for spec in &config.repositories {
            stack.add_resource(ecr::repository(
                LogicalId::from_path(&[&format!("Ecr{}", spec.id)])?,
                &spec.name,
                MAX_IMAGE_COUNT,
            ))?;
        }

        stack.add_resource(ecs::cluster(
            LogicalId::from_path(&["EcsCluster"])?,
            &config.cluster_name,
        ))?;

        let role = LogicalId::from_path(&["EcsTaskExecutionRole"])?;
        stack.add_resource(iam::service_role(
            role.clone(),
            TASK_SERVICE_PRINCIPAL,
            &[TASK_ROLE_POLICY],
        ))?;

        for (id, stream) in LOG_STREAMS {
            stack.add_resource(logs::log_group(
                LogicalId::from_path(&[id])?,
                &format!("/ecs/{}/{stream}", config.service_name),
                LOG_RETENTION_DAYS,
            ))?;
        }

        let compute_group = LogicalId::from_path(&["EcsSecurityGroup"])?;
        stack.add_resource(
            ec2::SecurityGroupBuilder::new(
                compute_group.clone(),
                &network.vpc,
                format!("{}/EcsSecurityGroup", config.stack_name),
            )
            .ingress_security_group(
                APP_PORT,
                &edge.security_group,
                "Allow app traffic from the load balancer",
            )
            .build(),
        )?;

        Self::publish(&mut stack, config, &network, &edge, &compute_group, &role)?;

        Ok(stack)
    }

    /// Composes the stack and synthesizes its template.
    ///
    /// # Errors
    ///
    /// Returns an error if composition or synthesis fails.
    pub fn synthesize(&self) -> Result<Template> {
        self.compose()?.into_template()
    }

    /// Publishes the identifiers downstream deployments consume.
    fn publish(
        stack: &mut Stack,
        config: &AppConfig,
        network: &Network,
        edge: &Edge,
        compute_group: &LogicalId,
        role: &LogicalId,
    ) -> Result<()> {
        let published: [(&str, &str, CfnValue); 5] = [
            (
                "PrivateSubnetAz1",
                "private-subnet-az1",
                CfnValue::reference(network.private_subnets[0].clone()),
            ),
            (
                "PrivateSubnetAz2",
                "private-subnet-az2",
                CfnValue::reference(network.private_subnets[1].clone()),
            ),
            (
                "EcsSecurityGroupId",
                "ecs-security-group-id",
                CfnValue::get_att(compute_group.clone(), "GroupId"),
            ),
            (
                "AlbTargetGroupArn",
                "alb-target-group-arn",
                CfnValue::reference(edge.target_group.clone()),
            ),
            (
                "EcsTaskExecutionRoleArn",
                "task-execution-role-arn",
                CfnValue::get_att(role.clone(), "Arn"),
            ),
        ];
        match config.publish {
            PublishMode::Outputs => {
                for (name, _, value) in published {
                    stack.add_output(LogicalId::new(name)?, Output::new(value))?;
                }
            }
            PublishMode::SsmParameters => {
                for (name, parameter, value) in published {
                    stack.add_resource(ssm::string_parameter(
                        LogicalId::from_path(&["Ssm", name])?,
                        &format!("/{}/{parameter}", config.app_name),
                        value,
                    ))?;
                }
            }
        }
        Ok(())
    }
}

/// Checks a bucket name against the storage naming rules: 3 to 63
/// characters of lowercase alphanumerics, `.`, and `-`, starting and
/// ending with an alphanumeric.
fn is_valid_bucket_name(name: &str) -> bool {
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    name.len() >= 3
        && name.len() <= 63
        && name.chars().all(|c| alnum(c) || matches!(c, '.' | '-'))
        && name.starts_with(alnum)
        && name.ends_with(alnum)
}
