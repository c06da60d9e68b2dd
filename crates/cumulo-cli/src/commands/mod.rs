//! CLI command definitions and dispatch.

pub mod plan;
pub mod synth;

use clap::{Args, Parser, Subcommand};

use cumulo_common::config::{self, AppConfig, PublishMode};
use cumulo_common::constants;
use cumulo_common::error::Result;

/// Cumulo — declare and synthesize the web application stack.
#[derive(Parser, Debug)]
#[command(name = "cumulo", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Deployment configuration, shared by every subcommand.
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize the provisioning template.
    Synth(synth::SynthArgs),
    /// Print the resources in provisioning order without writing anything.
    Plan,
}

/// Deployment configuration, readable from flags or the environment.
///
/// Every value has a working default, so a bare `cumulo synth` produces
/// the example stack. Flags take precedence over environment variables.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Twelve-digit account the stack deploys into.
    #[arg(long, env = "APP_AWS_ACCOUNT", default_value = constants::DEFAULT_ACCOUNT)]
    pub account: String,

    /// Region the stack deploys into.
    #[arg(long, env = "APP_AWS_REGION", default_value = constants::DEFAULT_REGION)]
    pub region: String,

    /// Name of the stack itself.
    #[arg(long, env = "APP_STACK_NAME", default_value = constants::DEFAULT_STACK_NAME)]
    pub stack_name: String,

    /// Short application name, namespacing published parameters.
    #[arg(long, default_value = constants::DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Name of the pre-existing hosted zone.
    #[arg(long, env = "APP_HOSTED_ZONE_NAME", default_value = constants::DEFAULT_HOSTED_ZONE_NAME)]
    pub hosted_zone_name: String,

    /// Identifier of the pre-existing hosted zone.
    #[arg(long, env = "APP_HOSTED_ZONE_ID", default_value = constants::DEFAULT_HOSTED_ZONE_ID)]
    pub hosted_zone_id: String,

    /// Public name the application is served under.
    #[arg(long, env = "APP_DOMAIN_NAME", default_value = constants::DEFAULT_DOMAIN_NAME)]
    pub domain_name: String,

    /// Bucket that receives load balancer access logs.
    #[arg(long, env = "APP_LOG_BUCKET_NAME", default_value = constants::DEFAULT_LOG_BUCKET_NAME)]
    pub log_bucket_name: String,

    /// Image repositories as comma-separated `Id=name` pairs.
    #[arg(long, env = "APP_ECR_REPOSITORIES")]
    pub repositories: Option<String>,

    /// Name of the container service cluster.
    #[arg(long, env = "APP_ECS_CLUSTER_NAME", default_value = constants::DEFAULT_CLUSTER_NAME)]
    pub cluster_name: String,

    /// Name of the application service, used in log group paths.
    #[arg(long, env = "APP_ECS_SERVICE_NAME", default_value = constants::DEFAULT_SERVICE_NAME)]
    pub service_name: String,

    /// Address range of the network.
    #[arg(long, env = "APP_VPC_CIDR", default_value = constants::DEFAULT_VPC_CIDR)]
    pub vpc_cidr: String,

    /// Publish identifiers as parameter-store entries instead of outputs.
    #[arg(long, env = "APP_PUBLISH_SSM")]
    pub publish_ssm: bool,
}

impl ConfigArgs {
    /// Converts the raw arguments into a deployment configuration.
    ///
    /// An unset repository list falls back to the default repositories; an
    /// explicitly empty one means no repositories at all.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository list does not parse.
    pub fn into_config(self) -> Result<AppConfig> {
        let repositories = match self.repositories.as_deref() {
            Some(list) => config::parse_repositories(list)?,
            None => config::default_repositories(),
        };
        let publish = if self.publish_ssm {
            PublishMode::SsmParameters
        } else {
            PublishMode::Outputs
        };
        Ok(AppConfig {
            account: self.account,
            region: self.region,
            stack_name: self.stack_name,
            app_name: self.app_name,
            hosted_zone_name: self.hosted_zone_name,
            hosted_zone_id: self.hosted_zone_id,
            domain_name: self.domain_name,
            log_bucket_name: self.log_bucket_name,
            repositories,
            cluster_name: self.cluster_name,
            service_name: self.service_name,
            vpc_cidr: self.vpc_cidr,
            publish,
        })
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if configuration conversion or command execution
/// fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.into_config()?;
    match cli.command {
        Command::Synth(args) => synth::execute(args, config),
        Command::Plan => plan::execute(config),
    }
}
