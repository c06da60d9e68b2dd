//! Deployment configuration model for Cumulo stacks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{CumuloError, Result};

/// Where stack-level identifiers are published after synthesis.
///
/// Exactly one mechanism is active per synthesis. Identifiers either land
/// in template outputs or in parameter-store entries, never both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishMode {
    /// Publish identifiers as template outputs.
    #[default]
    Outputs,
    /// Publish identifiers as SSM parameters under `/<app>/`.
    SsmParameters,
}

impl fmt::Display for PublishMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outputs => write!(f, "outputs"),
            Self::SsmParameters => write!(f, "ssm"),
        }
    }
}

impl FromStr for PublishMode {
    type Err = CumuloError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "outputs" => Ok(Self::Outputs),
            "ssm" => Ok(Self::SsmParameters),
            other => Err(CumuloError::Config {
                message: format!("publish mode must be \"outputs\" or \"ssm\": {other:?}"),
            }),
        }
    }
}

/// A single container image repository to provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySpec {
    /// Construct identifier, unique among the repositories of one stack.
    pub id: String,
    /// Repository name, e.g. `webapp/nginx-prod`.
    pub name: String,
}

impl RepositorySpec {
    /// Checks the identifier and repository name against the naming rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty or not ASCII
    /// alphanumeric, or the repository name is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() || !self.id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CumuloError::Config {
                message: format!(
                    "repository identifier must be ASCII alphanumeric: {:?}",
                    self.id
                ),
            });
        }
        if !is_valid_repository_name(&self.name) {
            return Err(CumuloError::Config {
                message: format!("invalid repository name: {:?}", self.name),
            });
        }
        Ok(())
    }
}

/// Root configuration for one stack synthesis.
///
/// Every field has a working default so the CLI can synthesize an example
/// stack with no environment set. Values are plain strings here; the stack
/// composer parses them into validated domain types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Twelve-digit account the stack deploys into.
    pub account: String,
    /// Region the stack deploys into, e.g. `ap-northeast-1`.
    pub region: String,
    /// Name of the stack itself.
    pub stack_name: String,
    /// Short application name, used to namespace published parameters.
    pub app_name: String,
    /// Name of the pre-existing hosted zone, e.g. `example.org`.
    pub hosted_zone_name: String,
    /// Identifier of the pre-existing hosted zone.
    pub hosted_zone_id: String,
    /// Public name the application is served under, e.g. `app.example.org`.
    pub domain_name: String,
    /// Bucket that receives load balancer access logs.
    pub log_bucket_name: String,
    /// Container image repositories to provision.
    pub repositories: Vec<RepositorySpec>,
    /// Name of the container service cluster.
    pub cluster_name: String,
    /// Name of the application service, used in log group paths.
    pub service_name: String,
    /// Address range of the network, e.g. `192.168.0.0/16`.
    pub vpc_cidr: String,
    /// Where stack-level identifiers are published.
    pub publish: PublishMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            account: constants::DEFAULT_ACCOUNT.to_string(),
            region: constants::DEFAULT_REGION.to_string(),
            stack_name: constants::DEFAULT_STACK_NAME.to_string(),
            app_name: constants::DEFAULT_APP_NAME.to_string(),
            hosted_zone_name: constants::DEFAULT_HOSTED_ZONE_NAME.to_string(),
            hosted_zone_id: constants::DEFAULT_HOSTED_ZONE_ID.to_string(),
            domain_name: constants::DEFAULT_DOMAIN_NAME.to_string(),
            log_bucket_name: constants::DEFAULT_LOG_BUCKET_NAME.to_string(),
            repositories: default_repositories(),
            cluster_name: constants::DEFAULT_CLUSTER_NAME.to_string(),
            service_name: constants::DEFAULT_SERVICE_NAME.to_string(),
            vpc_cidr: constants::DEFAULT_VPC_CIDR.to_string(),
            publish: PublishMode::default(),
        }
    }
}

/// Returns the repository list used when none is configured.
#[must_use]
pub fn default_repositories() -> Vec<RepositorySpec> {
    vec![
        RepositorySpec {
            id: "Nginx".to_string(),
            name: "webapp/nginx-prod".to_string(),
        },
        RepositorySpec {
            id: "AppCli".to_string(),
            name: "webapp/app-cli-prod".to_string(),
        },
        RepositorySpec {
            id: "AppServer".to_string(),
            name: "webapp/app-server-prod".to_string(),
        },
    ]
}

/// Parses a comma-separated repository list of the form `Id=name,Id=name`.
///
/// An empty or all-whitespace input yields an empty list.
///
/// # Errors
///
/// Returns an error if an entry lacks the `=` separator, an identifier is
/// not ASCII alphanumeric, a repository name is malformed, or two entries
/// share an identifier.
pub fn parse_repositories(input: &str) -> Result<Vec<RepositorySpec>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut specs: Vec<RepositorySpec> = Vec::new();
    for entry in input.split(',') {
        let entry = entry.trim();
        let (id, name) = entry.split_once('=').ok_or_else(|| CumuloError::Config {
            message: format!("repository entry must be Id=name: {entry:?}"),
        })?;
        let spec = RepositorySpec {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
        };
        spec.validate()?;
        if specs.iter().any(|existing| existing.id == spec.id) {
            return Err(CumuloError::DuplicateId { id: spec.id });
        }
        specs.push(spec);
    }
    Ok(specs)
}

/// Checks a repository name against the registry naming rules: 2 to 256
/// characters of lowercase alphanumerics, `.`, `_`, `-`, and `/`, starting
/// and ending with an alphanumeric.
fn is_valid_repository_name(name: &str) -> bool {
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    name.len() >= 2
        && name.len() <= 256
        && name.chars().all(|c| alnum(c) || matches!(c, '.' | '_' | '-' | '/'))
        && name.starts_with(alnum)
        && name.ends_with(alnum)
}
