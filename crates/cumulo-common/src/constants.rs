//! System-wide constants and configuration defaults.

/// Template format version emitted at the top of every synthesized template.
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

/// Maximum length of a resource logical ID.
pub const MAX_LOGICAL_ID_LENGTH: usize = 255;

/// Hex characters of path digest appended to derived logical IDs.
pub const LOGICAL_ID_HASH_LENGTH: usize = 8;

/// Port the load balancer serves plain HTTP on.
pub const HTTP_PORT: u16 = 80;

/// Port the load balancer serves HTTPS on.
pub const HTTPS_PORT: u16 = 443;

/// Port the application containers listen on behind the load balancer.
pub const APP_PORT: u16 = 8080;

/// Number of availability zones the network spans.
pub const AVAILABILITY_ZONE_COUNT: usize = 2;

/// Prefix length of each carved subnet.
pub const SUBNET_PREFIX: u8 = 24;

/// Session cookie lifetime for listener stickiness, in seconds.
pub const STICKINESS_DURATION_SECONDS: u32 = 86_400;

/// Days before access log objects expire out of the log bucket.
pub const LOG_BUCKET_EXPIRATION_DAYS: u32 = 365;

/// Days container log events are retained (ten years).
pub const LOG_RETENTION_DAYS: u32 = 3653;

/// Images kept per repository before the oldest are expired.
pub const MAX_IMAGE_COUNT: u32 = 10;

/// Default account placeholder.
pub const DEFAULT_ACCOUNT: &str = "000000000000";

/// Default deployment region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default stack name.
pub const DEFAULT_STACK_NAME: &str = "ExampleWebAppStack";

/// Default short application name.
pub const DEFAULT_APP_NAME: &str = "webapp";

/// Default hosted zone name.
pub const DEFAULT_HOSTED_ZONE_NAME: &str = "example.com";

/// Placeholder hosted zone ID used until a real zone is configured.
pub const DEFAULT_HOSTED_ZONE_ID: &str = "ZZONEPLACEHOLDER";

/// Default public application name.
pub const DEFAULT_DOMAIN_NAME: &str = "app.example.com";

/// Default access log bucket name.
pub const DEFAULT_LOG_BUCKET_NAME: &str = "example-log-bucket";

/// Default container service cluster name.
pub const DEFAULT_CLUSTER_NAME: &str = "example-webapp-cluster";

/// Default application service name.
pub const DEFAULT_SERVICE_NAME: &str = "webapp";

/// Default network address range.
pub const DEFAULT_VPC_CIDR: &str = "192.168.0.0/16";

/// Application name used in CLI output.
pub const APP_NAME: &str = "cumulo";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "cumulo";
