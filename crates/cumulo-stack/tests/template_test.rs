//! End-to-end tests over the synthesized template.
//!
//! Each test composes the full stack from a fixed configuration and
//! asserts on the rendered template document:
//! 1. Network topology (VPC, subnets, routing, NAT egress)
//! 2. Edge (certificate, balancer, listeners, DNS aliases)
//! 3. Storage (access log bucket and its delivery policy)
//! 4. Registry and compute (repositories, cluster, role, log groups)
//! 5. Identifier publication (template outputs vs. parameter store)
//! 6. Rendering (JSON/YAML agreement, determinism)
//! 7. Configuration edge cases (undersized ranges, apex domains)

#![allow(clippy::expect_used, clippy::unwrap_used)]

use cumulo_common::config::{AppConfig, PublishMode};
use cumulo_stack::StackComposer;
use cumulo_synth::Template;

fn test_config() -> AppConfig {
    AppConfig {
        account: "123456789012".to_string(),
        region: "ap-northeast-1".to_string(),
        stack_name: "TestStack".to_string(),
        app_name: "webapp".to_string(),
        hosted_zone_name: "example.org".to_string(),
        hosted_zone_id: "Z1234567890ABC".to_string(),
        domain_name: "app.example.org".to_string(),
        log_bucket_name: "example-log-storage".to_string(),
        vpc_cidr: "192.168.0.0/16".to_string(),
        ..AppConfig::default()
    }
}

fn synthesize() -> Template {
    StackComposer::new(test_config())
        .synthesize()
        .expect("should synthesize template")
}

// ── Network Topology ─────────────────────────────────────────────────

#[test]
fn network_spans_two_zones_with_four_subnets() {
    let template = synthesize();
    let query = template.query();

    assert_eq!(query.count_of_type("AWS::EC2::VPC"), 1);
    assert_eq!(query.count_of_type("AWS::EC2::Subnet"), 4);
    assert_eq!(query.count_of_type("AWS::EC2::InternetGateway"), 1);
    assert_eq!(query.count_of_type("AWS::EC2::NatGateway"), 1);
    assert_eq!(query.count_of_type("AWS::EC2::RouteTable"), 4);

    assert!(query.has_resource_properties(
        "AWS::EC2::VPC",
        &serde_json::json!({
            "CidrBlock": "192.168.0.0/16",
            "EnableDnsHostnames": true,
            "EnableDnsSupport": true,
        })
    ));
}

#[test]
fn subnets_carve_consecutive_blocks_public_first() {
    let template = synthesize();
    let query = template.query();

    for (block, zone, public) in [
        ("192.168.0.0/24", "ap-northeast-1a", true),
        ("192.168.1.0/24", "ap-northeast-1b", true),
        ("192.168.2.0/24", "ap-northeast-1a", false),
        ("192.168.3.0/24", "ap-northeast-1b", false),
    ] {
        assert!(
            query.has_resource_properties(
                "AWS::EC2::Subnet",
                &serde_json::json!({
                    "CidrBlock": block,
                    "AvailabilityZone": zone,
                    "MapPublicIpOnLaunch": public,
                })
            ),
            "missing subnet {block} in {zone}"
        );
    }
}

#[test]
fn private_subnets_route_through_the_single_nat() {
    let template = synthesize();
    let query = template.query();

    let routes = query.resources_of_type("AWS::EC2::Route");
    let nat_routes = routes
        .iter()
        .filter(|(_, body)| body.pointer("/Properties/NatGatewayId").is_some())
        .count();
    let internet_routes = routes
        .iter()
        .filter(|(_, body)| body.pointer("/Properties/GatewayId").is_some())
        .count();
    assert_eq!(nat_routes, 2, "one NAT route per private subnet");
    assert_eq!(internet_routes, 2, "one internet route per public subnet");
}

// ── Edge ─────────────────────────────────────────────────────────────

#[test]
fn balancer_is_internet_facing_and_logs_access() {
    let template = synthesize();
    let query = template.query();

    assert!(query.has_resource_properties(
        "AWS::ElasticLoadBalancingV2::LoadBalancer",
        &serde_json::json!({
            "Scheme": "internet-facing",
            "Type": "application",
            "LoadBalancerAttributes": [
                { "Key": "deletion_protection.enabled", "Value": "false" },
                { "Key": "access_logs.s3.enabled", "Value": "true" },
                { "Key": "access_logs.s3.bucket", "Value": "example-log-storage" },
            ],
        })
    ));
}

#[test]
fn balancer_waits_for_the_log_delivery_grant() {
    let template = synthesize();
    let query = template.query();

    let (policy_id, _) = query.resources_of_type("AWS::S3::BucketPolicy")[0];
    let (_, balancer) = query.resources_of_type("AWS::ElasticLoadBalancingV2::LoadBalancer")[0];
    let depends = balancer
        .pointer("/DependsOn")
        .and_then(serde_json::Value::as_array)
        .expect("balancer should declare dependencies");
    assert!(depends.contains(&serde_json::json!(policy_id)));
}

#[test]
fn one_security_group_each_for_edge_and_compute() {
    let template = synthesize();
    let query = template.query();

    assert_eq!(query.count_of_type("AWS::EC2::SecurityGroup"), 2);
    assert!(query.has_resource_properties(
        "AWS::EC2::SecurityGroup",
        &serde_json::json!({
            "SecurityGroupIngress": [
                { "FromPort": 80, "ToPort": 80, "IpProtocol": "tcp", "CidrIp": "0.0.0.0/0" },
                { "FromPort": 443, "ToPort": 443, "IpProtocol": "tcp", "CidrIp": "0.0.0.0/0" },
            ],
        })
    ));
}

#[test]
fn compute_group_admits_only_balancer_traffic() {
    let template = synthesize();
    let query = template.query();

    let (edge_group_id, _) = *query
        .resources_of_type("AWS::EC2::SecurityGroup")
        .iter()
        .find(|(_, body)| {
            body.pointer("/Properties/GroupDescription")
                == Some(&serde_json::json!("TestStack/Alb/SecurityGroup"))
        })
        .expect("edge security group should exist");

    assert!(query.has_resource_properties(
        "AWS::EC2::SecurityGroup",
        &serde_json::json!({
            "GroupDescription": "TestStack/EcsSecurityGroup",
            "SecurityGroupIngress": [{
                "FromPort": 8080,
                "ToPort": 8080,
                "IpProtocol": "tcp",
                "SourceSecurityGroupId": { "Fn::GetAtt": [edge_group_id, "GroupId"] },
            }],
        })
    ));
}

#[test]
fn https_listener_presents_the_certificate() {
    let template = synthesize();
    let query = template.query();

    let (certificate_id, _) = query.resources_of_type("AWS::CertificateManager::Certificate")[0];
    let (target_group_id, _) = query.resources_of_type("AWS::ElasticLoadBalancingV2::TargetGroup")[0];

    assert!(query.has_resource_properties(
        "AWS::ElasticLoadBalancingV2::Listener",
        &serde_json::json!({
            "Port": 443,
            "Protocol": "HTTPS",
            "Certificates": [{ "CertificateArn": { "Ref": certificate_id } }],
            "DefaultActions": [{ "TargetGroupArn": { "Ref": target_group_id }, "Type": "forward" }],
        })
    ));
}

#[test]
fn both_listeners_default_to_the_target_group() {
    let template = synthesize();
    let query = template.query();

    let (target_group_id, _) = query.resources_of_type("AWS::ElasticLoadBalancingV2::TargetGroup")[0];

    for (port, protocol) in [(80, "HTTP"), (443, "HTTPS")] {
        assert!(
            query.has_resource_properties(
                "AWS::ElasticLoadBalancingV2::Listener",
                &serde_json::json!({
                    "Port": port,
                    "Protocol": protocol,
                    "DefaultActions": [{
                        "TargetGroupArn": { "Ref": target_group_id },
                        "Type": "forward",
                    }],
                })
            ),
            "{protocol} listener should default-forward to the target group"
        );
    }
}

#[test]
fn http_traffic_redirects_permanently_to_https() {
    let template = synthesize();
    let query = template.query();

    assert_eq!(query.count_of_type("AWS::ElasticLoadBalancingV2::ListenerRule"), 1);
    assert!(query.has_resource_properties(
        "AWS::ElasticLoadBalancingV2::ListenerRule",
        &serde_json::json!({
            "Priority": 1,
            "Conditions": [{
                "Field": "path-pattern",
                "PathPatternConfig": { "Values": ["*"] },
            }],
            "Actions": [{
                "Type": "redirect",
                "RedirectConfig": {
                    "Port": "443",
                    "Protocol": "HTTPS",
                    "StatusCode": "HTTP_301",
                },
            }],
        })
    ));
}

#[test]
fn target_group_is_sticky_over_ip_targets() {
    let template = synthesize();
    let query = template.query();

    assert!(query.has_resource_properties(
        "AWS::ElasticLoadBalancingV2::TargetGroup",
        &serde_json::json!({
            "Port": 80,
            "Protocol": "HTTP",
            "TargetType": "ip",
            "TargetGroupAttributes": [
                { "Key": "stickiness.enabled", "Value": "true" },
                { "Key": "stickiness.lb_cookie.duration_seconds", "Value": "86400" },
                { "Key": "stickiness.type", "Value": "lb_cookie" },
            ],
        })
    ));
}

#[test]
fn certificate_validates_through_the_hosted_zone() {
    let template = synthesize();
    let query = template.query();

    assert!(query.has_resource_properties(
        "AWS::CertificateManager::Certificate",
        &serde_json::json!({
            "DomainName": "app.example.org",
            "ValidationMethod": "DNS",
            "DomainValidationOptions": [{
                "DomainName": "app.example.org",
                "HostedZoneId": "Z1234567890ABC",
            }],
        })
    ));
}

#[test]
fn domain_gets_dual_stack_aliases_onto_the_balancer() {
    let template = synthesize();
    let query = template.query();

    let records = query.resources_of_type("AWS::Route53::RecordSet");
    assert_eq!(records.len(), 2);

    let (balancer_id, _) = query.resources_of_type("AWS::ElasticLoadBalancingV2::LoadBalancer")[0];
    for record_type in ["A", "AAAA"] {
        assert!(
            query.has_resource_properties(
                "AWS::Route53::RecordSet",
                &serde_json::json!({
                    "Name": "app.example.org.",
                    "Type": record_type,
                    "HostedZoneId": "Z1234567890ABC",
                    "AliasTarget": {
                        "DNSName": { "Fn::Join": ["", [
                            "dualstack.",
                            { "Fn::GetAtt": [balancer_id, "DNSName"] },
                        ]]},
                        "HostedZoneId": { "Fn::GetAtt": [balancer_id, "CanonicalHostedZoneID"] },
                    },
                })
            ),
            "missing {record_type} alias"
        );
    }
}

// ── Storage ──────────────────────────────────────────────────────────

#[test]
fn log_bucket_expires_objects_and_survives_deletion() {
    let template = synthesize();
    let query = template.query();

    assert!(query.has_resource_properties(
        "AWS::S3::Bucket",
        &serde_json::json!({
            "BucketName": "example-log-storage",
            "LifecycleConfiguration": {
                "Rules": [{ "ExpirationInDays": 365, "Status": "Enabled" }],
            },
        })
    ));

    let (bucket_id, bucket) = query.resources_of_type("AWS::S3::Bucket")[0];
    assert_eq!(
        bucket.pointer("/DeletionPolicy"),
        Some(&serde_json::json!("Retain")),
        "bucket {bucket_id} must be retained"
    );
    assert_eq!(
        bucket.pointer("/UpdateReplacePolicy"),
        Some(&serde_json::json!("Retain"))
    );
}

#[test]
fn bucket_policy_grants_log_delivery_only() {
    let template = synthesize();
    let query = template.query();

    let (_, policy) = query.resources_of_type("AWS::S3::BucketPolicy")[0];
    let statements = policy
        .pointer("/Properties/PolicyDocument/Statement")
        .and_then(serde_json::Value::as_array)
        .expect("policy should carry statements");
    assert_eq!(statements.len(), 2);

    let actions: Vec<&str> = statements
        .iter()
        .filter_map(|statement| statement.pointer("/Action").and_then(serde_json::Value::as_str))
        .collect();
    assert!(actions.contains(&"s3:PutObject"));
    assert!(actions.contains(&"s3:GetBucketAcl"));

    for statement in statements {
        assert_eq!(
            statement.pointer("/Principal/Service"),
            Some(&serde_json::json!("logdelivery.elasticloadbalancing.amazonaws.com"))
        );
    }

    let put_statement = statements
        .iter()
        .find(|statement| statement.pointer("/Action") == Some(&serde_json::json!("s3:PutObject")))
        .expect("PutObject statement should exist");
    let resource = put_statement
        .pointer("/Resource/Fn::Join/1/1")
        .and_then(serde_json::Value::as_str)
        .expect("PutObject resource should be a join");
    assert_eq!(resource, "/AWSLogs/123456789012/*");
}

// ── Registry and Compute ─────────────────────────────────────────────

#[test]
fn provisions_one_repository_per_configured_entry() {
    let template = synthesize();
    let query = template.query();

    let repositories = query.resources_of_type("AWS::ECR::Repository");
    assert_eq!(repositories.len(), 3);

    let names: Vec<&str> = repositories
        .iter()
        .filter_map(|(_, body)| {
            body.pointer("/Properties/RepositoryName")
                .and_then(serde_json::Value::as_str)
        })
        .collect();
    assert!(names.contains(&"webapp/nginx-prod"));
    assert!(names.contains(&"webapp/app-cli-prod"));
    assert!(names.contains(&"webapp/app-server-prod"));

    for (id, body) in repositories {
        let text = body
            .pointer("/Properties/LifecyclePolicy/LifecyclePolicyText")
            .and_then(serde_json::Value::as_str)
            .expect("repository should carry a lifecycle policy");
        let policy: serde_json::Value =
            serde_json::from_str(text).expect("policy text should be valid JSON");
        assert_eq!(
            policy.pointer("/rules/0/selection/countNumber"),
            Some(&serde_json::json!(10)),
            "repository {id} should hold ten images"
        );
    }
}

#[test]
fn cluster_is_declared_by_name_only() {
    let template = synthesize();
    let query = template.query();

    assert_eq!(query.count_of_type("AWS::ECS::Cluster"), 1);
    assert!(query.has_resource_properties(
        "AWS::ECS::Cluster",
        &serde_json::json!({ "ClusterName": "example-webapp-cluster" })
    ));
}

#[test]
fn task_execution_role_assumes_from_the_container_service() {
    let template = synthesize();
    let query = template.query();

    assert!(query.has_resource_properties(
        "AWS::IAM::Role",
        &serde_json::json!({
            "AssumeRolePolicyDocument": {
                "Statement": [{
                    "Action": "sts:AssumeRole",
                    "Effect": "Allow",
                    "Principal": { "Service": "ecs-tasks.amazonaws.com" },
                }],
                "Version": "2012-10-17",
            },
            "ManagedPolicyArns": ["arn:aws:iam::aws:policy/PowerUserAccess"],
        })
    ));
}

#[test]
fn container_log_groups_retain_ten_years() {
    let template = synthesize();
    let query = template.query();

    let groups = query.resources_of_type("AWS::Logs::LogGroup");
    assert_eq!(groups.len(), 3);

    for stream in ["nginx", "app-server", "app-batch"] {
        assert!(
            query.has_resource_properties(
                "AWS::Logs::LogGroup",
                &serde_json::json!({
                    "LogGroupName": format!("/ecs/webapp/{stream}"),
                    "RetentionInDays": 3653,
                })
            ),
            "missing log group for {stream}"
        );
    }
    for (id, body) in groups {
        assert_eq!(
            body.pointer("/DeletionPolicy"),
            Some(&serde_json::json!("Retain")),
            "log group {id} must be retained"
        );
    }
}

// ── Identifier Publication ───────────────────────────────────────────

#[test]
fn outputs_mode_publishes_five_identifiers() {
    let template = synthesize();
    let query = template.query();

    assert_eq!(query.output_count(), 5);
    for name in [
        "PrivateSubnetAz1",
        "PrivateSubnetAz2",
        "EcsSecurityGroupId",
        "AlbTargetGroupArn",
        "EcsTaskExecutionRoleArn",
    ] {
        assert!(query.output(name).is_some(), "missing output {name}");
    }
    assert_eq!(query.count_of_type("AWS::SSM::Parameter"), 0);

    let subnet = query
        .output("PrivateSubnetAz1")
        .and_then(|output| output.pointer("/Value/Ref"))
        .and_then(serde_json::Value::as_str)
        .expect("output should reference a subnet");
    assert!(query.resource(subnet).is_some(), "dangling output target");
}

#[test]
fn parameter_mode_publishes_under_the_app_prefix() {
    let config = AppConfig {
        publish: PublishMode::SsmParameters,
        ..test_config()
    };
    let template = StackComposer::new(config)
        .synthesize()
        .expect("should synthesize template");
    let query = template.query();

    assert_eq!(query.output_count(), 0);
    assert!(
        template.as_value().pointer("/Outputs").is_none(),
        "parameter mode must not emit an Outputs section"
    );

    let parameters = query.resources_of_type("AWS::SSM::Parameter");
    assert_eq!(parameters.len(), 5);
    for name in [
        "/webapp/private-subnet-az1",
        "/webapp/private-subnet-az2",
        "/webapp/ecs-security-group-id",
        "/webapp/alb-target-group-arn",
        "/webapp/task-execution-role-arn",
    ] {
        assert!(
            query.has_resource_properties(
                "AWS::SSM::Parameter",
                &serde_json::json!({ "Name": name, "Type": "String" })
            ),
            "missing parameter {name}"
        );
    }
}

// ── Rendering ────────────────────────────────────────────────────────

#[test]
fn json_and_yaml_render_the_same_document() {
    let template = synthesize();
    let json: serde_json::Value =
        serde_json::from_str(&template.to_json().expect("should render JSON"))
            .expect("JSON should parse back");
    let yaml: serde_json::Value =
        serde_yaml::from_str(&template.to_yaml().expect("should render YAML"))
            .expect("YAML should parse back");
    assert_eq!(json, yaml);
}

#[test]
fn synthesis_is_deterministic() {
    let first = synthesize().to_json().expect("should render JSON");
    let second = synthesize().to_json().expect("should render JSON");
    assert_eq!(first, second);
}

#[test]
fn provisioning_order_puts_dependencies_first() {
    let stack = StackComposer::new(test_config())
        .compose()
        .expect("should compose stack");
    let order = cumulo_synth::graph::DependencyGraph::from_stack(&stack)
        .resolve_order()
        .expect("should order without cycles");
    assert_eq!(order.len(), stack.resource_count());

    let position_of = |id: &cumulo_common::types::LogicalId| {
        order
            .iter()
            .position(|candidate| candidate == id)
            .expect("resource should be ordered")
    };
    for resource in stack.resources() {
        let own = position_of(resource.logical_id());
        for dependency in resource.referenced_ids() {
            assert!(
                position_of(dependency) < own,
                "{dependency} must precede {}",
                resource.logical_id()
            );
        }
    }
}

// ── Configuration Edge Cases ─────────────────────────────────────────

#[test]
fn rejects_an_address_range_too_small_for_the_plan() {
    let config = AppConfig {
        vpc_cidr: "192.168.0.0/24".to_string(),
        ..test_config()
    };
    let err = StackComposer::new(config)
        .synthesize()
        .expect_err("should reject undersized range");
    let msg = err.to_string();
    assert!(msg.contains("holds only"), "got: {msg}");
}

#[test]
fn accepts_the_zone_apex_as_domain() {
    let config = AppConfig {
        domain_name: "example.org".to_string(),
        ..test_config()
    };
    let template = StackComposer::new(config)
        .synthesize()
        .expect("apex domain should synthesize");
    assert!(template.query().has_resource_properties(
        "AWS::Route53::RecordSet",
        &serde_json::json!({ "Name": "example.org.", "Type": "A" })
    ));
}
