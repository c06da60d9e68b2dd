//! # cumulo-aws
//!
//! Typed builders for the provider resources Cumulo stacks declare.
//!
//! Each module covers one service family and produces plain
//! [`cumulo_synth::CfnResource`] values. Builders fix the property
//! vocabulary of their resource type; composition and wiring between
//! resources happens one level up, in `cumulo-stack`.

pub mod acm;
pub mod ec2;
pub mod ecr;
pub mod ecs;
pub mod elbv2;
pub mod iam;
pub mod logs;
pub mod route53;
pub mod s3;
pub mod ssm;
