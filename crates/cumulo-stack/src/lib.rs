//! Composition of the web application stack.
//!
//! This crate turns an [`cumulo_common::config::AppConfig`] into a fully
//! declared [`cumulo_synth::Stack`]: network and routing, the public edge
//! with TLS and access logging, image registries, and the compute plumbing
//! the container service deploys onto. [`StackComposer`] is the entry
//! point; [`Network`] and [`Edge`] are the intermediate constructs it
//! wires together.

pub mod app;
pub mod edge;
pub mod network;

pub use app::StackComposer;
pub use edge::{Edge, EdgeProps};
pub use network::Network;
