//! # cumulo-synth
//!
//! Resource model and template synthesis engine.
//!
//! Handles:
//! - **Value**: Property values, including references between resources.
//! - **Resource**: A single declared resource with its typed properties.
//! - **Stack**: The ordered registry of resources and outputs.
//! - **Graph**: Dependency graph construction and topological resolution.
//! - **Template**: Rendering a stack into a provisioning template document.
//! - **Inspect**: Read-side queries over rendered templates.

pub mod graph;
pub mod inspect;
pub mod resource;
pub mod stack;
pub mod template;
pub mod value;

pub use resource::CfnResource;
pub use stack::{Output, Stack};
pub use template::Template;
pub use value::CfnValue;
