//! `cumulo plan` — print the planned resources in provisioning order.

use cumulo_common::config::AppConfig;
use cumulo_stack::StackComposer;
use cumulo_synth::graph::DependencyGraph;

/// Executes the `plan` command.
///
/// Composes the stack, resolves the provisioning order from the
/// dependency graph, and prints each resource with its type, followed by
/// the names of the published outputs. Nothing is written to disk.
///
/// # Errors
///
/// Returns an error if composition fails or the dependency graph is
/// cyclic.
pub fn execute(config: AppConfig) -> anyhow::Result<()> {
    let stack = StackComposer::new(config).compose()?;
    let order = DependencyGraph::from_stack(&stack).resolve_order()?;

    println!("Provisioning plan for {}", stack.name());
    println!();
    for id in &order {
        if let Some(resource) = stack.resource(id) {
            println!("  + {id}  ({})", resource.resource_type());
        }
    }
    println!();
    println!("  {} resource(s) will be provisioned.", order.len());

    if stack.output_count() > 0 {
        println!();
        println!("  Outputs:");
        for (id, _) in stack.outputs() {
            println!("    {id}");
        }
    }

    Ok(())
}
