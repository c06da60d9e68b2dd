//! `cumulo synth` — synthesize the provisioning template.

use std::path::PathBuf;

use clap::Args;

use cumulo_common::config::AppConfig;
use cumulo_common::error::CumuloError;
use cumulo_stack::StackComposer;

/// Rendering flavors of the template document.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Compact JSON on one line.
    Json,
    /// Indented JSON.
    Pretty,
    /// YAML.
    Yaml,
}

/// Arguments for the `synth` subcommand.
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Write the template to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rendering of the template document.
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: Format,
}

/// Executes the `synth` command.
///
/// Composes the stack from the configuration, renders the template in the
/// requested flavor, and writes it to the given path or to stdout.
///
/// # Errors
///
/// Returns an error if composition, rendering, or writing fails.
pub fn execute(args: SynthArgs, config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(stack = %config.stack_name, format = ?args.format, "synthesizing template");

    let template = StackComposer::new(config).synthesize()?;
    let rendered = match args.format {
        Format::Json => template.to_json()?,
        Format::Pretty => template.to_json_pretty()?,
        Format::Yaml => template.to_yaml()?,
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &rendered).map_err(|source| CumuloError::Io {
            path: path.clone(),
            source,
        })?;
        println!("Wrote template to {}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
