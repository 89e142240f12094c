//!
//! Emission of the two artifacts the batch execution engine consumes:
//! the configuration file and the workflow-definition file. Everything
//! here is pure templating over the resolver's output; nothing prompts.

use anyhow::{Context, Result};

use resolve::ResolvedPipeline;

use crate::fs::Fs;

/// Composition of the configuration mapping
mod config;
pub use config::{compose_config, ConfigInputs};

/// Workflow-definition file construction
mod pipeline;
pub use pipeline::PipelineFileBuilder;

/// Write the configuration and the workflow-definition file into the
/// work dir. `unit` selects the single-module file names.
pub fn write_artifacts(
    fs: &Fs,
    config: &serde_yaml::Mapping,
    resolved: &ResolvedPipeline,
    unit: bool,
) -> Result<()> {
    let config_path = fs.config_path(unit);
    let text = serde_yaml::to_string(config).context("serializing configuration")?;
    fs.write_file(&config_path, &text)?;
    log::info!("wrote {config_path:?}");

    let mut strbuf = String::with_capacity(1024);
    let mut builder = PipelineFileBuilder::new(&mut strbuf);
    builder.write_prefix(&config_path);
    for module in &resolved.write_order {
        // modules in the write order always carry a choice
        let package = &resolved.choices[module];
        builder.write_include(module, package);
    }
    builder.write_target_rule(&resolved.write_order);

    let pipeline_path = fs.pipeline_path(unit);
    fs.write_file(&pipeline_path, &strbuf)?;
    log::info!("wrote {pipeline_path:?}");
    Ok(())
}
