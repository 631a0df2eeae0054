//! Synth command handler

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use shipyard_assembler::synthesize;

use super::load_definition;

/// Synthesize the template and write it to `output` or stdout
pub fn handle_synth(definition_path: &Path, output: Option<&Path>) -> Result<()> {
    let definition = load_definition(definition_path)?;
    let synthesis = synthesize(&definition)
        .with_context(|| format!("Failed to synthesize {}", definition.name()))?;

    let rendered = serde_json::to_string_pretty(&synthesis.template)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write template: {}", path.display()))?;
            eprintln!(
                "{}",
                format!("✓ Template written to {}", path.display())
                    .green()
                    .bold()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
