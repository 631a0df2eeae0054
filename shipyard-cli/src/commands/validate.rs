//! Validate command handler

use std::path::Path;

use anyhow::Result;
use colored::*;
use shipyard_assembler::synthesize;

use super::load_definition;

/// Run a full synthesis and report the outcome without writing anything
pub fn handle_validate(definition_path: &Path) -> Result<()> {
    let definition = load_definition(definition_path)?;

    match synthesize(&definition) {
        Ok(synthesis) => {
            println!(
                "{}",
                format!("✓ {} is valid", definition.name()).green().bold()
            );
            println!(
                "  Resources: {}",
                synthesis.template.resources.len().to_string().cyan()
            );
            println!(
                "  Stages:    {}",
                synthesis.pipeline.stage_names().join(", ").dimmed()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "{}",
                format!("✗ {} is invalid", definition.name()).red().bold()
            );
            Err(e.into())
        }
    }
}
