//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod stages;
mod synth;
mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use shipyard_core::domain::deployment::DeploymentDefinition;

/// Definition file shared by every command
#[derive(Args)]
pub struct DefinitionArgs {
    /// Path to the deployment definition (JSON)
    #[arg(short, long, env = "SHIPYARD_DEFINITION")]
    definition: PathBuf,
}

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize the resource template of a definition
    Synth {
        #[command(flatten)]
        definition: DefinitionArgs,

        /// Write the template to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the pipeline stages and their actions
    Stages {
        #[command(flatten)]
        definition: DefinitionArgs,
    },
    /// Check a definition without writing anything
    Validate {
        #[command(flatten)]
        definition: DefinitionArgs,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Synth { definition, output } => {
            synth::handle_synth(&definition.definition, output.as_deref())
        }
        Commands::Stages { definition } => stages::handle_stages(&definition.definition),
        Commands::Validate { definition } => validate::handle_validate(&definition.definition),
    }
}

/// Read and parse a definition file
fn load_definition(path: &Path) -> Result<DeploymentDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read definition file: {}", path.display()))?;

    let definition = DeploymentDefinition::from_json(&content)
        .with_context(|| format!("Failed to parse definition file: {}", path.display()))?;
    tracing::debug!("Loaded definition {} from {}", definition.name(), path.display());

    Ok(definition)
}
