//! Stages command handler

use std::path::Path;

use anyhow::Result;
use colored::*;
use shipyard_assembler::synthesize;
use shipyard_core::domain::pipeline::{Action, Stage};

use super::load_definition;

/// Print each stage with its actions in run order
pub fn handle_stages(definition_path: &Path) -> Result<()> {
    let definition = load_definition(definition_path)?;
    let synthesis = synthesize(&definition)?;

    println!(
        "{}",
        format!(
            "Pipeline for {} ({} stage(s)):",
            definition.name(),
            synthesis.pipeline.stages.len()
        )
        .bold()
    );
    println!();

    for (index, stage) in synthesis.pipeline.stages.iter().enumerate() {
        print_stage(index, stage);
    }

    Ok(())
}

fn print_stage(index: usize, stage: &Stage) {
    println!("{} {}", format!("{}.", index).dimmed(), stage.name.bold());

    let mut actions: Vec<&Action> = stage.actions.iter().collect();
    actions.sort_by_key(|a| a.run_order());

    for action in actions {
        let kind = match action.kind() {
            "approval" => action.kind().yellow(),
            "source" => action.kind().blue(),
            _ => action.kind().green(),
        };
        println!(
            "   [{}] {} {}",
            action.run_order().to_string().cyan(),
            action.name(),
            format!("({})", kind).dimmed()
        );
    }
}
