//! Frontend pipeline assembly
//!
//! Each environment gets a web distribution and a stage that extracts the
//! checked out artifact into the distribution's origin bucket.

use std::collections::BTreeMap;

use shipyard_core::domain::environment::FrontendEnvironment;
use shipyard_core::domain::pipeline::{Action, Pipeline, Stage};
use shipyard_core::domain::template::Token;

use crate::distribution::{DistributionContext, assets_distribution, web_distribution};
use crate::error::Result;
use crate::naming::stage_name;
use crate::pipeline::{SOURCE_ARTIFACT, SourceArtifact, approval_action, checkout_stage};
use crate::template::TemplateBuilder;

/// Assembled frontend pipeline
#[derive(Debug, Clone)]
pub struct FrontendPipeline {
    pub pipeline: Pipeline,
    /// Assets buckets keyed by environment name
    pub asset_storages: BTreeMap<String, Token>,
}

/// Declares the distributions for every environment and returns the stage list
pub fn assemble_frontend(
    template: &mut TemplateBuilder,
    source: &SourceArtifact,
    approval_topic: &Token,
    environments: &[FrontendEnvironment],
    context: &DistributionContext<'_>,
) -> Result<FrontendPipeline> {
    let mut stages = vec![checkout_stage(source)];
    let mut asset_storages = BTreeMap::new();

    for environment in environments {
        let origin = web_distribution(template, environment, context)?;
        if let Some(assets) = assets_distribution(template, environment, context)? {
            asset_storages.insert(environment.name.clone(), assets);
        }

        let mut actions = Vec::with_capacity(2);
        let mut run_order = 0;
        if environment.approval_required {
            run_order += 1;
            actions.push(approval_action("Approve".to_string(), run_order, approval_topic));
        }
        run_order += 1;
        actions.push(Action::S3Deploy {
            name: "Deploy".to_string(),
            bucket: origin,
            input: SOURCE_ARTIFACT.to_string(),
            object_key: environment.name.clone(),
            extract: true,
            run_order,
        });

        let stage = stage_name(&environment.name);
        tracing::info!("Assembled stage {} with {} action(s)", stage, actions.len());
        stages.push(Stage {
            name: stage,
            actions,
        });
    }

    Ok(FrontendPipeline {
        pipeline: Pipeline { stages },
        asset_storages,
    })
}
