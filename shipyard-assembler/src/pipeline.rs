//! Multi-environment pipeline assembly
//!
//! Stage 0 checks the source artifact out of the artifacts bucket; every
//! environment then gets its own deploy stage, in definition order, running a
//! build project with that environment's credentials and variables.

use shipyard_core::domain::environment::BackendEnvironment;
use shipyard_core::domain::pipeline::{Action, CHECKOUT_STAGE, Pipeline, SourceTrigger, Stage};
use shipyard_core::domain::template::{BuildProject, Resource, Token};

use crate::buildspec::{build_variables, inject_credentials};
use crate::credentials::provision_credentials;
use crate::error::Result;
use crate::naming::{approval_action_name, logical_id, physical_name, stage_name};
use crate::template::TemplateBuilder;

/// Output artifact of the checkout stage
pub const SOURCE_ARTIFACT: &str = "S3Source";

const BUILD_IMAGE: &str = "aws/codebuild/standard:7.0";
const COMPUTE_TYPE: &str = "BUILD_GENERAL1_SMALL";

/// Location of the artifact that feeds the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    pub bucket: Token,
    pub key: String,
}

/// Run orders for an environment stage: (approval, deploy)
pub fn run_orders(approval_required: bool) -> (Option<u32>, u32) {
    if approval_required {
        (Some(1), 2)
    } else {
        (None, 1)
    }
}

/// The fixed checkout stage reading `source`
pub fn checkout_stage(source: &SourceArtifact) -> Stage {
    Stage {
        name: CHECKOUT_STAGE.to_string(),
        actions: vec![Action::S3Source {
            name: SOURCE_ARTIFACT.to_string(),
            bucket: source.bucket.clone(),
            bucket_key: source.key.clone(),
            output: SOURCE_ARTIFACT.to_string(),
            trigger: SourceTrigger::Events,
        }],
    }
}

/// Manual approval action notifying `topic`
pub fn approval_action(name: String, run_order: u32, topic: &Token) -> Action {
    Action::ManualApproval {
        name,
        run_order,
        notification_topic: topic.clone(),
    }
}

/// Assembles backend pipelines
pub struct PipelineAssembler {
    source: SourceArtifact,
    approval_topic: Token,
}

impl PipelineAssembler {
    /// Creates an assembler
    ///
    /// # Arguments
    /// * `source` - Artifact checked out by the first stage
    /// * `approval_topic` - Topic notified when an approval gate is reached
    pub fn new(source: SourceArtifact, approval_topic: Token) -> Self {
        Self {
            source,
            approval_topic,
        }
    }

    /// Declares build projects and credentials for each environment and
    /// returns the ordered stage list
    pub fn assemble(
        &self,
        template: &mut TemplateBuilder,
        environments: &[BackendEnvironment],
    ) -> Result<Pipeline> {
        let mut stages = Vec::with_capacity(environments.len() + 1);
        stages.push(checkout_stage(&self.source));

        for environment in environments {
            stages.push(self.environment_stage(template, environment)?);
        }

        Ok(Pipeline { stages })
    }

    fn environment_stage(
        &self,
        template: &mut TemplateBuilder,
        environment: &BackendEnvironment,
    ) -> Result<Stage> {
        let name = environment.name.as_str();
        let stage = stage_name(name);

        let slots = provision_credentials(template, name, environment.admin_permissions)?;
        let build_spec = inject_credentials(name, &environment.build_spec, &slots)?;

        let project_id = logical_id(&[name, "PipelineProject"]);
        let project = template.add(
            project_id.clone(),
            Resource::BuildProject(BuildProject {
                name: physical_name(&project_id),
                description: format!("Shipyard deploy project for stage {stage}"),
                build_spec,
                image: BUILD_IMAGE.to_string(),
                compute_type: COMPUTE_TYPE.to_string(),
                privileged_mode: environment.privileged_mode,
                environment_variables: build_variables(&environment.runtime_variables, &slots),
                readable_parameters: slots.parameter_names(),
            }),
        )?;

        let (approval_order, deploy_order) = run_orders(environment.approval_required);
        let mut actions = Vec::with_capacity(2);
        if let Some(run_order) = approval_order {
            actions.push(approval_action(
                approval_action_name(name),
                run_order,
                &self.approval_topic,
            ));
        }
        actions.push(Action::CodeBuild {
            name: "Deploy".to_string(),
            project,
            input: SOURCE_ARTIFACT.to_string(),
            outputs: vec![logical_id(&[name, "Source"])],
            run_order: deploy_order,
        });

        tracing::info!(
            "Assembled stage {} with {} action(s)",
            stage,
            actions.len()
        );

        Ok(Stage {
            name: stage,
            actions,
        })
    }
}
