//! Template synthesis
//!
//! Both deployment kinds share the same skeleton: an artifacts bucket whose
//! source object triggers the pipeline, a trail recording writes to it, a
//! notification topic with its rule and subscription. They differ in how the
//! environment stages deploy.

use std::collections::HashSet;

use shipyard_core::domain::deployment::{
    BackendDeployment, DeploymentDefinition, FrontendDeployment, NotificationConfig,
};
use shipyard_core::domain::environment::Environment;
use shipyard_core::domain::notification::NotificationTarget;
use shipyard_core::domain::pipeline::Pipeline;
use shipyard_core::domain::template::{
    Bucket, Certificate, PipelineResource, Resource, Template, Token, Topic, Trail,
};

use crate::distribution::{DistributionContext, HostedZone};
use crate::error::{AssemblyError, Result};
use crate::frontend::assemble_frontend;
use crate::naming::{is_valid_environment_name, logical_id};
use crate::notification::{notifications_rule, subscribe, validate_email};
use crate::pipeline::{PipelineAssembler, SourceArtifact};
use crate::template::TemplateBuilder;

const ARTIFACTS_BUCKET: &str = "ArtifactsBucket";
const PIPELINE: &str = "Pipeline";
const NOTIFICATIONS_TOPIC: &str = "NotificationsTopic";
const CERTIFICATE_REGION: &str = "us-east-1";

/// Result of synthesizing a definition
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub template: Template,
    /// Stage layout, also embedded in the pipeline resource
    pub pipeline: Pipeline,
}

/// Validates `definition` and declares every resource it describes
pub fn synthesize(definition: &DeploymentDefinition) -> Result<Synthesis> {
    tracing::info!("Synthesizing deployment {}", definition.name());

    let synthesis = match definition {
        DeploymentDefinition::Backend(backend) => synthesize_backend(backend)?,
        DeploymentDefinition::Frontend(frontend) => synthesize_frontend(frontend)?,
    };

    tracing::info!(
        "Synthesized {} resource(s) across {} stage(s)",
        synthesis.template.resources.len(),
        synthesis.pipeline.stages.len()
    );
    Ok(synthesis)
}

/// Checks everything that can be rejected before any resource is declared
pub fn validate<E: Environment>(
    environments: &[E],
    notifications: &NotificationConfig,
) -> Result<()> {
    if environments.is_empty() {
        return Err(AssemblyError::NoEnvironments);
    }

    let mut seen = HashSet::new();
    for environment in environments {
        let name = environment.name();
        if !is_valid_environment_name(name) {
            return Err(AssemblyError::InvalidEnvironmentName(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(AssemblyError::DuplicateEnvironment(name.to_string()));
        }
    }

    if let NotificationTarget::Email { email_address, .. } = &notifications.target {
        validate_email(email_address)?;
    }

    Ok(())
}

fn synthesize_backend(deployment: &BackendDeployment) -> Result<Synthesis> {
    validate(&deployment.pipeline.environments, &deployment.notifications)?;

    let mut template =
        TemplateBuilder::new(format!("Shipyard backend pipeline for {}", deployment.name));
    let source = source_artifact(
        &mut template,
        deployment.artifacts_bucket_name.as_deref(),
        &deployment.pipeline.artifacts_source_key,
    )?;
    let topic = notifications_topic(&mut template, &deployment.notifications)?;

    let pipeline = PipelineAssembler::new(source.clone(), topic.clone())
        .assemble(&mut template, &deployment.pipeline.environments)?;

    finish(template, source, topic, pipeline, &deployment.notifications)
}

fn synthesize_frontend(deployment: &FrontendDeployment) -> Result<Synthesis> {
    validate(&deployment.pipeline.environments, &deployment.notifications)?;

    let mut template =
        TemplateBuilder::new(format!("Shipyard frontend pipeline for {}", deployment.name));
    let hosted_zone = HostedZone {
        id: deployment.hosted_zone_id.clone(),
        name: deployment.zone_name().to_string(),
    };
    let certificate = match &deployment.certificate_arn {
        Some(arn) => Token::literal(arn.clone()),
        None => template.add(
            "Certificate",
            Resource::Certificate(Certificate {
                domain_name: deployment.base_domain_name.clone(),
                subject_alternative_names: vec![format!("*.{}", deployment.base_domain_name)],
                hosted_zone_id: hosted_zone.id.clone(),
                // Distributions only accept certificates from this region
                region: CERTIFICATE_REGION.to_string(),
            }),
        )?,
    };

    let source = source_artifact(&mut template, None, &deployment.pipeline.artifacts_source_key)?;
    let topic = notifications_topic(&mut template, &deployment.notifications)?;

    let context = DistributionContext {
        certificate: &certificate,
        hosted_zone: &hosted_zone,
    };
    let frontend = assemble_frontend(
        &mut template,
        &source,
        &topic,
        &deployment.pipeline.environments,
        &context,
    )?;
    for (environment, bucket) in &frontend.asset_storages {
        template.output(
            format!("{}AssetsBucket", logical_id(&[environment.as_str()])),
            bucket.clone(),
            Some("Static assets bucket"),
        );
    }

    finish(template, source, topic, frontend.pipeline, &deployment.notifications)
}

/// Declares the artifacts bucket and the trail watching the source object
fn source_artifact(
    template: &mut TemplateBuilder,
    bucket_name: Option<&str>,
    key: &str,
) -> Result<SourceArtifact> {
    let bucket = template.add(
        ARTIFACTS_BUCKET,
        Resource::Bucket(Bucket {
            bucket_name: bucket_name.map(str::to_string),
            versioned: true,
            ..Default::default()
        }),
    )?;

    // Unnamed buckets only get a name at provisioning time
    let selector = match bucket_name {
        Some(name) => Token::literal(format!("arn:aws:s3:::{name}/{key}")),
        None => Token::join(vec![
            Token::attribute(ARTIFACTS_BUCKET, "Arn"),
            Token::literal(format!("/{key}")),
        ]),
    };
    template.add(
        "ArtifactsTrail",
        Resource::Trail(Trail {
            send_to_cloud_watch_logs: false,
            write_event_selectors: vec![selector],
        }),
    )?;

    Ok(SourceArtifact {
        bucket,
        key: key.to_string(),
    })
}

fn notifications_topic(
    template: &mut TemplateBuilder,
    notifications: &NotificationConfig,
) -> Result<Token> {
    let display_name = match &notifications.target {
        NotificationTarget::Email { subject, .. } => subject.clone(),
        NotificationTarget::Slack { .. } => None,
    };

    template.add(
        NOTIFICATIONS_TOPIC,
        Resource::Topic(Topic {
            topic_name: notifications.topic_name.clone(),
            display_name,
        }),
    )
}

/// Declares the pipeline, its notification wiring and the outputs
fn finish(
    mut template: TemplateBuilder,
    source: SourceArtifact,
    topic: Token,
    pipeline: Pipeline,
    notifications: &NotificationConfig,
) -> Result<Synthesis> {
    let pipeline_ref = template.add(
        PIPELINE,
        Resource::Pipeline(PipelineResource {
            artifact_store: source.bucket.clone(),
            pipeline: pipeline.clone(),
        }),
    )?;

    notifications_rule(
        &mut template,
        &topic,
        &pipeline_ref,
        notifications.notifications_type,
        notifications.rule_name.as_deref(),
    )?;
    subscribe(&mut template, &topic, &notifications.target)?;

    template.output("PipelineName", pipeline_ref, Some("Deploy pipeline"));
    template.output("ArtifactsBucketName", source.bucket, Some("Artifacts bucket"));
    template.output("NotificationsTopicArn", topic, Some("Notifications topic"));

    Ok(Synthesis {
        template: template.build(),
        pipeline,
    })
}
