//! Deployment definition types
//!
//! A deployment definition is the input document of synthesis. It is read
//! from JSON with camelCase keys and tagged by `kind`.

use serde::{Deserialize, Serialize};

use super::environment::{BackendEnvironment, FrontendEnvironment};
use super::notification::{NotificationTarget, NotificationsType};

/// Top level deployment definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeploymentDefinition {
    Backend(BackendDeployment),
    Frontend(FrontendDeployment),
}

impl DeploymentDefinition {
    /// Parses a definition document
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Backend(d) => &d.name,
            Self::Frontend(d) => &d.name,
        }
    }

    pub fn notifications(&self) -> &NotificationConfig {
        match self {
            Self::Backend(d) => &d.notifications,
            Self::Frontend(d) => &d.notifications,
        }
    }
}

/// Deployment of a backend application through build projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendDeployment {
    pub name: String,
    /// Explicit artifacts bucket name, generated by the provisioner when unset
    pub artifacts_bucket_name: Option<String>,
    pub pipeline: PipelineConfig<BackendEnvironment>,
    pub notifications: NotificationConfig,
}

/// Deployment of a static web application onto CDN distributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendDeployment {
    pub name: String,
    /// Domain the application is served under, e.g. `example.com` for `app.example.com`
    pub base_domain_name: String,
    pub hosted_zone_id: String,
    /// Zone name when it differs from the base domain name
    pub hosted_zone_name: Option<String>,
    /// Existing certificate, a DNS validated one is requested when unset
    pub certificate_arn: Option<String>,
    pub pipeline: PipelineConfig<FrontendEnvironment>,
    pub notifications: NotificationConfig,
}

impl FrontendDeployment {
    pub fn zone_name(&self) -> &str {
        self.hosted_zone_name
            .as_deref()
            .unwrap_or(&self.base_domain_name)
    }
}

/// Pipeline section of a definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig<T> {
    /// Object key of the artifact that triggers the pipeline (e.g. `builds/app.zip`)
    pub artifacts_source_key: String,
    pub environments: Vec<T>,
}

/// Notification section of a definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    pub target: NotificationTarget,
    #[serde(default)]
    pub notifications_type: NotificationsType,
    pub topic_name: Option<String>,
    pub rule_name: Option<String>,
}

impl NotificationConfig {
    pub fn new(target: NotificationTarget) -> Self {
        Self {
            target,
            notifications_type: NotificationsType::default(),
            topic_name: None,
            rule_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_definition() {
        let definition = DeploymentDefinition::from_json(
            r#"{
                "kind": "backend",
                "name": "orders",
                "pipeline": {
                    "artifactsSourceKey": "builds/orders.zip",
                    "environments": [
                        { "name": "dev", "buildSpec": {} },
                        { "name": "prod", "approvalRequired": true, "buildSpec": {} }
                    ]
                },
                "notifications": {
                    "target": { "targetType": "email", "emailAddress": "team@example.com" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(definition.name(), "orders");
        assert_eq!(
            definition.notifications().notifications_type,
            NotificationsType::PipelineExecution
        );
        let DeploymentDefinition::Backend(backend) = definition else {
            panic!("expected a backend definition");
        };
        assert_eq!(backend.pipeline.environments.len(), 2);
        assert!(backend.pipeline.environments[1].approval_required);
    }

    #[test]
    fn test_zone_name_falls_back_to_base_domain() {
        let mut deployment = FrontendDeployment {
            name: "web".to_string(),
            base_domain_name: "example.com".to_string(),
            hosted_zone_id: "Z123".to_string(),
            hosted_zone_name: None,
            certificate_arn: None,
            pipeline: PipelineConfig {
                artifacts_source_key: "web.zip".to_string(),
                environments: vec![],
            },
            notifications: NotificationConfig::new(NotificationTarget::slack("deploys")),
        };
        assert_eq!(deployment.zone_name(), "example.com");

        deployment.hosted_zone_name = Some("zone.example.com".to_string());
        assert_eq!(deployment.zone_name(), "zone.example.com");
    }
}
