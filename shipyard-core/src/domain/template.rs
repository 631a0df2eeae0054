//! Resource template domain types
//!
//! A template is the declarative output of synthesis: every resource the
//! provisioner should create, keyed by logical id, plus named outputs.
//! Cross references between resources are expressed with [`Token`]s and
//! resolved by the provisioner, never at synthesis time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::environment::PriceClass;
use super::pipeline::{BuildVariable, Pipeline};

/// A value that is either literal or resolved by the provisioner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// Primary identifier of another resource
    #[serde(rename = "Ref")]
    Ref(String),
    /// Named attribute of another resource
    #[serde(rename = "Fn::GetAtt")]
    GetAtt(String, String),
    /// Concatenation of the parts with the separator
    #[serde(rename = "Fn::Join")]
    Join(String, Vec<Token>),
    #[serde(untagged)]
    Literal(String),
}

impl Token {
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    pub fn attribute(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt(logical_id.into(), attribute.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn join(parts: Vec<Token>) -> Self {
        Self::Join(String::new(), parts)
    }
}

/// Synthesized template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    pub description: String,
    pub resources: BTreeMap<String, Resource>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Logical ids of all resources of the given type (e.g. `AWS::S3::Bucket`)
    pub fn ids_of_type(&self, type_name: &str) -> Vec<&str> {
        self.resources
            .iter()
            .filter(|(_, r)| r.type_name() == type_name)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub value: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Declared resource with its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Properties")]
pub enum Resource {
    #[serde(rename = "AWS::S3::Bucket")]
    Bucket(Bucket),
    #[serde(rename = "AWS::CloudTrail::Trail")]
    Trail(Trail),
    #[serde(rename = "AWS::SNS::Topic")]
    Topic(Topic),
    #[serde(rename = "AWS::SNS::Subscription")]
    Subscription(Subscription),
    #[serde(rename = "AWS::SNS::TopicPolicy")]
    TopicPolicy(TopicPolicy),
    #[serde(rename = "AWS::IAM::User")]
    User(User),
    #[serde(rename = "AWS::IAM::AccessKey")]
    AccessKey(AccessKey),
    #[serde(rename = "AWS::IAM::Role")]
    Role(Role),
    #[serde(rename = "AWS::SSM::Parameter")]
    Parameter(Parameter),
    #[serde(rename = "AWS::CodeBuild::Project")]
    BuildProject(BuildProject),
    #[serde(rename = "AWS::CodePipeline::Pipeline")]
    Pipeline(PipelineResource),
    #[serde(rename = "AWS::Events::Rule")]
    EventRule(EventRule),
    #[serde(rename = "AWS::Lambda::Function")]
    Function(Function),
    #[serde(rename = "AWS::Lambda::Permission")]
    Permission(Permission),
    #[serde(rename = "AWS::CloudFront::CloudFrontOriginAccessIdentity")]
    OriginAccessIdentity(OriginAccessIdentity),
    #[serde(rename = "AWS::CloudFront::Distribution")]
    Distribution(Distribution),
    #[serde(rename = "AWS::Route53::RecordSet")]
    CnameRecord(CnameRecord),
    #[serde(rename = "AWS::CertificateManager::Certificate")]
    Certificate(Certificate),
}

impl Resource {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bucket(_) => "AWS::S3::Bucket",
            Self::Trail(_) => "AWS::CloudTrail::Trail",
            Self::Topic(_) => "AWS::SNS::Topic",
            Self::Subscription(_) => "AWS::SNS::Subscription",
            Self::TopicPolicy(_) => "AWS::SNS::TopicPolicy",
            Self::User(_) => "AWS::IAM::User",
            Self::AccessKey(_) => "AWS::IAM::AccessKey",
            Self::Role(_) => "AWS::IAM::Role",
            Self::Parameter(_) => "AWS::SSM::Parameter",
            Self::BuildProject(_) => "AWS::CodeBuild::Project",
            Self::Pipeline(_) => "AWS::CodePipeline::Pipeline",
            Self::EventRule(_) => "AWS::Events::Rule",
            Self::Function(_) => "AWS::Lambda::Function",
            Self::Permission(_) => "AWS::Lambda::Permission",
            Self::OriginAccessIdentity(_) => "AWS::CloudFront::CloudFrontOriginAccessIdentity",
            Self::Distribution(_) => "AWS::CloudFront::Distribution",
            Self::CnameRecord(_) => "AWS::Route53::RecordSet",
            Self::Certificate(_) => "AWS::CertificateManager::Certificate",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    pub versioned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_index_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_error_document: Option<String>,
}

/// Audit trail recording write events on selected objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trail {
    pub send_to_cloud_watch_logs: bool,
    /// Object ARNs whose write events are recorded
    pub write_event_selectors: Vec<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Topic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscription {
    pub topic: Token,
    pub protocol: SubscriptionProtocol,
    pub endpoint: Token,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionProtocol {
    Email,
    Lambda,
}

/// Lets a service principal publish to the listed topics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicPolicy {
    pub topics: Vec<Token>,
    pub principal: String,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub managed_policy_arns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessKey {
    pub user_name: Token,
}

/// Execution role assumed by a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub assumed_by: String,
    pub managed_policy_arns: Vec<String>,
    /// Parameters the role may read
    pub readable_parameters: Vec<String>,
}

/// String parameter in the parameter store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    pub value: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildProject {
    pub name: String,
    pub description: String,
    pub build_spec: serde_json::Value,
    pub image: String,
    pub compute_type: String,
    pub privileged_mode: bool,
    pub environment_variables: BTreeMap<String, BuildVariable>,
    /// Parameters the project's role may read
    pub readable_parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipelineResource {
    pub artifact_store: Token,
    #[serde(flatten)]
    pub pipeline: Pipeline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EventRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    pub enabled: bool,
    pub event_pattern: EventPattern,
    pub targets: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPattern {
    pub source: Vec<String>,
    #[serde(rename = "detail-type")]
    pub detail_type: Vec<String>,
    pub resources: Vec<Token>,
}

/// Function running the notification relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Function {
    pub description: String,
    pub runtime: String,
    pub handler: String,
    pub code: String,
    pub timeout: u32,
    pub role: Token,
    pub environment: BTreeMap<String, Token>,
}

/// Grants a service principal the right to invoke a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Permission {
    pub action: String,
    pub function_name: Token,
    pub principal: String,
    pub source_arn: Token,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginAccessIdentity {
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Distribution {
    pub comment: String,
    pub aliases: Vec<String>,
    pub origin_bucket: Token,
    pub origin_access_identity: Token,
    pub price_class: PriceClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_root_object: Option<String>,
    pub viewer_protocol_policy: String,
    pub certificate: Token,
    pub ssl_support_method: String,
    pub minimum_protocol_version: String,
    pub allowed_methods: Vec<String>,
    pub forward_query_string: bool,
    pub error_responses: Vec<ErrorResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CnameRecord {
    pub hosted_zone_id: String,
    pub name: String,
    pub value: Token,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Certificate {
    pub domain_name: String,
    pub subject_alternative_names: Vec<String>,
    pub hosted_zone_id: String,
    pub region: String,
}
