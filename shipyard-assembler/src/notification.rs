//! Notification wiring
//!
//! Pipeline events reach the notification topic through an event rule; the
//! topic then fans out to the configured target.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use shipyard_core::domain::notification::{NotificationTarget, NotificationsType};
use shipyard_core::domain::template::{
    EventPattern, EventRule, Function, Parameter, Permission, Resource, Role, Subscription,
    SubscriptionProtocol, Token, TopicPolicy,
};

use crate::error::{AssemblyError, Result};
use crate::naming::PARAMETER_PREFIX;
use crate::template::TemplateBuilder;

const EVENT_SOURCE: &str = "aws.codepipeline";
const AUTH_TOKEN_PLACEHOLDER: &str = "Dummy Auth Token";

const RELAY_FUNCTION: &str = "SlackSubscriptionHandler";
const RELAY_ROLE: &str = "SlackSubscriptionHandlerRole";
const RELAY_EXECUTION_POLICY: &str =
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole";
const RELAY_RUNTIME: &str = "provided.al2023";
const RELAY_HANDLER: &str = "bootstrap";
const RELAY_CODE: &str = "shipyard-notifier";
const RELAY_TIMEOUT_SECONDS: u32 = 30;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9\-]+(\.[a-z0-9\-]+)*\.[a-z]{2,}$")
        .expect("email pattern is valid")
});

/// Parameter holding the Slack bot token
pub fn auth_token_parameter_name() -> String {
    format!("{PARAMETER_PREFIX}/slack/auth_token")
}

/// Checks an email address, ignoring case
pub fn validate_email(address: &str) -> Result<()> {
    if EMAIL_PATTERN.is_match(&address.trim().to_lowercase()) {
        Ok(())
    } else {
        Err(AssemblyError::InvalidEmail(address.to_string()))
    }
}

/// Subscribes `target` to `topic`
pub fn subscribe(
    template: &mut TemplateBuilder,
    topic: &Token,
    target: &NotificationTarget,
) -> Result<()> {
    match target {
        NotificationTarget::Email { email_address, .. } => {
            validate_email(email_address)?;
            template.add(
                "EmailSubscription",
                Resource::Subscription(Subscription {
                    topic: topic.clone(),
                    protocol: SubscriptionProtocol::Email,
                    endpoint: Token::literal(email_address.clone()),
                }),
            )?;
        }
        NotificationTarget::Slack {
            channel_name,
            channel_types,
            channel_id,
        } => {
            let parameter = auth_token_parameter_name();
            template.add(
                "AuthParameter",
                Resource::Parameter(Parameter {
                    name: parameter.clone(),
                    value: Token::literal(AUTH_TOKEN_PLACEHOLDER),
                    description: Some("Slack bot token used by the notification relay".to_string()),
                }),
            )?;

            let mut environment = BTreeMap::new();
            environment.insert(
                "SLACK_BOT_TOKEN".to_string(),
                Token::literal(format!("{{{{resolve:ssm:{parameter}}}}}")),
            );
            environment.insert(
                "CHANNEL_NAME".to_string(),
                Token::literal(channel_name.clone()),
            );
            if let Some(types) = channel_types {
                environment.insert("CHANNEL_TYPES".to_string(), Token::literal(types.clone()));
            }
            if let Some(id) = channel_id {
                environment.insert("CHANNEL_ID".to_string(), Token::literal(id.clone()));
            }

            template.add(
                RELAY_ROLE,
                Resource::Role(Role {
                    assumed_by: "lambda.amazonaws.com".to_string(),
                    managed_policy_arns: vec![RELAY_EXECUTION_POLICY.to_string()],
                    readable_parameters: vec![parameter.clone()],
                }),
            )?;

            template.add(
                RELAY_FUNCTION,
                Resource::Function(Function {
                    description: "Relays pipeline notifications to Slack".to_string(),
                    runtime: RELAY_RUNTIME.to_string(),
                    handler: RELAY_HANDLER.to_string(),
                    code: RELAY_CODE.to_string(),
                    timeout: RELAY_TIMEOUT_SECONDS,
                    role: Token::attribute(RELAY_ROLE, "Arn"),
                    environment,
                }),
            )?;

            template.add(
                "SlackSubscription",
                Resource::Subscription(Subscription {
                    topic: topic.clone(),
                    protocol: SubscriptionProtocol::Lambda,
                    endpoint: Token::attribute(RELAY_FUNCTION, "Arn"),
                }),
            )?;
            template.add(
                "SlackSubscriptionPermission",
                Resource::Permission(Permission {
                    action: "lambda:InvokeFunction".to_string(),
                    function_name: Token::attribute(RELAY_FUNCTION, "Arn"),
                    principal: "sns.amazonaws.com".to_string(),
                    source_arn: topic.clone(),
                }),
            )?;
        }
    }

    tracing::info!("Subscribed {} target to notifications", target.kind());
    Ok(())
}

/// Declares the rule forwarding pipeline events to `topic`, unless notifications are off
pub fn notifications_rule(
    template: &mut TemplateBuilder,
    topic: &Token,
    pipeline: &Token,
    notifications_type: NotificationsType,
    rule_name: Option<&str>,
) -> Result<Option<Token>> {
    let Some(detail_type) = notifications_type.detail_type() else {
        tracing::info!("Pipeline notifications disabled, no rule declared");
        return Ok(None);
    };

    let rule = template.add(
        "PipelineNotificationsRule",
        Resource::EventRule(EventRule {
            name: rule_name.map(str::to_string),
            description: "Shipyard pipeline notifications rule".to_string(),
            enabled: true,
            event_pattern: EventPattern {
                source: vec![EVENT_SOURCE.to_string()],
                detail_type: vec![detail_type.to_string()],
                resources: vec![pipeline.clone()],
            },
            targets: vec![topic.clone()],
        }),
    )?;
    template.add(
        "NotificationsTopicPolicy",
        Resource::TopicPolicy(TopicPolicy {
            topics: vec![topic.clone()],
            principal: "events.amazonaws.com".to_string(),
            actions: vec!["sns:Publish".to_string()],
        }),
    )?;

    Ok(Some(rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("team@example.com").is_ok());
        assert!(validate_email("Team.Lead@Example.co.uk").is_ok());
        assert!(matches!(
            validate_email("not-an-email"),
            Err(AssemblyError::InvalidEmail(_))
        ));
        assert!(validate_email("team@example").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_email_subscription() {
        let mut template = TemplateBuilder::new("test");
        let topic = Token::reference("NotificationsTopic");
        subscribe(&mut template, &topic, &NotificationTarget::email("team@example.com")).unwrap();
        let template = template.build();

        let Some(Resource::Subscription(subscription)) = template.resource("EmailSubscription")
        else {
            panic!("subscription missing");
        };
        assert_eq!(subscription.protocol, SubscriptionProtocol::Email);
        assert_eq!(subscription.endpoint, Token::literal("team@example.com"));
    }

    #[test]
    fn test_invalid_email_declares_nothing() {
        let mut template = TemplateBuilder::new("test");
        let topic = Token::reference("NotificationsTopic");
        let result = subscribe(&mut template, &topic, &NotificationTarget::email("nope"));

        assert!(matches!(result, Err(AssemblyError::InvalidEmail(_))));
        assert!(template.is_empty());
    }

    #[test]
    fn test_slack_subscription() {
        let mut template = TemplateBuilder::new("test");
        let topic = Token::reference("NotificationsTopic");
        subscribe(&mut template, &topic, &NotificationTarget::slack("deploys")).unwrap();
        let template = template.build();

        let Some(Resource::Function(function)) = template.resource("SlackSubscriptionHandler")
        else {
            panic!("relay function missing");
        };
        assert_eq!(
            function.environment["SLACK_BOT_TOKEN"],
            Token::literal("{{resolve:ssm:/shipyard/slack/auth_token}}")
        );
        assert_eq!(function.environment["CHANNEL_NAME"], Token::literal("deploys"));
        assert!(!function.environment.contains_key("CHANNEL_ID"));

        let Some(Resource::Subscription(subscription)) = template.resource("SlackSubscription")
        else {
            panic!("subscription missing");
        };
        assert_eq!(subscription.protocol, SubscriptionProtocol::Lambda);
        assert_eq!(
            subscription.endpoint,
            Token::attribute("SlackSubscriptionHandler", "Arn")
        );

        let Some(Resource::Permission(permission)) =
            template.resource("SlackSubscriptionPermission")
        else {
            panic!("invoke permission missing");
        };
        assert_eq!(permission.principal, "sns.amazonaws.com");
        assert_eq!(permission.action, "lambda:InvokeFunction");
        assert_eq!(permission.source_arn, topic);

        assert_eq!(
            function.role,
            Token::attribute("SlackSubscriptionHandlerRole", "Arn")
        );
        let Some(Resource::Role(role)) = template.resource("SlackSubscriptionHandlerRole") else {
            panic!("execution role missing");
        };
        assert_eq!(role.assumed_by, "lambda.amazonaws.com");
        assert_eq!(role.readable_parameters, vec!["/shipyard/slack/auth_token"]);
    }

    #[test]
    fn test_notifications_rule() {
        let mut template = TemplateBuilder::new("test");
        let topic = Token::reference("NotificationsTopic");
        let pipeline = Token::reference("Pipeline");

        let rule = notifications_rule(
            &mut template,
            &topic,
            &pipeline,
            NotificationsType::StageExecution,
            Some("deploys"),
        )
        .unwrap();
        assert_eq!(rule, Some(Token::reference("PipelineNotificationsRule")));

        let template = template.build();
        let Some(Resource::EventRule(rule)) = template.resource("PipelineNotificationsRule") else {
            panic!("rule missing");
        };
        assert_eq!(
            rule.event_pattern.detail_type,
            vec!["CodePipeline Stage Execution State Change"]
        );
        assert_eq!(rule.event_pattern.source, vec!["aws.codepipeline"]);
        assert_eq!(rule.name.as_deref(), Some("deploys"));

        let Some(Resource::TopicPolicy(policy)) = template.resource("NotificationsTopicPolicy")
        else {
            panic!("topic policy missing");
        };
        assert_eq!(policy.topics, vec![topic]);
        assert_eq!(policy.principal, "events.amazonaws.com");
        assert_eq!(policy.actions, vec!["sns:Publish"]);
    }

    #[test]
    fn test_notifications_disabled() {
        let mut template = TemplateBuilder::new("test");
        let rule = notifications_rule(
            &mut template,
            &Token::reference("NotificationsTopic"),
            &Token::reference("Pipeline"),
            NotificationsType::None,
            None,
        )
        .unwrap();

        assert!(rule.is_none());
        assert!(template.is_empty());
    }
}
