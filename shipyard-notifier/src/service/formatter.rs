//! Message formatter
//!
//! Turns the raw topic message into Slack text and blocks. Approval requests
//! and pipeline state changes get a status layout; anything else is passed
//! through as plain text.

use chrono::{DateTime, FixedOffset, Local};
use serde_json::Value;
use shipyard_core::dto::event::{ApprovalNotification, StateChangeEvent};
use shipyard_core::dto::slack::Block;

use super::blocks::{StatusAction, StatusBody, deployment_status_blocks};

pub const APPROVAL_TEXT: &str = "Approval required";
pub const STATE_CHANGE_TEXT: &str = "Deployment state updated";

const FOOTER_DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Text and optional layout of an outgoing message
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedMessage {
    pub text: String,
    pub blocks: Option<Vec<Block>>,
}

impl FormattedMessage {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            blocks: None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MessageFormatter;

impl MessageFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Formats `raw` with a footer stamped with the current local time
    pub fn format(&self, raw: &str) -> FormattedMessage {
        self.format_at(raw, Local::now().fixed_offset())
    }

    /// Formats `raw` with a footer stamped with `now`
    ///
    /// Never fails. An object carrying an `approval` object or a `detail`
    /// object gets the status layout, with mistyped fields read as empty.
    /// Anything else becomes the plain-text message.
    pub fn format_at(&self, raw: &str, now: DateTime<FixedOffset>) -> FormattedMessage {
        let Ok(Value::Object(payload)) = serde_json::from_str::<Value>(raw) else {
            return FormattedMessage::plain(raw);
        };

        let footer = format!("Last Updated at {}", now.format(FOOTER_DATE_FORMAT));

        let approval = payload.get("approval").map(Value::is_object);
        let detail = payload.get("detail").map(Value::is_object);

        let formatted = match (approval, detail) {
            (Some(true), _) => {
                serde_json::from_value::<ApprovalNotification>(Value::Object(payload))
                    .map(|notification| approval_message(notification, &footer))
            }
            (Some(false), _) => return FormattedMessage::plain(raw),
            (None, Some(true)) => {
                serde_json::from_value::<StateChangeEvent>(Value::Object(payload))
                    .map(|event| state_change_message(event, &footer))
            }
            _ => return FormattedMessage::plain(raw),
        };

        formatted.unwrap_or_else(|e| {
            tracing::debug!("Payload did not match its layout: {}", e);
            FormattedMessage::plain(raw)
        })
    }
}

fn approval_message(notification: ApprovalNotification, footer: &str) -> FormattedMessage {
    let approval = notification.approval;
    let body = StatusBody {
        title: approval.pipeline_name,
        fields: vec![
            format!("*Stage:* {}", approval.stage_name),
            format!("*Action:* {}", approval.action_name),
            format!("*Region:* {}", notification.region),
        ],
        image_url: None,
    };
    let actions = vec![StatusAction::link("View", approval.approval_review_link)];

    FormattedMessage {
        text: APPROVAL_TEXT.to_string(),
        blocks: Some(deployment_status_blocks(APPROVAL_TEXT, body, actions, footer)),
    }
}

fn state_change_message(event: StateChangeEvent, footer: &str) -> FormattedMessage {
    let url = pipeline_console_url(&event.region, &event.detail.pipeline);
    let body = StatusBody {
        title: event.detail.pipeline,
        fields: vec![
            format!("*Id:* {}", event.id),
            format!("*Region:* {}", event.region),
            format!("*Account:* {}", event.account),
            format!("*State:* {}", event.detail.state),
        ],
        image_url: None,
    };
    let actions = vec![StatusAction::link("View", url)];

    FormattedMessage {
        text: STATE_CHANGE_TEXT.to_string(),
        blocks: Some(deployment_status_blocks(STATE_CHANGE_TEXT, body, actions, footer)),
    }
}

/// Console page of a pipeline
pub fn pipeline_console_url(region: &str, pipeline: &str) -> String {
    format!("https://console.aws.amazon.com/codepipeline/home?region={region}#/view/{pipeline}")
}
