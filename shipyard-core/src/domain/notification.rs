//! Notification domain types

use serde::{Deserialize, Serialize};

/// Where deployment notifications are delivered
///
/// Definitions select the variant with `targetType`; any other tag is
/// rejected while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "targetType", rename_all = "lowercase")]
pub enum NotificationTarget {
    #[serde(rename_all = "camelCase")]
    Email {
        email_address: String,
        subject: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Slack {
        channel_name: String,
        /// Comma separated conversation types, `public_channel` when unset.
        /// Private channels must be listed here explicitly.
        channel_types: Option<String>,
        /// Skips the name lookup when set
        channel_id: Option<String>,
    },
}

impl NotificationTarget {
    pub fn email(address: impl Into<String>) -> Self {
        Self::Email {
            email_address: address.into(),
            subject: None,
        }
    }

    pub fn slack(channel_name: impl Into<String>) -> Self {
        Self::Slack {
            channel_name: channel_name.into(),
            channel_types: None,
            channel_id: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Email { .. } => "email",
            Self::Slack { .. } => "slack",
        }
    }
}

/// Granularity of pipeline events forwarded to the notification topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationsType {
    #[default]
    PipelineExecution,
    StageExecution,
    ActionExecution,
    None,
}

impl NotificationsType {
    /// Event detail type matched by the notifications rule, `None` disables the rule
    pub fn detail_type(self) -> Option<&'static str> {
        match self {
            Self::PipelineExecution => Some("CodePipeline Pipeline Execution State Change"),
            Self::StageExecution => Some("CodePipeline Stage Execution State Change"),
            Self::ActionExecution => Some("CodePipeline Action Execution State Change"),
            Self::None => None,
        }
    }
}

/// Outcome of looking a channel up by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelLookup {
    Found(String),
    /// Every page was scanned without a match
    NotFound,
    /// The directory rejected a request
    Failed(String),
}
