//! Slack Web API DTOs
//!
//! Only the subset used by the relay: conversation listing and message posting
//! with Block Kit layouts.

use serde::{Deserialize, Serialize};

/// A conversation returned by `conversations.list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// One page of the channel directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPage {
    pub channels: Vec<Channel>,
    /// Cursor of the following page, `None` on the last page
    pub next_cursor: Option<String>,
}

impl ChannelPage {
    pub fn find(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }
}

/// `conversations.list` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationsListResponse {
    #[serde(default)]
    pub channels: Vec<Channel>,
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

impl From<ConversationsListResponse> for ChannelPage {
    fn from(response: ConversationsListResponse) -> Self {
        // Slack marks the last page with an empty cursor
        let next_cursor = response
            .response_metadata
            .map(|m| m.next_cursor)
            .filter(|c| !c.is_empty());
        Self {
            channels: response.channels,
            next_cursor,
        }
    }
}

/// `chat.postMessage` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMessage {
    pub channel: String,
    /// Notification fallback; hidden by clients when blocks are present
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
}

/// `chat.postMessage` response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMessageResponse {
    pub channel: Option<String>,
    pub ts: Option<String>,
}

/// Layout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: Text,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        fields: Vec<Text>,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
    Divider,
    Actions {
        elements: Vec<Element>,
    },
    Context {
        elements: Vec<Text>,
    },
}

/// Text object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        emoji: Option<bool>,
    },
    Mrkdwn {
        text: String,
    },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText {
            text: text.into(),
            emoji: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::PlainText { text, .. } | Self::Mrkdwn { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Image { image_url: String, alt_text: String },
}

/// Interactive element of an actions block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        text: Text,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Danger,
}
