//! Notification relay
//!
//! One invocation handles one topic event: resolve the channel, extract the
//! message, format it and post it. Every failure is logged and folded into
//! the returned [`RelayResult`]; nothing escapes as an error.

use std::sync::Arc;

use serde::Serialize;
use shipyard_core::domain::notification::ChannelLookup;
use shipyard_core::dto::event::SnsEvent;
use shipyard_core::dto::slack::PostMessage;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::config::ChannelConfig;
use crate::repository::MessagePoster;
use crate::service::{ChannelResolver, MessageFormatter};

/// Outcome reported back to the trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: Option<String>) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

pub struct NotificationRelay {
    channel: ChannelConfig,
    resolver: ChannelResolver,
    formatter: MessageFormatter,
    poster: Arc<dyn MessagePoster>,
}

impl NotificationRelay {
    pub fn new(
        channel: ChannelConfig,
        resolver: ChannelResolver,
        formatter: MessageFormatter,
        poster: Arc<dyn MessagePoster>,
    ) -> Self {
        Self {
            channel,
            resolver,
            formatter,
            poster,
        }
    }

    /// Handles one event inside its own invocation span
    pub async fn handle(&self, event: &SnsEvent) -> RelayResult {
        let span = info_span!("relay", invocation = %Uuid::new_v4());
        self.relay(event).instrument(span).await
    }

    async fn relay(&self, event: &SnsEvent) -> RelayResult {
        let channel_id = match self.resolver.resolve(&self.channel).await {
            ChannelLookup::Found(id) => id,
            ChannelLookup::Failed(e) => {
                error!(
                    "Could not retrieve channel id, check the bot has the channels:read scope: {}",
                    e
                );
                return RelayResult::failure(Some(e));
            }
            ChannelLookup::NotFound => {
                error!("No channel named {} exists", self.channel.name);
                return RelayResult::failure(None);
            }
        };

        let raw = match extract_message(event) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Rejected event: {}", e);
                return RelayResult::failure(Some(e));
            }
        };

        let formatted = self.formatter.format(raw);
        let message = PostMessage {
            channel: channel_id,
            text: formatted.text,
            blocks: formatted.blocks,
        };

        if let Err(e) = self.poster.post(&message).await {
            error!(
                "Could not post notification, check the chat:write scope and that the bot is in the channel: {:#}",
                e
            );
            return RelayResult::failure(Some(e.to_string()));
        }

        info!("Posted notification to {}", message.channel);
        RelayResult::success()
    }
}

/// Message of the event's single record
fn extract_message(event: &SnsEvent) -> Result<&str, String> {
    match event.records.as_slice() {
        [record] => record
            .message()
            .ok_or_else(|| "event record carries no message".to_string()),
        records => Err(format!(
            "expected exactly one event record, got {}",
            records.len()
        )),
    }
}
