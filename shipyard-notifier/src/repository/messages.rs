//! Message posting repository

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shipyard_core::dto::slack::PostMessage;
use shipyard_slack::SlackClient;

#[async_trait]
pub trait MessagePoster: Send + Sync {
    /// Posts `message`; the error carries the remote reason
    async fn post(&self, message: &PostMessage) -> Result<()>;
}

/// Slack implementation of MessagePoster
pub struct SlackMessagePoster {
    client: Arc<SlackClient>,
}

impl SlackMessagePoster {
    pub fn new(client: Arc<SlackClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessagePoster for SlackMessagePoster {
    async fn post(&self, message: &PostMessage) -> Result<()> {
        let response = self.client.post_message(message).await.inspect_err(|e| {
            if e.is_rate_limited() {
                tracing::warn!("Slack throttled the post to {}", message.channel);
            }
        })?;
        tracing::debug!("Posted message at {:?}", response.ts);
        Ok(())
    }
}
