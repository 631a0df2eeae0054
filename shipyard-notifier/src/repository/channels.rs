//! Channel directory repository

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use shipyard_core::dto::slack::ChannelPage;
use shipyard_slack::SlackClient;

/// Paginated listing of the workspace's conversations
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Fetches one page of conversations
    ///
    /// # Arguments
    /// * `types` - Comma separated conversation types to include
    /// * `cursor` - Cursor of the page to fetch, `None` for the first page
    /// * `limit` - Maximum conversations on the page
    async fn list_page(&self, types: &str, cursor: Option<&str>, limit: u32)
    -> Result<ChannelPage>;
}

/// Slack implementation of ChannelDirectory
pub struct SlackChannelDirectory {
    client: Arc<SlackClient>,
}

impl SlackChannelDirectory {
    pub fn new(client: Arc<SlackClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChannelDirectory for SlackChannelDirectory {
    async fn list_page(
        &self,
        types: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<ChannelPage> {
        self.client
            .list_conversations(Some(types), cursor, limit)
            .await
            .context("Failed to list conversations")
    }
}
