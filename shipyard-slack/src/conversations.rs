//! `conversations.*` endpoints

use crate::SlackClient;
use crate::error::Result;
use shipyard_core::dto::slack::{ChannelPage, ConversationsListResponse};

impl SlackClient {
    /// List one page of conversations
    ///
    /// # Arguments
    /// * `types` - Comma separated conversation types (e.g. `public_channel,private_channel`),
    ///   Slack's default when `None`
    /// * `cursor` - Cursor returned by the previous page, `None` for the first page
    /// * `limit` - Maximum number of conversations on the page
    ///
    /// # Returns
    /// The page, with `next_cursor` set when more pages follow
    pub async fn list_conversations(
        &self,
        types: Option<&str>,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<ChannelPage> {
        let mut query = vec![
            ("exclude_archived", "true".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(types) = types {
            query.push(("types", types.to_string()));
        }
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor.to_string()));
        }

        tracing::debug!("Listing conversations (cursor: {:?})", cursor);
        let response = self
            .client
            .get(self.url("conversations.list"))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await?;

        let body: ConversationsListResponse = self.handle_response(response).await?;
        Ok(body.into())
    }
}
