//! `chat.*` endpoints

use crate::SlackClient;
use crate::error::Result;
use shipyard_core::dto::slack::{PostMessage, PostMessageResponse};

impl SlackClient {
    /// Post a message to a channel
    ///
    /// # Arguments
    /// * `message` - Channel id, fallback text and optional blocks
    ///
    /// # Returns
    /// The channel and timestamp of the posted message
    pub async fn post_message(&self, message: &PostMessage) -> Result<PostMessageResponse> {
        let response = self
            .client
            .post(self.url("chat.postMessage"))
            .bearer_auth(&self.token)
            .json(message)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
