//! Shipyard Slack Client
//!
//! A small, typed client for the two Slack Web API methods the notification
//! relay needs: listing conversations and posting messages.
//!
//! Slack answers most failures with `200 OK` and `{"ok": false, "error": ...}`;
//! both transport errors and these envelope errors surface as [`SlackError`].
//!
//! # Example
//!
//! ```no_run
//! use shipyard_slack::SlackClient;
//! use shipyard_core::dto::slack::PostMessage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SlackClient::new("xoxb-token");
//!
//!     let page = client.list_conversations(Some("public_channel"), None, 200).await?;
//!     if let Some(channel) = page.find("deploys") {
//!         client.post_message(&PostMessage {
//!             channel: channel.id.clone(),
//!             text: "Hi There!".to_string(),
//!             blocks: None,
//!         }).await?;
//!     }
//!     Ok(())
//! }
//! ```

mod chat;
mod conversations;
pub mod error;

// Re-export commonly used types
pub use error::{Result, SlackError};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default Slack Web API root
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// HTTP client for the Slack Web API
#[derive(Debug, Clone)]
pub struct SlackClient {
    /// API root (e.g., "https://slack.com/api")
    base_url: String,
    /// Bot token sent as a bearer token
    token: String,
    client: Client,
}

impl SlackClient {
    /// Create a client against the public Slack API
    ///
    /// # Arguments
    /// * `token` - Bot token (`xoxb-...`)
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_client(DEFAULT_BASE_URL, token, Client::new())
    }

    /// Create a client with a custom API root and HTTP client
    ///
    /// This allows you to configure timeouts or point the client at a test server.
    ///
    /// # Example
    /// ```
    /// use shipyard_slack::SlackClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = SlackClient::with_client("http://localhost:9000/api/", "xoxb-token", http_client);
    /// assert_eq!(client.base_url(), "http://localhost:9000/api");
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        }
    }

    /// Get the API root
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Check the HTTP status and the `ok` envelope, then deserialize the body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SlackError::api_error(status.as_u16(), error_text));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SlackError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        if !body.get("ok").and_then(|ok| ok.as_bool()).unwrap_or(false) {
            let code = body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("unknown_error");
            return Err(SlackError::Slack(code.to_string()));
        }

        serde_json::from_value(body)
            .map_err(|e| SlackError::ParseError(format!("Unexpected response shape: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SlackClient::new("xoxb-token");
        assert_eq!(client.base_url(), "https://slack.com/api");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = SlackClient::with_client("http://localhost:9000/", "xoxb-token", Client::new());
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(client.url("chat.postMessage"), "http://localhost:9000/chat.postMessage");
    }
}
