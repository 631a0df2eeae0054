//! Integration tests for the Slack client

use httpmock::prelude::*;
use serde_json::json;
use shipyard_core::dto::slack::{Block, PostMessage, Text};
use shipyard_slack::{SlackClient, SlackError};

fn client(server: &MockServer) -> SlackClient {
    SlackClient::with_client(server.url("/api"), "xoxb-test", reqwest::Client::new())
}

#[tokio::test]
async fn test_list_conversations_first_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/conversations.list")
            .header("authorization", "Bearer xoxb-test")
            .query_param("types", "public_channel,private_channel")
            .query_param("limit", "200");
        then.status(200).json_body(json!({
            "ok": true,
            "channels": [
                { "id": "C1", "name": "general" },
                { "id": "C2", "name": "deploys" }
            ],
            "response_metadata": { "next_cursor": "dGVhbTpDMDYx" }
        }));
    });

    let page = client(&server)
        .list_conversations(Some("public_channel,private_channel"), None, 200)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(page.channels.len(), 2);
    assert_eq!(page.find("deploys").map(|c| c.id.as_str()), Some("C2"));
    assert_eq!(page.next_cursor.as_deref(), Some("dGVhbTpDMDYx"));
}

#[tokio::test]
async fn test_list_conversations_sends_cursor() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/conversations.list")
            .query_param("cursor", "page-2");
        then.status(200).json_body(json!({
            "ok": true,
            "channels": [],
            "response_metadata": { "next_cursor": "" }
        }));
    });

    let page = client(&server)
        .list_conversations(None, Some("page-2"), 200)
        .await
        .unwrap();

    mock.assert();
    assert!(page.channels.is_empty());
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn test_envelope_error_is_surfaced() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/conversations.list");
        then.status(200)
            .json_body(json!({ "ok": false, "error": "invalid_auth" }));
    });

    let error = client(&server)
        .list_conversations(None, None, 200)
        .await
        .unwrap_err();

    assert!(matches!(error, SlackError::Slack(ref code) if code == "invalid_auth"));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/chat.postMessage");
        then.status(503).body("unavailable");
    });

    let message = PostMessage {
        channel: "C1".to_string(),
        text: "Hi There!".to_string(),
        blocks: None,
    };
    let error = client(&server).post_message(&message).await.unwrap_err();

    assert!(matches!(error, SlackError::ApiError { status: 503, .. }));
}

#[tokio::test]
async fn test_post_plain_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat.postMessage")
            .header("authorization", "Bearer xoxb-test")
            .json_body(json!({ "channel": "C1", "text": "Hi There!" }));
        then.status(200)
            .json_body(json!({ "ok": true, "channel": "C1", "ts": "1503435956.000247" }));
    });

    let message = PostMessage {
        channel: "C1".to_string(),
        text: "Hi There!".to_string(),
        blocks: None,
    };
    let response = client(&server).post_message(&message).await.unwrap();

    mock.assert();
    assert_eq!(response.ts.as_deref(), Some("1503435956.000247"));
}

#[tokio::test]
async fn test_post_message_with_blocks() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/chat.postMessage").json_body(json!({
            "channel": "C1",
            "text": "Deployment state updated",
            "blocks": [
                { "type": "section", "text": { "type": "mrkdwn", "text": "*orders*" } },
                { "type": "divider" }
            ]
        }));
        then.status(200).json_body(json!({ "ok": true, "channel": "C1", "ts": "1" }));
    });

    let message = PostMessage {
        channel: "C1".to_string(),
        text: "Deployment state updated".to_string(),
        blocks: Some(vec![
            Block::Section {
                text: Text::markdown("*orders*"),
                fields: Vec::new(),
                accessory: None,
            },
            Block::Divider,
        ]),
    };
    client(&server).post_message(&message).await.unwrap();

    mock.assert();
}

#[tokio::test]
async fn test_channel_not_found_on_post() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/chat.postMessage");
        then.status(200)
            .json_body(json!({ "ok": false, "error": "channel_not_found" }));
    });

    let message = PostMessage {
        channel: "C404".to_string(),
        text: "Hi There!".to_string(),
        blocks: None,
    };
    let error = client(&server).post_message(&message).await.unwrap_err();

    assert_eq!(error.code(), Some("channel_not_found"));
}

#[tokio::test]
async fn test_throttled_post() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/chat.postMessage");
        then.status(429).header("retry-after", "30").body("");
    });

    let message = PostMessage {
        channel: "C1".to_string(),
        text: "Hi There!".to_string(),
        blocks: None,
    };
    let error = client(&server).post_message(&message).await.unwrap_err();

    assert!(error.is_rate_limited());
    assert!(matches!(error, SlackError::ApiError { status: 429, .. }));
}
