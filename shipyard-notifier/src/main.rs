//! Shipyard Notifier
//!
//! Relays pipeline notifications from the notification topic to Slack.
//!
//! Architecture:
//! - Configuration: Load settings from the process environment
//! - Repositories: Slack API access (channel directory, message posting)
//! - Services: Channel resolution and message formatting
//! - Relay: Per-event orchestration producing a `{success, error?}` result
//!
//! The event is read as JSON from the file named by the first argument, or
//! from stdin when no argument is given. The result is printed to stdout.

mod config;
mod relay;
mod repository;
mod service;

use std::sync::Arc;

use anyhow::{Context, Result};
use shipyard_core::dto::event::SnsEvent;
use shipyard_slack::SlackClient;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::relay::NotificationRelay;
use crate::repository::{SlackChannelDirectory, SlackMessagePoster};
use crate::service::{ChannelResolver, MessageFormatter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipyard_notifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;
    info!(
        "Loaded configuration: channel={}, types={}, api={}",
        config.channel.name, config.channel.types, config.slack_api_url
    );

    let event = read_event(std::env::args().nth(1)).await?;

    let http_client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let client = Arc::new(SlackClient::with_client(
        config.slack_api_url.clone(),
        config.slack_token.clone(),
        http_client,
    ));

    let resolver = ChannelResolver::new(
        Arc::new(SlackChannelDirectory::new(client.clone())),
        config.page_size,
        config.max_pages,
    );
    let relay = NotificationRelay::new(
        config.channel.clone(),
        resolver,
        MessageFormatter::new(),
        Arc::new(SlackMessagePoster::new(client)),
    );

    let result = relay.handle(&event).await;
    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}

/// Reads the trigger event from `path`, or stdin when no path is given
async fn read_event(path: Option<String>) -> Result<SnsEvent> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read event file {}", path))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read event from stdin")?;
            raw
        }
    };

    serde_json::from_str(&raw).context("Event is not a valid notification event")
}
