//! Channel resolver
//!
//! Walks the conversation directory page by page until a channel with the
//! configured name shows up.

use std::sync::Arc;

use shipyard_core::domain::notification::ChannelLookup;
use tracing::{debug, info, warn};

use crate::config::ChannelConfig;
use crate::repository::ChannelDirectory;

pub struct ChannelResolver {
    directory: Arc<dyn ChannelDirectory>,
    page_size: u32,
    max_pages: u32,
}

impl ChannelResolver {
    /// Creates a new resolver
    ///
    /// # Arguments
    /// * `directory` - Conversation listing
    /// * `page_size` - Conversations requested per page
    /// * `max_pages` - Pages scanned before giving up
    pub fn new(directory: Arc<dyn ChannelDirectory>, page_size: u32, max_pages: u32) -> Self {
        Self {
            directory,
            page_size,
            max_pages,
        }
    }

    /// Resolves the id of the configured channel
    ///
    /// A configured id is returned as is. Otherwise pages are fetched in
    /// order; the first exact name match wins and a listing failure stops the
    /// scan without retrying.
    pub async fn resolve(&self, channel: &ChannelConfig) -> ChannelLookup {
        if let Some(id) = &channel.id {
            debug!("Using configured channel id {}", id);
            return ChannelLookup::Found(id.clone());
        }

        let mut cursor: Option<String> = None;
        for page_number in 1..=self.max_pages {
            let page = match self
                .directory
                .list_page(&channel.types, cursor.as_deref(), self.page_size)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!("Could not list channels (page {}): {:#}", page_number, e);
                    return ChannelLookup::Failed(e.to_string());
                }
            };

            debug!(
                "Fetched channel page {} with {} channel(s)",
                page_number,
                page.channels.len()
            );

            if let Some(found) = page.find(&channel.name) {
                info!("Resolved channel {} to {}", channel.name, found.id);
                return ChannelLookup::Found(found.id.clone());
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    info!("No channel named {} exists", channel.name);
                    return ChannelLookup::NotFound;
                }
            }
        }

        warn!(
            "Gave up looking for channel {} after {} page(s)",
            channel.name, self.max_pages
        );
        ChannelLookup::Failed(format!(
            "channel {} not found within {} pages",
            channel.name, self.max_pages
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use shipyard_core::dto::slack::{Channel, ChannelPage};
    use std::sync::Mutex;

    /// Directory serving fixed pages, cursor `n` pointing at page `n`
    struct PagedDirectory {
        pages: Vec<Vec<(&'static str, &'static str)>>,
        calls: Mutex<Vec<Option<String>>>,
    }

    impl PagedDirectory {
        fn new(pages: Vec<Vec<(&'static str, &'static str)>>) -> Arc<Self> {
            Arc::new(Self {
                pages,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Option<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChannelDirectory for PagedDirectory {
        async fn list_page(
            &self,
            _types: &str,
            cursor: Option<&str>,
            _limit: u32,
        ) -> Result<ChannelPage> {
            self.calls.lock().unwrap().push(cursor.map(str::to_string));
            let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let channels = self.pages[index]
                .iter()
                .map(|(id, name)| Channel {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect();
            let next_cursor = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
            Ok(ChannelPage {
                channels,
                next_cursor,
            })
        }
    }

    struct FailingDirectory;

    #[async_trait]
    impl ChannelDirectory for FailingDirectory {
        async fn list_page(&self, _: &str, _: Option<&str>, _: u32) -> Result<ChannelPage> {
            anyhow::bail!("missing_scope")
        }
    }

    fn channel(name: &str) -> ChannelConfig {
        ChannelConfig {
            name: name.to_string(),
            types: "public_channel".to_string(),
            id: None,
        }
    }

    fn pages() -> Vec<Vec<(&'static str, &'static str)>> {
        vec![
            vec![("C1", "general"), ("C2", "random")],
            vec![("C3", "support")],
            vec![("C4", "deploys"), ("C5", "Deploys-old")],
        ]
    }

    #[tokio::test]
    async fn test_match_on_page_k_takes_k_calls() {
        for (k, (name, id)) in [("general", "C1"), ("support", "C3"), ("deploys", "C4")]
            .into_iter()
            .enumerate()
        {
            let directory = PagedDirectory::new(pages());
            let resolver = ChannelResolver::new(directory.clone(), 200, 100);

            let lookup = resolver.resolve(&channel(name)).await;

            assert_eq!(lookup, ChannelLookup::Found(id.to_string()));
            assert_eq!(directory.calls().len(), k + 1);
        }
    }

    #[tokio::test]
    async fn test_cursor_is_forwarded() {
        let directory = PagedDirectory::new(pages());
        let resolver = ChannelResolver::new(directory.clone(), 200, 100);

        resolver.resolve(&channel("deploys")).await;

        assert_eq!(
            directory.calls(),
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_not_found_after_last_page() {
        let directory = PagedDirectory::new(pages());
        let resolver = ChannelResolver::new(directory.clone(), 200, 100);

        // Matching is case-sensitive
        let lookup = resolver.resolve(&channel("DEPLOYS")).await;

        assert_eq!(lookup, ChannelLookup::NotFound);
        assert_eq!(directory.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_listing_failure_is_not_retried() {
        let resolver = ChannelResolver::new(Arc::new(FailingDirectory), 200, 100);

        let lookup = resolver.resolve(&channel("deploys")).await;

        assert_eq!(lookup, ChannelLookup::Failed("missing_scope".to_string()));
    }

    #[tokio::test]
    async fn test_page_cap() {
        let directory = PagedDirectory::new(pages());
        let resolver = ChannelResolver::new(directory.clone(), 200, 2);

        let lookup = resolver.resolve(&channel("deploys")).await;

        assert!(matches!(lookup, ChannelLookup::Failed(_)));
        assert_eq!(directory.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_configured_id_skips_lookup() {
        let directory = PagedDirectory::new(pages());
        let resolver = ChannelResolver::new(directory.clone(), 200, 100);
        let mut config = channel("deploys");
        config.id = Some("C999".to_string());

        let lookup = resolver.resolve(&config).await;

        assert_eq!(lookup, ChannelLookup::Found("C999".to_string()));
        assert!(directory.calls().is_empty());
    }
}
