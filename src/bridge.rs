use std::path::PathBuf;

use crate::config::{BridgeConfig, Trigger};
use crate::correlate::SiteDiscussions;
use crate::error::{BridgeError, Result};
use crate::github::{DiscussionSource, types::category_by_name};
use crate::normalize::normalize_discussions;
use crate::opener::Opener;
use crate::reconcile::{draft_discussion, find_unsynced};
use crate::site::{FeedFetcher, Site};

/// What a single run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Discussions were opened for unsynced pages
    Synced(SyncReport),
    /// The page to discussion map was written
    Saved { discussions: usize, path: PathBuf },
    /// The trigger is not handled
    Ignored(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Pages discovered on the site
    pub pages: usize,
    /// Pages that had no discussion yet
    pub unsynced: usize,
    pub created: usize,
    pub failed: usize,
}

/// Ties the site and the discussion service together for one run
pub struct Bridge<'a> {
    config: &'a BridgeConfig,
    opener: Opener,
    site: Site,
    source: &'a dyn DiscussionSource,
}

impl<'a> Bridge<'a> {
    /// Build a bridge; fails when the opener template has no URL placeholder
    pub fn new(
        config: &'a BridgeConfig,
        source: &'a dyn DiscussionSource,
        fetcher: Box<dyn FeedFetcher>,
    ) -> Result<Self> {
        let opener = Opener::new(&config.discussion_opener)?;
        let site = Site::new(
            config.site_rss_url.clone(),
            config.site_map_url.clone(),
            fetcher,
        );
        Ok(Self {
            config,
            opener,
            site,
            source,
        })
    }

    /// Run the work selected by the configured trigger
    pub async fn run(&self) -> Result<RunOutcome> {
        let trigger = self.config.trigger();
        ::log::info!("Triggered by: {}", trigger.as_str());
        if !self.config.event_path.is_empty() {
            ::log::debug!("Event path: {}", self.config.event_path);
        }

        match trigger {
            Trigger::Push => self.sync_pages().await.map(RunOutcome::Synced),
            Trigger::Discussion | Trigger::DiscussionComment => self.save_discussions().await,
            Trigger::Other(name) => {
                ::log::info!("Unhandled event name {:?}, doing nothing", name);
                Ok(RunOutcome::Ignored(name))
            }
        }
    }

    /// Open a discussion for every page that has none yet.
    ///
    /// A failed creation is logged and counted; the remaining pages are still
    /// processed.
    pub async fn sync_pages(&self) -> Result<SyncReport> {
        let category_id = self.category_id().await?;
        let discussions = self.site_discussions(&category_id).await?;
        let pages = self.site.pages(&self.config.site_url_prefix).await?;

        let unsynced = find_unsynced(&pages, &discussions);
        ::log::info!(
            "Got {} pages from site, found {} unsynced discussions",
            pages.len(),
            unsynced.len()
        );

        let mut report = SyncReport {
            pages: pages.len(),
            unsynced: unsynced.len(),
            ..SyncReport::default()
        };
        for page in &unsynced {
            let draft = draft_discussion(page, &self.opener);
            if self.config.dry_run {
                ::log::info!(
                    "Dry run: would create discussion {:?} with body {:?}",
                    draft.title,
                    draft.message.body
                );
                continue;
            }
            match self
                .source
                .create_discussion(&category_id, &draft.title, &draft.message.body)
                .await
            {
                Ok(id) => {
                    ::log::info!("Created discussion {} for {}", id, page.url);
                    report.created += 1;
                }
                Err(e) => {
                    ::log::error!("Could not create discussion for {}: {}", page.url, e);
                    report.failed += 1;
                }
            }
        }

        ::log::info!(
            "Created {} discussions, {} failed",
            report.created,
            report.failed
        );
        Ok(report)
    }

    /// Write the page to discussion map to the configured output file
    pub async fn save_discussions(&self) -> Result<RunOutcome> {
        let category_id = self.category_id().await?;
        let discussions = self.site_discussions(&category_id).await?;
        discussions.save(&self.config.output_file)?;
        Ok(RunOutcome::Saved {
            discussions: discussions.len(),
            path: self.config.output_file.clone(),
        })
    }

    async fn category_id(&self) -> Result<String> {
        let categories = self.source.categories().await?;
        if categories.is_empty() {
            return Err(BridgeError::NoCategories);
        }
        let category = category_by_name(&categories, &self.config.category_name)
            .ok_or_else(|| BridgeError::CategoryNotFound(self.config.category_name.clone()))?;
        ::log::info!("Got category ID: {}", category.id);
        Ok(category.id.clone())
    }

    async fn site_discussions(&self, category_id: &str) -> Result<SiteDiscussions> {
        let discussions = self.source.discussions(category_id).await?;
        let related = SiteDiscussions::relate(&normalize_discussions(&discussions), &self.opener);
        ::log::info!(
            "Related {} of {} discussions to pages",
            related.len(),
            discussions.len()
        );
        Ok(related)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types as gh;
    use crate::site::fetch::FetchResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const RSS_URL: &str = "https://example.com/index.xml";

    const RSS: &str = r#"<rss version="2.0"><channel>
  <item><title>A</title><link>https://example.com/a/</link></item>
  <item><title>B</title><link>https://example.com/b/</link></item>
  <item><title>C</title><link>https://example.com/c/</link></item>
</channel></rss>"#;

    struct FakeSource {
        categories: Vec<gh::Category>,
        discussions: Vec<gh::Discussion>,
        /// Titles whose creation fails
        failing: Vec<&'static str>,
        created: Mutex<Vec<(String, String)>>,
    }

    impl FakeSource {
        fn new(bodies: &[&str]) -> Self {
            Self {
                categories: vec![
                    gh::Category {
                        id: "C1".to_string(),
                        emoji: String::new(),
                        name: "General".to_string(),
                    },
                    gh::Category {
                        id: "C2".to_string(),
                        emoji: String::new(),
                        name: "Blog".to_string(),
                    },
                ],
                discussions: bodies
                    .iter()
                    .map(|body| gh::Discussion {
                        body: body.to_string(),
                        ..gh::Discussion::default()
                    })
                    .collect(),
                failing: Vec::new(),
                created: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DiscussionSource for FakeSource {
        async fn categories(&self) -> Result<Vec<gh::Category>> {
            Ok(self.categories.clone())
        }

        async fn discussions(&self, category_id: &str) -> Result<Vec<gh::Discussion>> {
            assert_eq!(category_id, "C2");
            Ok(self.discussions.clone())
        }

        async fn create_discussion(
            &self,
            category_id: &str,
            title: &str,
            body: &str,
        ) -> Result<String> {
            assert_eq!(category_id, "C2");
            if self.failing.iter().any(|f| *f == title) {
                return Err(BridgeError::RemoteQuery("connection reset".to_string()));
            }
            let mut created = self.created.lock().unwrap();
            created.push((title.to_string(), body.to_string()));
            Ok(format!("D{}", created.len()))
        }
    }

    struct FakeFetcher;

    #[async_trait]
    impl FeedFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> FetchResult {
            if url == RSS_URL {
                Ok(RSS.to_string())
            } else {
                Err(format!("connection refused: {url}").into())
            }
        }
    }

    fn config(event_name: &str) -> BridgeConfig {
        BridgeConfig {
            repo_owner: "o".to_string(),
            repo_name: "r".to_string(),
            event_name: event_name.to_string(),
            site_rss_url: Some(RSS_URL.to_string()),
            discussion_opener: "Blog post: {{ .URL }}".to_string(),
            ..BridgeConfig::default()
        }
    }

    #[tokio::test]
    async fn test_push_creates_unsynced_discussions() {
        let source = FakeSource::new(&["Blog post: https://example.com/a/"]);
        let config = config("push");
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        let outcome = bridge.run().await.unwrap();
        assert_eq!(
            outcome,
            RunOutcome::Synced(SyncReport {
                pages: 3,
                unsynced: 2,
                created: 2,
                failed: 0,
            })
        );
        let created = source.created.lock().unwrap();
        assert_eq!(
            *created,
            vec![
                ("B".to_string(), "Blog post: https://example.com/b/".to_string()),
                ("C".to_string(), "Blog post: https://example.com/c/".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_push_continues_after_failed_creation() {
        let mut fake = FakeSource::new(&["Blog post: https://example.com/a/"]);
        fake.failing = vec!["B"];
        let source = fake;
        let config = config("push");
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        let report = bridge.sync_pages().await.unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.failed, 1);
        let created = source.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "C");
    }

    #[tokio::test]
    async fn test_dry_run_creates_nothing() {
        let source = FakeSource::new(&[]);
        let config = BridgeConfig {
            dry_run: true,
            ..config("push")
        };
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        let report = bridge.sync_pages().await.unwrap();
        assert_eq!(report.unsynced, 3);
        assert_eq!(report.created, 0);
        assert!(source.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_fails_without_feeds() {
        let source = FakeSource::new(&[]);
        let config = BridgeConfig {
            site_rss_url: Some("https://example.com/missing.xml".to_string()),
            ..config("push")
        };
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        let err = bridge.run().await.unwrap_err();
        assert!(matches!(err, BridgeError::FeedUnavailable(_)));
    }

    #[tokio::test]
    async fn test_discussion_event_saves_map() {
        let source = FakeSource::new(&[
            "Blog post: https://example.com/a/",
            "unrelated",
            "Blog post: https://example.com/c/",
        ]);
        let dir = tempfile::tempdir().unwrap();
        let output_file = dir.path().join("data").join("discussions.json");
        let config = BridgeConfig {
            output_file: output_file.clone(),
            ..config("discussion_comment")
        };
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        let outcome = bridge.run().await.unwrap();
        assert_eq!(
            outcome,
            RunOutcome::Saved {
                discussions: 2,
                path: output_file.clone(),
            }
        );
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output_file).unwrap()).unwrap();
        let keys: Vec<_> = written.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["https://example.com/a/", "https://example.com/c/"]);
        assert_eq!(
            written["https://example.com/a/"]["bodyMimeType"],
            "text/markdown"
        );
    }

    #[tokio::test]
    async fn test_other_event_is_ignored() {
        let source = FakeSource::new(&[]);
        let config = config("workflow_dispatch");
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        assert_eq!(
            bridge.run().await.unwrap(),
            RunOutcome::Ignored("workflow_dispatch".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_category() {
        let source = FakeSource::new(&[]);
        let config = BridgeConfig {
            category_name: "Announcements".to_string(),
            ..config("discussion")
        };
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        let err = bridge.run().await.unwrap_err();
        assert!(matches!(err, BridgeError::CategoryNotFound(name) if name == "Announcements"));
    }

    #[tokio::test]
    async fn test_no_categories() {
        let mut fake = FakeSource::new(&[]);
        fake.categories.clear();
        let source = fake;
        let config = config("discussion");
        let bridge = Bridge::new(&config, &source, Box::new(FakeFetcher)).unwrap();

        let err = bridge.run().await.unwrap_err();
        assert!(matches!(err, BridgeError::NoCategories));
    }

    #[test]
    fn test_malformed_opener() {
        let source = FakeSource::new(&[]);
        let config = BridgeConfig {
            discussion_opener: "Blog post".to_string(),
            ..config("push")
        };
        let result = Bridge::new(&config, &source, Box::new(FakeFetcher));
        assert!(matches!(result, Err(BridgeError::MalformedTemplate(_))));
    }
}
