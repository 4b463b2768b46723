use crate::error::BridgeError;
use crate::site::fetch::{FeedFetcher, FetchResult};
use crate::site::{Page, PageSet, Site};
use async_trait::async_trait;
use std::collections::HashMap;

#[cfg(test)]
mod discovery_tests {
    use super::*;

    const RSS_URL: &str = "https://example.com/index.xml";
    const SITEMAP_URL: &str = "https://example.com/sitemap.xml";

    const RSS: &str = r#"<rss version="2.0">
  <channel>
    <item>
      <title>Icons</title>
      <link>https://example.com/blog/icons/</link>
      <pubDate>Mon, 01 Mar 2021 10:00:00 +0000</pubDate>
      <description>All about icons</description>
    </item>
    <item>
      <title>About</title>
      <link>https://example.com/about/</link>
    </item>
    <item>
      <title>Fonts</title>
      <link>https://example.com/blog/fonts/</link>
      <pubDate>Tue, 02 Mar 2021 10:00:00 +0000</pubDate>
      <description>All about fonts</description>
    </item>
  </channel>
</rss>"#;

    const SITEMAP: &str = r#"<urlset>
  <url><loc>https://example.com/blog/icons/</loc><lastmod>2021-03-01T10:00:00Z</lastmod></url>
  <url><loc>https://example.com/blog/from-sitemap/</loc></url>
</urlset>"#;

    /// Serves feeds from memory; unknown URLs fail like an unreachable host
    struct FakeFetcher {
        documents: HashMap<&'static str, &'static str>,
    }

    impl FakeFetcher {
        fn new(documents: &[(&'static str, &'static str)]) -> Box<Self> {
            Box::new(Self {
                documents: documents.iter().copied().collect(),
            })
        }
    }

    #[async_trait]
    impl FeedFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> FetchResult {
            self.documents
                .get(url)
                .map(|doc| doc.to_string())
                .ok_or_else(|| format!("connection refused: {url}").into())
        }
    }

    fn urls(pages: &PageSet) -> Vec<&str> {
        pages.iter().map(|p| p.url.as_str()).collect()
    }

    #[tokio::test]
    async fn test_rss_preferred_when_sitemap_unreachable() {
        let site = Site::new(
            Some(RSS_URL.to_string()),
            Some(SITEMAP_URL.to_string()),
            FakeFetcher::new(&[(RSS_URL, RSS)]),
        );
        let pages = site.pages("https://example.com/blog/").await.unwrap();

        assert_eq!(
            urls(&pages),
            vec![
                "https://example.com/blog/icons/",
                "https://example.com/blog/fonts/"
            ]
        );
        let icons = pages.get("https://example.com/blog/icons/").unwrap();
        assert_eq!(icons.title.as_deref(), Some("Icons"));
        assert_eq!(icons.description.as_deref(), Some("All about icons"));
        assert!(icons.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_falls_back_to_sitemap() {
        let site = Site::new(
            Some(RSS_URL.to_string()),
            Some(SITEMAP_URL.to_string()),
            FakeFetcher::new(&[(SITEMAP_URL, SITEMAP)]),
        );
        let pages = site.pages("https://example.com/blog/").await.unwrap();

        assert_eq!(
            urls(&pages),
            vec![
                "https://example.com/blog/icons/",
                "https://example.com/blog/from-sitemap/"
            ]
        );
        assert!(pages.iter().all(|p| p.title.is_none()));
    }

    #[tokio::test]
    async fn test_falls_back_on_unparsable_rss() {
        let site = Site::new(
            Some(RSS_URL.to_string()),
            Some(SITEMAP_URL.to_string()),
            FakeFetcher::new(&[(RSS_URL, "<html>not a feed</html>"), (SITEMAP_URL, SITEMAP)]),
        );
        let pages = site.pages("https://example.com/").await.unwrap();
        assert!(pages.contains("https://example.com/blog/from-sitemap/"));
    }

    #[tokio::test]
    async fn test_both_feeds_unavailable() {
        let site = Site::new(
            Some(RSS_URL.to_string()),
            Some(SITEMAP_URL.to_string()),
            FakeFetcher::new(&[]),
        );
        let err = site.pages("https://example.com/").await.unwrap_err();
        match err {
            // The last failure is the sitemap's
            BridgeError::FeedUnavailable(reason) => assert!(reason.contains(SITEMAP_URL)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sitemap_index_is_unavailable() {
        let index = r#"<sitemapindex>
  <sitemap><loc>https://example.com/en/sitemap.xml</loc></sitemap>
</sitemapindex>"#;
        let site = Site::new(None, Some(SITEMAP_URL.to_string()), FakeFetcher::new(&[(SITEMAP_URL, index)]));
        let err = site.pages("https://example.com/").await.unwrap_err();
        match err {
            BridgeError::FeedUnavailable(reason) => assert!(reason.contains("sitemapindex"), "{reason}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_feed_configured() {
        let site = Site::new(Some(String::new()), None, FakeFetcher::new(&[(RSS_URL, RSS)]));
        let err = site.pages("https://example.com/").await.unwrap_err();
        assert!(matches!(err, BridgeError::FeedUnavailable(_)));
    }

    #[test]
    fn test_page_set_keeps_discovery_order() {
        let page = |url: &str, title: &str| Page {
            url: url.to_string(),
            title: Some(title.to_string()),
            ..Page::default()
        };
        let pages: PageSet = vec![
            page("https://example.com/c/", "c"),
            page("https://example.com/a/", "a"),
            page("https://example.com/c/", "c2"),
            page("https://example.com/b/", "b"),
        ]
        .into_iter()
        .collect();

        assert_eq!(pages.len(), 3);
        assert_eq!(
            urls(&pages),
            vec![
                "https://example.com/c/",
                "https://example.com/a/",
                "https://example.com/b/"
            ]
        );
        assert_eq!(
            pages.get("https://example.com/c/").unwrap().title.as_deref(),
            Some("c2")
        );
    }
}
