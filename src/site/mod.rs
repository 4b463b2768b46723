pub mod feeds;
pub mod fetch;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{BridgeError, Result};
pub use fetch::{FeedFetcher, HttpFetcher};

/// A content page of the site, identified by its URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Pages keyed by URL, iterated in discovery order
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pages: Vec<Page>,
    index: HashMap<String, usize>,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page; a page with a known URL replaces the old one in place
    pub fn insert(&mut self, page: Page) {
        match self.index.get(&page.url) {
            Some(&i) => self.pages[i] = page,
            None => {
                self.index.insert(page.url.clone(), self.pages.len());
                self.pages.push(page);
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&Page> {
        self.index.get(url).map(|&i| &self.pages[i])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }
}

impl FromIterator<Page> for PageSet {
    fn from_iter<I: IntoIterator<Item = Page>>(iter: I) -> Self {
        let mut set = PageSet::new();
        for page in iter {
            set.insert(page);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PageSet {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Discovers the pages of a site from its RSS feed or sitemap
pub struct Site {
    rss_url: Option<String>,
    sitemap_url: Option<String>,
    fetcher: Box<dyn FeedFetcher>,
}

impl Site {
    /// Create a site; empty feed URLs count as not configured
    pub fn new(
        rss_url: Option<String>,
        sitemap_url: Option<String>,
        fetcher: Box<dyn FeedFetcher>,
    ) -> Self {
        Self {
            rss_url: rss_url.filter(|u| !u.is_empty()),
            sitemap_url: sitemap_url.filter(|u| !u.is_empty()),
            fetcher,
        }
    }

    /// Collect the site's pages under `url_prefix`, trying RSS first and then
    /// the sitemap
    pub async fn pages(&self, url_prefix: &str) -> Result<PageSet> {
        let mut last_error = None;

        if let Some(url) = &self.rss_url {
            match self.rss(url, url_prefix).await {
                Ok(pages) => return Ok(pages),
                Err(e) => {
                    ::log::warn!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        if let Some(url) = &self.sitemap_url {
            match self.sitemap(url, url_prefix).await {
                Ok(pages) => return Ok(pages),
                Err(e) => {
                    ::log::warn!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(BridgeError::FeedUnavailable(match last_error {
            Some(e) => e.to_string(),
            None => "neither an RSS feed nor a sitemap is configured".to_string(),
        }))
    }

    /// Pages listed in the RSS feed
    pub async fn rss(&self, url: &str, url_prefix: &str) -> Result<PageSet> {
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| feed_error("RSS", url, e))?;
        let pages = feeds::parse_rss(&body, url_prefix).map_err(|e| feed_error("RSS", url, e))?;
        ::log::info!("Found {} pages in RSS feed {}", pages.len(), url);
        Ok(pages.into_iter().collect())
    }

    /// Pages listed in the sitemap
    pub async fn sitemap(&self, url: &str, url_prefix: &str) -> Result<PageSet> {
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| feed_error("sitemap", url, e))?;
        let pages =
            feeds::parse_sitemap(&body, url_prefix).map_err(|e| feed_error("sitemap", url, e))?;
        ::log::info!("Found {} pages in sitemap {}", pages.len(), url);
        Ok(pages.into_iter().collect())
    }
}

fn feed_error(kind: &'static str, url: &str, err: impl std::fmt::Display) -> BridgeError {
    BridgeError::Feed {
        kind,
        url: url.to_string(),
        reason: err.to_string(),
    }
}
