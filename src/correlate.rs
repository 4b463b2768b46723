use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{BridgeError, Result};
use crate::model::Discussion;
use crate::opener::Opener;

/// Discussions keyed by the URL of the page they were opened for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteDiscussions {
    discussions: BTreeMap<String, Discussion>,
}

impl SiteDiscussions {
    /// Relate discussions to pages by extracting the opener URL from each body.
    ///
    /// Discussions without an opener are skipped. When two discussions name the
    /// same page, the later one replaces the earlier one; this is logged but
    /// otherwise left alone.
    pub fn relate(discussions: &[Discussion], opener: &Opener) -> Self {
        let mut related = BTreeMap::new();
        for discussion in discussions {
            let Some(url) = opener.extract(&discussion.message.body) else {
                ::log::debug!(
                    "Discussion {:?} carries no opener, skipping",
                    discussion.title
                );
                continue;
            };
            if let Some(previous) = related.insert(url.clone(), discussion.clone()) {
                ::log::warn!(
                    "Discussions {} and {} both claim {}, keeping the latter",
                    previous.message.url,
                    discussion.message.url,
                    url
                );
            }
        }
        Self {
            discussions: related,
        }
    }

    pub fn has_page(&self, url: &str) -> bool {
        self.discussions.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&Discussion> {
        self.discussions.get(url)
    }

    /// Page URLs with a discussion, sorted
    pub fn urls(&self) -> Vec<&str> {
        self.discussions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.discussions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discussions.is_empty()
    }

    /// Write the map as a JSON object keyed by page URL, creating parent
    /// directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec(&self.discussions)
            .map_err(|e| BridgeError::Serialization(format!("could not marshal JSON: {e}")))?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                BridgeError::Serialization(format!(
                    "could not create directories for {}: {e}",
                    path.display()
                ))
            })?;
        }
        fs::write(path, data).map_err(|e| {
            BridgeError::Serialization(format!("could not write {}: {e}", path.display()))
        })?;

        ::log::info!("Wrote {} discussions to {}", self.len(), path.display());
        Ok(())
    }
}
