pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
pub use client::GitHubClient;
pub use types::{Category, Discussion};

/// Where discussions are read from and created in
#[async_trait]
pub trait DiscussionSource: Send + Sync {
    /// All discussion categories of the repository
    async fn categories(&self) -> Result<Vec<Category>>;

    /// Discussions of one category, most recently updated first
    async fn discussions(&self, category_id: &str) -> Result<Vec<Discussion>>;

    /// Open a new discussion and return its node ID
    async fn create_discussion(&self, category_id: &str, title: &str, body: &str)
    -> Result<String>;
}
