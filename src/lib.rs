//! Keeps a discussion thread per page of a static site and exports which
//! discussion belongs to which page.
//!
//! Pages come from the site's RSS feed or sitemap. Every discussion is opened
//! with a templated line naming the page URL (the *opener*), which is read
//! back to relate existing discussions to their pages.

pub mod bridge;
pub mod config;
pub mod correlate;
pub mod error;
pub mod github;
pub mod model;
pub mod normalize;
pub mod opener;
pub mod reconcile;
pub mod site;

// Re-export commonly used types for convenience
pub use bridge::{Bridge, RunOutcome, SyncReport};
pub use config::{BridgeConfig, Trigger};
pub use correlate::SiteDiscussions;
pub use error::{BridgeError, Result};
pub use model::{Comment, Discussion, EmojiCode, Message};
pub use opener::Opener;
pub use site::{Page, PageSet, Site};
