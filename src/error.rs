use thiserror::Error;

use crate::config::ConfigError;

/// Result type used throughout the crate
pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

/// Errors raised while synchronizing pages and discussions
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The opener template carries no `{{ .URL }}` placeholder
    #[error("could not find {{{{ .URL }}}} anywhere in the opener {0:?}")]
    MalformedTemplate(String),

    /// A single feed could not be fetched or parsed
    #[error("{kind} feed {url}: {reason}")]
    Feed {
        kind: &'static str,
        url: String,
        reason: String,
    },

    /// Neither the RSS nor the sitemap feed produced pages
    #[error("could not get pages: {0}")]
    FeedUnavailable(String),

    /// The discussion service was unreachable or rejected a query/mutation
    #[error("remote query failed: {0}")]
    RemoteQuery(String),

    /// The discussion map could not be written
    #[error("could not save discussions: {0}")]
    Serialization(String),

    /// Configuration was rejected before any work started
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(
        "could not find any categories. please ensure that discussions are enabled and there is at least one category"
    )]
    NoCategories,

    #[error("could not find discussion category with name {0:?}")]
    CategoryNotFound(String),
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        BridgeError::RemoteQuery(err.to_string())
    }
}
