use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{BridgeError, Result};

/// A single rejected configuration field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
}

/// All problems found while validating a [`BridgeConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigError {
    pub errors: Vec<FieldError>,
}

impl ConfigError {
    fn add(&mut self, field: &'static str, value: &str, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            value: value.to_string(),
            reason: reason.into(),
        });
    }

    fn empty(&mut self, field: &'static str, value: &str) {
        self.add(field, value, "must not be empty");
    }

    /// Whether the given field was rejected
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> std::result::Result<(), ConfigError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error:")?;
        for e in &self.errors {
            write!(f, " {} ({:?}) {};", e.field, e.value, e.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

/// The event that triggered a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// New content was pushed: create discussions for unsynced pages
    Push,
    /// A discussion changed: rewrite the discussion map
    Discussion,
    /// A discussion comment changed: rewrite the discussion map
    DiscussionComment,
    /// Anything else, kept for reporting
    Other(String),
}

impl Trigger {
    pub fn from_event_name(name: &str) -> Self {
        match name {
            "push" => Trigger::Push,
            "discussion" => Trigger::Discussion,
            "discussion_comment" => Trigger::DiscussionComment,
            other => Trigger::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Trigger::Push => "push",
            Trigger::Discussion => "discussion",
            Trigger::DiscussionComment => "discussion_comment",
            Trigger::Other(name) => name,
        }
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Repository owner (user or organization)
    #[serde(default)]
    pub repo_owner: String,

    /// Repository name
    #[serde(default)]
    pub repo_name: String,

    /// Token used against the GraphQL API
    #[serde(default, skip_serializing)]
    pub token: String,

    /// Discussion category holding the page discussions
    #[serde(default = "default_category_name")]
    pub category_name: String,

    /// Opener template seeding every new discussion
    #[serde(default = "default_discussion_opener")]
    pub discussion_opener: String,

    /// Where the page to discussion map is written
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// RSS feed of the site (tried first)
    #[serde(default)]
    pub site_rss_url: Option<String>,

    /// Sitemap of the site (fallback)
    #[serde(default)]
    pub site_map_url: Option<String>,

    /// Only pages whose URL starts with this prefix are considered
    #[serde(default = "default_site_url_prefix")]
    pub site_url_prefix: String,

    /// Name of the triggering event, e.g. "push"
    #[serde(default)]
    pub event_name: String,

    /// Path to the triggering event's payload
    #[serde(default)]
    pub event_path: String,

    /// GraphQL endpoint of the discussion service
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// Number of discussions fetched per request; all pages are followed
    #[serde(default = "default_max_discussions")]
    pub max_discussions: u32,

    /// Maximum number of comments fetched per discussion
    #[serde(default = "default_max_comments")]
    pub max_comments: u32,

    /// Timeout for every HTTP request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log drafted discussions instead of creating them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_category_name() -> String {
    "Blog".to_string()
}

fn default_discussion_opener() -> String {
    "Blog post: {{ .URL }}".to_string()
}

fn default_output_file() -> PathBuf {
    PathBuf::from("data/discussions.json")
}

fn default_site_url_prefix() -> String {
    "http".to_string()
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_max_discussions() -> u32 {
    100
}

fn default_max_comments() -> u32 {
    50
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            repo_owner: String::new(),
            repo_name: String::new(),
            token: String::new(),
            category_name: default_category_name(),
            discussion_opener: default_discussion_opener(),
            output_file: default_output_file(),
            site_rss_url: None,
            site_map_url: None,
            site_url_prefix: default_site_url_prefix(),
            event_name: String::new(),
            event_path: String::new(),
            graphql_url: default_graphql_url(),
            max_discussions: default_max_discussions(),
            max_comments: default_max_comments(),
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| invalid_file(path, e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| invalid_file(path, e))?;
        Self::from_json(&contents).map_err(|e| invalid_file(path, e))
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Split a `owner/name` repository slug into owner and name
    pub fn set_repository(&mut self, slug: &str) -> std::result::Result<(), ConfigError> {
        match slug.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] => {
                self.repo_owner = owner.to_string();
                self.repo_name = name.to_string();
                Ok(())
            }
            _ => {
                let mut errors = ConfigError::default();
                let reason = "repository uses incorrect format, want {owner}/{repo}";
                errors.add("repo_owner", slug, reason);
                errors.add("repo_name", slug, reason);
                Err(errors)
            }
        }
    }

    /// The trigger kind parsed from the event name
    pub fn trigger(&self) -> Trigger {
        Trigger::from_event_name(&self.event_name)
    }

    /// Check every field and report all problems at once
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let mut errors = ConfigError::default();
        if self.repo_name.is_empty() {
            errors.empty("repo_name", &self.repo_name);
        }
        if self.repo_owner.is_empty() {
            errors.empty("repo_owner", &self.repo_owner);
        }
        if self.category_name.is_empty() {
            errors.empty("category_name", &self.category_name);
        }
        if self.output_file.as_os_str().is_empty() {
            errors.empty("output_file", "");
        }
        if self.discussion_opener.is_empty() {
            errors.empty("discussion_opener", &self.discussion_opener);
        }

        let rss = self.site_rss_url.as_deref().filter(|u| !u.is_empty());
        let sitemap = self.site_map_url.as_deref().filter(|u| !u.is_empty());
        if rss.is_none() && sitemap.is_none() {
            errors.empty("site_map_url", "");
            errors.empty("site_rss_url", "");
        }
        for (field, value) in [("site_map_url", sitemap), ("site_rss_url", rss)] {
            if let Some(value) = value {
                if !value.starts_with("http") || Url::parse(value).is_err() {
                    errors.add(field, value, "must be a valid URL (starting with http)");
                }
            }
        }
        errors.into_result()
    }
}

fn invalid_file(path: &Path, err: impl fmt::Display) -> BridgeError {
    let mut errors = ConfigError::default();
    errors.add("config", &path.display().to_string(), err.to_string());
    BridgeError::Config(errors)
}
