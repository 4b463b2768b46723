use clap::Parser;
use page_discussions::config::BridgeConfig;
use page_discussions::error::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-discussions")]
#[command(about = "Keeps one discussion per site page and exports the page to discussion map")]
#[command(version)]
pub struct Args {
    /// JSON configuration file; replaces all other options when given
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Repository holding the discussions, as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY", default_value = "")]
    pub repository: String,

    /// Token for the GraphQL API
    #[arg(long, env = "REPO_TOKEN", hide_env_values = true, default_value = "")]
    pub token: String,

    /// Discussion category holding the page discussions
    #[arg(long, env = "CATEGORY_NAME", default_value = "Blog")]
    pub category_name: String,

    /// Opener every new discussion starts with; must contain {{ .URL }}
    #[arg(long, env = "DISCUSSION_OPENER", default_value = "Blog post: {{ .URL }}")]
    pub discussion_opener: String,

    /// Where the page to discussion map is written
    #[arg(long, env = "OUTPUT_FILE", default_value = "data/discussions.json")]
    pub output_file: PathBuf,

    /// RSS feed of the site (tried first)
    #[arg(long, env = "SITE_RSS_URL")]
    pub site_rss_url: Option<String>,

    /// Sitemap of the site (used when the RSS feed fails)
    #[arg(long, env = "SITE_MAP_URL")]
    pub site_map_url: Option<String>,

    /// Only pages whose URL starts with this prefix get a discussion
    #[arg(long, env = "SITE_URL_PREFIX", default_value = "http")]
    pub site_url_prefix: String,

    /// Name of the triggering event (push, discussion, discussion_comment)
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    pub event_name: String,

    /// Path to the triggering event's payload
    #[arg(long, env = "GITHUB_EVENT_PATH", default_value = "")]
    pub event_path: String,

    /// GraphQL endpoint of the discussion service
    #[arg(
        long,
        env = "GITHUB_GRAPHQL_URL",
        default_value = "https://api.github.com/graphql"
    )]
    pub graphql_url: String,

    /// Number of discussions fetched per request
    #[arg(long, default_value_t = 100)]
    pub max_discussions: u32,

    /// Maximum number of comments fetched per discussion
    #[arg(long, default_value_t = 50)]
    pub max_comments: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Log the discussions that would be created without creating them
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// Resolve the configuration for this run
    pub fn into_config(self) -> Result<BridgeConfig> {
        if let Some(path) = &self.config {
            return BridgeConfig::from_file(path);
        }

        let mut config = BridgeConfig {
            token: self.token,
            category_name: self.category_name,
            discussion_opener: self.discussion_opener,
            output_file: self.output_file,
            site_rss_url: self.site_rss_url,
            site_map_url: self.site_map_url,
            site_url_prefix: self.site_url_prefix,
            event_name: self.event_name,
            event_path: self.event_path,
            graphql_url: self.graphql_url,
            max_discussions: self.max_discussions,
            max_comments: self.max_comments,
            timeout_secs: self.timeout,
            dry_run: self.dry_run,
            ..BridgeConfig::default()
        };
        // Owner and name stay empty on a malformed slug; validation reports them
        if let Err(e) = config.set_repository(&self.repository) {
            ::log::warn!("{}", e);
        }
        Ok(config)
    }
}
