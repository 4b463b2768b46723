use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{BridgeError, Result};
use crate::github::DiscussionSource;
use crate::github::types::*;

const CATEGORIES_QUERY: &str = r#"
query($owner: String!, $name: String!, $firstCategories: Int!) {
  repository(owner: $owner, name: $name) {
    discussionCategories(first: $firstCategories) {
      totalCount
      nodes { id emoji name }
    }
  }
}"#;

const DISCUSSIONS_QUERY: &str = r#"
query($owner: String!, $name: String!, $categoryId: ID!, $after: String, $firstDiscussions: Int!, $firstComments: Int!, $firstReactions: Int!) {
  repository(owner: $owner, name: $name) {
    discussions(first: $firstDiscussions, after: $after, categoryId: $categoryId, orderBy: {field: UPDATED_AT, direction: DESC}) {
      totalCount
      pageInfo { hasNextPage endCursor }
      nodes {
        url
        title
        body
        locked
        upvoteCount
        author { login url avatarUrl(size: 64) }
        comments(first: $firstComments) {
          totalCount
          nodes {
            url
            authorAssociation
            body
            upvoteCount
            author { login url avatarUrl(size: 64) }
            reactions(first: $firstReactions) {
              totalCount
              nodes { content user { login url avatarUrl(size: 64) } }
            }
            replies { totalCount }
          }
        }
        reactions(first: $firstReactions) {
          totalCount
          nodes { content user { login url avatarUrl(size: 64) } }
        }
      }
    }
  }
}"#;

const REPOSITORY_ID_QUERY: &str = r#"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) { id }
}"#;

const CREATE_DISCUSSION_MUTATION: &str = r#"
mutation($input: CreateDiscussionInput!) {
  createDiscussion(input: $input) {
    discussion { id }
  }
}"#;

/// GraphQL client for a repository's discussions
pub struct GitHubClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    owner: String,
    repo: String,

    max_categories: u32,
    max_discussions: u32,
    max_comments: u32,
    max_reactions: u32,
}

impl GitHubClient {
    /// Create a client for `owner/repo` authenticated with `token`
    pub fn new(
        endpoint: &str,
        token: &str,
        owner: &str,
        repo: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            max_categories: 100,
            max_discussions: 100,
            max_comments: 50,
            max_reactions: 50,
        })
    }

    /// Set how many discussions are fetched per request
    pub fn with_max_discussions(mut self, n: u32) -> Self {
        self.max_discussions = n;
        self
    }

    /// Set how many comments are fetched per discussion
    pub fn with_max_comments(mut self, n: u32) -> Self {
        self.max_comments = n;
        self
    }

    async fn query<V, T>(&self, query: &str, variables: V) -> Result<T>
    where
        V: Serialize + Send,
        T: DeserializeOwned + Send,
    {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_response(status, &body)
    }

    fn repository<R>(&self, data: RepositoryData<R>) -> Result<R> {
        data.repository.ok_or_else(|| {
            BridgeError::RemoteQuery(format!(
                "could not resolve repository {}/{}",
                self.owner, self.repo
            ))
        })
    }

    async fn repository_id(&self) -> Result<String> {
        let data: RepositoryData<RepositoryId> = self
            .query(
                REPOSITORY_ID_QUERY,
                RepositoryVars {
                    owner: &self.owner,
                    name: &self.repo,
                },
            )
            .await?;
        Ok(self.repository(data)?.id)
    }
}

#[async_trait]
impl DiscussionSource for GitHubClient {
    async fn categories(&self) -> Result<Vec<Category>> {
        let data: RepositoryData<RepositoryCategories> = self
            .query(
                CATEGORIES_QUERY,
                CategoriesVars {
                    owner: &self.owner,
                    name: &self.repo,
                    first_categories: self.max_categories,
                },
            )
            .await?;
        Ok(self.repository(data)?.discussion_categories.nodes)
    }

    async fn discussions(&self, category_id: &str) -> Result<Vec<Discussion>> {
        let discussions = collect_pages(|after| async move {
            let data: RepositoryData<RepositoryDiscussions> = self
                .query(
                    DISCUSSIONS_QUERY,
                    DiscussionsVars {
                        owner: &self.owner,
                        name: &self.repo,
                        category_id,
                        after: after.as_deref(),
                        first_discussions: self.max_discussions,
                        first_comments: self.max_comments,
                        first_reactions: self.max_reactions,
                    },
                )
                .await?;
            Ok(self.repository(data)?.discussions)
        })
        .await
        .map_err(|e| context(e, "could not fetch discussions"))?;
        ::log::debug!("Fetched {} discussions", discussions.len());
        Ok(discussions)
    }

    async fn create_discussion(&self, category_id: &str, title: &str, body: &str) -> Result<String> {
        let repository_id = self
            .repository_id()
            .await
            .map_err(|e| context(e, "could not get repository ID"))?;

        let data: CreateDiscussionData = self
            .query(
                CREATE_DISCUSSION_MUTATION,
                CreateDiscussionVars {
                    input: CreateDiscussionInput {
                        repository_id: &repository_id,
                        category_id,
                        title,
                        body,
                    },
                },
            )
            .await
            .map_err(|e| context(e, "could not create discussion"))?;
        Ok(data.create_discussion.discussion.id)
    }
}

/// Turn a GraphQL HTTP response into its data.
///
/// A non-success status, an `errors` array or a missing `data` member all
/// fail with `RemoteQuery`.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        return Err(BridgeError::RemoteQuery(format!("HTTP {status}: {body}")));
    }
    let envelope: GraphQlResponse<T> = serde_json::from_str(body)
        .map_err(|e| BridgeError::RemoteQuery(format!("could not decode response: {e}")))?;
    if !envelope.errors.is_empty() {
        let messages: Vec<_> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(BridgeError::RemoteQuery(messages.join("; ")));
    }
    envelope
        .data
        .ok_or_else(|| BridgeError::RemoteQuery("response carried no data".to_string()))
}

/// Follow a connection's cursors until its last page
async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Connection<T>>>,
{
    let mut nodes = Vec::new();
    let mut cursor = None;
    loop {
        let page = fetch_page(cursor.take()).await?;
        let fetched = page.nodes.len();
        nodes.extend(page.nodes);
        if !page.page_info.has_next_page {
            if page.total_count as usize > nodes.len() {
                ::log::warn!(
                    "Fetched {} items but {} were reported",
                    nodes.len(),
                    page.total_count
                );
            }
            return Ok(nodes);
        }
        match page.page_info.end_cursor {
            Some(next) if fetched > 0 => cursor = Some(next),
            _ => {
                return Err(BridgeError::RemoteQuery(format!(
                    "fetched {} of {} items, but the rest cannot be paged to",
                    nodes.len(),
                    page.total_count
                )));
            }
        }
    }
}

fn context(err: BridgeError, what: &str) -> BridgeError {
    match err {
        BridgeError::RemoteQuery(reason) => BridgeError::RemoteQuery(format!("{what}: {reason}")),
        other => other,
    }
}
