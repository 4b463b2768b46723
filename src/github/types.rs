//! Typed shapes of the GitHub GraphQL discussion API.

use serde::{Deserialize, Serialize};

/// A node list with its total count
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
    #[serde(default)]
    pub total_count: u32,
    /// Only requested for connections that are paged through
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            total_count: 0,
            page_info: PageInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Only the total count of a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Count {
    #[serde(default)]
    pub total_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub login: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    /// Free-text reaction identifier, e.g. `THUMBS_UP`
    pub content: String,
    /// Absent when the reacting account was deleted
    pub user: Option<Actor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub url: String,
    pub author: Option<Actor>,
    #[serde(default)]
    pub author_association: String,
    pub body: String,
    #[serde(default)]
    pub upvote_count: i64,
    #[serde(default)]
    pub reactions: Connection<Reaction>,
    #[serde(default)]
    pub replies: Count,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub url: String,
    pub title: String,
    pub body: String,
    pub author: Option<Actor>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub upvote_count: i64,
    #[serde(default)]
    pub comments: Connection<Comment>,
    #[serde(default)]
    pub reactions: Connection<Reaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub emoji: String,
    pub name: String,
}

/// Find the first category with exactly this name
pub fn category_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.name == name)
}

/// Request body of every GraphQL call
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// Response envelope of every GraphQL call
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RepositoryVars<'a> {
    pub owner: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesVars<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub first_categories: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionsVars<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub category_id: &'a str,
    /// Cursor of the last discussion already fetched
    pub after: Option<&'a str>,
    pub first_discussions: u32,
    pub first_comments: u32,
    pub first_reactions: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionInput<'a> {
    pub repository_id: &'a str,
    pub category_id: &'a str,
    pub title: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateDiscussionVars<'a> {
    pub input: CreateDiscussionInput<'a>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryData<R> {
    pub repository: Option<R>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCategories {
    pub discussion_categories: Connection<Category>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryDiscussions {
    pub discussions: Connection<Discussion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionData {
    pub create_discussion: CreateDiscussionPayload,
}

#[derive(Debug, Deserialize)]
pub struct CreateDiscussionPayload {
    pub discussion: CreatedDiscussion,
}

#[derive(Debug, Deserialize)]
pub struct CreatedDiscussion {
    pub id: String,
}
