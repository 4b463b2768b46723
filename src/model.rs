//! Service-independent content model written to the discussion map.
//!
//! Field names follow the JSON shape consumed by the site's templates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// MIME type of every body coming from the discussion service
pub const MARKDOWN_MIME: &str = "text/markdown";

/// A reaction expressed by an emoji
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmojiCode {
    #[serde(rename = ":+1:")]
    ThumbsUp,
    #[serde(rename = ":-1:")]
    ThumbsDown,
    #[serde(rename = ":smile:")]
    Smile,
    #[serde(rename = ":tada:")]
    Party,
    #[serde(rename = ":confused:")]
    Confused,
    #[serde(rename = ":heart:")]
    Heart,
    #[serde(rename = ":rocket:")]
    Rocket,
    #[serde(rename = ":eyes:")]
    Eyes,
    /// Anything the vocabulary does not know
    #[serde(rename = ":thought_balloon:")]
    ThoughtBalloon,
}

/// Users grouped by the emoji they reacted with
pub type Reactions = BTreeMap<EmojiCode, Vec<User>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user name
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "Name")]
    pub name: String,
    /// Real name, when the service exposes one
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "PictureURL")]
    pub picture_url: String,
}

/// Anything written by an author that can receive reactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub url: String,
    pub author: Author,
    pub body: String,
    #[serde(rename = "bodyMimeType")]
    pub body_mime: String,
    /// How many times the message has been found useful
    #[serde(rename = "upvotesCount")]
    pub upvotes_count: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reactions: Reactions,
}

/// A discussion with its first level of comments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    #[serde(flatten)]
    pub message: Message,
    pub title: String,
    pub comments: Vec<Comment>,
}

/// A comment; its replies are only counted, never included
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(flatten)]
    pub message: Message,
    #[serde(
        rename = "commentsCount",
        default,
        skip_serializing_if = "is_zero"
    )]
    pub comments_count: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_discussion_json_shape() {
        let mut reactions = Reactions::new();
        reactions.insert(
            EmojiCode::Party,
            vec![User {
                name: "octocat".to_string(),
            }],
        );
        let discussion = Discussion {
            message: Message {
                url: "https://github.com/o/r/discussions/1".to_string(),
                author: Author {
                    name: "octocat".to_string(),
                    full_name: String::new(),
                    picture_url: "https://avatars.example/1".to_string(),
                },
                body: "Blog post: https://example.com/a/".to_string(),
                body_mime: MARKDOWN_MIME.to_string(),
                upvotes_count: 0,
                reactions,
            },
            title: "A".to_string(),
            comments: vec![Comment {
                message: Message {
                    body: "Nice".to_string(),
                    upvotes_count: 2,
                    ..Message::default()
                },
                comments_count: 0,
            }],
        };

        let value = serde_json::to_value(&discussion).unwrap();
        assert_eq!(
            value,
            json!({
                "url": "https://github.com/o/r/discussions/1",
                "author": {"Name": "octocat", "FullName": "", "PictureURL": "https://avatars.example/1"},
                "body": "Blog post: https://example.com/a/",
                "bodyMimeType": "text/markdown",
                "upvotesCount": 0,
                "reactions": {":tada:": [{"Name": "octocat"}]},
                "title": "A",
                "comments": [{
                    "url": "",
                    "author": {"Name": "", "FullName": "", "PictureURL": ""},
                    "body": "Nice",
                    "bodyMimeType": "",
                    "upvotesCount": 2
                }]
            })
        );
    }

    #[test]
    fn test_comment_replies_count_serialized() {
        let comment = Comment {
            comments_count: 3,
            ..Comment::default()
        };
        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["commentsCount"], 3);
    }

    #[test]
    fn test_emoji_code_names() {
        assert_eq!(serde_json::to_string(&EmojiCode::ThumbsUp).unwrap(), r#"":+1:""#);
        assert_eq!(
            serde_json::to_string(&EmojiCode::ThoughtBalloon).unwrap(),
            r#"":thought_balloon:""#
        );
        let code: EmojiCode = serde_json::from_str(r#"":tada:""#).unwrap();
        assert_eq!(code, EmojiCode::Party);
    }
}
