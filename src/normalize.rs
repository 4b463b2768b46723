//! Conversion of GitHub discussions into the independent content model.
//!
//! Only one level of comments is kept:
//!
//! ```text
//! Discussion
//! ├── Comment #1
//! ├── Comment #2   (replies: 1, only counted)
//! ```

use crate::github::types as gh;
use crate::model::{Author, Comment, Discussion, EmojiCode, MARKDOWN_MIME, Message, Reactions, User};

/// Map a GitHub reaction identifier to an emoji; unknown identifiers become
/// [`EmojiCode::ThoughtBalloon`]
pub fn normalize_reaction(content: &str) -> EmojiCode {
    match content.to_lowercase().as_str() {
        "thumbs_up" => EmojiCode::ThumbsUp,
        "thumbs_down" => EmojiCode::ThumbsDown,
        "smile" | "laugh" => EmojiCode::Smile,
        "hooray" => EmojiCode::Party,
        "confused" => EmojiCode::Confused,
        "heart" => EmojiCode::Heart,
        "rocket" => EmojiCode::Rocket,
        "eyes" => EmojiCode::Eyes,
        _ => EmojiCode::ThoughtBalloon,
    }
}

pub fn normalize_discussions(discussions: &[gh::Discussion]) -> Vec<Discussion> {
    discussions.iter().map(normalize_discussion).collect()
}

/// Discussion upvotes are not tracked and always normalize to zero
pub fn normalize_discussion(discussion: &gh::Discussion) -> Discussion {
    Discussion {
        message: Message {
            url: discussion.url.clone(),
            author: normalize_author(discussion.author.as_ref()),
            body: discussion.body.clone(),
            body_mime: MARKDOWN_MIME.to_string(),
            upvotes_count: 0,
            reactions: normalize_reactions(&discussion.reactions.nodes),
        },
        title: discussion.title.clone(),
        comments: discussion.comments.nodes.iter().map(normalize_comment).collect(),
    }
}

pub fn normalize_comment(comment: &gh::Comment) -> Comment {
    Comment {
        message: Message {
            url: comment.url.clone(),
            author: normalize_author(comment.author.as_ref()),
            body: comment.body.clone(),
            body_mime: MARKDOWN_MIME.to_string(),
            upvotes_count: comment.upvote_count,
            reactions: normalize_reactions(&comment.reactions.nodes),
        },
        comments_count: comment.replies.total_count,
    }
}

/// Deleted accounts have no author and map to an empty one
fn normalize_author(actor: Option<&gh::Actor>) -> Author {
    match actor {
        Some(actor) => Author {
            name: actor.login.clone(),
            full_name: String::new(),
            picture_url: actor.avatar_url.clone(),
        },
        None => Author::default(),
    }
}

/// Group reacting users by emoji, keeping the order they reacted in
pub fn normalize_reactions(reactions: &[gh::Reaction]) -> Reactions {
    let mut grouped = Reactions::new();
    for reaction in reactions {
        let name = reaction
            .user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_default();
        grouped
            .entry(normalize_reaction(&reaction.content))
            .or_default()
            .push(User { name });
    }
    grouped
}
