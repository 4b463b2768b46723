use crate::correlate::SiteDiscussions;
use crate::model::{Discussion, MARKDOWN_MIME, Message};
use crate::opener::Opener;
use crate::site::{Page, PageSet};

/// Pages without a discussion, in discovery order
pub fn find_unsynced(pages: &PageSet, discussions: &SiteDiscussions) -> Vec<Page> {
    pages
        .iter()
        .filter(|page| !discussions.has_page(&page.url))
        .cloned()
        .collect()
}

/// Draft the discussion that will be opened for a page.
///
/// Untitled pages get `"<url> - <updated at>"` as title, with `<nil>` for an
/// unknown timestamp.
pub fn draft_discussion(page: &Page, opener: &Opener) -> Discussion {
    let title = match page.title.as_deref().filter(|t| !t.is_empty()) {
        Some(title) => title.to_string(),
        None => {
            let updated_at = page
                .updated_at
                .map(|t| t.to_string())
                .unwrap_or_else(|| "<nil>".to_string());
            format!("{} - {}", page.url, updated_at)
        }
    };

    Discussion {
        message: Message {
            body: opener.render(page),
            body_mime: MARKDOWN_MIME.to_string(),
            ..Message::default()
        },
        title,
        comments: Vec::new(),
    }
}
