use regex::Regex;
use std::sync::LazyLock;

use crate::error::{BridgeError, Result};
use crate::site::Page;

/// Matches any placeholder, e.g. `{{ .URL }}`, `{{.Title}}`; group 1 is the name
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.(URL|Title|Description|UpdatedAt)\s*\}\}")
        .expect("valid placeholder regex")
});

/// The line every page discussion is opened with.
///
/// An opener is written once by a human, e.g. `**Blog Post**: {{ .URL }}`.
/// It is rendered with a page's attributes to author new discussion bodies,
/// and used in reverse to recover the page URL from an existing body.
#[derive(Debug, Clone)]
pub struct Opener {
    template: String,
    prefix: String,
    suffix: String,
    pattern: Regex,
}

impl Opener {
    /// Derive the rendering template and the extraction pattern.
    ///
    /// Only the first URL placeholder is captured. Literal text is matched
    /// as is; the other placeholders match any rendered value: greedily on
    /// one line in front of the URL, lazily after it, and across lines for
    /// `{{ .Description }}`.
    pub fn new(template: &str) -> Result<Self> {
        let url = PLACEHOLDER
            .captures_iter(template)
            .find(|caps| &caps[1] == "URL")
            .and_then(|caps| caps.get(0))
            .ok_or_else(|| BridgeError::MalformedTemplate(template.to_string()))?;

        let prefix = &template[..url.start()];
        let suffix = &template[url.end()..];

        let mut pattern = String::new();
        let mut literal_start = 0;
        for caps in PLACEHOLDER.captures_iter(template) {
            let Some(placeholder) = caps.get(0) else {
                continue;
            };
            pattern.push_str(&regex::escape(
                &template[literal_start..placeholder.start()],
            ));
            let wildcard = if placeholder.start() == url.start() {
                // An empty suffix must not turn the capture lazy, or it would always be empty
                if suffix.is_empty() { "(.*)" } else { "(.*?)" }
            } else if &caps[1] == "Description" {
                "(?s:.*?)"
            } else if placeholder.start() < url.start() {
                ".*"
            } else {
                ".*?"
            };
            pattern.push_str(wildcard);
            literal_start = placeholder.end();
        }
        pattern.push_str(&regex::escape(&template[literal_start..]));

        let pattern = Regex::new(&pattern)
            .map_err(|_| BridgeError::MalformedTemplate(template.to_string()))?;
        ::log::debug!("Derived opener pattern: {}", pattern.as_str());

        Ok(Self {
            template: template.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            pattern,
        })
    }

    /// Literal text in front of the URL placeholder
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Literal text after the URL placeholder
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Render the opener for a page
    pub fn render(&self, page: &Page) -> String {
        PLACEHOLDER
            .replace_all(&self.template, |caps: &regex::Captures| match &caps[1] {
                "URL" => page.url.clone(),
                "Title" => page.title.clone().unwrap_or_default(),
                "Description" => page.description.clone().unwrap_or_default(),
                _ => page
                    .updated_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_default(),
            })
            .into_owned()
    }

    /// Recover the page URL from a discussion body.
    ///
    /// Returns `None` when either anchor is missing or the captured text is empty.
    pub fn extract(&self, text: &str) -> Option<String> {
        let url = self.pattern.captures(text)?.get(1)?.as_str().trim();
        if url.is_empty() {
            None
        } else {
            Some(url.to_string())
        }
    }
}
