use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::de::DeError;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Deserialize;
use serde::de::Error as _;

use crate::site::Page;

/// Publish date layouts tried in order: RFC 822 and RFC 1123, each with a
/// numeric zone first and a named zone second
const RSS_DATE_LAYOUTS: [(&str, bool); 4] = [
    ("%d %b %y %H:%M %z", true),
    ("%d %b %y %H:%M %Z", false),
    ("%a, %d %b %Y %H:%M:%S %z", true),
    ("%a, %d %b %Y %H:%M:%S %Z", false),
];

#[derive(Debug, Deserialize)]
struct UrlSet {
    #[serde(rename = "url", default)]
    urls: Vec<SitemapUrl>,
}

#[derive(Debug, Deserialize)]
struct SitemapUrl {
    #[serde(default)]
    loc: String,
    #[serde(default)]
    lastmod: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Parse a sitemap document, keeping locations under `url_prefix`.
///
/// Sitemaps carry no title or description.
pub fn parse_sitemap(xml: &str, url_prefix: &str) -> Result<Vec<Page>, DeError> {
    expect_root(xml, "urlset")?;
    let sitemap: UrlSet = quick_xml::de::from_str(xml)?;
    let pages = sitemap
        .urls
        .into_iter()
        .filter_map(|entry| {
            let url = entry.loc.trim();
            if url.is_empty() || !url.starts_with(url_prefix) {
                return None;
            }
            Some(Page {
                url: url.to_string(),
                title: None,
                description: None,
                updated_at: entry.lastmod.as_deref().and_then(parse_lastmod),
            })
        })
        .collect();
    Ok(pages)
}

/// Parse an RSS 2.0 document, keeping item links under `url_prefix`
pub fn parse_rss(xml: &str, url_prefix: &str) -> Result<Vec<Page>, DeError> {
    expect_root(xml, "rss")?;
    let rss: Rss = quick_xml::de::from_str(xml)?;
    let pages = rss
        .channel
        .items
        .into_iter()
        .filter_map(|item| {
            let url = item.link.trim();
            if url.is_empty() || !url.starts_with(url_prefix) {
                return None;
            }
            Some(Page {
                url: url.to_string(),
                title: non_empty(item.title),
                description: non_empty(item.description),
                updated_at: parse_pub_date(&item.pub_date),
            })
        })
        .collect();
    Ok(pages)
}

/// Fail unless the document element is `expected`, e.g. for a sitemap index
/// served where a sitemap was configured
fn expect_root(xml: &str, expected: &str) -> Result<(), DeError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.local_name();
                let name = String::from_utf8_lossy(name.as_ref());
                return if name == expected {
                    Ok(())
                } else {
                    Err(DeError::custom(format!(
                        "expected <{expected}> document, found <{name}>"
                    )))
                };
            }
            Ok(Event::Eof) => {
                return Err(DeError::custom(format!(
                    "expected <{expected}> document, found no element"
                )));
            }
            Ok(_) => {}
            Err(e) => return Err(DeError::custom(e)),
        }
    }
}

/// Parse an RSS `pubDate`; unknown layouts yield no timestamp
pub fn parse_pub_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    RSS_DATE_LAYOUTS.iter().find_map(|(layout, numeric_zone)| {
        if *numeric_zone {
            DateTime::parse_from_str(value, layout)
                .ok()
                .map(|t| t.with_timezone(&Utc))
        } else {
            // Zone names are skipped and read as UTC
            NaiveDateTime::parse_from_str(value, layout)
                .ok()
                .map(|t| t.and_utc())
        }
    })
}

/// Parse a sitemap `lastmod`, which is either a full timestamp or a date
fn parse_lastmod(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|t| t.and_utc())
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
