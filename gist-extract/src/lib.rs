//! Page acquisition and visible-text reduction.
//!
//! [`fetch_visible_text`] downloads a single URL and flattens the returned
//! HTML to the text a reader would actually see: script/style/head/title/meta
//! content and comments are dropped, everything else is trimmed and joined
//! in document order. Headings, links, and layout are deliberately not
//! preserved; the output feeds an LLM prompt, not a renderer.

use gist_common::{GistError, Result};
use gist_http::HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scraper::{Html, Node};

/// Some servers answer 403 to requests without a browser-like agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Tags whose text content never renders.
const HIDDEN_PARENTS: [&str; 5] = ["style", "script", "head", "title", "meta"];

/// Download `url` and return its body as text.
///
/// Non-2xx statuses and transport failures are fatal; there is no retry.
pub async fn fetch_page(url: &str) -> Result<String> {
    let client = HttpClient::new(url).map_err(|e| GistError::Fetch(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    let body = client
        .get_text(url, headers)
        .await
        .map_err(|e| GistError::Fetch(e.to_string()))?;

    tracing::info!(url, body_len = body.len(), "page.fetched");
    Ok(body)
}

/// Reduce an HTML document to its visible text.
///
/// The parser degrades gracefully on malformed markup, so this extracts
/// whatever the tree still contains. A text node survives only when its
/// nearest element ancestor renders; fragments are trimmed and empties
/// dropped before joining with single spaces.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut fragments: Vec<&str> = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let parent_tag = node.ancestors().find_map(|a| match a.value() {
            Node::Element(el) => Some(el.name()),
            _ => None,
        });

        // Text hanging directly off the document root does not render either.
        let visible = matches!(parent_tag, Some(tag) if !HIDDEN_PARENTS.contains(&tag));
        if !visible {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            fragments.push(trimmed);
        }
    }

    fragments.join(" ")
}

/// Convenience pipeline step: fetch, then flatten.
pub async fn fetch_visible_text(url: &str) -> Result<String> {
    let html = fetch_page(url).await?;
    let text = visible_text(&html);
    tracing::info!(url, text_len = text.len(), "page.text_extracted");
    Ok(text)
}
