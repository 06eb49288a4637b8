//! Turn search results into one bounded blob of plain text.

use futures::future::join_all;
use scraper::{Html, Node};
use tracing::{debug, info, warn};

use super::stage::{DegradeReason, Stage, StageResult};
use super::types::truncate_chars;
use crate::kernel::{BasePageFetcher, SearchResult};

/// Elements whose text is never page content.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements that break a line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "title", "tr", "ul",
];

/// Fetch every result's page (concurrently, one attempt each), keep the first
/// `page_char_budget` characters of its cleaned text, and join the fragments
/// in rank order. Failed pages are skipped; if all fail the stage degrades and
/// the payload is the empty string.
pub async fn extract(
    fetcher: &dyn BasePageFetcher,
    results: &[SearchResult],
    page_char_budget: usize,
) -> StageResult<String> {
    if results.is_empty() {
        return StageResult::Completed(String::new());
    }

    let fragments = join_all(
        results
            .iter()
            .map(|result| extract_page(fetcher, &result.url, page_char_budget)),
    )
    .await;

    let fetched = fragments.iter().filter(|f| f.is_some()).count();
    let content = fragments
        .into_iter()
        .flatten()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    info!(
        pages_requested = results.len(),
        pages_fetched = fetched,
        content_chars = content.chars().count(),
        "Content extracted"
    );

    if fetched == 0 {
        return StageResult::degraded(
            Stage::Extraction,
            DegradeReason::Transport(format!("all {} page fetches failed", results.len())),
        );
    }

    StageResult::Completed(content)
}

/// `None` when the page could not be fetched.
async fn extract_page(fetcher: &dyn BasePageFetcher, url: &str, budget: usize) -> Option<String> {
    match fetcher.fetch(url).await {
        Ok(html) => {
            let text = html_to_text(&html);
            debug!(url = %url, chars = text.chars().count(), "Page text extracted");
            Some(truncate_chars(&text, budget).to_string())
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Skipping page");
            None
        }
    }
}

/// Visible text of an HTML document with whitespace runs collapsed.
///
/// Text nodes are concatenated as-is so inline markup (`H<sub>2</sub>O`)
/// keeps words whole; block elements start and end on a word boundary.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();

    for node in document.tree.root().descendants() {
        match node.value() {
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => raw.push(' '),
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                });
                if hidden {
                    continue;
                }
                let after_block = node
                    .prev_sibling()
                    .and_then(|sibling| sibling.value().as_element())
                    .is_some_and(|el| BLOCK_ELEMENTS.contains(&el.name()));
                if after_block {
                    raw.push(' ');
                }
                raw.push_str(text);
            }
            _ => {}
        }
    }

    collapse_whitespace(&raw)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockPageFetcher;

    fn results(urls: &[&str]) -> Vec<SearchResult> {
        urls.iter()
            .map(|url| SearchResult::new("title", *url))
            .collect()
    }

    #[test]
    fn test_html_to_text_strips_markup_and_scripts() {
        let html = r#"
            <html>
              <head><title>Tides</title><style>body { color: red; }</style></head>
              <body>
                <script>var tracking = true;</script>
                <h1>Ocean   tides</h1>
                <p>Caused by the
                   <b>Moon</b>.</p>
                <noscript>Enable JS</noscript>
              </body>
            </html>"#;

        assert_eq!(html_to_text(html), "Tides Ocean tides Caused by the Moon.");
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let html = "<p>H<sub>2</sub>O is <b>w</b>ater. <a href='#'>Link</a>, then.</p>";

        assert_eq!(html_to_text(html), "H2O is water. Link, then.");
    }

    #[test]
    fn test_block_elements_separate_words() {
        let html = "<div><p>one</p>two</div><ul><li>a</li><li>b</li></ul>line<br>break";

        assert_eq!(html_to_text(html), "one two a b line break");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a\n\n\tb   c "), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[tokio::test]
    async fn test_pages_are_truncated_to_budget() {
        let long_body = format!("<p>{}</p>", "x".repeat(5000));
        let fetcher = MockPageFetcher::new().with_page("https://a.example", &long_body);

        let content = extract(&fetcher, &results(&["https://a.example"]), 1000)
            .await
            .into_payload();

        assert_eq!(content.chars().count(), 1000);
    }

    #[tokio::test]
    async fn test_all_fetches_failing_yields_empty_string() {
        let fetcher = MockPageFetcher::new();

        let outcome = extract(
            &fetcher,
            &results(&["https://a.example", "https://b.example"]),
            1000,
        )
        .await;

        assert!(outcome.is_degraded());
        assert_eq!(outcome.into_payload(), "");
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_one_failure_keeps_the_others_in_order() {
        let fetcher = MockPageFetcher::new()
            .with_page("https://a.example", "<p>first page</p>")
            .with_page("https://c.example", "<p>third page</p>");

        let outcome = extract(
            &fetcher,
            &results(&["https://a.example", "https://b.example", "https://c.example"]),
            1000,
        )
        .await;

        assert_eq!(outcome, StageResult::Completed("first page third page".to_string()));
    }

    #[tokio::test]
    async fn test_no_results_is_empty_without_fetching() {
        let fetcher = MockPageFetcher::new();

        let outcome = extract(&fetcher, &[], 1000).await;

        assert_eq!(outcome, StageResult::Completed(String::new()));
        assert!(fetcher.calls().is_empty());
    }
}
