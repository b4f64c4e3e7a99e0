use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

// ── Lazy static selectors ────────────────────────────────────────────────────

static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search term must not be empty")]
    EmptyTerm,
    #[error("{0}")]
    Request(String),
}

// ── Providers ────────────────────────────────────────────────────────────────

/// A photo site whose search-results markup we scrape for image URLs.
/// Providers differ only in endpoint template and filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Unsplash,
    AdobeStock,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Unsplash, Provider::AdobeStock];

    /// Build the search-results URL for this provider with the term escaped.
    pub fn search_url(&self, term: &str) -> String {
        match self {
            Provider::Unsplash => {
                let mut url = Url::parse("https://unsplash.com/s/photos").unwrap();
                url.path_segments_mut().unwrap().push(term);
                url.to_string()
            }
            Provider::AdobeStock => {
                let mut url = Url::parse("https://stock.adobe.com/search").unwrap();
                url.query_pairs_mut()
                    .append_pair("k", term)
                    .append_pair("search_type", "usertyped");
                url.to_string()
            }
        }
    }

    /// Apply this provider's filter to one `img` element, returning the
    /// accepted `src` value. Absent attributes fail the filter, never error.
    fn candidate<'a>(&self, el: ElementRef<'a>) -> Option<&'a str> {
        match self {
            Provider::Unsplash => {
                let src = el.value().attr("src")?;
                if src.ends_with(".svg") || !src.starts_with("https://") {
                    return None;
                }
                // Icon-sized thumbnails declare height="16" or "32";
                // elements without a declared height are excluded too.
                let height = el.value().attr("height")?;
                if height == "16" || height == "32" {
                    return None;
                }
                Some(src)
            }
            Provider::AdobeStock => {
                // Result thumbnails carry the "img" marker class.
                if !el.value().classes().any(|c| c == "img") {
                    return None;
                }
                let src = el.value().attr("src")?;
                src.starts_with("https://").then_some(src)
            }
        }
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Run every provider for one term and union the resulting URL sets.
/// A search-page fetch failing on either provider aborts the whole run.
pub async fn extract_all(
    client: &reqwest::Client,
    term: &str,
) -> Result<HashSet<String>, SearchError> {
    if term.is_empty() {
        return Err(SearchError::EmptyTerm);
    }
    let mut urls = HashSet::new();
    for provider in Provider::ALL {
        urls.extend(extract(client, provider, term).await?);
    }
    Ok(urls)
}

/// Fetch one provider's search page and extract its candidate URL set.
pub async fn extract(
    client: &reqwest::Client,
    provider: Provider,
    term: &str,
) -> Result<HashSet<String>, SearchError> {
    let url = provider.search_url(term);
    let html = fetch_search_page(client, &url).await?;
    let urls = extract_from_html(provider, &html);
    tracing::info!(?provider, candidates = urls.len(), "extracted candidate urls");
    Ok(urls)
}

// ── HTTP fetch ───────────────────────────────────────────────────────────────

/// One plain GET: no custom headers, no timeout override, no retry. The body
/// is parsed whatever the status code; only transport failures abort.
async fn fetch_search_page(
    client: &reqwest::Client,
    url: &str,
) -> Result<String, SearchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(classify_request_error)?;

    response
        .text()
        .await
        .map_err(|e| SearchError::Request(e.to_string()))
}

fn classify_request_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Request(format!("TimeoutError: {}", e))
    } else if e.is_connect() {
        SearchError::Request(format!("ConnectError: {}", e))
    } else {
        SearchError::Request(format!("RequestError: {}", e))
    }
}

// ── Markup scan ──────────────────────────────────────────────────────────────

/// Collect every `img` element in the markup and keep the sources that pass
/// the provider's filter. Exact-string set semantics: repeated identical tags
/// collapse to one entry.
pub fn extract_from_html(provider: Provider, html: &str) -> HashSet<String> {
    let document = Html::parse_document(html);
    document
        .select(&IMG_SELECTOR)
        .filter_map(|el| provider.candidate(el))
        .map(str::to_string)
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(provider: Provider, html: &str) -> HashSet<String> {
        extract_from_html(provider, html)
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unsplash_keeps_only_https_non_svg_non_icon_sources() {
        let html = r#"
            <html><body>
                <img src="https://x/a.jpg" height="16">
                <img src="https://x/b.jpg" height="64">
                <img src="https://x/c.svg" height="64">
            </body></html>"#;
        assert_eq!(urls(Provider::Unsplash, html), set(&["https://x/b.jpg"]));
    }

    #[test]
    fn unsplash_requires_https_prefix() {
        let html = r#"
            <img src="http://x/a.jpg" height="64">
            <img src="/static/b.jpg" height="64">
            <img src="data:image/png;base64,AAAA" height="64">"#;
        assert!(urls(Provider::Unsplash, html).is_empty());
    }

    #[test]
    fn unsplash_excludes_both_declared_icon_heights() {
        let html = r#"
            <img src="https://x/a.jpg" height="16">
            <img src="https://x/b.jpg" height="32">
            <img src="https://x/c.jpg" height="48">"#;
        assert_eq!(urls(Provider::Unsplash, html), set(&["https://x/c.jpg"]));
    }

    #[test]
    fn unsplash_skips_elements_missing_src_or_height() {
        let html = r#"
            <img height="64">
            <img src="https://x/a.jpg">
            <img>"#;
        assert!(urls(Provider::Unsplash, html).is_empty());
    }

    #[test]
    fn repeated_identical_tags_collapse_to_one_entry() {
        let html = r#"
            <img src="https://x/a.jpg" height="64">
            <img src="https://x/a.jpg" height="64">
            <img src="https://x/a.jpg" height="64">"#;
        assert_eq!(urls(Provider::Unsplash, html).len(), 1);
    }

    #[test]
    fn adobe_stock_requires_the_marker_class() {
        let html = r#"
            <img src="https://x/a.jpg">
            <img class="thumb img" src="https://x/b.jpg">
            <img class="imgs" src="https://x/c.jpg">
            <img class="img" src="/relative/d.jpg">"#;
        assert_eq!(urls(Provider::AdobeStock, html), set(&["https://x/b.jpg"]));
    }

    #[test]
    fn adobe_stock_does_not_filter_on_height() {
        let html = r#"<img class="img" src="https://x/a.jpg" height="16">"#;
        assert_eq!(urls(Provider::AdobeStock, html), set(&["https://x/a.jpg"]));
    }

    #[test]
    fn disjoint_provider_sets_union_to_their_combined_size() {
        let a = urls(
            Provider::Unsplash,
            r#"<img src="https://x/a.jpg" height="64">
               <img src="https://x/b.jpg" height="64">"#,
        );
        let b = urls(
            Provider::AdobeStock,
            r#"<img class="img" src="https://y/c.jpg">"#,
        );
        let mut union = a.clone();
        union.extend(b.iter().cloned());
        assert_eq!(union.len(), a.len() + b.len());

        // A shared URL collapses.
        let mut overlapping = a.clone();
        overlapping.extend(a.iter().cloned());
        assert_eq!(overlapping.len(), a.len());
    }

    #[test]
    fn search_urls_escape_the_term() {
        assert_eq!(
            Provider::Unsplash.search_url("mountain lake"),
            "https://unsplash.com/s/photos/mountain%20lake"
        );
        assert_eq!(
            Provider::AdobeStock.search_url("mountain lake"),
            "https://stock.adobe.com/search?k=mountain+lake&search_type=usertyped"
        );
    }
}
