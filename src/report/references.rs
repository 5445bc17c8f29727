use std::collections::HashSet;

use crate::search::SearchHit;

/// Every HTTP(S) URL in `text`, in order of appearance.
///
/// Markdown link syntax and trailing sentence punctuation are stripped, so
/// `[site](https://a.test/x).` yields `https://a.test/x`.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = text;

    loop {
        let start = match (rest.find("https://"), rest.find("http://")) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => break,
        };
        let url_part = &rest[start..];
        let end = url_part
            .find(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '`'))
            .unwrap_or(url_part.len());
        let url = trim_url(&url_part[..end]);
        if url.len() > "https://".len() {
            urls.push(url.to_string());
        }
        rest = &url_part[end..];
    }

    urls
}

fn trim_url(url: &str) -> &str {
    let mut url = url.trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | ']' | '*'));
    // Keep parentheses that belong to the URL, drop the one closing a markdown link.
    while url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
        url = url[..url.len() - 1].trim_end_matches(|c: char| matches!(c, '.' | ',' | ';'));
    }
    url
}

/// URLs the report cites, followed by search sources it did not cite.
///
/// A search URL is skipped when it already appears in the report or is a
/// prefix/extension of a cited one.
pub fn collect_references(body: &str, hits: &[SearchHit]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut refs: Vec<String> = extract_urls(body)
        .into_iter()
        .filter(|u| seen.insert(u.clone()))
        .collect();

    for hit in hits {
        let url = hit.url.trim();
        if url.is_empty() || !seen.insert(url.to_string()) {
            continue;
        }
        if refs.iter().any(|e| e.contains(url) || url.contains(e.as_str())) {
            continue;
        }
        refs.push(url.to_string());
    }

    refs
}
