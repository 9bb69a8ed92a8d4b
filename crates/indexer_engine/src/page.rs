use scraper::{Html, Selector};
use url::Url;

/// Visible text of the document body, whitespace-separated. Falls back to
/// the whole document when there is no `<body>`.
pub fn extract_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body_sel = Selector::parse("body").ok();
    let body = body_sel.as_ref().and_then(|sel| doc.select(sel).next());
    match body {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => doc.root_element().text().collect::<Vec<_>>().join(" "),
    }
}

/// Absolute hyperlink targets of every anchor in the document, resolved
/// against `base`. Fragment-only, query-only and javascript references are
/// skipped.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    doc.select(&anchor_sel)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_url(href, base))
        .collect()
}

fn resolve_url(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.join(trimmed).ok()
}
