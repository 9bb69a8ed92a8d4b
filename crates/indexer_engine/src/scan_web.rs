use std::sync::Arc;

use url::Url;

use indexer_core::{is_web_url, KeywordCounts};

use crate::engine::ScanContext;
use crate::job::{Job, WebJob};
use crate::page;

/// Scans one page: fetches the document, counts keywords in its body text
/// and, while depth remains, fans out into its links.
///
/// A failed fetch is logged and yields the zero-seeded count map; one bad
/// page must not abort the pipeline.
pub(crate) async fn scan_page(url: Url, depth: u32, ctx: Arc<ScanContext>) -> KeywordCounts {
    log::info!("started web scan for: web|{url} (depth {depth})");
    let html = match ctx.fetcher.fetch(&url).await {
        Ok(html) => html,
        Err(err) => {
            log::error!("web scan failed for {url}: {err}");
            return ctx.keywords.seeded_counts();
        }
    };

    if depth > 0 {
        enqueue_inner_links(&html, &url, depth, &ctx);
    }

    let text = page::extract_text(&html);
    let counts = ctx.keywords.count_words(text.split_whitespace());
    log::debug!("finished web scan for: web|{url}");
    counts
}

/// Submits a depth-decremented web job for every extracted link the gate
/// reports ready. Depth 0 never reaches this point, which bounds the
/// recursion.
fn enqueue_inner_links(html: &str, base: &Url, depth: u32, ctx: &ScanContext) {
    for link in page::extract_links(html, base) {
        if !is_web_url(&link) {
            continue;
        }
        if ctx.url_gate.check_and_mark_ready(&link) {
            ctx.queue.submit(Job::Web(WebJob::new(link, depth - 1)));
        }
    }
}
