use indexer_core::{
    extract_domain, file_key, is_web_url, parse_query, web_key, QueryParseError, QueryTarget,
    ScanType,
};
use url::Url;

#[test]
fn file_and_web_keys_carry_the_type_prefix() {
    assert_eq!(file_key("corpus_books"), "file|corpus_books");
    let url = Url::parse("https://example.com/page").unwrap();
    assert_eq!(web_key(&url), "web|https://example.com/page");
}

#[test]
fn parse_query_recognizes_summaries() {
    assert_eq!(
        parse_query("file|summary"),
        Ok(QueryTarget::Summary(ScanType::File))
    );
    assert_eq!(
        parse_query("web|summary"),
        Ok(QueryTarget::Summary(ScanType::Web))
    );
}

#[test]
fn parse_query_keeps_the_full_key_for_corpus_lookups() {
    assert_eq!(
        parse_query("file|corpus_books"),
        Ok(QueryTarget::Corpus {
            scan_type: ScanType::File,
            key: "file|corpus_books".to_string(),
        })
    );
}

#[test]
fn parse_query_passes_urls_through_verbatim() {
    let raw = "web|https://example.com/a?b=c|d";
    match parse_query(raw) {
        Ok(QueryTarget::Corpus { scan_type, key }) => {
            assert_eq!(scan_type, ScanType::Web);
            assert_eq!(key, raw);
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn parse_query_rejects_malformed_input() {
    assert_eq!(
        parse_query("file"),
        Err(QueryParseError::MissingSeparator("file".to_string()))
    );
    assert_eq!(
        parse_query("file|"),
        Err(QueryParseError::MissingSeparator("file|".to_string()))
    );
    assert_eq!(
        parse_query("ftp|summary"),
        Err(QueryParseError::UnknownScanType("ftp".to_string()))
    );
}

#[test]
fn only_http_and_https_are_scannable() {
    assert!(is_web_url(&Url::parse("http://example.com").unwrap()));
    assert!(is_web_url(&Url::parse("https://example.com").unwrap()));
    assert!(!is_web_url(&Url::parse("ftp://example.com").unwrap()));
    assert!(!is_web_url(&Url::parse("mailto:someone@example.com").unwrap()));
}

#[test]
fn extract_domain_returns_the_host() {
    assert_eq!(
        extract_domain("https://news.example.com/a/b"),
        Some("news.example.com".to_string())
    );
    assert_eq!(extract_domain("not a url"), None);
}
