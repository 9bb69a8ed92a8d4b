use std::error::Error;
use std::fmt;

use url::Url;

/// The two result families a query key can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScanType {
    File,
    Web,
}

impl ScanType {
    /// Prefix that keys of this family start with, separator included.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            ScanType::File => "file|",
            ScanType::Web => "web|",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanType::File => write!(f, "file"),
            ScanType::Web => write!(f, "web"),
        }
    }
}

/// Query key for a file corpus, e.g. `file|corpus_books`.
pub fn file_key(corpus_name: &str) -> String {
    format!("file|{corpus_name}")
}

/// Query key for a scanned page, e.g. `web|https://example.com/`.
pub fn web_key(url: &Url) -> String {
    format!("web|{url}")
}

/// What a console `get`/`query` argument refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// `<type>|summary`: the aggregated summary for a scan type.
    Summary(ScanType),
    /// `<type>|<id>`: a single corpus result, carried as the full key.
    Corpus { scan_type: ScanType, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    MissingSeparator(String),
    UnknownScanType(String),
}

impl fmt::Display for QueryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParseError::MissingSeparator(raw) => {
                write!(f, "query '{raw}' must have the form <type>|<id>")
            }
            QueryParseError::UnknownScanType(t) => {
                write!(f, "unknown scan type '{t}', expected 'file' or 'web'")
            }
        }
    }
}

impl Error for QueryParseError {}

/// Parses a console query string of the form `<type>|<id>` or
/// `<type>|summary`. The id may itself contain `|` (URLs are passed
/// through verbatim).
pub fn parse_query(raw: &str) -> Result<QueryTarget, QueryParseError> {
    let (scan_type, id) = match raw.split_once('|') {
        Some((prefix, id)) if !id.is_empty() => (prefix, id),
        _ => return Err(QueryParseError::MissingSeparator(raw.to_string())),
    };
    let scan_type = match scan_type {
        "file" => ScanType::File,
        "web" => ScanType::Web,
        other => return Err(QueryParseError::UnknownScanType(other.to_string())),
    };
    if id == "summary" {
        Ok(QueryTarget::Summary(scan_type))
    } else {
        Ok(QueryTarget::Corpus {
            scan_type,
            key: raw.to_string(),
        })
    }
}

/// Whether a URL is one the web scanner can fetch.
pub fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Host component of a URL string, used to group web results by domain.
/// Returns `None` for unparsable URLs or URLs without a host.
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
}
