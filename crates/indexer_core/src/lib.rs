//! Indexer core: pure keyword counting, partitioning and query-key helpers.
mod counts;
mod partition;
mod query;

pub use counts::{strip_punctuation, KeywordCounts, KeywordSet, SummaryCounts};
pub use partition::greedy_groups;
pub use query::{
    extract_domain, file_key, is_web_url, parse_query, web_key, QueryParseError, QueryTarget,
    ScanType,
};
