use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::runtime::Runtime;

use indexer_core::{extract_domain, KeywordCounts, KeywordSet, ScanType, SummaryCounts};

use crate::cell::ResultCell;
use crate::error::QueryError;

/// Eventual per-corpus keyword counts, registered at job initiation.
pub type ResultHandle = Arc<ResultCell<KeywordCounts>>;

/// Eventual summary aggregation for one scan type.
pub type SummaryHandle = Arc<ResultCell<SummaryCounts>>;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Holds every result handle ever registered, plus memoized summary
/// computations per scan type.
///
/// Individual results are never evicted; re-submitting a query key replaces
/// the handle (the superseded computation keeps running, it is not
/// cancelled). Summaries run on a dedicated execution service so
/// aggregation never competes with scan-pool capacity.
pub struct ResultStore {
    results: DashMap<String, ResultHandle>,
    summaries: DashMap<ScanType, SummaryHandle>,
    keywords: KeywordSet,
    summary_runtime: Mutex<Option<Runtime>>,
}

impl ResultStore {
    pub fn new(keywords: KeywordSet) -> Arc<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("summary-pool")
            .enable_all()
            .build()
            .expect("summary runtime");
        Arc::new(Self {
            results: DashMap::new(),
            summaries: DashMap::new(),
            keywords,
            summary_runtime: Mutex::new(Some(runtime)),
        })
    }

    /// Registers a handle for `key`, replacing any previous entry.
    pub fn add_result(&self, key: String, handle: ResultHandle) {
        self.results.insert(key, handle);
    }

    /// Blocks until the result for `key` is available.
    pub fn get_result(&self, key: &str) -> Result<KeywordCounts, QueryError> {
        let handle = self.result_handle(key)?;
        Ok(handle.wait())
    }

    /// Non-blocking lookup: `NotFound` if the key was never registered,
    /// `NotReady` while its computation is still running.
    pub fn query_result(&self, key: &str) -> Result<KeywordCounts, QueryError> {
        let handle = self.result_handle(key)?;
        handle
            .peek()
            .ok_or_else(|| QueryError::NotReady(key.to_string()))
    }

    fn result_handle(&self, key: &str) -> Result<ResultHandle, QueryError> {
        // Clone the handle out so no shard lock is held while waiting.
        self.results
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| QueryError::NotFound(key.to_string()))
    }

    /// Blocks until the summary for `scan_type` is available, submitting
    /// the computation first if no memoized one exists.
    pub fn get_summary(self: &Arc<Self>, scan_type: ScanType) -> Result<SummaryCounts, QueryError> {
        let handle = self.summary_handle(scan_type)?;
        Ok(handle.wait())
    }

    /// Non-blocking summary lookup. Submits the computation lazily when
    /// absent, then reports `NotReady` until it completes.
    pub fn query_summary(
        self: &Arc<Self>,
        scan_type: ScanType,
    ) -> Result<SummaryCounts, QueryError> {
        let handle = self.summary_handle(scan_type)?;
        handle
            .peek()
            .ok_or_else(|| QueryError::NotReady(format!("{scan_type}|summary")))
    }

    /// Drops the memoized summary so the next access recomputes it from
    /// current store contents. This is the only invalidation mechanism.
    pub fn clear_summary(&self, scan_type: ScanType) {
        self.summaries.remove(&scan_type);
    }

    fn summary_handle(self: &Arc<Self>, scan_type: ScanType) -> Result<SummaryHandle, QueryError> {
        match self.summaries.entry(scan_type) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let runtime = self
                    .summary_runtime
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                let Some(runtime) = runtime.as_ref() else {
                    // Stopped store: nothing will ever complete a new handle.
                    return Err(QueryError::NotReady(format!("{scan_type}|summary")));
                };
                let handle: SummaryHandle = Arc::new(ResultCell::new());
                let cell = Arc::clone(&handle);
                let store = Arc::clone(self);
                log::debug!("calculating summary for {scan_type}");
                runtime.spawn_blocking(move || {
                    let summary = match scan_type {
                        ScanType::File => store.file_summary(),
                        ScanType::Web => store.web_summary(),
                    };
                    cell.complete(summary);
                });
                entry.insert(Arc::clone(&handle));
                Ok(handle)
            }
        }
    }

    /// Per-corpus breakdown: each known file key mapped to its individually
    /// resolved result.
    fn file_summary(&self) -> SummaryCounts {
        self.keys_of(ScanType::File)
            .into_iter()
            .map(|key| {
                let counts = self
                    .get_result(&key)
                    .unwrap_or_else(|_| self.keywords.seeded_counts());
                (key, counts)
            })
            .collect()
    }

    /// Per-domain breakdown: every known web result summed into its URL's
    /// host, zero-seeded for each domain observed.
    fn web_summary(&self) -> SummaryCounts {
        let mut summary = SummaryCounts::new();
        for key in self.keys_of(ScanType::Web) {
            let Some(url) = key.strip_prefix(ScanType::Web.key_prefix()) else {
                continue;
            };
            let Some(domain) = extract_domain(url) else {
                continue;
            };
            let counts = self
                .get_result(&key)
                .unwrap_or_else(|_| self.keywords.seeded_counts());
            let domain_counts = summary
                .entry(domain)
                .or_insert_with(|| self.keywords.seeded_counts());
            for (word, count) in counts {
                *domain_counts.entry(word).or_insert(0) += count;
            }
        }
        summary
    }

    fn keys_of(&self, scan_type: ScanType) -> Vec<String> {
        self.results
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| key.starts_with(scan_type.key_prefix()))
            .collect()
    }

    /// Shuts the summary execution service down, giving in-flight
    /// aggregations a drain window. Idempotent.
    pub fn stop(&self) {
        let runtime = self
            .summary_runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(runtime) = runtime {
            log::info!("stopping result store...");
            runtime.shutdown_timeout(DRAIN_TIMEOUT);
        }
    }
}
