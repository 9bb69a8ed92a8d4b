use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use url::Url;

use indexer_core::{file_key, web_key, ScanType};

use crate::cell::ResultCell;
use crate::engine::ScanContext;
use crate::results::ResultHandle;
use crate::{scan_file, scan_web};

/// A unit of scanning work flowing through the queue. Immutable once
/// constructed; consumed exactly once by the dispatcher.
#[derive(Debug, Clone)]
pub enum Job {
    File(FileJob),
    Web(WebJob),
    /// Terminal sentinel: consuming it stops the dispatcher permanently.
    Terminate,
}

impl Job {
    /// The result family this job belongs to; `None` for the sentinel.
    pub fn scan_type(&self) -> Option<ScanType> {
        match self {
            Job::File(_) => Some(ScanType::File),
            Job::Web(_) => Some(ScanType::Web),
            Job::Terminate => None,
        }
    }

    /// The stable identity its result is registered under; `None` for the
    /// sentinel.
    pub fn query_key(&self) -> Option<String> {
        match self {
            Job::File(job) => Some(job.query_key()),
            Job::Web(job) => Some(job.query_key()),
            Job::Terminate => None,
        }
    }
}

/// A request to scan one corpus directory for keyword occurrences.
#[derive(Debug, Clone)]
pub struct FileJob {
    directory: PathBuf,
}

impl FileJob {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    /// Keyed by the corpus directory name, e.g. `file|corpus_books`.
    pub fn query_key(&self) -> String {
        let name = self
            .directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.directory.display().to_string());
        file_key(&name)
    }

    /// Schedules the corpus scan on `runtime` and returns the handle its
    /// eventual result will appear in.
    pub(crate) fn initiate(self, runtime: &Handle, ctx: Arc<ScanContext>) -> ResultHandle {
        let handle: ResultHandle = Arc::new(ResultCell::new());
        let cell = Arc::clone(&handle);
        runtime.spawn(async move {
            let counts = scan_file::scan_corpus(self.directory, ctx).await;
            cell.complete(counts);
        });
        handle
    }
}

/// A request to scan one web page, recursing into its links while `depth`
/// is positive.
#[derive(Debug, Clone)]
pub struct WebJob {
    url: Url,
    depth: u32,
}

impl WebJob {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }

    /// Keyed by the absolute URL, e.g. `web|https://example.com/`.
    pub fn query_key(&self) -> String {
        web_key(&self.url)
    }

    /// Schedules the page scan on `runtime` and returns the handle its
    /// eventual result will appear in.
    pub(crate) fn initiate(self, runtime: &Handle, ctx: Arc<ScanContext>) -> ResultHandle {
        let handle: ResultHandle = Arc::new(ResultCell::new());
        let cell = Arc::clone(&handle);
        runtime.spawn(async move {
            let counts = scan_web::scan_page(self.url, self.depth, ctx).await;
            cell.complete(counts);
        });
        handle
    }
}
