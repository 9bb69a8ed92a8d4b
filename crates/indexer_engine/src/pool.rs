use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Runtime;

use indexer_core::ScanType;

use crate::engine::ScanContext;
use crate::job::Job;
use crate::results::ResultStore;

/// How long a terminating pool waits for in-flight scans to drain.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// A worker pool for one scan type. Each pool owns its own runtime, so
/// file scans and web scans cannot starve each other; sub-tasks run on the
/// runtime's blocking pool, which grows with submitted work and reclaims
/// idle threads.
pub struct ScannerPool {
    scan_type: ScanType,
    runtime: Mutex<Option<Runtime>>,
    results: Arc<ResultStore>,
    ctx: Arc<ScanContext>,
}

impl ScannerPool {
    pub fn new(scan_type: ScanType, results: Arc<ResultStore>, ctx: Arc<ScanContext>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name(format!("{scan_type}-scanner"))
            .enable_all()
            .build()
            .expect("scanner pool runtime");
        Self {
            scan_type,
            runtime: Mutex::new(Some(runtime)),
            results,
            ctx,
        }
    }

    /// Starts the job's computation and registers its result handle under
    /// the job's query key. Registration happens at initiation: readers may
    /// legitimately observe a handle that is not yet complete.
    pub fn accept(&self, job: Job) {
        let guard = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(runtime) = guard.as_ref() else {
            log::warn!("{} scanner pool is terminated, dropping job", self.scan_type);
            return;
        };
        let (key, handle) = match job {
            Job::File(job) => {
                let key = job.query_key();
                (key, job.initiate(runtime.handle(), Arc::clone(&self.ctx)))
            }
            Job::Web(job) => {
                let key = job.query_key();
                (key, job.initiate(runtime.handle(), Arc::clone(&self.ctx)))
            }
            Job::Terminate => return,
        };
        log::debug!("registering result handle for {key}");
        self.results.add_result(key, handle);
    }

    /// Runs a one-off future on this pool, for console helpers that need
    /// the pool's I/O context. Returns `false` once the pool is terminated.
    pub(crate) fn spawn<F>(&self, future: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let guard = self.runtime.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(runtime) => {
                runtime.spawn(future);
                true
            }
            None => false,
        }
    }

    /// Stops accepting work and shuts the runtime down, giving in-flight
    /// scans a drain window to resolve their handles. Idempotent.
    pub fn terminate(&self) {
        let runtime = self
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(runtime) = runtime {
            log::info!("stopping {} scanner pool...", self.scan_type);
            runtime.shutdown_timeout(DRAIN_TIMEOUT);
        }
    }
}
