use std::path::Path;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use url::Url;

use indexer_core::{is_web_url, KeywordCounts, KeywordSet, ScanType, SummaryCounts};

use crate::crawler::DirectoryCrawler;
use crate::dispatcher::Dispatcher;
use crate::error::{LinksError, QueryError, ValidationError};
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::job::{Job, WebJob};
use crate::page;
use crate::pool::ScannerPool;
use crate::queue::{job_queue, JobQueue};
use crate::results::ResultStore;
use crate::url_gate::UrlGate;

/// Everything a running scan job needs, constructed once at engine start
/// and passed by reference. There is no global state: web jobs reach the
/// queue and the URL gate through this context.
pub struct ScanContext {
    pub keywords: KeywordSet,
    pub file_size_limit: u64,
    pub queue: JobQueue,
    pub url_gate: UrlGate,
    pub fetcher: Arc<dyn Fetcher>,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub keywords: KeywordSet,
    pub corpus_prefix: String,
    pub file_size_limit: u64,
    pub crawl_interval: Duration,
    pub web_depth_limit: u32,
    pub url_refresh_interval: Duration,
    pub fetch: FetchSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            keywords: KeywordSet::default(),
            corpus_prefix: "corpus_".to_string(),
            file_size_limit: 1_048_576,
            crawl_interval: Duration::from_millis(1000),
            web_depth_limit: 1,
            url_refresh_interval: Duration::from_millis(86_400_000),
            fetch: FetchSettings::default(),
        }
    }
}

struct EngineThreads {
    crawler: JoinHandle<()>,
    dispatcher: JoinHandle<()>,
}

/// The assembled pipeline: queue, dispatcher, scanner pools, result store,
/// URL gate and crawler, wired once and exposed through the operations the
/// console consumes.
pub struct Engine {
    web_depth_limit: u32,
    queue: JobQueue,
    crawler: Arc<DirectoryCrawler>,
    results: Arc<ResultStore>,
    ctx: Arc<ScanContext>,
    file_pool: Arc<ScannerPool>,
    web_pool: Arc<ScannerPool>,
    threads: Mutex<Option<EngineThreads>>,
}

impl Engine {
    /// Starts the pipeline with a reqwest-backed fetcher.
    pub fn start(settings: EngineSettings) -> Result<Self, crate::fetch::FetchError> {
        let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch.clone())?);
        Ok(Self::start_with_fetcher(settings, fetcher))
    }

    /// Starts the pipeline with a caller-supplied fetcher; tests inject
    /// canned ones.
    pub fn start_with_fetcher(settings: EngineSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        let (queue, consumer) = job_queue();
        let results = ResultStore::new(settings.keywords.clone());
        let ctx = Arc::new(ScanContext {
            keywords: settings.keywords.clone(),
            file_size_limit: settings.file_size_limit,
            queue: queue.clone(),
            url_gate: UrlGate::new(settings.url_refresh_interval),
            fetcher,
        });

        let file_pool = Arc::new(ScannerPool::new(
            ScanType::File,
            Arc::clone(&results),
            Arc::clone(&ctx),
        ));
        let web_pool = Arc::new(ScannerPool::new(
            ScanType::Web,
            Arc::clone(&results),
            Arc::clone(&ctx),
        ));

        let mut dispatcher = Dispatcher::new(consumer);
        dispatcher.register_pool(ScanType::File, Arc::clone(&file_pool));
        dispatcher.register_pool(ScanType::Web, Arc::clone(&web_pool));

        let crawler = DirectoryCrawler::new(
            queue.clone(),
            settings.corpus_prefix.clone(),
            settings.crawl_interval,
        );

        let threads = EngineThreads {
            crawler: crawler.spawn(),
            dispatcher: dispatcher.spawn(),
        };

        Self {
            web_depth_limit: settings.web_depth_limit,
            queue,
            crawler,
            results,
            ctx,
            file_pool,
            web_pool,
            threads: Mutex::new(Some(threads)),
        }
    }

    /// Registers a crawl root directory.
    pub fn add_directory(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        self.crawler.add_directory(path)
    }

    /// Validates a URL and submits a top-level web scan if the gate allows
    /// it. Returns whether a job was actually submitted.
    pub fn add_url(&self, raw: &str) -> Result<bool, ValidationError> {
        let url = self.parse_web_url(raw)?;
        if self.ctx.url_gate.check_and_mark_ready(&url) {
            self.queue
                .submit(Job::Web(WebJob::new(url, self.web_depth_limit)));
            Ok(true)
        } else {
            log::debug!("already visited url: {url}");
            Ok(false)
        }
    }

    /// Blocking result fetch for a query key.
    pub fn get_result(&self, key: &str) -> Result<KeywordCounts, QueryError> {
        self.results.get_result(key)
    }

    /// Non-blocking result fetch for a query key.
    pub fn query_result(&self, key: &str) -> Result<KeywordCounts, QueryError> {
        self.results.query_result(key)
    }

    /// Blocking summary fetch for a scan type.
    pub fn get_summary(&self, scan_type: ScanType) -> Result<SummaryCounts, QueryError> {
        self.results.get_summary(scan_type)
    }

    /// Non-blocking summary fetch for a scan type.
    pub fn query_summary(&self, scan_type: ScanType) -> Result<SummaryCounts, QueryError> {
        self.results.query_summary(scan_type)
    }

    /// Invalidates the memoized summary for a scan type.
    pub fn clear_summary(&self, scan_type: ScanType) {
        self.results.clear_summary(scan_type);
    }

    /// Fetches `url` once and returns its extracted hyperlinks, without
    /// scheduling a scan. Bridged over the web pool so the console thread
    /// never performs I/O itself.
    pub fn collect_links(&self, raw: &str) -> Result<Vec<Url>, LinksError> {
        let url = self.parse_web_url(raw)?;
        let fetcher = Arc::clone(&self.ctx.fetcher);
        let (tx, rx) = mpsc::channel();
        let spawned = self.web_pool.spawn(async move {
            let result = match fetcher.fetch(&url).await {
                Ok(html) => Ok(page::extract_links(&html, &url)),
                Err(err) => Err(err),
            };
            let _ = tx.send(result);
        });
        if !spawned {
            return Err(LinksError::Stopped);
        }
        match rx.recv() {
            Ok(result) => result.map_err(LinksError::from),
            Err(_) => Err(LinksError::Stopped),
        }
    }

    fn parse_web_url(&self, raw: &str) -> Result<Url, ValidationError> {
        let url =
            Url::parse(raw).map_err(|_| ValidationError::InvalidUrl(raw.to_string()))?;
        if !is_web_url(&url) {
            return Err(ValidationError::InvalidUrl(raw.to_string()));
        }
        Ok(url)
    }

    /// Stops the pipeline in stages: signal the crawler and wake it, stop
    /// the summary service, enqueue the terminal sentinel, join the crawler
    /// and dispatcher threads, then shut both scanner pools down. The
    /// ordering lets the dispatcher drain already-routed jobs before the
    /// pools disappear. Safe to call more than once.
    pub fn stop(&self) {
        log::info!("stopping engine...");
        self.crawler.stop();
        self.results.stop();
        self.queue.terminate();
        let threads = self
            .threads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(threads) = threads {
            if threads.crawler.join().is_err() {
                log::error!("directory crawler thread panicked");
            }
            if threads.dispatcher.join().is_err() {
                log::error!("job dispatcher thread panicked");
            }
        }
        self.file_pool.terminate();
        self.web_pool.terminate();
    }
}
