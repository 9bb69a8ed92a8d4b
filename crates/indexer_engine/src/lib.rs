//! Indexer engine: the concurrent scan pipeline and its public operations.
mod cell;
mod crawler;
mod dispatcher;
mod engine;
mod error;
mod fetch;
mod job;
mod page;
mod pool;
mod queue;
mod results;
mod scan_file;
mod scan_web;
mod url_gate;

pub use cell::ResultCell;
pub use crawler::DirectoryCrawler;
pub use dispatcher::Dispatcher;
pub use engine::{Engine, EngineSettings, ScanContext};
pub use error::{LinksError, QueryError, ValidationError};
pub use fetch::{FetchError, FetchSettings, Fetcher, ReqwestFetcher};
pub use job::{FileJob, Job, WebJob};
pub use page::{extract_links, extract_text};
pub use pool::ScannerPool;
pub use queue::{job_queue, JobConsumer, JobQueue};
pub use results::{ResultHandle, ResultStore, SummaryHandle};
pub use url_gate::UrlGate;
