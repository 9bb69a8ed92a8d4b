use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::ValidationError;
use crate::job::{FileJob, Job};
use crate::queue::JobQueue;

/// Periodic background scanner for registered root directories.
///
/// Each cycle descends every root recursively. A directory whose name
/// carries the corpus prefix is a corpus leaf: its direct-child files are
/// checked for modification and, if any changed since the last cycle, one
/// file job for the whole corpus is enqueued. Other directories are
/// searched deeper.
pub struct DirectoryCrawler {
    directories: Mutex<Vec<PathBuf>>,
    file_watch: DashMap<PathBuf, SystemTime>,
    corpus_prefix: String,
    sleep_interval: Duration,
    queue: JobQueue,
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl DirectoryCrawler {
    pub fn new(
        queue: JobQueue,
        corpus_prefix: impl Into<String>,
        sleep_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            directories: Mutex::new(Vec::new()),
            file_watch: DashMap::new(),
            corpus_prefix: corpus_prefix.into(),
            sleep_interval,
            queue,
            stopped: Mutex::new(false),
            wake: Condvar::new(),
        })
    }

    /// Registers a crawl root. Rejects paths that are not directories and
    /// roots already tracked. Safe to call while a crawl cycle is running.
    pub fn add_directory(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ValidationError::NotADirectory(path.to_path_buf()));
        }
        let mut directories = self
            .directories
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if directories.iter().any(|d| d == path) {
            return Err(ValidationError::DuplicateDirectory(path.to_path_buf()));
        }
        log::info!("adding directory '{}'", path.display());
        directories.push(path.to_path_buf());
        Ok(())
    }

    /// Starts the crawler on its own thread.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let crawler = Arc::clone(self);
        thread::Builder::new()
            .name("directory-crawler".into())
            .spawn(move || crawler.run())
            .expect("spawn directory crawler thread")
    }

    fn run(&self) {
        log::info!("directory crawler is now running");
        while !self.is_stopped() {
            let roots = self
                .directories
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            for root in roots {
                self.scan_for_corpora(&root);
            }
            if self.pause() {
                break;
            }
        }
        log::info!("stopping directory crawler...");
    }

    fn scan_for_corpora(&self, directory: &Path) {
        let Ok(entries) = fs::read_dir(directory) else {
            log::warn!("cannot list directory {}", directory.display());
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&self.corpus_prefix) {
                self.check_corpus_for_changes(&path);
            } else {
                self.scan_for_corpora(&path);
            }
        }
    }

    /// Enqueues one scan job for the whole corpus if any direct-child file
    /// changed since the last cycle. Modification times are recorded here,
    /// before the job runs, so rapid repeated edits inside one crawl
    /// interval coalesce into a single rescan.
    fn check_corpus_for_changes(&self, corpus: &Path) {
        let Ok(entries) = fs::read_dir(corpus) else {
            log::warn!("cannot list corpus directory {}", corpus.display());
            return;
        };
        let mut changed = false;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            // Every file's watch entry must be refreshed, so no short-circuit.
            if self.update_file_watch(path) {
                changed = true;
            }
        }
        if changed {
            log::debug!("corpus {} changed, enqueueing scan", corpus.display());
            self.queue
                .submit(Job::File(FileJob::new(corpus.to_path_buf())));
        }
    }

    /// Records the file's current modification time. Reports `true` when
    /// the file is new to the watch or its recorded time moved.
    fn update_file_watch(&self, path: PathBuf) -> bool {
        let Ok(metadata) = fs::metadata(&path) else {
            return false;
        };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        match self.file_watch.entry(path) {
            Entry::Occupied(mut entry) => {
                if *entry.get() != modified {
                    *entry.get_mut() = modified;
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(modified);
                true
            }
        }
    }

    /// Timed inter-cycle wait, woken eagerly by `stop`. Returns `true`
    /// once stopped.
    fn pause(&self) -> bool {
        let deadline = Instant::now() + self.sleep_interval;
        let mut stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if *stopped {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .wake
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
        }
    }

    fn is_stopped(&self) -> bool {
        *self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signals the crawler to stop and wakes it if it is sleeping between
    /// cycles.
    pub fn stop(&self) {
        let mut stopped = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        self.wake.notify_all();
    }
}
