use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use url::Url;

/// Records when each URL was last scheduled for a scan and gates re-visits
/// by a refresh interval. Shared by the console (top-level submissions) and
/// every running web job (link fan-out).
pub struct UrlGate {
    visited: DashMap<Url, Instant>,
    refresh_interval: Duration,
}

impl UrlGate {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            visited: DashMap::new(),
            refresh_interval,
        }
    }

    /// Reports whether `url` is ready to scan and, if so, marks it visited
    /// until the refresh interval elapses. Check and update are a single
    /// atomic step per URL: two concurrent callers cannot both observe
    /// "ready" for the same URL inside one refresh window.
    pub fn check_and_mark_ready(&self, url: &Url) -> bool {
        let now = Instant::now();
        match self.visited.entry(url.clone()) {
            Entry::Occupied(mut entry) => {
                if now >= *entry.get() {
                    *entry.get_mut() = now + self.refresh_interval;
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now + self.refresh_interval);
                true
            }
        }
    }

    /// Number of URLs the gate has ever admitted.
    pub fn seen_count(&self) -> usize {
        self.visited.len()
    }
}
