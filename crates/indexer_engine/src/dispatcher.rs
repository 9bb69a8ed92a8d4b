use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use indexer_core::ScanType;

use crate::job::Job;
use crate::pool::ScannerPool;
use crate::queue::JobConsumer;

/// The single consumer of the job queue. Owns the consumer half outright,
/// so no other thread can dequeue. Routes each job to the scanner pool
/// registered for its scan type and stops for good on the terminal
/// sentinel.
pub struct Dispatcher {
    consumer: JobConsumer,
    pools: HashMap<ScanType, Arc<ScannerPool>>,
}

impl Dispatcher {
    pub fn new(consumer: JobConsumer) -> Self {
        Self {
            consumer,
            pools: HashMap::new(),
        }
    }

    /// Binds a scanner pool to a scan type. Every type that can appear in
    /// the queue must be registered before `spawn`.
    pub fn register_pool(&mut self, scan_type: ScanType, pool: Arc<ScannerPool>) {
        self.pools.insert(scan_type, pool);
    }

    /// Starts the dispatcher on its own thread.
    pub fn spawn(self) -> JoinHandle<()> {
        thread::Builder::new()
            .name("job-dispatcher".into())
            .spawn(move || self.run())
            .expect("spawn job dispatcher thread")
    }

    fn run(self) {
        log::info!("job dispatcher is now running");
        loop {
            let job = self.consumer.next();
            let Some(scan_type) = job.scan_type() else {
                break;
            };
            // Routing a type with no registered pool is a wiring bug, not a
            // runtime condition.
            let pool = self
                .pools
                .get(&scan_type)
                .unwrap_or_else(|| panic!("no scanner pool registered for scan type '{scan_type}'"));
            pool.accept(job);
        }
        log::info!("stopping job dispatcher...");
    }
}
