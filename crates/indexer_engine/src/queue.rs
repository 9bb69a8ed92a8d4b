use std::sync::mpsc::{self, Receiver, Sender};

use crate::job::Job;

/// Creates a connected producer/consumer pair for the scanning pipeline.
pub fn job_queue() -> (JobQueue, JobConsumer) {
    let (tx, rx) = mpsc::channel();
    (JobQueue { tx }, JobConsumer { rx })
}

/// Producer half of the job queue. Cloneable: the crawler, the console and
/// running web jobs all submit into the same queue.
#[derive(Clone)]
pub struct JobQueue {
    tx: Sender<Job>,
}

impl JobQueue {
    /// Enqueues a job. Submissions into a torn-down queue are dropped
    /// silently; by then the dispatcher is gone and nothing can run them.
    pub fn submit(&self, job: Job) {
        if self.tx.send(job).is_err() {
            log::debug!("job queue is closed, dropping job");
        }
    }

    /// Enqueues the terminal sentinel. Idempotent: calling it again after
    /// shutdown neither blocks nor fails.
    pub fn terminate(&self) {
        let _ = self.tx.send(Job::Terminate);
    }
}

/// Consumer half of the job queue. Deliberately not cloneable: the
/// dispatcher takes ownership, so no other thread can ever dequeue. The
/// single-consumer contract is enforced by the type system instead of a
/// runtime identity check.
pub struct JobConsumer {
    rx: Receiver<Job>,
}

impl JobConsumer {
    /// Blocks until the next job arrives. A disconnected queue degrades to
    /// the terminal sentinel so the consumer stops instead of erroring.
    pub fn next(&self) -> Job {
        self.rx.recv().unwrap_or(Job::Terminate)
    }
}
