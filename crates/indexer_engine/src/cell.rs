use std::sync::{Condvar, Mutex, PoisonError};

/// A single-assignment result slot shared between one producer and any
/// number of readers.
///
/// The producer calls [`complete`](Self::complete) exactly once; readers
/// either poll with [`peek`](Self::peek) or block in [`wait`](Self::wait).
/// The cell is independent of any execution service, so it can hold the
/// outcome of a task regardless of where that task runs.
#[derive(Debug, Default)]
pub struct ResultCell<T> {
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T: Clone> ResultCell<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Completes the cell and wakes all blocked readers. The first call
    /// wins; later calls are ignored.
    pub fn complete(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(value);
            self.ready.notify_all();
        }
    }

    /// Non-blocking read; `None` while the computation is still running.
    pub fn peek(&self) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_complete(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Blocks the calling thread until the value is available.
    pub fn wait(&self) -> T {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(value) = slot.as_ref() {
                return value.clone();
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}
