//! Single-threaded work queue (an event loop on a dedicated thread).
//!
//! Jobs posted to a queue run one at a time, in order, on the queue's own
//! thread. A panicking job is logged and does not stop the loop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Sender};
use tracing::{trace, warn};

use crate::executor::SumError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Cloneable handle for posting jobs to a `SerialQueue`.
#[derive(Clone)]
pub struct QueueHandle {
    name: String,
    sender: Sender<Job>,
}

impl QueueHandle {
    /// Post a job to the queue's event loop.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> Result<(), SumError> {
        self.sender
            .send(Box::new(job))
            .map_err(|_| SumError::Calculation(format!("queue {} has shut down", self.name)))
    }

    /// Name of the queue's thread.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A dedicated thread draining a job channel.
pub struct SerialQueue {
    handle: QueueHandle,
    thread: JoinHandle<()>,
}

impl SerialQueue {
    /// Start a queue on a new thread with the given name.
    pub fn spawn(name: impl Into<String>) -> Result<Self, SumError> {
        let name = name.into();
        let (sender, receiver) = unbounded::<Job>();
        let thread_name = name.clone();
        let thread = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                for job in receiver {
                    if catch_unwind(AssertUnwindSafe(job)).is_err() {
                        warn!(queue = %thread_name, "job panicked");
                    }
                }
                trace!(queue = %thread_name, "event loop stopped");
            })
            .map_err(|e| SumError::Calculation(format!("failed to start queue {name}: {e}")))?;

        Ok(Self {
            handle: QueueHandle { name, sender },
            thread,
        })
    }

    /// A handle other threads can post through.
    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        self.handle.clone()
    }

    /// Post a job to this queue.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> Result<(), SumError> {
        self.handle.post(job)
    }

    /// Stop accepting jobs, let pending ones finish, and join the thread.
    ///
    /// Outstanding `QueueHandle` clones keep the loop alive until dropped.
    pub fn shutdown(self) {
        let Self { handle, thread } = self;
        let name = handle.name().to_owned();
        drop(handle);
        if thread.join().is_err() {
            warn!(queue = %name, "event loop thread panicked");
        }
    }
}
