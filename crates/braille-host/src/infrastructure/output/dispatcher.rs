//! Fire-and-forget frame dispatch with bounded concurrency.
//!
//! # How it works (for beginners)
//!
//! Drivers for some displays hand their frames off with
//! [`OutputWriter::write_async`] and never wait for the USB/Bluetooth write
//! to finish.  [`FrameDispatcher`] makes that safe:
//!
//! 1. `write_async` pushes the frame into a bounded `mpsc` queue.  It never
//!    blocks; if the queue is full the frame is dropped and counted.
//! 2. One dispatch task pulls frames off the queue.  Before handing a frame to
//!    the inner writer it acquires a permit from a [`Semaphore`] sized to the
//!    configured worker count.
//! 3. The (blocking) inner write runs on the blocking thread pool and releases
//!    its permit when it returns.
//!
//! The result: at most `workers` writes are in flight, at most
//! `queue_capacity` frames wait behind them, and the caller's thread is never
//! held up by device I/O.
//!
//! Frames are started in queue order; with more than one worker they may
//! finish out of order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use braille_core::{OutputWriter, WriteError};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Errors produced by the dispatcher itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// `spawn` was called outside a Tokio runtime.
    #[error("no Tokio runtime available for the frame dispatcher")]
    NoRuntime,

    /// The queue is full; the frame was dropped.
    #[error("frame queue is full")]
    QueueFull,

    /// The dispatcher has been shut down.
    #[error("frame dispatcher is closed")]
    Closed,
}

impl From<DispatchError> for WriteError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Closed => WriteError::Closed,
            other => WriteError::Rejected(other.to_string()),
        }
    }
}

/// Bounded queue in front of another [`OutputWriter`].
pub struct FrameDispatcher {
    inner: Arc<dyn OutputWriter>,
    tx: Mutex<Option<mpsc::Sender<Vec<u8>>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    dropped: Arc<AtomicU64>,
    workers: usize,
    queue_capacity: usize,
}

impl FrameDispatcher {
    /// Starts the dispatch task on the current Tokio runtime.
    ///
    /// `workers` and `queue_capacity` are raised to at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoRuntime`] when called outside a runtime.
    pub fn spawn(
        inner: Arc<dyn OutputWriter>,
        workers: usize,
        queue_capacity: usize,
    ) -> Result<Self, DispatchError> {
        let handle = Handle::try_current().map_err(|_| DispatchError::NoRuntime)?;
        let workers = workers.max(1);
        let queue_capacity = queue_capacity.max(1);

        let (tx, rx) = mpsc::channel(queue_capacity);
        let semaphore = Arc::new(Semaphore::new(workers));
        let task = handle.spawn(dispatch_loop(rx, Arc::clone(&inner), semaphore, workers));

        debug!(workers, queue_capacity, "frame dispatcher started");
        Ok(Self {
            inner,
            tx: Mutex::new(Some(tx)),
            task: Mutex::new(Some(task)),
            dropped: Arc::new(AtomicU64::new(0)),
            workers,
            queue_capacity,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Frames dropped because the queue was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender().is_none()
    }

    /// Queues one frame without blocking.
    ///
    /// # Errors
    ///
    /// [`DispatchError::QueueFull`] when the frame was dropped, or
    /// [`DispatchError::Closed`] after [`shutdown`](Self::shutdown).
    pub fn dispatch(&self, frame: Vec<u8>) -> Result<(), DispatchError> {
        let Some(tx) = self.sender() else {
            return Err(DispatchError::Closed);
        };
        match tx.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(frame)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(len = frame.len(), dropped, "frame queue full; dropping frame");
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(DispatchError::Closed),
        }
    }

    /// Stops accepting frames and waits for every queued and in-flight write
    /// to finish.  Calling it twice is harmless.
    pub async fn shutdown(&self) {
        self.tx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        let task = self
            .task
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("frame dispatch task ended abnormally: {e}");
            }
            info!(dropped = self.dropped_count(), "frame dispatcher stopped");
        }
    }

    fn sender(&self) -> Option<mpsc::Sender<Vec<u8>>> {
        self.tx
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl OutputWriter for FrameDispatcher {
    /// Writes straight through to the inner writer, bypassing the queue.
    fn write(&self, frame: &[u8]) -> Result<(), WriteError> {
        if self.is_closed() {
            return Err(WriteError::Closed);
        }
        self.inner.write(frame)
    }

    fn write_async(&self, frame: Vec<u8>) -> Result<(), WriteError> {
        self.dispatch(frame).map_err(WriteError::from)
    }
}

impl std::fmt::Debug for FrameDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDispatcher")
            .field("workers", &self.workers)
            .field("queue_capacity", &self.queue_capacity)
            .field("dropped", &self.dropped_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn dispatch_loop(
    mut rx: mpsc::Receiver<Vec<u8>>,
    inner: Arc<dyn OutputWriter>,
    semaphore: Arc<Semaphore>,
    workers: usize,
) {
    while let Some(frame) = rx.recv().await {
        let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
            break;
        };
        let inner = Arc::clone(&inner);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            if let Err(e) = inner.write(&frame) {
                warn!(len = frame.len(), "frame write failed: {e}");
            }
        });
    }

    // Every permit back means every in-flight write has returned.
    let permits = u32::try_from(workers).unwrap_or(u32::MAX);
    if semaphore.acquire_many(permits).await.is_err() {
        debug!("worker semaphore closed before drain");
    }
}
