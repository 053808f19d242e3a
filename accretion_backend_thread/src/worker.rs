// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partition offload on a dedicated worker thread.
//!
//! [`PartitionWorker`] accepts [`PartitionJob`]s posted from the transport
//! thread, computes each band off-thread, and queues the
//! [`PartitionResult`]s for the transport thread to drain on a later tick.
//! Results never interrupt tick processing; the host decides when to call
//! [`Engine::absorb_result`].
//!
//! [`Engine::absorb_result`]: accretion_core::engine::Engine::absorb_result

use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use accretion_core::engine::{PartitionJob, PartitionResult};

/// Errors from posting jobs to a [`PartitionWorker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerError {
    /// The worker thread is no longer running.
    Disconnected,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "partition worker is no longer running"),
        }
    }
}

impl std::error::Error for WorkerError {}

/// A worker thread computing evolution bands off the transport thread.
///
/// Jobs flow in through [`post`](Self::post); every job produces exactly one
/// result, drained with [`try_result`](Self::try_result). Dropping the
/// worker closes the job queue and joins the thread.
///
/// # Tick loop pseudocode
///
/// ```ignore
/// fn on_tick(tick: TransportTick) {
///     while let Some(result) = worker.try_result() {
///         engine.absorb_result(result, &mut tracer);
///     }
///     if let Some(job) = engine.plan_partition(&tick, &mut tracer) {
///         worker.post(job)?;
///     }
/// }
/// ```
pub struct PartitionWorker {
    jobs: Option<Sender<PartitionJob>>,
    results: Receiver<PartitionResult>,
    handle: Option<JoinHandle<()>>,
}

impl fmt::Debug for PartitionWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionWorker").finish_non_exhaustive()
    }
}

impl PartitionWorker {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the OS refuses to spawn a thread.
    pub fn spawn() -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<PartitionJob>();
        let (result_tx, result_rx) = mpsc::channel::<PartitionResult>();
        let handle = thread::Builder::new()
            .name("accretion-worker".into())
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    if result_tx.send(job.compute()).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    /// Posts a band for off-thread computation.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Disconnected`] if the worker thread has
    /// exited.
    pub fn post(&self, job: PartitionJob) -> Result<(), WorkerError> {
        self.jobs
            .as_ref()
            .and_then(|jobs| jobs.send(job).ok())
            .ok_or(WorkerError::Disconnected)
    }

    /// Takes one completed result, if any is waiting.
    ///
    /// Non-blocking; call in a loop at the top of each tick to drain the
    /// queue.
    #[must_use]
    pub fn try_result(&self) -> Option<PartitionResult> {
        match self.results.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks until one result arrives or the worker exits.
    ///
    /// Intended for shutdown flushes and tests; tick loops should use
    /// [`try_result`](Self::try_result).
    #[must_use]
    pub fn recv_result(&self) -> Option<PartitionResult> {
        self.results.recv().ok()
    }
}

impl Drop for PartitionWorker {
    fn drop(&mut self) {
        drop(self.jobs.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
