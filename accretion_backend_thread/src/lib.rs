// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thread backend for accretion.
//!
//! This crate provides composable building blocks for driving an accretion
//! engine from plain OS threads:
//!
//! - [`Transport`]: Tick source (tempo-paced thread delivering one
//!   [`TransportTick`] per sixteenth note)
//! - [`PartitionWorker`]: Off-thread evolution band computation with
//!   results drained on the transport thread
//! - [`now`]: Monotonic host clock
//!
//! [`TransportTick`]: accretion_core::timing::TransportTick

mod clock;
mod transport;
mod worker;

pub use accretion_core::backend::StepSink;
pub use transport::Transport;
pub use worker::{PartitionWorker, WorkerError};

use accretion_core::time::HostTime;

/// Returns the current host time from the process-wide monotonic clock.
///
/// The same clock anchors the [`Transport`] schedule, so times compare
/// directly with [`TransportTick::now`].
///
/// [`TransportTick::now`]: accretion_core::timing::TransportTick::now
#[must_use]
pub fn now() -> HostTime {
    clock::now()
}
