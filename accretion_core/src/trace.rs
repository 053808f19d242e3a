// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the tick loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! tick-loop instrumentation calls at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`SweepSummaryBuilder`] is a convenience helper that collects partition
//! timestamps during a sweep and produces a [`SweepSummary`] at commit.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-row evolved-rows event
//!   plus the corresponding `TraceSink` method.

use crate::sweep::PARTITION_COUNT;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the transport delivers a tick.
#[derive(Clone, Copy, Debug)]
pub struct TickEvent {
    /// Monotonic tick counter.
    pub index: u64,
    /// The step column this tick addresses.
    pub step: u32,
    /// Host time when the tick was generated.
    pub now: HostTime,
}

/// Emitted when a partition band is computed inline or planned for a worker.
#[derive(Clone, Copy, Debug)]
pub struct PartitionEvent {
    /// Tick counter of the tick that ran or planned the band.
    pub tick_index: u64,
    /// Band index within the sweep, `0..PARTITION_COUNT`.
    pub partition: u8,
    /// First row of the band.
    pub start_row: u32,
    /// One past the last row of the band.
    pub end_row: u32,
    /// Whether the band was handed to a worker instead of computed inline.
    pub delegated: bool,
}

/// Emitted when a sweep commits a new generation.
#[derive(Clone, Copy, Debug)]
pub struct CommitEvent {
    /// The generation number after the commit.
    pub generation: u64,
    /// How many rows changed relative to the previous generation.
    pub changed_rows: u32,
}

/// Emitted when a worker result reaches the engine.
#[derive(Clone, Copy, Debug)]
pub struct AbsorbEvent {
    /// Epoch stamped into the job the result answers.
    pub epoch: u64,
    /// The engine's current epoch. A mismatch means the result was stale and
    /// discarded.
    pub engine_epoch: u64,
    /// Whether the result carried a commit.
    pub commit: bool,
}

impl AbsorbEvent {
    /// Returns whether the result was discarded as stale.
    #[inline]
    #[must_use]
    pub const fn stale(self) -> bool {
        self.epoch != self.engine_epoch
    }
}

/// Per-sweep timing summary produced by [`SweepSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct SweepSummary {
    /// The generation the sweep committed.
    pub generation: u64,
    /// Tick counter when the sweep's first band ran.
    pub first_tick: u64,
    /// Tick counter when the sweep committed.
    pub last_tick: u64,
    /// Compute duration per band in nanoseconds (0 if not measured).
    pub partition_nanos: [u64; PARTITION_COUNT],
    /// How many rows changed at commit.
    pub changed_rows: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the tick loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a transport tick is received.
    fn on_tick(&mut self, e: &TickEvent) {
        _ = e;
    }

    /// Called when a partition band is computed or planned.
    fn on_partition(&mut self, e: &PartitionEvent) {
        _ = e;
    }

    /// Called when a sweep commits.
    fn on_commit(&mut self, e: &CommitEvent) {
        _ = e;
    }

    /// Called when a worker result reaches the engine.
    fn on_absorb(&mut self, e: &AbsorbEvent) {
        _ = e;
    }

    /// Called with a per-sweep timing summary.
    fn on_sweep_summary(&mut self, s: &SweepSummary) {
        _ = s;
    }

    /// Called at commit with the rows that changed (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    fn on_evolved_rows(&mut self, generation: u64, rows: &[u32]) {
        _ = (generation, rows);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TickEvent`].
    #[inline]
    pub fn tick(&mut self, e: &TickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PartitionEvent`].
    #[inline]
    pub fn partition(&mut self, e: &PartitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_partition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CommitEvent`].
    #[inline]
    pub fn commit(&mut self, e: &CommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_commit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AbsorbEvent`].
    #[inline]
    pub fn absorb(&mut self, e: &AbsorbEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_absorb(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SweepSummary`].
    #[inline]
    pub fn sweep_summary(&mut self, s: &SweepSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_sweep_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits evolved rows (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn evolved_rows(&mut self, generation: u64, rows: &[u32]) {
        if let Some(s) = &mut self.sink {
            s.on_evolved_rows(generation, rows);
        }
    }
}

// ---------------------------------------------------------------------------
// SweepSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects partition timestamps during a sweep and produces a
/// [`SweepSummary`] at commit.
#[derive(Debug)]
pub struct SweepSummaryBuilder {
    first_tick: u64,
    last_tick: u64,
    partition_starts: [Option<HostTime>; PARTITION_COUNT],
    partition_ends: [Option<HostTime>; PARTITION_COUNT],
    changed_rows: u32,
}

impl SweepSummaryBuilder {
    /// Starts building a summary for a sweep whose first band runs on the
    /// given tick.
    #[must_use]
    pub fn new(first_tick: u64) -> Self {
        Self {
            first_tick,
            last_tick: first_tick,
            partition_starts: [None; PARTITION_COUNT],
            partition_ends: [None; PARTITION_COUNT],
            changed_rows: 0,
        }
    }

    /// Records the start of a band's computation.
    ///
    /// # Panics
    ///
    /// Panics if `partition >= PARTITION_COUNT`.
    pub fn partition_begin(&mut self, partition: usize, t: HostTime) {
        self.partition_starts[partition] = Some(t);
    }

    /// Records the end of a band's computation.
    ///
    /// # Panics
    ///
    /// Panics if `partition >= PARTITION_COUNT`.
    pub fn partition_end(&mut self, partition: usize, t: HostTime) {
        self.partition_ends[partition] = Some(t);
    }

    /// Records the tick the sweep committed on.
    pub fn set_last_tick(&mut self, tick: u64) {
        self.last_tick = tick;
    }

    /// Records how many rows changed at commit.
    pub fn set_changed_rows(&mut self, rows: u32) {
        self.changed_rows = rows;
    }

    /// Consumes the builder and produces the final [`SweepSummary`].
    #[must_use]
    pub fn finish(self, generation: u64) -> SweepSummary {
        let mut partition_nanos = [0; PARTITION_COUNT];
        for (idx, nanos) in partition_nanos.iter_mut().enumerate() {
            if let (Some(start), Some(end)) = (self.partition_starts[idx], self.partition_ends[idx])
            {
                *nanos = end.saturating_duration_since(start).nanos();
            }
        }
        SweepSummary {
            generation,
            first_tick: self.first_tick,
            last_tick: self.last_tick,
            partition_nanos,
            changed_rows: self.changed_rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
