// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in microseconds.

use std::io::Write;

use accretion_core::time::HostTime;
use accretion_core::trace::{
    AbsorbEvent, CommitEvent, PartitionEvent, SweepSummary, TickEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

fn host_us(t: HostTime) -> f64 {
    t.nanos() as f64 / 1000.0
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick(&mut self, e: &TickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] index={} step={} now={:.1}µs",
            e.index,
            e.step,
            host_us(e.now),
        );
    }

    fn on_partition(&mut self, e: &PartitionEvent) {
        let via = if e.delegated { "worker" } else { "inline" };
        let _ = writeln!(
            self.writer,
            "[partition] tick={} band={} rows={}..{} via={via}",
            e.tick_index, e.partition, e.start_row, e.end_row,
        );
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        let _ = writeln!(
            self.writer,
            "[commit] generation={} changed_rows={}",
            e.generation, e.changed_rows,
        );
    }

    fn on_absorb(&mut self, e: &AbsorbEvent) {
        let fate = if e.stale() { "STALE" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "[absorb] epoch={}/{} commit={} {fate}",
            e.epoch, e.engine_epoch, e.commit,
        );
    }

    fn on_sweep_summary(&mut self, s: &SweepSummary) {
        let band_us: Vec<f64> = s
            .partition_nanos
            .iter()
            .map(|&nanos| nanos as f64 / 1000.0)
            .collect();
        let _ = writeln!(
            self.writer,
            "[summary] generation={} ticks={}..{} bands={band_us:.1?}µs changed_rows={}",
            s.generation, s.first_tick, s.last_tick, s.changed_rows,
        );
    }

    fn on_evolved_rows(&mut self, generation: u64, rows: &[u32]) {
        let _ = writeln!(
            self.writer,
            "[rows] generation={generation} changed={}",
            rows.len(),
        );
    }
}
