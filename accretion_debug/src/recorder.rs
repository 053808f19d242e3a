// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! The rich event ([`on_evolved_rows`](TraceSink::on_evolved_rows)) stores
//! only the row count.

use accretion_core::sweep::PARTITION_COUNT;
use accretion_core::time::HostTime;
use accretion_core::trace::{
    AbsorbEvent, CommitEvent, PartitionEvent, SweepSummary, TickEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TICK: u8 = 1;
const TAG_PARTITION: u8 = 2;
const TAG_COMMIT: u8 = 3;
const TAG_ABSORB: u8 = 4;
const TAG_SWEEP_SUMMARY: u8 = 5;
const TAG_EVOLVED_ROWS_COUNT: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }
}

impl TraceSink for RecorderSink {
    fn on_tick(&mut self, e: &TickEvent) {
        self.write_u8(TAG_TICK);
        self.write_u64(e.index);
        self.write_u32(e.step);
        self.write_u64(e.now.nanos());
    }

    fn on_partition(&mut self, e: &PartitionEvent) {
        self.write_u8(TAG_PARTITION);
        self.write_u64(e.tick_index);
        self.write_u8(e.partition);
        self.write_u32(e.start_row);
        self.write_u32(e.end_row);
        self.write_bool(e.delegated);
    }

    fn on_commit(&mut self, e: &CommitEvent) {
        self.write_u8(TAG_COMMIT);
        self.write_u64(e.generation);
        self.write_u32(e.changed_rows);
    }

    fn on_absorb(&mut self, e: &AbsorbEvent) {
        self.write_u8(TAG_ABSORB);
        self.write_u64(e.epoch);
        self.write_u64(e.engine_epoch);
        self.write_bool(e.commit);
    }

    fn on_sweep_summary(&mut self, s: &SweepSummary) {
        self.write_u8(TAG_SWEEP_SUMMARY);
        self.write_u64(s.generation);
        self.write_u64(s.first_tick);
        self.write_u64(s.last_tick);
        for nanos in s.partition_nanos {
            self.write_u64(nanos);
        }
        self.write_u32(s.changed_rows);
    }

    fn on_evolved_rows(&mut self, generation: u64, rows: &[u32]) {
        self.write_u8(TAG_EVOLVED_ROWS_COUNT);
        self.write_u64(generation);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "row count capped at u32::MAX for recording"
        )]
        self.write_u32(rows.len().min(u32::MAX as usize) as u32);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`TickEvent`].
    Tick(TickEvent),
    /// A [`PartitionEvent`].
    Partition(PartitionEvent),
    /// A [`CommitEvent`].
    Commit(CommitEvent),
    /// An [`AbsorbEvent`].
    Absorb(AbsorbEvent),
    /// A [`SweepSummary`].
    SweepSummary(SweepSummary),
    /// Evolved-row count for a commit.
    EvolvedRowsCount {
        /// The generation the rows changed at.
        generation: u64,
        /// Number of changed rows.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn decode_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Tick(TickEvent {
            index: self.read_u64()?,
            step: self.read_u32()?,
            now: HostTime(self.read_u64()?),
        }))
    }

    fn decode_partition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Partition(PartitionEvent {
            tick_index: self.read_u64()?,
            partition: self.read_u8()?,
            start_row: self.read_u32()?,
            end_row: self.read_u32()?,
            delegated: self.read_bool()?,
        }))
    }

    fn decode_commit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Commit(CommitEvent {
            generation: self.read_u64()?,
            changed_rows: self.read_u32()?,
        }))
    }

    fn decode_absorb(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Absorb(AbsorbEvent {
            epoch: self.read_u64()?,
            engine_epoch: self.read_u64()?,
            commit: self.read_bool()?,
        }))
    }

    fn decode_sweep_summary(&mut self) -> Option<RecordedEvent> {
        let generation = self.read_u64()?;
        let first_tick = self.read_u64()?;
        let last_tick = self.read_u64()?;
        let mut partition_nanos = [0; PARTITION_COUNT];
        for nanos in &mut partition_nanos {
            *nanos = self.read_u64()?;
        }
        let changed_rows = self.read_u32()?;
        Some(RecordedEvent::SweepSummary(SweepSummary {
            generation,
            first_tick,
            last_tick,
            partition_nanos,
            changed_rows,
        }))
    }

    fn decode_evolved_rows_count(&mut self) -> Option<RecordedEvent> {
        let generation = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::EvolvedRowsCount { generation, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TICK => self.decode_tick(),
            TAG_PARTITION => self.decode_partition(),
            TAG_COMMIT => self.decode_commit(),
            TAG_ABSORB => self.decode_absorb(),
            TAG_SWEEP_SUMMARY => self.decode_sweep_summary(),
            TAG_EVOLVED_ROWS_COUNT => self.decode_evolved_rows_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tick_event() -> TickEvent {
        TickEvent {
            index: 7,
            step: 7,
            now: HostTime(1_000_000),
        }
    }

    fn sample_partition_event() -> PartitionEvent {
        PartitionEvent {
            tick_index: 7,
            partition: 3,
            start_row: 18,
            end_row: 26,
            delegated: true,
        }
    }

    fn sample_summary() -> SweepSummary {
        SweepSummary {
            generation: 12,
            first_tick: 40,
            last_tick: 43,
            partition_nanos: [400, 310, 290, 355],
            changed_rows: 5,
        }
    }

    #[test]
    fn round_trip_tick() {
        let mut rec = RecorderSink::new();
        let orig = sample_tick_event();
        rec.on_tick(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::Tick(e) => {
                assert_eq!(e.index, orig.index);
                assert_eq!(e.step, orig.step);
                assert_eq!(e.now, orig.now);
            }
            other => panic!("expected Tick, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_partition() {
        let mut rec = RecorderSink::new();
        let orig = sample_partition_event();
        rec.on_partition(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::Partition(e) => {
                assert_eq!(e.tick_index, orig.tick_index);
                assert_eq!(e.partition, orig.partition);
                assert_eq!(e.start_row, orig.start_row);
                assert_eq!(e.end_row, orig.end_row);
                assert_eq!(e.delegated, orig.delegated);
            }
            other => panic!("expected Partition, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_commit_and_absorb() {
        let mut rec = RecorderSink::new();
        rec.on_commit(&CommitEvent {
            generation: 9,
            changed_rows: 4,
        });
        rec.on_absorb(&AbsorbEvent {
            epoch: 2,
            engine_epoch: 3,
            commit: false,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::Commit(e) => {
                assert_eq!(e.generation, 9);
                assert_eq!(e.changed_rows, 4);
            }
            other => panic!("expected Commit, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::Absorb(e) => {
                assert_eq!(e.epoch, 2);
                assert_eq!(e.engine_epoch, 3);
                assert!(!e.commit);
                assert!(e.stale());
            }
            other => panic!("expected Absorb, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_sweep_summary() {
        let mut rec = RecorderSink::new();
        let orig = sample_summary();
        rec.on_sweep_summary(&orig);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::SweepSummary(s) => {
                assert_eq!(s.generation, orig.generation);
                assert_eq!(s.first_tick, orig.first_tick);
                assert_eq!(s.last_tick, orig.last_tick);
                assert_eq!(s.partition_nanos, orig.partition_nanos);
                assert_eq!(s.changed_rows, orig.changed_rows);
            }
            other => panic!("expected SweepSummary, got {other:?}"),
        }
    }

    #[test]
    fn round_trip_multiple_events() {
        let mut rec = RecorderSink::new();
        rec.on_tick(&sample_tick_event());
        rec.on_partition(&sample_partition_event());
        rec.on_sweep_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], RecordedEvent::Tick(_)));
        assert!(matches!(events[1], RecordedEvent::Partition(_)));
        assert!(matches!(events[2], RecordedEvent::SweepSummary(_)));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn evolved_rows_store_only_the_count() {
        let mut rec = RecorderSink::new();
        rec.on_evolved_rows(42, &[1, 4, 6]);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::EvolvedRowsCount { generation, count } => {
                assert_eq!(*generation, 42);
                assert_eq!(*count, 3);
            }
            other => panic!("expected EvolvedRowsCount, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_tick(&sample_tick_event());
        let bytes = rec.as_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert!(events.is_empty());
    }
}
