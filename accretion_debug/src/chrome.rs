// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Ticks carry host timestamps; the remaining events are anchored to the
/// most recent tick's time.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut anchor_us = 0.0_f64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Tick(e) => {
                anchor_us = nanos_to_us(e.now.nanos());
                events.push(json!({
                    "ph": "i",
                    "name": "TransportTick",
                    "cat": "Transport",
                    "ts": anchor_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "index": e.index,
                        "step": e.step,
                    }
                }));
            }
            RecordedEvent::Partition(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Partition",
                    "cat": "Sweep",
                    "ts": anchor_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "tick_index": e.tick_index,
                        "band": e.partition,
                        "start_row": e.start_row,
                        "end_row": e.end_row,
                        "delegated": e.delegated,
                    }
                }));
            }
            RecordedEvent::Commit(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Commit",
                    "cat": "Sweep",
                    "ts": anchor_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "generation": e.generation,
                        "changed_rows": e.changed_rows,
                    }
                }));
            }
            RecordedEvent::Absorb(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Absorb",
                    "cat": "Worker",
                    "ts": anchor_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "epoch": e.epoch,
                        "engine_epoch": e.engine_epoch,
                        "commit": e.commit,
                        "stale": e.stale(),
                    }
                }));
            }
            RecordedEvent::SweepSummary(s) => {
                let band_us: Vec<f64> = s
                    .partition_nanos
                    .iter()
                    .map(|&nanos| nanos_to_us(nanos))
                    .collect();
                events.push(json!({
                    "ph": "i",
                    "name": "SweepSummary",
                    "cat": "Summary",
                    "ts": anchor_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "generation": s.generation,
                        "first_tick": s.first_tick,
                        "last_tick": s.last_tick,
                        "band_us": band_us,
                        "changed_rows": s.changed_rows,
                    }
                }));
            }
            RecordedEvent::EvolvedRowsCount { generation, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "EvolvedRows",
                    "cat": "Rich",
                    "ts": anchor_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "generation": generation,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn nanos_to_us(nanos: u64) -> f64 {
    nanos as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use accretion_core::time::HostTime;
    use accretion_core::trace::{CommitEvent, PartitionEvent, TickEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_tick(&TickEvent {
            index: 0,
            step: 0,
            now: HostTime(1_000_000),
        });
        rec.on_partition(&PartitionEvent {
            tick_index: 0,
            partition: 0,
            start_row: 0,
            end_row: 2,
            delegated: false,
        });
        rec.on_commit(&CommitEvent {
            generation: 1,
            changed_rows: 2,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        // First event is an instant TransportTick.
        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "TransportTick");

        // Later events anchor to the tick's time.
        assert_eq!(parsed[1]["name"], "Partition");
        assert_eq!(parsed[1]["ts"], parsed[0]["ts"]);
        assert_eq!(parsed[2]["name"], "Commit");
        assert_eq!(parsed[2]["args"]["generation"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
