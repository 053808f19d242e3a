// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host integrations.
//!
//! Accretion splits host-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Tick source** — Produces [`TransportTick`] values once per sixteenth
//!   note via a host mechanism (e.g. a paced thread, an audio callback).
//!   This is backend-specific and not abstracted by a trait because the
//!   setup and lifecycle differ fundamentally across hosts.
//!
//! - **Time** — A `now() -> HostTime` free function that reads the host's
//!   monotonic clock.
//!
//! - **Step sink** — Implements the [`StepSink`] trait to turn engine
//!   output into sound and display updates (e.g. note-on messages, a lit
//!   step column).
//!
//! - **Worker** (optional) — Accepts [`PartitionJob`] values, computes them
//!   off the tick thread, and hands [`PartitionResult`] values back to
//!   [`Engine::absorb_result`].
//!
//! # Crate boundaries
//!
//! `accretion_core` owns the grid, the evolution rule, the engine, and this
//! contract module. Backend crates depend on `accretion_core` and provide
//! host glue. Application code depends on both and wires them together in a
//! tick loop.
//!
//! [`TransportTick`]: crate::timing::TransportTick
//! [`PartitionJob`]: crate::engine::PartitionJob
//! [`PartitionResult`]: crate::engine::PartitionResult
//! [`Engine::absorb_result`]: crate::engine::Engine::absorb_result

use crate::engine::GridChanges;
use crate::timing::StepOutput;

/// Consumes per-tick engine output.
///
/// Both audio and display integrations implement this trait, enabling
/// generic tick loops and test doubles.
///
/// # Tick loop pseudocode
///
/// A typical tick callback wires the pieces together like this:
///
/// ```rust,ignore
/// fn on_tick(tick: TransportTick) {
///     // Advance: trigger collection plus one evolution partition
///     engine.advance_into(&tick, &mut output, &mut tracer);
///     sink.trigger(&output);
///
///     // Drain: rows touched by edits and commits since the last tick
///     engine.drain_changes_into(&mut changes);
///     sink.apply_changes(&changes);
/// }
/// ```
pub trait StepSink {
    /// Receives the triggers and commit marker for one transport tick.
    fn trigger(&mut self, output: &StepOutput);

    /// Receives the rows whose cells changed since the previous drain.
    fn apply_changes(&mut self, changes: &GridChanges);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::time::HostTime;
    use crate::timing::TransportTick;
    use crate::trace::Tracer;
    use alloc::vec::Vec;

    struct RecordingSink {
        steps: Vec<u32>,
        edited: Vec<u32>,
    }

    impl StepSink for RecordingSink {
        fn trigger(&mut self, output: &StepOutput) {
            self.steps.push(output.step);
        }

        fn apply_changes(&mut self, changes: &GridChanges) {
            self.edited.extend_from_slice(&changes.edited);
        }
    }

    #[test]
    fn tick_loop_feeds_the_sink() {
        let mut engine = Engine::new(8);
        let mut tracer = Tracer::none();
        let mut sink = RecordingSink {
            steps: Vec::new(),
            edited: Vec::new(),
        };
        engine.toggle_step(3, 0);

        let mut output = StepOutput::default();
        let mut changes = GridChanges::default();
        for index in 0..3 {
            let tick = TransportTick {
                index,
                now: HostTime(index * 1_000),
                scheduled: None,
            };
            engine.advance_into(&tick, &mut output, &mut tracer);
            sink.trigger(&output);
            engine.drain_changes_into(&mut changes);
            sink.apply_changes(&changes);
        }

        assert_eq!(sink.steps, [0, 1, 2]);
        assert_eq!(sink.edited, [3]);
    }
}
