// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transport tick and step output types.
//!
//! A [`TransportTick`] flows from the transport clock into the engine once
//! per sixteenth note. A [`StepOutput`] flows back out: which step column is
//! current, which tracks should trigger, and whether this tick committed a
//! new generation.

use alloc::vec::Vec;

use crate::time::HostTime;

/// One transport clock tick, delivered once per sixteenth note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportTick {
    /// Monotonically increasing tick counter, starting at 0.
    pub index: u64,
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Host time the tick was scheduled for, if the transport paces ahead.
    pub scheduled: Option<HostTime>,
}

impl TransportTick {
    /// Returns the step column this tick addresses.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is reduced modulo the step count first"
    )]
    pub const fn step(self) -> u32 {
        (self.index % crate::grid::STEP_COUNT as u64) as u32
    }
}

/// The per-tick output the engine hands to the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepOutput {
    /// The step column addressed by this tick.
    pub step: u32,
    /// Tracks that are live in the step column and not muted, ascending.
    pub triggered: Vec<u32>,
    /// The new generation number, if this tick committed a sweep.
    pub committed: Option<u64>,
}

impl StepOutput {
    /// Clears the output for reuse.
    pub fn clear(&mut self) {
        self.step = 0;
        self.triggered.clear();
        self.committed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_step_wraps_at_step_count() {
        let tick = |index| TransportTick {
            index,
            now: HostTime(0),
            scheduled: None,
        };
        assert_eq!(tick(0).step(), 0);
        assert_eq!(tick(31).step(), 31);
        assert_eq!(tick(32).step(), 0);
        assert_eq!(tick(33).step(), 1);
    }

    #[test]
    fn output_clear_resets_all_fields() {
        let mut out = StepOutput {
            step: 7,
            triggered: alloc::vec![1, 2],
            committed: Some(3),
        };
        out.clear();
        assert_eq!(out, StepOutput::default());
    }
}
