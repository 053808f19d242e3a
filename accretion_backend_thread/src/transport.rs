// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tempo-paced transport clock on a dedicated thread.
//!
//! [`Transport`] spawns a thread that invokes a host callback with one
//! [`TransportTick`] per sixteenth note. The callback owns the engine and
//! runs every core operation, so the single-writer discipline holds by
//! construction.
//!
//! [`TransportTick`]: accretion_core::timing::TransportTick

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::thread::{self, JoinHandle};

use accretion_core::time::Tempo;
use accretion_core::timing::TransportTick;

use crate::clock;

/// How often the paused loop rechecks its flags.
const PAUSE_POLL: std::time::Duration = std::time::Duration::from_millis(5);

struct Controls {
    bpm: AtomicU16,
    paused: AtomicBool,
    stop: AtomicBool,
}

/// A transport clock that delivers [`TransportTick`] events on its own
/// thread.
///
/// Ticks are scheduled against a monotonic clock, one sixteenth-note
/// interval apart at the current tempo. If the callback overruns an
/// interval the schedule re-anchors to the present instead of bursting to
/// catch up. Tick indices increase by one regardless.
///
/// Dropping the transport stops the thread and joins it.
///
/// # Example
///
/// ```ignore
/// let transport = Transport::spawn(Tempo::DEFAULT, move |tick| {
///     engine.advance_into(&tick, &mut output, &mut tracer);
///     sink.trigger(&output);
/// })?;
/// ```
pub struct Transport {
    controls: Arc<Controls>,
    handle: Option<JoinHandle<()>>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("tempo", &self.tempo())
            .field("paused", &self.is_paused())
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Spawns the transport thread at the given tempo.
    ///
    /// The callback is invoked on the transport thread for every tick,
    /// starting immediately at index 0.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the OS refuses to spawn a thread.
    pub fn spawn<F>(tempo: Tempo, callback: F) -> io::Result<Self>
    where
        F: FnMut(TransportTick) + Send + 'static,
    {
        let controls = Arc::new(Controls {
            bpm: AtomicU16::new(tempo.bpm()),
            paused: AtomicBool::new(false),
            stop: AtomicBool::new(false),
        });
        let thread_controls = Arc::clone(&controls);
        let handle = thread::Builder::new()
            .name("accretion-transport".into())
            .spawn(move || run(&thread_controls, callback))?;
        Ok(Self {
            controls,
            handle: Some(handle),
        })
    }

    /// Returns the current tempo.
    #[must_use]
    pub fn tempo(&self) -> Tempo {
        Tempo::new(self.controls.bpm.load(Ordering::Relaxed))
    }

    /// Changes the tempo. Takes effect from the next tick.
    pub fn set_tempo(&self, tempo: Tempo) {
        self.controls.bpm.store(tempo.bpm(), Ordering::Relaxed);
    }

    /// Returns whether tick delivery is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.controls.paused.load(Ordering::Acquire)
    }

    /// Pauses or resumes tick delivery.
    ///
    /// Resuming re-anchors the schedule to the present; the tick index
    /// continues from where it left off.
    pub fn set_paused(&self, paused: bool) {
        self.controls.paused.store(paused, Ordering::Release);
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.controls.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run<F: FnMut(TransportTick)>(controls: &Controls, mut callback: F) {
    let mut index = 0_u64;
    let mut scheduled = clock::now();
    while !controls.stop.load(Ordering::Acquire) {
        if controls.paused.load(Ordering::Acquire) {
            thread::sleep(PAUSE_POLL);
            scheduled = clock::now();
            continue;
        }

        let wait = scheduled.saturating_duration_since(clock::now());
        if wait.nanos() > 0 {
            thread::sleep(std::time::Duration::from_nanos(wait.nanos()));
        }

        let now = clock::now();
        callback(TransportTick {
            index,
            now,
            scheduled: Some(scheduled),
        });
        index += 1;

        let interval = Tempo::new(controls.bpm.load(Ordering::Relaxed)).sixteenth_interval();
        let next = scheduled + interval;
        // Overrun: re-anchor to the present rather than firing a burst.
        scheduled = next.max(clock::now());
    }
}
