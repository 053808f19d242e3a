// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core grid, evolution, and sequencing engine for the accretion step
//! sequencer.
//!
//! `accretion_core` provides the data structures for a step sequencer whose
//! patterns evolve under a cellular-automaton rule. It is `no_std`
//! compatible (with `alloc`) and keeps every per-tick operation allocation
//! free once buffers are warm.
//!
//! # Architecture
//!
//! The crate is organized around a tick loop that turns transport clock
//! ticks into triggers and incremental grid updates:
//!
//! ```text
//!   Backend (tick source)
//!       │
//!       ▼
//!   TransportTick ──► Engine::advance() ──► StepOutput ──► StepSink::trigger()
//!                          │
//!                          ▼
//!   Engine::drain_changes() ──► GridChanges ──► StepSink::apply_changes()
//! ```
//!
//! **[`grid`]** — The `rows × 32` cell buffer with row-major storage and
//! per-column trigger queries.
//!
//! **[`rule`]** — The B3/S23 birth and survival rule over a bounded
//! neighbourhood. Cells beyond the edges count as dead.
//!
//! **[`sweep`]** — Row-band partitioning. Each sweep is split into four
//! bands so one transport tick pays for a quarter of the work.
//!
//! **[`engine`]** — [`Engine`](engine::Engine) glues the pieces together:
//! trigger collection, the partition cursor, generation commits, edits,
//! snapshots, and the optional worker offload contract.
//!
//! **[`symmetry`]** — Mirror-axis reflection for edits. One gesture writes
//! up to four cells.
//!
//! **[`paint`]** — Step toggles and line-painting gestures with stride and
//! wall semantics.
//!
//! **[`pattern`]** — Built-in preset grids and deterministic randomization.
//!
//! **[`dirty`]** — Row-keyed dirty tracking via `understory_dirty`. Edits,
//! commits, and wholesale replacements mark separate channels.
//!
//! **[`timing`]** — [`TransportTick`](timing::TransportTick) in,
//! [`StepOutput`](timing::StepOutput) out.
//!
//! **[`time`]** — `HostTime`, `Duration`, and `Tempo` with sixteenth-note
//! interval math.
//!
//! **[`snapshot`]** — Validated session captures for host-side persistence.
//!
//! **[`backend`]** — The [`StepSink`](backend::StepSink) trait that host
//! backends implement to consume engine output.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for tick-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-row
//!   evolution events at commit time.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod dirty;
pub mod engine;
pub mod grid;
pub mod paint;
pub mod pattern;
pub mod rule;
pub mod snapshot;
pub mod sweep;
pub mod symmetry;
pub mod time;
pub mod timing;
pub mod trace;
