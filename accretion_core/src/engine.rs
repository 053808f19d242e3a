// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owned engine state and its tick loop.
//!
//! [`Engine`] owns everything the sequencer mutates: the committed grid, the
//! staging grid, the partition cursor, the generation and epoch counters, the
//! mirror and evolution flags, per-track mutes, tempo, the saved flag, and
//! the dirty tracker. There is no ambient singleton; hosts hold the engine
//! and thread `&mut` access through a single transport thread, which is what
//! makes the single-writer discipline explicit.
//!
//! # Tick loop
//!
//! Once per sixteenth note the transport delivers a [`TransportTick`]:
//!
//! 1. [`advance`](Engine::advance) reports the current step column and the
//!    live, unmuted tracks in it, then, while evolution is enabled, computes
//!    the partition band at the cursor into the staging grid.
//! 2. On the sweep's final band the staging grid is copied into the committed
//!    grid and the generation counter increments, exactly once per sweep.
//! 3. Hosts drain per-track change sets via
//!    [`drain_changes`](Engine::drain_changes) to re-render incrementally.
//!
//! # Worker delegation
//!
//! Instead of computing a band inline, a host may call
//! [`plan_partition`](Engine::plan_partition) to obtain a [`PartitionJob`]
//! and post it to a worker; the worker runs [`PartitionJob::compute`] and the
//! result returns to the transport thread, where
//! [`absorb_result`](Engine::absorb_result) applies it. Posting is
//! fire-and-forget; there is no cancellation. Wholesale grid replacements
//! bump the engine epoch, and a result stamped with an older epoch is
//! discarded instead of resurrecting a grid the user already replaced.
//! Within one epoch a late result still lands.

use alloc::vec;
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::dirty;
use crate::grid::StepGrid;
use crate::paint::{self, PaintAxis};
use crate::pattern::{self, Pattern, PatternRng};
use crate::snapshot::{SessionSnapshot, SnapshotError};
use crate::sweep::{self, PARTITION_COUNT};
use crate::symmetry::MirrorAxes;
use crate::time::Tempo;
use crate::timing::{StepOutput, TransportTick};
use crate::trace::{AbsorbEvent, CommitEvent, PartitionEvent, TickEvent, Tracer};

// ---------------------------------------------------------------------------
// Worker contract
// ---------------------------------------------------------------------------

/// One partition band handed to an offload worker.
///
/// Carries value snapshots of both grids so the worker shares nothing with
/// the engine; the epoch stamp lets the engine recognize results that predate
/// a wholesale grid replacement.
#[derive(Clone, Debug)]
pub struct PartitionJob {
    /// First row of the band.
    pub start_row: usize,
    /// One past the last row of the band.
    pub end_row: usize,
    /// Snapshot of the committed grid the band reads.
    pub grid: StepGrid,
    /// Snapshot of the staging grid the band writes into.
    pub staging: StepGrid,
    /// Whether this band completes the sweep.
    pub commit: bool,
    /// Engine epoch at planning time.
    pub epoch: u64,
}

impl PartitionJob {
    /// Computes the band and produces the result to send back.
    #[must_use]
    pub fn compute(mut self) -> PartitionResult {
        sweep::apply_partition(&self.grid, &mut self.staging, self.start_row, self.end_row);
        PartitionResult {
            staging: self.staging,
            commit: self.commit,
            epoch: self.epoch,
        }
    }
}

/// A computed band on its way back to the engine.
#[derive(Clone, Debug)]
pub struct PartitionResult {
    /// The staging grid with the band's rows updated.
    pub staging: StepGrid,
    /// Whether the band completes the sweep.
    pub commit: bool,
    /// Epoch copied from the job.
    pub epoch: u64,
}

/// What [`Engine::absorb_result`] did with a worker result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbsorbOutcome {
    /// The result predates a wholesale replacement and was discarded.
    Stale,
    /// The staging grid was updated; the sweep continues.
    Applied,
    /// The sweep completed and committed the contained generation.
    Committed(u64),
}

// ---------------------------------------------------------------------------
// Change set
// ---------------------------------------------------------------------------

/// The set of changes produced by one [`Engine::drain_changes`] call.
///
/// Each list contains track (row) indices in deterministic order. Hosts use
/// these to re-render only what moved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridChanges {
    /// Rows written by user gestures since the last drain.
    pub edited: Vec<u32>,
    /// Rows changed by sweep commits since the last drain.
    pub evolved: Vec<u32>,
    /// Whether the grid was replaced wholesale; re-read everything.
    pub replaced: bool,
}

impl GridChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.edited.clear();
        self.evolved.clear();
        self.replaced = false;
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The sequencer engine state.
pub struct Engine {
    grid: StepGrid,
    staging: StepGrid,
    cursor: usize,
    generation: u64,
    epoch: u64,
    axes: MirrorAxes,
    evolving: bool,
    mutes: Vec<bool>,
    tempo: Tempo,
    saved: bool,
    dirty: DirtyTracker<u32>,
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("rows", &self.grid.rows())
            .field("cursor", &self.cursor)
            .field("generation", &self.generation)
            .field("epoch", &self.epoch)
            .field("evolving", &self.evolving)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine with an all-dead grid of the given track count.
    ///
    /// Evolution starts disabled, no mirrors, default tempo, nothing muted.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is zero.
    #[must_use]
    pub fn new(rows: usize) -> Self {
        Self {
            grid: StepGrid::new(rows),
            staging: StepGrid::new(rows),
            cursor: 0,
            generation: 0,
            epoch: 0,
            axes: MirrorAxes::NONE,
            evolving: false,
            mutes: vec![false; rows],
            tempo: Tempo::DEFAULT,
            saved: true,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    // -- Read-only accessors --

    /// Returns the number of tracks.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Returns the committed grid.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &StepGrid {
        &self.grid
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the wholesale-replacement epoch.
    #[inline]
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Returns the next partition band the sweep will run.
    #[inline]
    #[must_use]
    pub const fn partition_cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the mirror flags.
    #[inline]
    #[must_use]
    pub const fn mirror_axes(&self) -> MirrorAxes {
        self.axes
    }

    /// Returns whether evolution is running.
    #[inline]
    #[must_use]
    pub const fn is_evolving(&self) -> bool {
        self.evolving
    }

    /// Returns the playback tempo.
    #[inline]
    #[must_use]
    pub const fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Returns whether a track is muted.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    #[must_use]
    pub fn is_muted(&self, row: usize) -> bool {
        self.mutes[row]
    }

    /// Returns whether the session has been saved since the last edit.
    #[inline]
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.saved
    }

    // -- Tick loop --

    /// Processes one transport tick: reports triggers and, while evolution is
    /// enabled, computes the partition band at the cursor.
    pub fn advance(&mut self, tick: &TransportTick, tracer: &mut Tracer<'_>) -> StepOutput {
        let mut out = StepOutput::default();
        self.advance_into(tick, &mut out, tracer);
        out
    }

    /// Like [`advance`](Self::advance), but reuses a caller-provided output
    /// to avoid allocation.
    pub fn advance_into(
        &mut self,
        tick: &TransportTick,
        out: &mut StepOutput,
        tracer: &mut Tracer<'_>,
    ) {
        out.clear();
        out.step = tick.step();
        tracer.tick(&TickEvent {
            index: tick.index,
            step: out.step,
            now: tick.now,
        });
        self.collect_triggers(out.step, &mut out.triggered);

        if self.evolving {
            let partition = self.advance_cursor(tick.index, false, tracer);
            let (start, end) = sweep::partition_rows(self.grid.rows(), partition);
            sweep::apply_partition(&self.grid, &mut self.staging, start, end);
            if partition == PARTITION_COUNT - 1 {
                out.committed = Some(self.commit(tracer));
            }
        }
    }

    /// Plans the current partition band as a worker job instead of computing
    /// it inline, and moves the cursor on. Returns `None` while evolution is
    /// disabled.
    ///
    /// The job is fire-and-forget: post it, return, and feed the result to
    /// [`absorb_result`](Self::absorb_result) whenever it arrives.
    pub fn plan_partition(
        &mut self,
        tick: &TransportTick,
        tracer: &mut Tracer<'_>,
    ) -> Option<PartitionJob> {
        if !self.evolving {
            return None;
        }
        let partition = self.advance_cursor(tick.index, true, tracer);
        let (start, end) = sweep::partition_rows(self.grid.rows(), partition);
        Some(PartitionJob {
            start_row: start,
            end_row: end,
            grid: self.grid.clone(),
            staging: self.staging.clone(),
            commit: partition == PARTITION_COUNT - 1,
            epoch: self.epoch,
        })
    }

    /// Applies a worker result on the transport thread.
    ///
    /// Results stamped with an older epoch are discarded. Fresh results
    /// replace the staging grid; a commit result additionally publishes the
    /// new generation.
    ///
    /// # Panics
    ///
    /// Panics if the result's staging grid has a different row count.
    pub fn absorb_result(
        &mut self,
        result: PartitionResult,
        tracer: &mut Tracer<'_>,
    ) -> AbsorbOutcome {
        tracer.absorb(&AbsorbEvent {
            epoch: result.epoch,
            engine_epoch: self.epoch,
            commit: result.commit,
        });
        if result.epoch != self.epoch {
            return AbsorbOutcome::Stale;
        }
        assert!(
            result.staging.rows() == self.staging.rows(),
            "worker result must match the grid shape"
        );
        self.staging = result.staging;
        if result.commit {
            AbsorbOutcome::Committed(self.commit(tracer))
        } else {
            AbsorbOutcome::Applied
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "partition index and row counts are tiny"
    )]
    fn advance_cursor(&mut self, tick_index: u64, delegated: bool, tracer: &mut Tracer<'_>) -> usize {
        let partition = self.cursor;
        let (start, end) = sweep::partition_rows(self.grid.rows(), partition);
        tracer.partition(&PartitionEvent {
            tick_index,
            partition: partition as u8,
            start_row: start as u32,
            end_row: end as u32,
            delegated,
        });
        self.cursor = (partition + 1) % PARTITION_COUNT;
        partition
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "row counts are small; indices fit u32"
    )]
    fn commit(&mut self, tracer: &mut Tracer<'_>) -> u64 {
        #[cfg(feature = "trace-rich")]
        let mut evolved: Vec<u32> = Vec::new();
        let mut changed_rows: u32 = 0;
        for row in 0..self.grid.rows() {
            if self.grid.row_cells(row) != self.staging.row_cells(row) {
                self.dirty.mark(row as u32, dirty::EVOLVE);
                changed_rows += 1;
                #[cfg(feature = "trace-rich")]
                evolved.push(row as u32);
            }
        }
        self.grid.copy_from(&self.staging);
        self.generation += 1;
        tracer.commit(&CommitEvent {
            generation: self.generation,
            changed_rows,
        });
        #[cfg(feature = "trace-rich")]
        tracer.evolved_rows(self.generation, &evolved);
        self.generation
    }

    fn collect_triggers(&self, step: u32, out: &mut Vec<u32>) {
        self.grid.live_rows_in_column(step as usize, out);
        out.retain(|&row| !self.mutes[row as usize]);
    }

    // -- User edits --

    /// Flips the cell at `(row, col)` and its mirror reflections.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    pub fn toggle_step(&mut self, row: usize, col: usize) {
        paint::toggle_step(&mut self.grid, row, col, self.axes);
        self.mark_edited(row);
    }

    /// Paints a line outward from `(row, col)` along `axis` with the given
    /// stride, through the mirror mapper.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds or `stride` is zero.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "row counts are small; indices fit u32"
    )]
    pub fn paint_line(&mut self, row: usize, col: usize, axis: PaintAxis, stride: usize) {
        paint::paint_line(&mut self.grid, row, col, axis, stride, self.axes);
        match axis {
            PaintAxis::Horizontal => self.mark_edited(row),
            PaintAxis::Vertical => {
                // A vertical walk can reach any row; mark them all.
                self.saved = false;
                for r in 0..self.grid.rows() {
                    self.dirty.mark(r as u32, dirty::EDIT);
                }
            }
        }
    }

    /// Enables or disables the step-axis mirror.
    pub fn set_mirror_x(&mut self, enabled: bool) {
        self.axes.x = enabled;
    }

    /// Enables or disables the track-axis mirror.
    pub fn set_mirror_y(&mut self, enabled: bool) {
        self.axes.y = enabled;
    }

    /// Starts or freezes evolution.
    ///
    /// Freezing keeps the partition cursor where it is; re-enabling resumes
    /// the sweep at the next unprocessed band.
    pub fn set_evolving(&mut self, enabled: bool) {
        self.evolving = enabled;
    }

    /// Sets the playback tempo.
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
    }

    /// Mutes or unmutes a track.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn set_muted(&mut self, row: usize, muted: bool) {
        self.mutes[row] = muted;
    }

    /// Marks the session as saved.
    pub fn mark_saved(&mut self) {
        self.saved = true;
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "row counts are small; indices fit u32"
    )]
    fn mark_edited(&mut self, row: usize) {
        self.saved = false;
        self.dirty.mark(row as u32, dirty::EDIT);
        if self.axes.y {
            self.dirty
                .mark((self.grid.rows() - 1 - row) as u32, dirty::EDIT);
        }
    }

    // -- Wholesale replacement --

    /// Replaces the grid with random cells, roughly 20% live.
    pub fn randomize(&mut self, rng: &mut PatternRng) {
        self.grid
            .replace_cells(pattern::random_cells(self.grid.rows(), rng));
        self.after_replacement();
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.after_replacement();
    }

    /// Replaces the grid with a preset pattern.
    pub fn load_pattern(&mut self, preset: Pattern) {
        let seeded = preset.build(self.grid.rows());
        self.grid.copy_from(&seeded);
        self.after_replacement();
    }

    /// Captures the full session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            rows: self.grid.rows(),
            cells: self.grid.cells().to_vec(),
            generation: self.generation,
            mirror: self.axes,
            evolving: self.evolving,
            tempo: self.tempo,
            mutes: self.mutes.clone(),
        }
    }

    /// Restores a previously captured session.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] and leaves the engine untouched when the
    /// snapshot does not match the running grid shape.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), SnapshotError> {
        snapshot.validate(self.grid.rows())?;
        self.grid.replace_cells(snapshot.cells.clone());
        self.generation = snapshot.generation;
        self.axes = snapshot.mirror;
        self.evolving = snapshot.evolving;
        self.tempo = snapshot.tempo;
        self.mutes.clone_from(&snapshot.mutes);
        self.after_replacement();
        self.saved = true;
        Ok(())
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "row counts are small; indices fit u32"
    )]
    fn after_replacement(&mut self) {
        self.staging.copy_from(&self.grid);
        self.cursor = 0;
        self.epoch += 1;
        self.saved = false;
        for row in 0..self.grid.rows() {
            self.dirty.mark(row as u32, dirty::SHAPE);
        }
    }

    // -- Change draining --

    /// Drains all dirty channels into a fresh [`GridChanges`].
    pub fn drain_changes(&mut self) -> GridChanges {
        let mut changes = GridChanges::default();
        self.drain_changes_into(&mut changes);
        changes
    }

    /// Like [`drain_changes`](Self::drain_changes), but reuses a
    /// caller-provided buffer to avoid allocation.
    pub fn drain_changes_into(&mut self, changes: &mut GridChanges) {
        changes.clear();
        changes.edited = self
            .dirty
            .drain(dirty::EDIT)
            .deterministic()
            .run()
            .collect();
        changes.evolved = self
            .dirty
            .drain(dirty::EVOLVE)
            .deterministic()
            .run()
            .collect();
        let replaced: Vec<u32> = self
            .dirty
            .drain(dirty::SHAPE)
            .deterministic()
            .run()
            .collect();
        changes.replaced = !replaced.is_empty();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::HostTime;

    const ROWS: usize = 8;

    fn tick(index: u64) -> TransportTick {
        TransportTick {
            index,
            now: HostTime(index * 1_000),
            scheduled: None,
        }
    }

    fn blinker_engine() -> Engine {
        let mut engine = Engine::new(ROWS);
        engine.toggle_step(3, 2);
        engine.toggle_step(3, 3);
        engine.toggle_step(3, 4);
        engine.set_evolving(true);
        let _ = engine.drain_changes();
        engine
    }

    fn full_sweep(grid: &StepGrid) -> StepGrid {
        let mut next = StepGrid::new(grid.rows());
        sweep::apply_partition(grid, &mut next, 0, grid.rows());
        next
    }

    #[test]
    fn four_advances_commit_one_generation() {
        let mut engine = blinker_engine();
        let expected = full_sweep(engine.grid());

        let mut tracer = Tracer::none();
        for i in 0..3 {
            let out = engine.advance(&tick(i), &mut tracer);
            assert_eq!(out.committed, None, "no commit before the final band");
        }
        let out = engine.advance(&tick(3), &mut tracer);
        assert_eq!(out.committed, Some(1));
        assert_eq!(engine.generation(), 1);
        assert_eq!(engine.grid(), &expected, "matches one full sweep");
    }

    #[test]
    fn triggers_report_live_unmuted_tracks() {
        let mut engine = Engine::new(ROWS);
        engine.toggle_step(1, 0);
        engine.toggle_step(5, 0);
        engine.toggle_step(2, 1);
        engine.set_muted(5, true);

        let mut tracer = Tracer::none();
        let out = engine.advance(&tick(0), &mut tracer);
        assert_eq!(out.step, 0);
        assert_eq!(out.triggered, &[1], "row 5 is muted");

        let out = engine.advance(&tick(1), &mut tracer);
        assert_eq!(out.step, 1);
        assert_eq!(out.triggered, &[2]);

        let out = engine.advance(&tick(32), &mut tracer);
        assert_eq!(out.step, 0, "step wraps at 32");
    }

    #[test]
    fn disabled_evolution_freezes_the_cursor() {
        let mut engine = blinker_engine();
        let mut tracer = Tracer::none();

        let _ = engine.advance(&tick(0), &mut tracer);
        let _ = engine.advance(&tick(1), &mut tracer);
        assert_eq!(engine.partition_cursor(), 2);

        engine.set_evolving(false);
        let _ = engine.advance(&tick(2), &mut tracer);
        let _ = engine.advance(&tick(3), &mut tracer);
        assert_eq!(engine.partition_cursor(), 2, "frozen while disabled");
        assert_eq!(engine.generation(), 0);

        engine.set_evolving(true);
        let _ = engine.advance(&tick(4), &mut tracer);
        assert_eq!(engine.partition_cursor(), 3, "resumed at band 2");
        let out = engine.advance(&tick(5), &mut tracer);
        assert_eq!(out.committed, Some(1), "sweep completes after resume");
    }

    #[test]
    fn worker_path_matches_inline_path() {
        let mut inline_engine = blinker_engine();
        let mut worker_engine = blinker_engine();
        let mut tracer = Tracer::none();

        for i in 0..4 {
            let _ = inline_engine.advance(&tick(i), &mut tracer);
            let job = worker_engine
                .plan_partition(&tick(i), &mut tracer)
                .unwrap();
            let result = job.compute();
            let outcome = worker_engine.absorb_result(result, &mut tracer);
            if i == 3 {
                assert_eq!(outcome, AbsorbOutcome::Committed(1));
            } else {
                assert_eq!(outcome, AbsorbOutcome::Applied);
            }
        }
        assert_eq!(worker_engine.grid(), inline_engine.grid());
        assert_eq!(worker_engine.generation(), 1);
    }

    #[test]
    fn stale_worker_result_is_discarded() {
        let mut engine = blinker_engine();
        let mut tracer = Tracer::none();

        let job = engine.plan_partition(&tick(0), &mut tracer).unwrap();
        engine.clear();
        let result = job.compute();
        let outcome = engine.absorb_result(result, &mut tracer);
        assert_eq!(outcome, AbsorbOutcome::Stale);
        assert!(
            engine.grid().cells().iter().all(|&c| c == 0),
            "cleared grid survives the stale result"
        );
    }

    #[test]
    fn late_result_within_epoch_still_lands() {
        let mut engine = blinker_engine();
        let mut tracer = Tracer::none();

        let job = engine.plan_partition(&tick(0), &mut tracer).unwrap();
        // An edit is not a wholesale replacement; it does not fence.
        engine.toggle_step(0, 0);
        let outcome = engine.absorb_result(job.compute(), &mut tracer);
        assert_eq!(outcome, AbsorbOutcome::Applied);
    }

    #[test]
    fn edits_mark_rows_and_clear_saved() {
        let mut engine = Engine::new(ROWS);
        assert!(engine.is_saved());
        engine.toggle_step(2, 10);
        assert!(!engine.is_saved());

        let changes = engine.drain_changes();
        assert_eq!(changes.edited, &[2]);
        assert!(changes.evolved.is_empty());
        assert!(!changes.replaced);

        engine.mark_saved();
        assert!(engine.is_saved());
    }

    #[test]
    fn mirrored_edit_marks_the_reflected_row_too() {
        let mut engine = Engine::new(ROWS);
        engine.set_mirror_y(true);
        engine.toggle_step(1, 4);
        let mut changes = engine.drain_changes();
        changes.edited.sort_unstable();
        assert_eq!(changes.edited, &[1, 6]);
    }

    #[test]
    fn commit_marks_changed_rows_in_evolve() {
        let mut engine = blinker_engine();
        let mut tracer = Tracer::none();
        for i in 0..4 {
            let _ = engine.advance(&tick(i), &mut tracer);
        }
        let mut changes = engine.drain_changes();
        changes.evolved.sort_unstable();
        // The blinker flips rows 2, 3, 4.
        assert_eq!(changes.evolved, &[2, 3, 4]);
        assert!(!changes.replaced);
    }

    #[test]
    fn wholesale_replacement_sets_replaced_and_bumps_epoch() {
        let mut engine = Engine::new(ROWS);
        let epoch = engine.epoch();
        engine.load_pattern(Pattern::Pulse);
        assert_eq!(engine.epoch(), epoch + 1);
        assert!(!engine.is_saved());

        let changes = engine.drain_changes();
        assert!(changes.replaced);
        assert!(engine.grid().is_alive(0, 0));
    }

    #[test]
    fn replacement_restarts_the_sweep() {
        let mut engine = blinker_engine();
        let mut tracer = Tracer::none();
        let _ = engine.advance(&tick(0), &mut tracer);
        let _ = engine.advance(&tick(1), &mut tracer);
        let mut rng = PatternRng::new(99);
        engine.randomize(&mut rng);
        assert_eq!(engine.partition_cursor(), 0, "sweep restarts from band 0");
    }

    #[test]
    fn snapshot_round_trip() {
        let mut engine = Engine::new(ROWS);
        engine.toggle_step(0, 0);
        engine.toggle_step(7, 31);
        engine.set_mirror_x(true);
        engine.set_tempo(Tempo::new(96));
        engine.set_muted(3, true);
        engine.set_evolving(true);
        let snapshot = engine.snapshot();

        let mut restored = Engine::new(ROWS);
        restored.restore(&snapshot).unwrap();
        assert_eq!(restored.grid(), engine.grid());
        assert_eq!(restored.tempo(), Tempo::new(96));
        assert!(restored.mirror_axes().x);
        assert!(restored.is_evolving());
        assert!(restored.is_muted(3));
        assert!(restored.is_saved(), "a restored session starts saved");
    }

    #[test]
    fn restore_rejects_wrong_shape() {
        let snapshot = Engine::new(4).snapshot();
        let mut engine = Engine::new(ROWS);
        engine.toggle_step(0, 5);
        let err = engine.restore(&snapshot).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::RowCountMismatch {
                expected: ROWS,
                found: 4
            }
        );
        assert!(engine.grid().is_alive(0, 5), "engine untouched on error");
    }

    #[test]
    fn dead_grid_stays_dead_across_sweeps() {
        let mut engine = Engine::new(ROWS);
        engine.set_evolving(true);
        let mut tracer = Tracer::none();
        for i in 0..16 {
            let _ = engine.advance(&tick(i), &mut tracer);
        }
        assert_eq!(engine.generation(), 4);
        assert!(engine.grid().cells().iter().all(|&c| c == 0));
        assert!(
            engine.drain_changes().evolved.is_empty(),
            "unchanged commits mark nothing"
        );
    }

    #[test]
    fn step_output_is_column_scoped() {
        let mut engine = Engine::new(ROWS);
        engine.toggle_step(4, 16);
        let mut tracer = Tracer::none();
        let out = engine.advance(&tick(16), &mut tracer);
        assert_eq!(out.triggered, &[4]);
        let out = engine.advance(&tick(17), &mut tracer);
        assert!(out.triggered.is_empty());
    }
}
