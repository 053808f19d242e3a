// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell toggles and line-paint gestures.
//!
//! [`toggle_step`] flips one cell and its mirror reflections. [`paint_line`]
//! paints outward from an initiating cell along one axis in both directions,
//! force-setting cells live through the mirror mapper until each direction
//! leaves the grid or runs into a wall.
//!
//! Wall tests run against a snapshot of the grid taken before the gesture, so
//! cells written earlier in the same gesture (including mirror reflections
//! landing ahead of a walk) never stop it.

use crate::grid::{STEP_COUNT, StepGrid};
use crate::symmetry::{MirrorAxes, affected_cells};

/// The axis a line gesture paints along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaintAxis {
    /// Paint along the step (column) axis within one track.
    Horizontal,
    /// Paint along the track (row) axis within one step column.
    Vertical,
}

/// Flips the cell at `(row, col)` and each enabled mirror reflection.
///
/// Each affected cell toggles independently; duplicate reflections are
/// collapsed by the mapper, so no cell flips twice.
///
/// # Panics
///
/// Panics if `row` or `col` is out of bounds.
pub fn toggle_step(grid: &mut StepGrid, row: usize, col: usize, axes: MirrorAxes) {
    for (r, c) in affected_cells(row, col, axes, grid.rows()) {
        grid.toggle(r, c);
    }
}

/// Paints a line outward from `(row, col)` along `axis`.
///
/// The origin cell is toggled (with reflections), then two independent walks
/// run toward index 0 and toward the axis maximum, with a step counter
/// starting at 1:
///
/// - A direction stops permanently once the candidate index leaves the grid
///   or the candidate cell was already live before the gesture (a wall).
/// - While active, offsets where `counter % stride == 0` are force-set live
///   through the mirror mapper; other offsets are skipped, which yields
///   dashed lines at stride 2.
/// - Exception: the backward horizontal walk paints only when no mirror axis
///   is enabled. With a mirror active it advances and honors walls but writes
///   nothing.
///
/// # Panics
///
/// Panics if `row` or `col` is out of bounds or `stride` is zero.
pub fn paint_line(
    grid: &mut StepGrid,
    row: usize,
    col: usize,
    axis: PaintAxis,
    stride: usize,
    axes: MirrorAxes,
) {
    assert!(stride > 0, "stride must be positive");
    let walls = grid.clone();
    toggle_step(grid, row, col, axes);

    let (origin, limit) = match axis {
        PaintAxis::Horizontal => (col, STEP_COUNT),
        PaintAxis::Vertical => (row, grid.rows()),
    };
    let cell_at = |idx: usize| match axis {
        PaintAxis::Horizontal => (row, idx),
        PaintAxis::Vertical => (idx, col),
    };

    let mut backward = true;
    let mut forward = true;
    let mut counter = 1_usize;
    while backward || forward {
        if backward {
            if counter > origin {
                backward = false;
            } else {
                let (r, c) = cell_at(origin - counter);
                if walls.is_alive(r, c) {
                    backward = false;
                } else if counter % stride == 0 {
                    match axis {
                        // Mirrored backward horizontal painting is
                        // intentionally absent; the walk still advances and
                        // stops on walls and bounds.
                        PaintAxis::Horizontal => {
                            if !axes.any() {
                                grid.set_alive(r, c, true);
                            }
                        }
                        PaintAxis::Vertical => {
                            for (mr, mc) in affected_cells(r, c, axes, grid.rows()) {
                                grid.set_alive(mr, mc, true);
                            }
                        }
                    }
                }
            }
        }
        if forward {
            let idx = origin + counter;
            if idx >= limit {
                forward = false;
            } else {
                let (r, c) = cell_at(idx);
                if walls.is_alive(r, c) {
                    forward = false;
                } else if counter % stride == 0 {
                    for (mr, mc) in affected_cells(r, c, axes, grid.rows()) {
                        grid.set_alive(mr, mc, true);
                    }
                }
            }
        }
        counter += 1;
    }
}
