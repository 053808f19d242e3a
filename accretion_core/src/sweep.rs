// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partitioned evolution sweeps.
//!
//! One sweep applies the rule to every cell of the grid. To keep each
//! transport tick cheap, a sweep is split into [`PARTITION_COUNT`] contiguous
//! row bands; one band is computed per tick and the result is committed only
//! after the final band.
//!
//! [`partition_rows`] derives the band boundaries from the row count alone,
//! so the same partitioning is computed identically on the engine side and on
//! an offload worker. [`apply_partition`] computes one band: it reads the
//! committed grid and writes next states into the staging grid, leaving rows
//! outside the band untouched.

use crate::grid::{STEP_COUNT, StepGrid};
use crate::rule::{live_neighbours, next_state};

/// Number of row bands a sweep is split into.
pub const PARTITION_COUNT: usize = 4;

/// Returns the `[start, end)` row range of one partition band.
///
/// Bands are contiguous and cover every row across the four partitions; the
/// last band absorbs the remainder when `rows` is not divisible by four.
///
/// # Panics
///
/// Panics if `partition >= PARTITION_COUNT`.
#[must_use]
pub const fn partition_rows(rows: usize, partition: usize) -> (usize, usize) {
    assert!(partition < PARTITION_COUNT, "partition index out of range");
    let band = rows / PARTITION_COUNT;
    let start = partition * band;
    let end = if partition == PARTITION_COUNT - 1 {
        rows
    } else {
        start + band
    };
    (start, end)
}

/// Computes next states for rows `[start_row, end_row)` of `current` into
/// `staging`.
///
/// Rows outside the band keep their previous staging contents.
///
/// # Panics
///
/// Panics if the grids differ in shape or the range exceeds the row count.
pub fn apply_partition(current: &StepGrid, staging: &mut StepGrid, start_row: usize, end_row: usize) {
    assert!(
        current.rows() == staging.rows(),
        "current and staging grids must have the same shape"
    );
    assert!(end_row <= current.rows(), "partition exceeds grid rows");
    for row in start_row..end_row {
        for col in 0..STEP_COUNT {
            let alive = current.is_alive(row, col);
            let neighbours = live_neighbours(current, row, col);
            staging.set_alive(row, col, next_state(alive, neighbours));
        }
    }
}
