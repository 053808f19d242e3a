// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-shape step grid storage.
//!
//! [`StepGrid`] owns a rectangular cell matrix with rows as tracks and columns
//! as steps. The column count is fixed at [`STEP_COUNT`] for the lifetime of a
//! process; the row count is chosen at construction and never changes.
//!
//! Cells store 0 (dead) or 1 (live) in a row-major `Vec<u8>`. Accessors assert
//! bounds; the grid never wraps. Wholesale replacement ([`replace_cells`],
//! [`copy_from`]) always preserves the shape.
//!
//! [`replace_cells`]: StepGrid::replace_cells
//! [`copy_from`]: StepGrid::copy_from

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// Number of steps (columns) per track. Fixed for the process lifetime.
pub const STEP_COUNT: usize = 32;

/// A rectangular grid of step cells, `rows × STEP_COUNT`, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct StepGrid {
    rows: usize,
    cells: Vec<u8>,
}

impl StepGrid {
    /// Creates an all-dead grid with the given number of rows (tracks).
    ///
    /// # Panics
    ///
    /// Panics if `rows` is zero.
    #[must_use]
    pub fn new(rows: usize) -> Self {
        assert!(rows > 0, "grid must have at least one row");
        Self {
            rows,
            cells: vec![0; rows * STEP_COUNT],
        }
    }

    /// Creates a grid from raw row-major cells.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != rows * STEP_COUNT` or any cell is not 0 or 1.
    #[must_use]
    pub fn from_cells(rows: usize, cells: Vec<u8>) -> Self {
        assert!(rows > 0, "grid must have at least one row");
        assert!(
            cells.len() == rows * STEP_COUNT,
            "cell buffer length must match grid shape"
        );
        assert!(
            cells.iter().all(|&c| c <= 1),
            "cells must be 0 (dead) or 1 (live)"
        );
        Self { rows, cells }
    }

    /// Returns the number of rows (tracks).
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns whether the cell at `(row, col)` is live.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        assert!(row < self.rows, "row out of bounds");
        assert!(col < STEP_COUNT, "column out of bounds");
        self.cells[row * STEP_COUNT + col] == 1
    }

    /// Sets the cell at `(row, col)` to live or dead.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn set_alive(&mut self, row: usize, col: usize, alive: bool) {
        assert!(row < self.rows, "row out of bounds");
        assert!(col < STEP_COUNT, "column out of bounds");
        self.cells[row * STEP_COUNT + col] = u8::from(alive);
    }

    /// Flips the cell at `(row, col)` and returns its new liveness.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn toggle(&mut self, row: usize, col: usize) -> bool {
        let next = !self.is_alive(row, col);
        self.set_alive(row, col, next);
        next
    }

    /// Returns the cells of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row_cells(&self, row: usize) -> &[u8] {
        assert!(row < self.rows, "row out of bounds");
        &self.cells[row * STEP_COUNT..(row + 1) * STEP_COUNT]
    }

    /// Returns the full row-major cell buffer.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Replaces all cells wholesale, preserving the shape.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != rows * STEP_COUNT` or any cell is not 0 or 1.
    pub fn replace_cells(&mut self, cells: Vec<u8>) {
        assert!(
            cells.len() == self.rows * STEP_COUNT,
            "cell buffer length must match grid shape"
        );
        assert!(
            cells.iter().all(|&c| c <= 1),
            "cells must be 0 (dead) or 1 (live)"
        );
        self.cells = cells;
    }

    /// Copies another grid's cells into this one, reusing the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the grids have different row counts.
    pub fn copy_from(&mut self, other: &Self) {
        assert!(self.rows == other.rows, "grids must have the same shape");
        self.cells.copy_from_slice(&other.cells);
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Collects the live rows in one step column into `out`.
    ///
    /// `out` is cleared first; indices are pushed in ascending row order.
    ///
    /// # Panics
    ///
    /// Panics if `col` is out of bounds.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "row counts are small; indices fit u32"
    )]
    pub fn live_rows_in_column(&self, col: usize, out: &mut Vec<u32>) {
        assert!(col < STEP_COUNT, "column out of bounds");
        out.clear();
        for row in 0..self.rows {
            if self.cells[row * STEP_COUNT + col] == 1 {
                out.push(row as u32);
            }
        }
    }
}

impl fmt::Debug for StepGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StepGrid({}x{})", self.rows, STEP_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_dead() {
        let grid = StepGrid::new(8);
        assert_eq!(grid.rows(), 8);
        for row in 0..8 {
            for col in 0..STEP_COUNT {
                assert!(!grid.is_alive(row, col), "fresh grid has no live cells");
            }
        }
    }

    #[test]
    fn set_and_toggle() {
        let mut grid = StepGrid::new(4);
        grid.set_alive(1, 5, true);
        assert!(grid.is_alive(1, 5));
        assert!(!grid.toggle(1, 5));
        assert!(!grid.is_alive(1, 5));
        assert!(grid.toggle(1, 5));
        assert!(grid.is_alive(1, 5));
    }

    #[test]
    fn replace_preserves_shape() {
        let mut grid = StepGrid::new(2);
        let mut cells = vec![0_u8; 2 * STEP_COUNT];
        cells[3] = 1;
        grid.replace_cells(cells);
        assert!(grid.is_alive(0, 3));
        assert!(!grid.is_alive(1, 3));
    }

    #[test]
    #[should_panic(expected = "cell buffer length must match grid shape")]
    fn replace_rejects_wrong_length() {
        let mut grid = StepGrid::new(2);
        grid.replace_cells(vec![0; STEP_COUNT]);
    }

    #[test]
    #[should_panic(expected = "cells must be 0 (dead) or 1 (live)")]
    fn from_cells_rejects_invalid_values() {
        let mut cells = vec![0_u8; STEP_COUNT];
        cells[0] = 2;
        let _ = StepGrid::from_cells(1, cells);
    }

    #[test]
    fn copy_from_reuses_buffer() {
        let mut a = StepGrid::new(3);
        let mut b = StepGrid::new(3);
        b.set_alive(2, 31, true);
        a.copy_from(&b);
        assert!(a.is_alive(2, 31));
        b.set_alive(2, 31, false);
        assert!(a.is_alive(2, 31), "copy is independent of the source");
    }

    #[test]
    fn live_rows_in_column_scans_ascending() {
        let mut grid = StepGrid::new(6);
        grid.set_alive(4, 7, true);
        grid.set_alive(1, 7, true);
        grid.set_alive(1, 8, true);
        let mut out = Vec::new();
        grid.live_rows_in_column(7, &mut out);
        assert_eq!(out, &[1, 4]);
        grid.live_rows_in_column(0, &mut out);
        assert!(out.is_empty(), "out buffer is cleared before the scan");
    }

    #[test]
    #[should_panic(expected = "row out of bounds")]
    fn out_of_bounds_row_panics() {
        let grid = StepGrid::new(2);
        let _ = grid.is_alive(2, 0);
    }
}
