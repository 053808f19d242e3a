// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session snapshots for host-side persistence.
//!
//! [`SessionSnapshot`] captures everything needed to recreate a session:
//! grid cells, generation, mirror flags, evolution flag, tempo, and mutes.
//! The host chooses the serialization format; this crate only defines the
//! in-memory shape and its validation.
//!
//! Restoring is the one fallible boundary of the engine: a snapshot produced
//! elsewhere may disagree with the running grid shape or carry cell values
//! outside 0/1, so [`SessionSnapshot::validate`] checks it before any state
//! is touched.

use alloc::vec::Vec;
use core::fmt;

use crate::grid::STEP_COUNT;
use crate::symmetry::MirrorAxes;
use crate::time::Tempo;

/// A full capture of session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Number of tracks the cells were captured for.
    pub rows: usize,
    /// Row-major cell buffer, `rows * STEP_COUNT` entries of 0 or 1.
    pub cells: Vec<u8>,
    /// Generation counter at capture time.
    pub generation: u64,
    /// Mirror flags.
    pub mirror: MirrorAxes,
    /// Whether evolution was running.
    pub evolving: bool,
    /// Playback tempo.
    pub tempo: Tempo,
    /// Per-track mute flags, `rows` entries.
    pub mutes: Vec<bool>,
}

impl SessionSnapshot {
    /// Checks that this snapshot can restore into an engine with the given
    /// row count.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch found: row count, cell buffer length, cell
    /// value outside 0/1, or mute list length.
    pub fn validate(&self, rows: usize) -> Result<(), SnapshotError> {
        if self.rows != rows {
            return Err(SnapshotError::RowCountMismatch {
                expected: rows,
                found: self.rows,
            });
        }
        if self.cells.len() != rows * STEP_COUNT {
            return Err(SnapshotError::CellCountMismatch {
                expected: rows * STEP_COUNT,
                found: self.cells.len(),
            });
        }
        for (idx, &cell) in self.cells.iter().enumerate() {
            if cell > 1 {
                return Err(SnapshotError::InvalidCell {
                    row: idx / STEP_COUNT,
                    col: idx % STEP_COUNT,
                });
            }
        }
        if self.mutes.len() != rows {
            return Err(SnapshotError::MuteCountMismatch {
                expected: rows,
                found: self.mutes.len(),
            });
        }
        Ok(())
    }
}

/// Why a snapshot cannot restore into the running engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    /// The snapshot was captured for a different track count.
    RowCountMismatch {
        /// Row count of the running engine.
        expected: usize,
        /// Row count recorded in the snapshot.
        found: usize,
    },
    /// The cell buffer does not match the snapshot's own row count.
    CellCountMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        found: usize,
    },
    /// A cell value other than 0 or 1.
    InvalidCell {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
    },
    /// The mute list does not match the row count.
    MuteCountMismatch {
        /// Expected list length.
        expected: usize,
        /// Actual list length.
        found: usize,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowCountMismatch { expected, found } => {
                write!(f, "snapshot has {found} rows, engine has {expected}")
            }
            Self::CellCountMismatch { expected, found } => {
                write!(f, "snapshot has {found} cells, shape requires {expected}")
            }
            Self::InvalidCell { row, col } => {
                write!(f, "cell ({row}, {col}) is neither dead nor live")
            }
            Self::MuteCountMismatch { expected, found } => {
                write!(f, "snapshot has {found} mutes, engine has {expected}")
            }
        }
    }
}

impl core::error::Error for SnapshotError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sample(rows: usize) -> SessionSnapshot {
        SessionSnapshot {
            rows,
            cells: vec![0; rows * STEP_COUNT],
            generation: 9,
            mirror: MirrorAxes { x: true, y: false },
            evolving: true,
            tempo: Tempo::new(90),
            mutes: vec![false; rows],
        }
    }

    #[test]
    fn valid_snapshot_passes() {
        assert_eq!(sample(8).validate(8), Ok(()));
    }

    #[test]
    fn row_count_mismatch_is_rejected() {
        assert_eq!(
            sample(8).validate(26),
            Err(SnapshotError::RowCountMismatch {
                expected: 26,
                found: 8
            })
        );
    }

    #[test]
    fn short_cell_buffer_is_rejected() {
        let mut snapshot = sample(8);
        snapshot.cells.pop();
        assert_eq!(
            snapshot.validate(8),
            Err(SnapshotError::CellCountMismatch {
                expected: 8 * STEP_COUNT,
                found: 8 * STEP_COUNT - 1
            })
        );
    }

    #[test]
    fn invalid_cell_value_is_located() {
        let mut snapshot = sample(8);
        snapshot.cells[STEP_COUNT + 5] = 3;
        assert_eq!(
            snapshot.validate(8),
            Err(SnapshotError::InvalidCell { row: 1, col: 5 })
        );
    }

    #[test]
    fn mute_length_mismatch_is_rejected() {
        let mut snapshot = sample(8);
        snapshot.mutes.push(true);
        assert_eq!(
            snapshot.validate(8),
            Err(SnapshotError::MuteCountMismatch {
                expected: 8,
                found: 9
            })
        );
    }

    #[test]
    fn display_is_readable() {
        let err = SnapshotError::InvalidCell { row: 1, col: 5 };
        assert_eq!(
            alloc::format!("{err}"),
            "cell (1, 5) is neither dead nor live"
        );
    }
}
