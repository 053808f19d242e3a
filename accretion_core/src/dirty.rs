// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Accretion uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! tell observers which tracks changed and how. The keyspace is flat: keys are
//! track (row) indices, there are no dependency edges, and no channel
//! propagates beyond the marked row.
//!
//! - [`EDIT`] — a user gesture (toggle, line paint) wrote cells in the row.
//! - [`EVOLVE`] — a sweep commit changed the row's cells.
//! - [`SHAPE`] — the grid was replaced wholesale (randomize, clear, pattern
//!   load, restore); every row is marked and observers should re-read the
//!   full grid rather than patch rows.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`Engine::drain_changes`](crate::engine::Engine::drain_changes) call
//! drains all channels and surfaces the results as
//! [`GridChanges`](crate::engine::GridChanges), which hosts consume to apply
//! incremental updates.

use understory_dirty::Channel;

/// A user edit wrote cells in the row.
pub const EDIT: Channel = Channel::new(0);

/// A sweep commit changed the row's cells.
pub const EVOLVE: Channel = Channel::new(1);

/// The grid was replaced wholesale; re-read everything.
pub const SHAPE: Channel = Channel::new(2);
