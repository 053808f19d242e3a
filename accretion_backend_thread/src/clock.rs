// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic clock shared by the transport and its tests.

use std::sync::OnceLock;
use std::time::Instant;

use accretion_core::time::HostTime;

static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Returns the current host time as nanoseconds since the first call in
/// this process.
pub(crate) fn now() -> HostTime {
    let epoch = *EPOCH.get_or_init(Instant::now);
    // u64 nanoseconds cover 584 years of uptime; saturate rather than wrap.
    HostTime(u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX))
}
