//! Engine counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lock-free counters updated on the hot path.
#[derive(Debug, Default)]
pub struct EngineStats {
    updates_applied: AtomicU64,
    stale_updates: AtomicU64,
    unknown_tokens: AtomicU64,
    inconsistent_reads: AtomicU64,
    opportunities: AtomicU64,
    below_threshold: AtomicU64,
    throttled: AtomicU64,
    plans_emitted: AtomicU64,
    plans_truncated: AtomicU64,
}

/// Point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub updates_applied: u64,
    pub stale_updates: u64,
    pub unknown_tokens: u64,
    pub inconsistent_reads: u64,
    pub opportunities: u64,
    pub below_threshold: u64,
    pub throttled: u64,
    pub plans_emitted: u64,
    pub plans_truncated: u64,
}

impl EngineStats {
    pub(crate) fn update_applied(&self) {
        self.updates_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn stale_update(&self) {
        self.stale_updates.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn unknown_token(&self) {
        self.unknown_tokens.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inconsistent_read(&self) {
        self.inconsistent_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn opportunity(&self) {
        self.opportunities.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn below_threshold(&self) {
        self.below_threshold.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn throttled(&self) {
        self.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn plan_emitted(&self, truncated: bool) {
        self.plans_emitted.fetch_add(1, Ordering::Relaxed);
        if truncated {
            self.plans_truncated.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            updates_applied: self.updates_applied.load(Ordering::Relaxed),
            stale_updates: self.stale_updates.load(Ordering::Relaxed),
            unknown_tokens: self.unknown_tokens.load(Ordering::Relaxed),
            inconsistent_reads: self.inconsistent_reads.load(Ordering::Relaxed),
            opportunities: self.opportunities.load(Ordering::Relaxed),
            below_threshold: self.below_threshold.load(Ordering::Relaxed),
            throttled: self.throttled.load(Ordering::Relaxed),
            plans_emitted: self.plans_emitted.load(Ordering::Relaxed),
            plans_truncated: self.plans_truncated.load(Ordering::Relaxed),
        }
    }
}
