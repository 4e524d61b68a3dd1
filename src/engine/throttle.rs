//! Per-key cooldown throttle.
//!
//! Each [`ThrottleKey`] moves `COLD -> HOT` when it fires and back to
//! `COLD` once the cooldown has elapsed. The check and the update happen
//! under the map entry's shard lock, so exactly one concurrent caller wins
//! each window.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::ThrottleKey;

/// Cooldown state of a key at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    /// Free to fire.
    Cold,
    /// Fired within the cooldown; remaining time attached.
    Hot { remaining: Duration },
}

/// Thread-safe cooldown tracker.
pub struct Throttle {
    fired: DashMap<ThrottleKey, Instant>,
    cooldown: Duration,
    max_entries: usize,
}

impl Throttle {
    /// Create a throttle with the given cooldown and record bound.
    #[must_use]
    pub fn new(cooldown: Duration, max_entries: usize) -> Self {
        Self {
            fired: DashMap::new(),
            cooldown,
            max_entries: max_entries.max(1),
        }
    }

    /// Fire `key` if it is cold at `now`.
    ///
    /// Returns `true` and records `now` when the key has never fired or its
    /// last firing is at least one cooldown old; otherwise returns `false`
    /// and leaves the record untouched.
    pub fn try_fire(&self, key: &ThrottleKey, now: Instant) -> bool {
        let fired = match self.fired.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                if now.saturating_duration_since(*entry.get()) >= self.cooldown {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        };

        if fired && self.fired.len() > self.max_entries {
            self.evict(now);
        }
        fired
    }

    /// State of `key` at `now`.
    #[must_use]
    pub fn state(&self, key: &ThrottleKey, now: Instant) -> ThrottleState {
        self.fired.get(key).map_or(ThrottleState::Cold, |last| {
            let elapsed = now.saturating_duration_since(*last);
            if elapsed >= self.cooldown {
                ThrottleState::Cold
            } else {
                ThrottleState::Hot {
                    remaining: self.cooldown - elapsed,
                }
            }
        })
    }

    /// Cooldown window.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    /// Forget every key.
    pub fn clear(&self) {
        self.fired.clear();
    }

    /// Drop cold records, then the oldest hot ones, down to the bound.
    ///
    /// A cold record behaves exactly like an absent one, so removing it
    /// changes nothing observable.
    fn evict(&self, now: Instant) {
        let cooldown = self.cooldown;
        self.fired
            .retain(|_, last| now.saturating_duration_since(*last) < cooldown);

        if self.fired.len() <= self.max_entries {
            return;
        }

        let mut entries: Vec<(ThrottleKey, Instant)> = self
            .fired
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();
        entries.sort_by_key(|(_, last)| *last);

        let excess = entries.len().saturating_sub(self.max_entries);
        for (key, _) in entries.into_iter().take(excess) {
            self.fired.remove(&key);
        }
    }
}
