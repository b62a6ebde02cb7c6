// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters are stored in the finder and incremented as the search runs. They
//! are atomic so that workers in concurrent mode can share them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

#[derive(EnumCountMacro, EnumIter, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counter {
    /// Child nodes created by descending.
    Descents,
    /// Branches abandoned because they are entirely old.
    AllOld,
    /// Newforms found (including replays).
    FoundNew,
    /// Branches abandoned at the maximum depth.
    MaxDepth,
    /// Branches abandoned because a basis could not be extracted.
    AbortedBranches,
    /// Restricted operator matrices released after their last use.
    MatrixReleases,
    /// Restricted operator matrices recomputed after being released.
    MatrixRegenerations,
}

#[derive(Debug, Default)]
pub struct Statistics {
    stats: [AtomicU64; Counter::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Increment the specified counter by 1.
    pub(crate) fn increment(&self, counter: Counter) {
        self.stats[counter as usize].fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counter) -> u64 {
        self.stats[counter as usize].load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        for stat in &self.stats {
            stat.store(0, Ordering::Relaxed);
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Counter::iter()
            .map(|c| format!("{:?}={}", c, self.get(c)))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let stats = Statistics::new();
        stats.increment(Counter::FoundNew);
        stats.increment(Counter::FoundNew);
        stats.increment(Counter::MaxDepth);
        assert_eq!(stats.get(Counter::FoundNew), 2);
        assert_eq!(stats.get(Counter::MaxDepth), 1);
        assert_eq!(stats.get(Counter::AllOld), 0);
    }

    #[test]
    fn test_reset() {
        let stats = Statistics::new();
        stats.increment(Counter::Descents);
        stats.reset();
        assert_eq!(stats.get(Counter::Descents), 0);
    }

    #[test]
    fn test_display_lists_every_counter() {
        let stats = Statistics::new();
        stats.increment(Counter::AllOld);
        let text = stats.to_string();
        assert!(text.starts_with("Descents=0, AllOld=1"));
        assert!(text.contains("MatrixRegenerations=0"));
    }
}
