// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search configuration.
//!
//! A [`FinderConfig`] is built with chained setters:
//!
//! ```
//! use form_finder::{FinderConfig, SearchMode};
//!
//! let config = FinderConfig::new()
//!     .plus(false)
//!     .max_depth(12)
//!     .mode(SearchMode::Concurrent);
//! assert_eq!(config.target_dimension(), 2);
//! ```
//!
//! The worker count for [`SearchMode::Concurrent`] defaults to
//! [`DEFAULT_THREADS`] and may be overridden at deployment time through the
//! [`THREADS_ENV_VAR`] environment variable.

use crate::error::FinderError;

/// Worker pool size when nothing else is configured.
pub const DEFAULT_THREADS: usize = 15;

/// Environment variable overriding the worker pool size.
pub const THREADS_ENV_VAR: &str = "FORM_FINDER_NUM_THREADS";

/// How branches of the search tree are explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Depth-first, left to right; newforms are delivered as they are found.
    #[default]
    Serial,
    /// Sibling branches run as tasks on a worker pool; newforms are delivered
    /// together once every task has finished.
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    /// Search the plus space: target dimension 1 instead of 2 split by sign.
    pub plus: bool,
    /// A branch reaching the target dimension only counts below this depth.
    pub min_depth: usize,
    /// Branches are abandoned at this depth.
    pub max_depth: usize,
    /// Ask the source for operators on the dual space.
    pub use_dual: bool,
    /// Fetch full operator matrices and restrict them here, rather than asking
    /// the source for pre-restricted ones.
    pub big_matrices: bool,
    pub mode: SearchMode,
    /// Worker pool size for concurrent mode.
    pub threads: usize,
    /// Per-node progress messages at `info` when positive. The log level
    /// still decides what is shown; warnings and errors are never gated.
    pub verbose: u8,
    /// Verify every restriction against the full operator; failures abandon
    /// the branch instead of corrupting it.
    pub check_restrictions: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            plus: true,
            min_depth: 0,
            max_depth: 20,
            use_dual: true,
            big_matrices: false,
            mode: SearchMode::Serial,
            threads: DEFAULT_THREADS,
            verbose: 0,
            check_restrictions: false,
        }
    }
}

impl FinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plus(mut self, plus: bool) -> Self {
        self.plus = plus;
        self
    }

    pub fn min_depth(mut self, depth: usize) -> Self {
        self.min_depth = depth;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn use_dual(mut self, dual: bool) -> Self {
        self.use_dual = dual;
        self
    }

    pub fn big_matrices(mut self, big: bool) -> Self {
        self.big_matrices = big;
        self
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    pub fn check_restrictions(mut self, check: bool) -> Self {
        self.check_restrictions = check;
        self
    }

    /// 1 in the plus space, 2 when eigenspaces are split by sign.
    pub fn target_dimension(&self) -> usize {
        if self.plus {
            1
        } else {
            2
        }
    }

    /// Worker count: the environment override if set and valid, else `threads`.
    pub fn thread_count(&self) -> usize {
        match std::env::var(THREADS_ENV_VAR) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!(
                        "Ignoring {}={:?}; using {} threads",
                        THREADS_ENV_VAR,
                        value,
                        self.threads
                    );
                    self.threads
                }
            },
            Err(_) => self.threads,
        }
    }

    pub fn validate(&self) -> Result<(), FinderError> {
        if self.min_depth > self.max_depth {
            return Err(FinderError::DepthBounds {
                min_depth: self.min_depth,
                max_depth: self.max_depth,
            });
        }
        if self.threads == 0 {
            return Err(FinderError::NoWorkers);
        }
        Ok(())
    }
}
