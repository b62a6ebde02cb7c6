// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The form finder: owns the search tree and drives the search.
//!
//! - [`FormFinder::find`] runs the full branch-and-bound search from the root.
//! - [`FormFinder::split_off`] replays one known eigenvalue sequence.
//! - [`FormFinder::recover`] replays a list of them.
//!
//! The per-node steps live in the submodules: `descent` (submatrix
//! preparation, descend, ascend and the per-node checks), `basis` (extracting
//! eigenvectors from a finished node), `scheduler` (the concurrent mode) and
//! `replay`.

mod basis;
mod descent;
#[cfg(test)]
mod fixtures;
mod replay;
mod scheduler;

use crate::config::{FinderConfig, SearchMode};
use crate::error::FinderError;
use crate::source::{Newform, NewformSink, OperatorSource};
use crate::stats::Statistics;
use crate::tree::Node;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct FormFinder<S: OperatorSource> {
    source: S,
    config: FinderConfig,
    /// Ambient dimension, queried once.
    dimension: usize,
    /// Operator denominator, queried once.
    denominator: i64,
    target: usize,
    root: Arc<Node>,
    /// Newforms found by workers in concurrent mode, waiting for delivery.
    batch: Mutex<Vec<Newform>>,
    stats: Statistics,
}

impl<S: OperatorSource> FormFinder<S> {
    /// Set up a search over `source`.
    ///
    /// Fails if the configuration is inconsistent or the source reports a
    /// non-positive denominator.
    pub fn new(source: S, config: FinderConfig) -> Result<Self, FinderError> {
        config.validate()?;
        let dimension = source.matrix_dimension();
        let denominator = source.matrix_denominator();
        if denominator <= 0 {
            return Err(FinderError::Denominator(denominator));
        }
        let conjugation =
            (config.big_matrices && !config.plus).then(|| source.symmetry_matrix(config.use_dual));
        info!(
            "Form finder on a space of dimension {} (denominator {}), target dimension {}, depths {}..={}",
            dimension,
            denominator,
            config.target_dimension(),
            config.min_depth,
            config.max_depth
        );
        Ok(Self {
            target: config.target_dimension(),
            root: Node::root(dimension, conjugation),
            source,
            config,
            dimension,
            denominator,
            batch: Mutex::new(Vec::new()),
            stats: Statistics::new(),
        })
    }

    /// Run the search from the root, handing every newform found to `sink`.
    ///
    /// In serial mode newforms are delivered as they are found, in candidate
    /// order. In concurrent mode they are delivered together after every worker
    /// has finished. Branches that fail are logged and skipped; the only errors
    /// returned are failures to start the worker pool.
    pub fn find(&mut self, sink: &mut impl NewformSink) -> Result<(), FinderError> {
        let root = Arc::clone(&self.root);
        match self.config.mode {
            SearchMode::Serial => {
                self.explore(&root, sink);
            }
            SearchMode::Concurrent => {
                self.find_concurrent(sink)?;
            }
        }
        debug!("Search statistics: {}", self.stats);
        Ok(())
    }

    pub fn root(&self) -> &Arc<Node> {
        &self.root
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn target_dimension(&self) -> usize {
        self.target
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether per-node progress is logged.
    fn verbose(&self) -> bool {
        self.config.verbose > 0
    }
}
