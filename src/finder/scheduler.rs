// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Concurrent search on a rayon pool.
//!
//! Every child slot becomes a task that descends, explores the child (spawning
//! further tasks for the grandchildren) and then ascends. A node is detached
//! from its parent by whichever happens last: its own task finishing, or the
//! last of its children completing. Newforms are collected in the finder's
//! batch and delivered after the scope, and with it every task, has ended.

use super::descent::Visit;
use super::FormFinder;
use crate::error::FinderError;
use crate::source::{Newform, NewformSink, OperatorSource};
use crate::tree::Node;
use log::{debug, info};
use rayon::ThreadPoolBuilder;
use std::sync::Arc;

impl<S: OperatorSource> FormFinder<S> {
    pub(super) fn find_concurrent(&mut self, sink: &mut impl NewformSink) -> Result<(), FinderError> {
        let threads = self.config.thread_count();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("form-finder-{}", i))
            .build()?;
        info!("Starting concurrent search with {} worker threads", threads);

        let root = Arc::clone(&self.root);
        let finder = &*self;
        pool.scope(|scope| finder.explore_spawning(scope, root));

        self.drain(sink);
        Ok(())
    }

    /// Visit `node` and spawn one task per candidate below it.
    fn explore_spawning<'s>(&'s self, scope: &rayon::Scope<'s>, node: Arc<Node>) {
        let candidates = match self.visit(&node) {
            Visit::Leaf => return,
            Visit::Found(form) => {
                self.store(form);
                return;
            }
            Visit::Branch(candidates) => candidates,
        };
        for eigenvalue in candidates {
            let parent = Arc::clone(&node);
            scope.spawn(move |scope| self.run_branch(scope, parent, eigenvalue));
        }
    }

    fn run_branch<'s>(&'s self, scope: &rayon::Scope<'s>, parent: Arc<Node>, eigenvalue: i64) {
        match self.descend(&parent, eigenvalue) {
            Ok(child) => {
                if child.dimension() > 0 {
                    self.explore_spawning(scope, Arc::clone(&child));
                }
                if child.finish_exploring() {
                    self.ascend(&child, true);
                }
            }
            Err(error) => {
                self.abandon(&error);
                self.release_child(&parent, eigenvalue, true);
            }
        }
    }

    /// Add a newform to the batch awaiting delivery.
    fn store(&self, form: Newform) {
        let mut batch = self.batch.lock();
        batch.push(form);
        if self.verbose() {
            info!("Current newform subtotal count at {}", batch.len());
        }
    }

    /// Deliver the batch to `sink` and empty it.
    fn drain(&self, sink: &mut impl NewformSink) {
        let forms = std::mem::take(&mut *self.batch.lock());
        debug!("Delivering {} newforms", forms.len());
        for form in forms {
            sink.accept(form);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FinderConfig, SearchMode};
    use crate::finder::fixtures::Diagonal;
    use crate::tree::NodeStatus;

    fn concurrent() -> FinderConfig {
        FinderConfig::new().mode(SearchMode::Concurrent).threads(4)
    }

    #[test]
    fn test_batch_delivered_once_and_reset() {
        let source = Diagonal::new(&[&[1, -1, 2]]);
        let mut finder = FormFinder::new(source, concurrent()).unwrap();
        let mut forms: Vec<Newform> = Vec::new();
        finder.find(&mut forms).unwrap();
        assert_eq!(forms.len(), 3);
        assert!(finder.batch.lock().is_empty());

        let mut again: Vec<Newform> = Vec::new();
        finder.find(&mut again).unwrap();
        forms.sort();
        again.sort();
        assert_eq!(forms, again);
    }

    #[test]
    fn test_tree_emptied_after_concurrent_run() {
        let source = Diagonal::new(&[&[1, 1, 2, 2], &[0, 1, 0, 1]]);
        let mut finder = FormFinder::new(source, concurrent()).unwrap();
        let mut forms: Vec<Newform> = Vec::new();
        finder.find(&mut forms).unwrap();
        assert_eq!(forms.len(), 4);
        assert_eq!(finder.root().child_count(), 0);
        assert_eq!(finder.root().status(), NodeStatus::Internal);
    }

    #[test]
    fn test_store_and_drain() {
        let finder = FormFinder::new(Diagonal::new(&[&[1]]), concurrent()).unwrap();
        let form = Newform {
            eigenvalues: vec![3],
            basis_plus: vec![1],
            basis_minus: None,
        };
        finder.store(form.clone());
        let mut sink: Vec<Newform> = Vec::new();
        finder.drain(&mut sink);
        assert_eq!(sink, vec![form]);
        assert!(finder.batch.lock().is_empty());
    }
}
