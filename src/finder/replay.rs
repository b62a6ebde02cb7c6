// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Replaying known eigenvalue sequences without searching.

use super::FormFinder;
use crate::error::BranchError;
use crate::source::{Newform, NewformSink, OperatorSource};
use crate::stats::Counter;
use crate::tree::NodeStatus;
use log::{error, info};
use std::sync::Arc;

/// Eigenvalues shown per form when logging a recovery.
const SHOWN_EIGENVALUES: usize = 10;

impl<S: OperatorSource> FormFinder<S> {
    /// Follow `eigenvalues` from the root and report the newform it leads to.
    ///
    /// Existing nodes along the sequence are reused; everything below the
    /// point where the tree diverges from it is dropped. From there the branch
    /// is grown one eigenvalue at a time, without trying alternatives, until it
    /// reaches the target dimension or the depth bound. The accepted newform
    /// carries the whole of `eigenvalues`.
    pub fn split_off(
        &mut self,
        eigenvalues: &[i64],
        sink: &mut impl NewformSink,
    ) -> Result<(), BranchError> {
        let verbose = self.verbose();
        let mut current = Arc::clone(&self.root);
        if verbose {
            info!(
                "Entering form finder, depth = {}, dimension {}",
                current.depth(),
                current.dimension()
            );
        }

        while let Some(child) = eigenvalues
            .get(current.depth())
            .and_then(|&eigenvalue| current.child(eigenvalue))
        {
            current = child;
        }
        current.clear_children();
        if verbose {
            info!(
                "Restarting at depth = {}, dimension {}",
                current.depth(),
                current.dimension()
            );
        }

        while current.dimension() > self.target && current.depth() < self.config.max_depth {
            let Some(&eigenvalue) = eigenvalues.get(current.depth()) else {
                break;
            };
            current = self.descend(&current, eigenvalue)?;
        }

        let basis = self.make_basis(&current)?;
        current.set_status(NodeStatus::FoundNew);
        current.set_basis(basis.clone());
        self.stats.increment(Counter::FoundNew);
        sink.accept(Newform {
            eigenvalues: eigenvalues.to_vec(),
            basis_plus: basis.plus,
            basis_minus: basis.minus,
        });
        Ok(())
    }

    /// Replay each sequence in `forms` with [`split_off`](Self::split_off).
    ///
    /// Sequences that fail are logged and skipped. Returns how many newforms
    /// were recovered.
    pub fn recover(&mut self, forms: &[Vec<i64>], sink: &mut impl NewformSink) -> usize {
        let mut recovered = 0;
        for (i, eigenvalues) in forms.iter().enumerate() {
            if self.verbose() {
                let shown = &eigenvalues[..eigenvalues.len().min(SHOWN_EIGENVALUES)];
                info!("Form number {} with eigenvalues {:?}...", i + 1, shown);
            }
            match self.split_off(eigenvalues, sink) {
                Ok(()) => recovered += 1,
                Err(e) => {
                    self.stats.increment(Counter::AbortedBranches);
                    error!("Could not recover form number {}: {}", i + 1, e);
                }
            }
        }
        recovered
    }
}
