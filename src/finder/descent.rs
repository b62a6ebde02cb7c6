// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-node steps of the search: submatrix preparation, descend, ascend, and the
//! checks that decide whether a node is a leaf.

use super::FormFinder;
use crate::error::BranchError;
use crate::linalg::{field, restrict, restrict_checked, LinalgError, Matrix, Subspace};
use crate::source::{Newform, NewformSink, OperatorSource};
use crate::stats::Counter;
use crate::tree::{Node, NodeStatus, Usage};
use log::{debug, error, info, trace, warn};
use std::sync::Arc;

/// What the per-node checks decided.
pub(super) enum Visit {
    /// Nothing more to do here: all old, depth bound, or an abandoned branch.
    Leaf,
    /// The node is a newform.
    Found(Newform),
    /// Try these candidates below the node, in order.
    Branch(Vec<i64>),
}

impl<S: OperatorSource> FormFinder<S> {
    /// The operator for the next depth restricted to `node`'s subspace,
    /// computing it if it is not cached.
    pub(super) fn submatrix(&self, node: &Node) -> Result<Arc<Matrix>, BranchError> {
        let (matrix, regenerated) =
            node.submatrix_or_insert_with(|| self.restricted_operator(node))?;
        if regenerated {
            self.stats.increment(Counter::MatrixRegenerations);
            debug!(
                "Regenerated restricted operator at depth {} for {:?}",
                node.depth(),
                node.prefix()
            );
        }
        Ok(matrix)
    }

    fn restricted_operator(&self, node: &Node) -> Result<Matrix, BranchError> {
        let depth = node.depth();
        let dual = self.config.use_dual;
        let failed = |source: LinalgError| BranchError::Restriction { depth, source };

        let Some(nest) = node.subspace() else {
            return Ok(self.source.operator_matrix(depth, dual));
        };
        if self.config.big_matrices {
            let full = self.source.operator_matrix(depth, dual);
            debug!("Restricting the operator at depth {} to its subspace", depth);
            return if self.config.check_restrictions {
                restrict_checked(&full, nest).map_err(failed)
            } else {
                Ok(restrict(&full, nest))
            };
        }
        let restricted = self.source.operator_matrix_restricted(depth, nest, dual);
        if self.config.check_restrictions {
            let full = self.source.operator_matrix(depth, dual);
            let expected = restrict_checked(&full, nest).map_err(failed)?;
            if expected != restricted {
                return Err(failed(LinalgError::RestrictionMismatch { index: depth }));
            }
        }
        Ok(restricted)
    }

    /// The child of `node` for `eigenvalue`, created if it does not exist yet.
    pub(super) fn descend(&self, node: &Arc<Node>, eigenvalue: i64) -> Result<Arc<Node>, BranchError> {
        if let Some(child) = node.child(eigenvalue) {
            return Ok(child);
        }
        let depth = node.depth();
        let scaled = field::mul(field::reduce(eigenvalue), self.denominator);
        debug!(
            "Increasing depth to {}, trying eigenvalue {} (scaled {})",
            depth + 1,
            eigenvalue,
            scaled
        );

        let matrix = self.submatrix(node)?;
        debug!(
            "Eigenspace of a {}x{} matrix (density {:.3})",
            matrix.nrows(),
            matrix.ncols(),
            matrix.density()
        );
        trace!("submatrix =\n{}", matrix);
        let eigenspace = Subspace::eigenspace(&matrix, scaled);
        drop(matrix);
        if node.use_submatrix() == Usage::Released {
            self.stats.increment(Counter::MatrixReleases);
            trace!("Released restricted operator at depth {}", depth);
        }

        let subspace = match node.subspace() {
            Some(nest) => nest.combine(&eigenspace),
            None => eigenspace,
        };
        self.stats.increment(Counter::Descents);
        let child = node.insert_child(Node::new_child(node, eigenvalue, subspace));
        debug!("Eigenvalue {} has multiplicity {}", eigenvalue, child.dimension());
        if child.dimension() > 0 && self.verbose() {
            info!(
                "Eigenvalue {} gives a new subspace at depth {} of dimension {}",
                eigenvalue,
                depth + 1,
                child.dimension()
            );
        }
        Ok(child)
    }

    /// Mark a finished child complete and detach it from its parent.
    ///
    /// With `propagate`, a parent that completes as a result is detached in
    /// turn, up to (not including) the root.
    pub(super) fn ascend(&self, child: &Arc<Node>, propagate: bool) {
        child.set_status(NodeStatus::Complete);
        if let (Some(parent), Some(eigenvalue)) = (child.parent(), child.eigenvalue()) {
            self.release_child(&parent, eigenvalue, propagate);
        }
    }

    /// Count the child slot for `eigenvalue` as done, whether or not a node was
    /// ever created for it.
    pub(super) fn release_child(&self, parent: &Arc<Node>, eigenvalue: i64, propagate: bool) {
        trace!(
            "Going up from eigenvalue {} at depth {}",
            eigenvalue,
            parent.depth() + 1
        );
        if parent.complete_child(eigenvalue) && propagate {
            self.ascend(parent, true);
        }
    }

    /// Log and count a branch that could not be completed.
    pub(super) fn abandon(&self, error: &BranchError) {
        self.stats.increment(Counter::AbortedBranches);
        error!("{}; aborting this branch", error);
    }

    /// The checks made once on entering a node.
    pub(super) fn visit(&self, node: &Node) -> Visit {
        let depth = node.depth();
        let dimension = node.dimension();
        let old = self.source.old_subspace_dimension(node.prefix());
        let verbose = self.verbose();
        if verbose {
            info!(
                "In form finder, depth = {}, eigenvalues = {:?}; dimension so far {}, old {}, new {}",
                depth,
                node.prefix(),
                dimension,
                old,
                dimension.saturating_sub(old)
            );
        }

        if old == dimension {
            node.set_status(NodeStatus::AllOld);
            self.stats.increment(Counter::AllOld);
            if verbose {
                info!(
                    "Abandoning a common eigenspace of dimension {} which is a sum of old classes",
                    dimension
                );
            }
            return Visit::Leaf;
        }

        if dimension == self.target && depth > self.config.min_depth {
            node.set_status(NodeStatus::FoundNew);
            return match self.make_basis(node) {
                Ok(basis) => {
                    self.stats.increment(Counter::FoundNew);
                    node.set_basis(basis.clone());
                    Visit::Found(Newform {
                        eigenvalues: node.prefix().to_vec(),
                        basis_plus: basis.plus,
                        basis_minus: basis.minus,
                    })
                }
                Err(error) => {
                    self.abandon(&error);
                    Visit::Leaf
                }
            };
        }

        if depth == self.config.max_depth {
            node.set_status(NodeStatus::MaxDepth);
            self.stats.increment(Counter::MaxDepth);
            warn!(
                "Found a {}D common eigenspace for eigenvalues {:?}; abandoning at depth {}, even though old classes only make up {}D of it",
                dimension,
                node.prefix(),
                depth,
                old
            );
            return Visit::Leaf;
        }

        if let Err(error) = self.submatrix(node) {
            self.abandon(&error);
            return Visit::Leaf;
        }
        let candidates = self.source.candidate_eigenvalues(depth);
        if verbose {
            info!("Testing eigenvalues {:?} at level {}", candidates, depth + 1);
        }
        node.expect_children(candidates.len());
        Visit::Branch(candidates)
    }

    /// Serial depth-first search below `node`, delivering newforms to `sink` as
    /// they are found.
    pub(super) fn explore(&self, node: &Arc<Node>, sink: &mut dyn NewformSink) {
        let candidates = match self.visit(node) {
            Visit::Leaf => return,
            Visit::Found(form) => {
                sink.accept(form);
                return;
            }
            Visit::Branch(candidates) => candidates,
        };
        for eigenvalue in candidates {
            match self.descend(node, eigenvalue) {
                Ok(child) => {
                    if child.dimension() > 0 {
                        self.explore(&child, sink);
                    }
                    self.ascend(&child, false);
                }
                Err(error) => {
                    self.abandon(&error);
                    self.release_child(node, eigenvalue, false);
                }
            }
        }
        if self.verbose() {
            info!("Finished at level {}", node.depth() + 1);
        }
    }
}
