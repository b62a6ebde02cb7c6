// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Extracting eigenvectors from a node of the target dimension.
//!
//! In the plus space the node's subspace is a line and its basis vector is the
//! answer. Otherwise the subspace is a plane, and it is split by the
//! conjugation involution into its +1 and -1 eigenlines, each of which must be
//! exactly one-dimensional.

use super::FormFinder;
use crate::error::BranchError;
use crate::linalg::{
    field, make_primitive, restrict, restrict_checked, unit_vector, LinalgError, Matrix, Subspace,
};
use crate::source::OperatorSource;
use crate::tree::{Basis, Node};
use log::debug;
use std::borrow::Cow;

impl<S: OperatorSource> FormFinder<S> {
    pub(super) fn make_basis(&self, node: &Node) -> Result<Basis, BranchError> {
        if node.dimension() != self.target {
            return Err(BranchError::UnexpectedDimension {
                eigenvalues: node.prefix().to_vec(),
                dimension: node.dimension(),
                expected: self.target,
            });
        }

        if self.config.plus {
            let plus = match node.subspace() {
                Some(nest) => make_primitive(&nest.basis_vector(0)),
                None => unit_vector(self.dimension, 0),
            };
            return Ok(Basis { plus, minus: None });
        }

        let conjugation = self.restricted_conjugation(node)?;
        let plus = self.sign_eigenvector(node, &conjugation, 1)?;
        let minus = self.sign_eigenvector(node, &conjugation, -1)?;
        Ok(Basis {
            plus,
            minus: Some(minus),
        })
    }

    /// The conjugation involution restricted to `node`'s subspace, following
    /// the same bulk or incremental policy as the operators.
    fn restricted_conjugation(&self, node: &Node) -> Result<Matrix, BranchError> {
        let depth = node.depth();
        let dual = self.config.use_dual;
        let failed = |source: LinalgError| BranchError::Restriction { depth, source };

        if self.config.big_matrices {
            let full = match self.root.conjugation() {
                Some(matrix) => Cow::Borrowed(matrix),
                None => Cow::Owned(self.source.symmetry_matrix(dual)),
            };
            return match node.subspace() {
                None => Ok(full.into_owned()),
                Some(nest) if self.config.check_restrictions => {
                    restrict_checked(&full, nest).map_err(failed)
                }
                Some(nest) => Ok(restrict(&full, nest)),
            };
        }

        let Some(nest) = node.subspace() else {
            return Ok(self.source.symmetry_matrix(dual));
        };
        let restricted = self.source.symmetry_matrix_restricted(nest, dual);
        if self.config.check_restrictions {
            let expected = restrict_checked(&self.source.symmetry_matrix(dual), nest).map_err(failed)?;
            if expected != restricted {
                return Err(failed(LinalgError::RestrictionMismatch { index: depth }));
            }
        }
        Ok(restricted)
    }

    /// The primitive eigenvector of the conjugation for `sign`, which must span
    /// a line inside the node's subspace.
    fn sign_eigenvector(
        &self,
        node: &Node,
        conjugation: &Matrix,
        sign: i64,
    ) -> Result<Vec<i64>, BranchError> {
        let eigenvalue = field::mul(field::reduce(sign), self.denominator);
        let eigenspace = Subspace::eigenspace(conjugation, eigenvalue);
        let line = match node.subspace() {
            Some(nest) => nest.combine(&eigenspace),
            None => eigenspace,
        };
        if line.dimension() != 1 {
            return Err(BranchError::SignSplit {
                eigenvalues: node.prefix().to_vec(),
                sign,
                dimension: line.dimension(),
            });
        }
        debug!("Found the ({:+}) eigenvector for {:?}", sign, node.prefix());
        Ok(make_primitive(&line.basis_vector(0)))
    }
}
