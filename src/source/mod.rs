// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The capabilities the search consumes: an operator source and a newform sink.
//!
//! The finder is a generic splitting engine. Everything it knows about the
//! operators comes through [`OperatorSource`]; everything it discovers goes out
//! through [`NewformSink`].

use crate::linalg::{restrict, Matrix, Subspace};

/// Supplies operator matrices, candidate eigenvalues and the old-subspace oracle.
///
/// Operator matrices are integral: the true operator at depth `i` is
/// `operator_matrix(i) / matrix_denominator()`, so a candidate eigenvalue `a`
/// is searched for as `a * matrix_denominator()`.
///
/// The source is shared by reference between workers in concurrent mode, hence
/// the `Sync` bound and `&self` receivers.
pub trait OperatorSource: Sync {
    /// Dimension of the ambient space.
    fn matrix_dimension(&self) -> usize;

    /// Common denominator of every operator matrix.
    fn matrix_denominator(&self) -> i64;

    /// The full operator used at depth `index`.
    fn operator_matrix(&self, index: usize, use_dual: bool) -> Matrix;

    /// The operator at depth `index` restricted to an invariant subspace.
    ///
    /// Sources that can build the restricted matrix without materializing the
    /// full one should override this.
    fn operator_matrix_restricted(&self, index: usize, subspace: &Subspace, use_dual: bool) -> Matrix {
        restrict(&self.operator_matrix(index, use_dual), subspace)
    }

    /// The conjugation involution, used to split 2-dimensional eigenspaces by sign.
    ///
    /// Scaled like the operators, so its eigenvalues are `±matrix_denominator()`.
    fn symmetry_matrix(&self, use_dual: bool) -> Matrix;

    /// The conjugation involution restricted to an invariant subspace.
    fn symmetry_matrix_restricted(&self, subspace: &Subspace, use_dual: bool) -> Matrix {
        restrict(&self.symmetry_matrix(use_dual), subspace)
    }

    /// Dimension of the part of the common eigenspace for `eigenvalues` that is
    /// already accounted for by known (old) classes.
    fn old_subspace_dimension(&self, eigenvalues: &[i64]) -> usize;

    /// Candidate eigenvalues to try at `depth`, in the order they should be tried.
    fn candidate_eigenvalues(&self, depth: usize) -> Vec<i64>;
}

/// A newform found by the search.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Newform {
    /// Eigenvalue sequence leading to the newform.
    pub eigenvalues: Vec<i64>,
    /// Primitive integer eigenvector (the +1 eigenvector when split by sign).
    pub basis_plus: Vec<i64>,
    /// Primitive integer -1 eigenvector; `None` in the plus space.
    pub basis_minus: Option<Vec<i64>>,
}

/// Receives completed newforms, once each.
pub trait NewformSink {
    fn accept(&mut self, form: Newform);
}

impl NewformSink for Vec<Newform> {
    fn accept(&mut self, form: Newform) {
        self.push(form);
    }
}
