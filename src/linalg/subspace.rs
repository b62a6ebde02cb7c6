// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Subspaces in pivot form, eigenspaces, and restriction of operators.
//!
//! A [`Subspace`] of dimension `d` inside an `n`-dimensional space is stored as
//! an `n x d` basis matrix `B` together with `d` pivot rows, chosen so that the
//! pivot rows of `B` form the `d x d` identity. This makes two operations cheap:
//!
//! - **Combination**: a subspace given in the coordinates of another one is
//!   mapped back to ambient coordinates by one product, `B_outer * B_inner`.
//! - **Restriction**: for an invariant subspace, `m * B = B * R` and reading off
//!   the pivot rows gives `R = m[pivots, :] * B` without solving anything.

use super::error::LinalgError;
use super::matrix::Matrix;

/// A subspace in pivot form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subspace {
    basis: Matrix,
    pivots: Vec<usize>,
}

impl Subspace {
    pub(crate) fn from_parts(basis: Matrix, pivots: Vec<usize>) -> Self {
        debug_assert_eq!(basis.ncols(), pivots.len());
        Self { basis, pivots }
    }

    /// The whole `n`-dimensional space.
    pub fn whole(n: usize) -> Self {
        Self::from_parts(Matrix::identity(n), (0..n).collect())
    }

    /// The eigenspace of `m` for `lambda`, i.e. the kernel of `m - lambda * I`.
    ///
    /// Always succeeds; the result may be zero-dimensional.
    pub fn eigenspace(m: &Matrix, lambda: i64) -> Self {
        m.shift_diagonal(lambda).kernel()
    }

    pub fn dimension(&self) -> usize {
        self.pivots.len()
    }

    pub fn ambient_dimension(&self) -> usize {
        self.basis.nrows()
    }

    /// Basis vectors as the columns of an `n x d` matrix.
    pub fn basis(&self) -> &Matrix {
        &self.basis
    }

    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Basis vector `i` as residues in ambient coordinates.
    pub fn basis_vector(&self, i: usize) -> Vec<i64> {
        self.basis.column(i)
    }

    /// Express `inner`, given in the coordinates of `self`, in ambient coordinates.
    ///
    /// # Panics
    ///
    /// Panics if `inner` does not live in a space of dimension `self.dimension()`.
    pub fn combine(&self, inner: &Subspace) -> Subspace {
        assert_eq!(
            inner.ambient_dimension(),
            self.dimension(),
            "combine: inner subspace lives in dimension {}, outer has dimension {}",
            inner.ambient_dimension(),
            self.dimension()
        );
        let basis = &self.basis * &inner.basis;
        let pivots = inner.pivots.iter().map(|&p| self.pivots[p]).collect();
        Subspace::from_parts(basis, pivots)
    }
}

/// The matrix of `m` on the `m`-invariant subspace `s`, in the coordinates of `s`.
///
/// Invariance is the caller's precondition; see [`restrict_checked`].
pub fn restrict(m: &Matrix, s: &Subspace) -> Matrix {
    if s.dimension() == m.nrows() {
        return m.clone();
    }
    &m.select_rows(&s.pivots) * &s.basis
}

/// Like [`restrict`], but verify that `s` really is invariant under `m`.
pub fn restrict_checked(m: &Matrix, s: &Subspace) -> Result<Matrix, LinalgError> {
    let restricted = restrict(m, s);
    let left = m * &s.basis;
    let right = &s.basis * &restricted;
    if left != right {
        return Err(LinalgError::NotInvariant {
            ambient: m.nrows(),
            dimension: s.dimension(),
        });
    }
    Ok(restricted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal(values: &[i64]) -> Matrix {
        Matrix::from_fn(values.len(), values.len(), |i, j| if i == j { values[i] } else { 0 })
    }

    #[test]
    fn test_whole_space() {
        let s = Subspace::whole(3);
        assert_eq!(s.dimension(), 3);
        assert_eq!(s.ambient_dimension(), 3);
    }

    #[test]
    fn test_eigenspace_dimensions() {
        let m = diagonal(&[2, 2, -1, 0]);
        assert_eq!(Subspace::eigenspace(&m, 2).dimension(), 2);
        assert_eq!(Subspace::eigenspace(&m, -1).dimension(), 1);
        assert_eq!(Subspace::eigenspace(&m, 5).dimension(), 0);
    }

    #[test]
    fn test_combine_nested_eigenspaces() {
        let t1 = diagonal(&[1, 1, 1, 3]);
        let t2 = diagonal(&[4, 5, 4, 4]);
        let outer = Subspace::eigenspace(&t1, 1);
        let inner = Subspace::eigenspace(&restrict(&t2, &outer), 4);
        let combined = outer.combine(&inner);
        assert_eq!(combined.dimension(), 2);
        assert_eq!(combined.ambient_dimension(), 4);
        // Spanned by e0 and e2.
        assert_eq!(combined.pivots(), &[0, 2]);
        assert_eq!(combined.basis_vector(0), vec![1, 0, 0, 0]);
        assert_eq!(combined.basis_vector(1), vec![0, 0, 1, 0]);
    }

    #[test]
    fn test_restrict_to_whole_space_is_identity_operation() {
        let m = Matrix::from_rows(&[vec![1, 2], vec![3, 4]]);
        assert_eq!(restrict(&m, &Subspace::whole(2)), m);
    }

    #[test]
    fn test_restrict_checked_accepts_invariant_subspace() {
        let m = Matrix::from_rows(&[vec![2, 1, 0], vec![0, 2, 0], vec![0, 0, 7]]);
        let s = Subspace::eigenspace(&m, 7);
        let r = restrict_checked(&m, &s).unwrap();
        assert_eq!(r, Matrix::from_rows(&[vec![7]]));
    }

    #[test]
    fn test_restrict_checked_rejects_non_invariant_subspace() {
        let m = Matrix::from_rows(&[vec![0, 1], vec![1, 0]]);
        let s = Subspace::eigenspace(&diagonal(&[1, 0]), 1);
        assert_eq!(
            restrict_checked(&m, &s),
            Err(LinalgError::NotInvariant {
                ambient: 2,
                dimension: 1
            })
        );
    }

    #[test]
    #[should_panic(expected = "combine: inner subspace")]
    fn test_combine_dimension_mismatch_panics() {
        let outer = Subspace::eigenspace(&diagonal(&[1, 0, 0]), 1);
        outer.combine(&Subspace::whole(2));
    }
}
