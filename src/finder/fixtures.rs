// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Diagonal operator source for unit tests.

use crate::linalg::Matrix;
use crate::source::OperatorSource;
use std::collections::HashMap;

/// Operators that are diagonal in the standard basis, one row of eigenvalues
/// per depth; depths past the last row reuse it.
pub(crate) struct Diagonal {
    operators: Vec<Vec<i64>>,
    symmetry: Vec<i64>,
    denominator: i64,
    old: HashMap<Vec<i64>, usize>,
    candidates: Vec<i64>,
}

impl Diagonal {
    pub(crate) fn new(operators: &[&[i64]]) -> Self {
        let dimension = operators[0].len();
        Self {
            operators: operators.iter().map(|row| row.to_vec()).collect(),
            symmetry: vec![1; dimension],
            denominator: 1,
            old: HashMap::new(),
            candidates: (-2..=2).collect(),
        }
    }

    pub(crate) fn with_denominator(mut self, denominator: i64) -> Self {
        self.denominator = denominator;
        self
    }

    pub(crate) fn with_symmetry(mut self, signs: &[i64]) -> Self {
        self.symmetry = signs.to_vec();
        self
    }

    pub(crate) fn with_old(mut self, prefix: &[i64], dimension: usize) -> Self {
        self.old.insert(prefix.to_vec(), dimension);
        self
    }

    fn diagonal(&self, values: &[i64]) -> Matrix {
        let n = values.len();
        Matrix::from_fn(n, n, |i, j| if i == j { values[i] * self.denominator } else { 0 })
    }
}

impl OperatorSource for Diagonal {
    fn matrix_dimension(&self) -> usize {
        self.symmetry.len()
    }

    fn matrix_denominator(&self) -> i64 {
        self.denominator
    }

    fn operator_matrix(&self, index: usize, _use_dual: bool) -> Matrix {
        let row = index.min(self.operators.len() - 1);
        self.diagonal(&self.operators[row])
    }

    fn symmetry_matrix(&self, _use_dual: bool) -> Matrix {
        self.diagonal(&self.symmetry)
    }

    fn old_subspace_dimension(&self, eigenvalues: &[i64]) -> usize {
        self.old.get(eigenvalues).copied().unwrap_or(0)
    }

    fn candidate_eigenvalues(&self, _depth: usize) -> Vec<i64> {
        self.candidates.clone()
    }
}
