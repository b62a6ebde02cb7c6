// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.
//!
//! [`FixtureSource`] builds commuting operators with known eigenvectors that
//! are *not* the standard basis, so restriction and combination are exercised
//! for real. With `P = I + (ones on the superdiagonal)` the eigenvectors are the
//! columns of `P`:
//!
//! ```text
//! v0 = e0,  v1 = e0 + e1,  v2 = e1 + e2,  ...
//! ```
//!
//! and the operator at depth `k` is `denominator * P * diag(a_k) * P^-1`, where
//! `a_k[i]` is the eigenvalue of `v_i`.

#![allow(dead_code)]

use form_finder::linalg::{restrict, Matrix, Subspace};
use form_finder::{Newform, OperatorSource};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct FixtureSource {
    dimension: usize,
    denominator: i64,
    /// `eigenvalues[k][i]`: eigenvalue of `v_i` under the operator at depth `k`.
    /// Depths past the last row reuse it.
    eigenvalues: Vec<Vec<i64>>,
    /// Eigenvalue (+1 or -1) of `v_i` under the conjugation.
    signs: Vec<i64>,
    candidates: Vec<i64>,
    old: HashMap<Vec<i64>, usize>,
    /// Operators replaced wholesale, by depth.
    overrides: HashMap<usize, Matrix>,
    /// Add the identity to every pre-restricted operator.
    corrupt_restrictions: bool,
    queried: Mutex<Vec<Vec<i64>>>,
    operator_indices: Mutex<Vec<usize>>,
    restricted_calls: AtomicUsize,
    dual_requests: Mutex<Vec<bool>>,
}

impl FixtureSource {
    pub fn new(eigenvalues: &[&[i64]]) -> Self {
        let dimension = eigenvalues[0].len();
        Self {
            dimension,
            denominator: 1,
            eigenvalues: eigenvalues.iter().map(|row| row.to_vec()).collect(),
            signs: vec![1; dimension],
            candidates: (-2..=2).collect(),
            old: HashMap::new(),
            overrides: HashMap::new(),
            corrupt_restrictions: false,
            queried: Mutex::new(Vec::new()),
            operator_indices: Mutex::new(Vec::new()),
            restricted_calls: AtomicUsize::new(0),
            dual_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_denominator(mut self, denominator: i64) -> Self {
        self.denominator = denominator;
        self
    }

    pub fn with_signs(mut self, signs: &[i64]) -> Self {
        self.signs = signs.to_vec();
        self
    }

    pub fn with_candidates(mut self, candidates: &[i64]) -> Self {
        self.candidates = candidates.to_vec();
        self
    }

    pub fn with_old(mut self, prefix: &[i64], dimension: usize) -> Self {
        self.old.insert(prefix.to_vec(), dimension);
        self
    }

    pub fn with_override(mut self, depth: usize, matrix: Matrix) -> Self {
        self.overrides.insert(depth, matrix);
        self
    }

    pub fn with_corrupt_restrictions(mut self) -> Self {
        self.corrupt_restrictions = true;
        self
    }

    /// Every prefix the old-subspace oracle was asked about, in order.
    pub fn queried(&self) -> Vec<Vec<i64>> {
        self.queried.lock().clone()
    }

    /// Every depth a full operator matrix was requested for.
    pub fn operator_indices(&self) -> Vec<usize> {
        self.operator_indices.lock().clone()
    }

    pub fn restricted_calls(&self) -> usize {
        self.restricted_calls.load(Ordering::Relaxed)
    }

    /// The `use_dual` flag of every operator and conjugation request, in order.
    pub fn dual_requests(&self) -> Vec<bool> {
        self.dual_requests.lock().clone()
    }

    /// Integer matrix `denominator * P * diag(values) * P^-1`.
    pub fn conjugated(&self, values: &[i64]) -> Vec<Vec<i64>> {
        let n = values.len();
        let inverse = |i: usize, j: usize| -> i64 {
            if j < i {
                0
            } else if (j - i) % 2 == 0 {
                1
            } else {
                -1
            }
        };
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let mut entry = values[i] * inverse(i, j);
                        if i + 1 < n {
                            entry += values[i + 1] * inverse(i + 1, j);
                        }
                        entry * self.denominator
                    })
                    .collect()
            })
            .collect()
    }

    /// Integer operator matrix at `depth`, before reduction.
    pub fn integer_operator(&self, depth: usize) -> Vec<Vec<i64>> {
        let row = depth.min(self.eigenvalues.len() - 1);
        self.conjugated(&self.eigenvalues[row])
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }
}

impl OperatorSource for FixtureSource {
    fn matrix_dimension(&self) -> usize {
        self.dimension
    }

    fn matrix_denominator(&self) -> i64 {
        self.denominator
    }

    fn operator_matrix(&self, index: usize, use_dual: bool) -> Matrix {
        self.operator_indices.lock().push(index);
        self.dual_requests.lock().push(use_dual);
        if let Some(matrix) = self.overrides.get(&index) {
            return matrix.clone();
        }
        Matrix::from_rows(&self.integer_operator(index))
    }

    fn operator_matrix_restricted(&self, index: usize, subspace: &Subspace, use_dual: bool) -> Matrix {
        self.restricted_calls.fetch_add(1, Ordering::Relaxed);
        let restricted = restrict(&self.operator_matrix(index, use_dual), subspace);
        if self.corrupt_restrictions {
            restricted.shift_diagonal(-1)
        } else {
            restricted
        }
    }

    fn symmetry_matrix(&self, use_dual: bool) -> Matrix {
        self.dual_requests.lock().push(use_dual);
        Matrix::from_rows(&self.conjugated(&self.signs))
    }

    fn old_subspace_dimension(&self, eigenvalues: &[i64]) -> usize {
        self.queried.lock().push(eigenvalues.to_vec());
        self.old.get(eigenvalues).copied().unwrap_or(0)
    }

    fn candidate_eigenvalues(&self, _depth: usize) -> Vec<i64> {
        self.candidates.clone()
    }
}

/// Two newforms on a 4-dimensional space, split by sign.
///
/// `v0, v1` share eigenvalues `[1, -1, 2]`, `v2, v3` share `[1, 0, -2]`; the
/// conjugation separates each pair.
pub fn four_dimensional_minus() -> FixtureSource {
    FixtureSource::new(&[&[1, 1, 1, 1], &[-1, -1, 0, 0], &[2, 2, -2, -2]])
        .with_signs(&[1, -1, 1, -1])
}

/// Three newforms on a 3-dimensional space in the plus space.
///
/// Eigenvalues: `v0 = [2, 1]`, `v1 = [2, -1]`, `v2 = [-1, 0]`.
pub fn three_dimensional_plus() -> FixtureSource {
    FixtureSource::new(&[&[2, 2, -1], &[1, -1, 0]])
}

/// `m * v` over the integers.
pub fn apply(m: &[Vec<i64>], v: &[i64]) -> Vec<i64> {
    m.iter()
        .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
        .collect()
}

/// Sort newforms so serial and concurrent runs can be compared.
pub fn sorted(mut forms: Vec<Newform>) -> Vec<Newform> {
    forms.sort();
    forms
}

/// Install a test logger once; output shows with `RUST_LOG` and `--nocapture`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
