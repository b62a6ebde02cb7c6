// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Cached restricted operator matrix with usage counting.
//!
//! A node computes the operator for the next depth restricted to its subspace
//! once, shares it with every child that descends from it, and drops it after
//! the last expected child has used it. A released matrix is recomputed if it
//! is ever needed again.

use crate::linalg::Matrix;
use std::sync::Arc;

/// Outcome of recording one use of a cached matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Usage {
    Retained,
    Released,
}

#[derive(Debug, Default)]
pub(crate) struct MatrixCache {
    matrix: Option<Arc<Matrix>>,
    usage: usize,
    expected: usize,
    released: bool,
}

impl MatrixCache {
    pub(crate) fn get(&self) -> Option<Arc<Matrix>> {
        self.matrix.clone()
    }

    /// Store a freshly computed matrix; returns true if it replaces a released one.
    pub(crate) fn store(&mut self, matrix: Matrix) -> (Arc<Matrix>, bool) {
        let matrix = Arc::new(matrix);
        self.matrix = Some(Arc::clone(&matrix));
        (matrix, std::mem::take(&mut self.released))
    }

    pub(crate) fn expect_uses(&mut self, expected: usize) {
        self.expected = expected;
        self.usage = 0;
    }

    /// Record one use; release the matrix once every expected user has had it.
    pub(crate) fn record_use(&mut self) -> Usage {
        self.usage += 1;
        if self.expected > 0 && self.usage >= self.expected && self.matrix.is_some() {
            self.matrix = None;
            self.released = true;
            Usage::Released
        } else {
            Usage::Retained
        }
    }

    pub(crate) fn usage(&self) -> usize {
        self.usage
    }

    pub(crate) fn is_cached(&self) -> bool {
        self.matrix.is_some()
    }
}
