// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Dense matrices over Z/pZ.
//!
//! Operators act on column vectors: the image of `v` under `m` is `m * v`.
//! Entries are kept reduced in `[0, MODULUS)`.

use super::field;
use super::subspace::Subspace;
use std::fmt;
use std::ops::Mul;

/// A dense `rows x cols` matrix over Z/pZ, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    entries: Vec<i64>,
}

/// Reduced row echelon form of a matrix, with the columns holding pivots.
#[derive(Debug, Clone)]
pub(crate) struct Echelon {
    pub(crate) reduced: Matrix,
    pub(crate) pivot_columns: Vec<usize>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            entries: vec![0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| i64::from(i == j))
    }

    /// Build a matrix from `f(i, j)`, reducing each value mod p.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> i64) -> Self {
        let mut entries = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                entries.push(field::reduce(f(i, j)));
            }
        }
        Self {
            rows,
            cols,
            entries,
        }
    }

    /// Build a matrix from signed integer rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows(rows: &[Vec<i64>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|r| r.len() == cols),
            "ragged rows in Matrix::from_rows"
        );
        Self::from_fn(rows.len(), cols, |i, j| rows[i][j])
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.entries[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: i64) {
        self.entries[i * self.cols + j] = field::reduce(value);
    }

    /// Column `j` as a vector of residues.
    pub fn column(&self, j: usize) -> Vec<i64> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }

    /// Every entry multiplied by `k`.
    pub fn scaled(&self, k: i64) -> Matrix {
        let k = field::reduce(k);
        Matrix {
            rows: self.rows,
            cols: self.cols,
            entries: self.entries.iter().map(|&e| field::mul(e, k)).collect(),
        }
    }

    /// `self - lambda * I`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    pub fn shift_diagonal(&self, lambda: i64) -> Matrix {
        assert!(self.is_square(), "shift_diagonal needs a square matrix");
        let lambda = field::reduce(lambda);
        let mut shifted = self.clone();
        for i in 0..self.rows {
            let idx = i * self.cols + i;
            shifted.entries[idx] = field::sub(shifted.entries[idx], lambda);
        }
        shifted
    }

    /// The submatrix made of the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Matrix {
        let mut entries = Vec::with_capacity(rows.len() * self.cols);
        for &r in rows {
            entries.extend_from_slice(&self.entries[r * self.cols..(r + 1) * self.cols]);
        }
        Matrix {
            rows: rows.len(),
            cols: self.cols,
            entries,
        }
    }

    /// Fraction of nonzero entries; 0 for an empty matrix.
    pub fn density(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let nonzero = self.entries.iter().filter(|&&e| e != 0).count();
        nonzero as f64 / self.entries.len() as f64
    }

    /// Gauss-Jordan elimination to reduced row echelon form.
    pub(crate) fn echelon(&self) -> Echelon {
        let mut m = self.clone();
        let mut pivot_columns = Vec::new();
        let mut row = 0;
        for col in 0..m.cols {
            if row == m.rows {
                break;
            }
            let Some(pivot) = (row..m.rows).find(|&r| m.get(r, col) != 0) else {
                continue;
            };
            m.swap_rows(row, pivot);
            let scale = field::inv(m.get(row, col));
            for j in col..m.cols {
                let idx = row * m.cols + j;
                m.entries[idx] = field::mul(m.entries[idx], scale);
            }
            for r in 0..m.rows {
                if r == row {
                    continue;
                }
                let factor = m.get(r, col);
                if factor == 0 {
                    continue;
                }
                for j in col..m.cols {
                    let sub = field::mul(factor, m.get(row, j));
                    let idx = r * m.cols + j;
                    m.entries[idx] = field::sub(m.entries[idx], sub);
                }
            }
            pivot_columns.push(col);
            row += 1;
        }
        Echelon {
            reduced: m,
            pivot_columns,
        }
    }

    pub fn rank(&self) -> usize {
        self.echelon().pivot_columns.len()
    }

    /// The null space `{ v : self * v = 0 }`.
    ///
    /// One basis vector per free column `f`, with a 1 in position `f`; the free
    /// columns are therefore the pivots of the returned subspace.
    pub fn kernel(&self) -> Subspace {
        let Echelon {
            reduced,
            pivot_columns,
        } = self.echelon();
        let mut is_pivot = vec![false; self.cols];
        for &c in &pivot_columns {
            is_pivot[c] = true;
        }
        let free: Vec<usize> = (0..self.cols).filter(|&c| !is_pivot[c]).collect();

        let mut basis = Matrix::zeros(self.cols, free.len());
        for (k, &f) in free.iter().enumerate() {
            basis.entries[f * basis.cols + k] = 1;
            for (r, &pc) in pivot_columns.iter().enumerate() {
                basis.entries[pc * basis.cols + k] = field::neg(reduced.get(r, f));
            }
        }
        Subspace::from_parts(basis, free)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for j in 0..self.cols {
            self.entries.swap(a * self.cols + j, b * self.cols + j);
        }
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    /// # Panics
    ///
    /// Panics if the inner dimensions differ.
    fn mul(self, rhs: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, rhs.rows,
            "dimension mismatch: {}x{} * {}x{}",
            self.rows, self.cols, rhs.rows, rhs.cols
        );
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a == 0 {
                    continue;
                }
                for j in 0..rhs.cols {
                    let idx = i * rhs.cols + j;
                    out.entries[idx] = field::add(out.entries[idx], field::mul(a, rhs.get(k, j)));
                }
            }
        }
        out
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.rows {
            let row: Vec<String> = (0..self.cols)
                .map(|j| field::symmetric(self.get(i, j)).to_string())
                .collect();
            writeln!(f, "[{}]", row.join(" "))?;
        }
        Ok(())
    }
}
