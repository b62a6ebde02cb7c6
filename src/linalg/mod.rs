// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Exact linear algebra over Z/pZ.
//!
//! The search only needs a handful of operations with clear mathematical
//! contracts:
//!
//! - [`Subspace::eigenspace`]: kernel of `m - lambda * I`
//! - [`Subspace::combine`]: nested subspace back in ambient coordinates
//! - [`restrict`]: an operator on an invariant subspace
//! - [`Subspace::dimension`] and [`Subspace::basis_vector`]
//! - [`make_primitive`]: canonical integer representative of an eigenvector
//!
//! All arithmetic is modulo [`MODULUS`], so dimensions are exact (with
//! overwhelming probability equal to the rational ones for integral operators).

pub mod error;
pub mod field;
pub mod matrix;
pub mod subspace;
pub mod vector;

pub use error::LinalgError;
pub use field::MODULUS;
pub use matrix::Matrix;
pub use subspace::{restrict, restrict_checked, Subspace};
pub use vector::{make_primitive, unit_vector};
