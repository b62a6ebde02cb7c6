// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for the form finder.
//!
//! Two layers, matching how far a failure reaches:
//!
//! - [`BranchError`]: one branch of the search cannot be completed. The finder
//!   logs it and carries on with the rest of the tree.
//! - [`FinderError`]: the search cannot be set up at all.
//!
//! Abandoning a branch because it is all old, or because it hit the depth
//! bound, is a normal outcome and not an error.

use crate::linalg::LinalgError;
use thiserror::Error;

/// A failure confined to one branch of the search tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BranchError {
    /// The final eigenspace does not have the target dimension.
    #[error("final subspace for eigenvalues {eigenvalues:?} has dimension {dimension}, expected {expected}")]
    UnexpectedDimension {
        eigenvalues: Vec<i64>,
        dimension: usize,
        expected: usize,
    },

    /// The conjugation eigenspace for one sign is not 1-dimensional.
    #[error("final ({}) subspace for eigenvalues {eigenvalues:?} has dimension {dimension}", sign_symbol(.sign))]
    SignSplit {
        eigenvalues: Vec<i64>,
        sign: i64,
        dimension: usize,
    },

    /// A checked restriction failed.
    #[error("restriction failed at depth {depth}: {source}")]
    Restriction {
        depth: usize,
        #[source]
        source: LinalgError,
    },
}

fn sign_symbol(sign: &i64) -> &'static str {
    if *sign > 0 {
        "+"
    } else {
        "-"
    }
}

/// A failure that prevents the search from running.
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("minimum depth {min_depth} exceeds maximum depth {max_depth}")]
    DepthBounds { min_depth: usize, max_depth: usize },

    #[error("concurrent search needs at least one worker thread")]
    NoWorkers,

    #[error("operator denominator must be positive, got {0}")]
    Denominator(i64),

    #[error("could not start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
