// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Failures reported by the optional restriction checks.

use thiserror::Error;

/// A restriction that failed verification.
///
/// These only arise when restriction checking is switched on; the unchecked
/// paths trust the caller's invariance precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinalgError {
    /// `m * B != B * R`: the subspace is not invariant under the operator.
    #[error("subspace of dimension {dimension} is not invariant under a {ambient}x{ambient} operator")]
    NotInvariant { ambient: usize, dimension: usize },

    /// A pre-restricted operator differs from restricting the full operator.
    #[error("restricted operator at index {index} differs from the restriction of the full operator")]
    RestrictionMismatch { index: usize },
}
