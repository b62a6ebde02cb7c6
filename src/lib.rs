// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Newform splitting by recursive simultaneous-eigenspace search.
//!
//! Given a space of modular symbols and a commuting family of operators (one per
//! depth), the [`FormFinder`] splits the space into common eigenspaces by trying
//! integer eigenvalue candidates depth by depth. Each branch that narrows down to
//! the target dimension (1 in the plus space, 2 otherwise) is one newform; its
//! basis is handed to a [`NewformSink`].
//!
//! # Architecture
//!
//! The search builds a tree with one [`Node`] per tried eigenvalue prefix:
//!
//! - **Descend**: compute the eigenspace of the node's restricted operator for
//!   the next candidate and intersect it with the node's nested subspace.
//! - **Find**: prune branches fully explained by old classes, report branches
//!   that reach the target dimension, abandon branches that hit the depth bound,
//!   and recurse into everything else.
//! - **Ascend**: drop finished children so their subspaces and matrices are freed.
//!
//! The finder knows nothing about where the operators come from. An
//! [`OperatorSource`] supplies operator matrices, candidate eigenvalues and the
//! old-subspace oracle; the [`linalg`] module provides the exact arithmetic.
//!
//! # Parallelization
//!
//! In [`SearchMode::Concurrent`] every child node becomes a task on a rayon pool.
//! Results are batched and delivered to the sink once the pool has drained, so
//! serial and concurrent runs accept the same set of newforms.
//!
//! # Example
//!
//! ```
//! use form_finder::linalg::{Matrix, Subspace};
//! use form_finder::{FinderConfig, FormFinder, Newform, OperatorSource};
//!
//! /// Two newforms on a 2-dimensional space, split by the first operator.
//! struct Diagonal;
//!
//! impl OperatorSource for Diagonal {
//!     fn matrix_dimension(&self) -> usize { 2 }
//!     fn matrix_denominator(&self) -> i64 { 1 }
//!     fn operator_matrix(&self, _index: usize, _use_dual: bool) -> Matrix {
//!         Matrix::from_rows(&[vec![1, 0], vec![0, -1]])
//!     }
//!     fn symmetry_matrix(&self, _use_dual: bool) -> Matrix { Matrix::identity(2) }
//!     fn old_subspace_dimension(&self, _eigenvalues: &[i64]) -> usize { 0 }
//!     fn candidate_eigenvalues(&self, _depth: usize) -> Vec<i64> { vec![-1, 0, 1] }
//! }
//!
//! let mut finder = FormFinder::new(Diagonal, FinderConfig::new().max_depth(2)).unwrap();
//! let mut forms: Vec<Newform> = Vec::new();
//! finder.find(&mut forms).unwrap();
//!
//! assert_eq!(forms.len(), 2);
//! assert_eq!(forms[0].eigenvalues, vec![-1]);
//! assert_eq!(forms[0].basis_plus, vec![0, 1]);
//! ```

pub mod config;
pub mod error;
pub mod finder;
pub mod linalg;
pub mod source;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use config::{FinderConfig, SearchMode};
pub use error::{BranchError, FinderError};
pub use finder::FormFinder;
pub use source::{Newform, NewformSink, OperatorSource};
pub use stats::{Counter, Statistics};
pub use tree::{Node, NodeStatus};
