// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search tree nodes.
//!
//! There is one [`Node`] per explored eigenvalue prefix. A node owns:
//!
//! - its nested subspace (the intersection of the eigenspaces along its prefix)
//!   and that subspace's dimension, both fixed at creation
//! - a cached copy of the next operator restricted to the subspace, released
//!   once every expected child has used it
//! - its children, keyed by eigenvalue
//! - its status, and the basis extracted when it resolves to a newform
//!
//! # Ownership
//!
//! ```text
//! root: Arc<Node>
//!   └── family.children: BTreeMap<eigenvalue, Arc<Node>>   (owning)
//!         └── parent: Weak<Node>                           (back-reference only)
//! ```
//!
//! Removing a child from its parent's map drops the whole subtree, including
//! any matrices cached inside it. Workers only hold extra `Arc` handles while
//! they are exploring that subtree.
//!
//! # Locking
//!
//! Each node has two small locks. The `family` lock covers the child map, the
//! status and the completion counters. The `submatrix` lock covers the matrix
//! cache; whoever holds it while the cache is empty is the only one computing
//! the matrix. Neither lock is held across a recursive call, and the `family`
//! lock is never held across an algebra operation.

mod cache;

use crate::linalg::{Matrix, Subspace};
use cache::MatrixCache;
pub(crate) use cache::Usage;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Where a node stands in the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    /// Being explored, or not yet classified.
    Internal,
    /// The whole subspace is accounted for by old classes.
    AllOld,
    /// The subspace has the target dimension: a newform.
    FoundNew,
    /// The depth bound was reached before the target dimension.
    MaxDepth,
    /// Fully explored and detached from its parent.
    Complete,
}

impl NodeStatus {
    /// True for the statuses that end a branch.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            NodeStatus::AllOld | NodeStatus::FoundNew | NodeStatus::MaxDepth
        )
    }
}

/// Eigenvector basis extracted from a node of the target dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basis {
    pub plus: Vec<i64>,
    pub minus: Option<Vec<i64>>,
}

#[derive(Debug)]
struct Family {
    status: NodeStatus,
    children: BTreeMap<i64, Arc<Node>>,
    expected: usize,
    completed: usize,
    explored: bool,
}

impl Default for Family {
    fn default() -> Self {
        Self {
            status: NodeStatus::Internal,
            children: BTreeMap::new(),
            expected: 0,
            completed: 0,
            explored: false,
        }
    }
}

pub struct Node {
    depth: usize,
    prefix: Vec<i64>,
    parent: Weak<Node>,
    /// `None` at the root, where the subspace is the whole space.
    subspace: Option<Subspace>,
    dimension: usize,
    /// Full conjugation matrix, kept on the root in bulk mode.
    conjugation: Option<Matrix>,
    submatrix: Mutex<MatrixCache>,
    family: Mutex<Family>,
    basis: Mutex<Option<Basis>>,
}

impl Node {
    /// The root node: the whole space of dimension `dimension`, empty prefix.
    pub fn root(dimension: usize, conjugation: Option<Matrix>) -> Arc<Node> {
        Arc::new(Node {
            depth: 0,
            prefix: Vec::new(),
            parent: Weak::new(),
            subspace: None,
            dimension,
            conjugation,
            submatrix: Mutex::default(),
            family: Mutex::default(),
            basis: Mutex::new(None),
        })
    }

    /// A new child of `parent` for `eigenvalue`, not yet attached.
    ///
    /// `subspace` is the child's nested subspace in ambient coordinates.
    pub(crate) fn new_child(parent: &Arc<Node>, eigenvalue: i64, subspace: Subspace) -> Arc<Node> {
        let mut prefix = Vec::with_capacity(parent.prefix.len() + 1);
        prefix.extend_from_slice(&parent.prefix);
        prefix.push(eigenvalue);
        let dimension = subspace.dimension();
        debug_assert!(dimension <= parent.dimension);
        Arc::new(Node {
            depth: parent.depth + 1,
            prefix,
            parent: Arc::downgrade(parent),
            subspace: Some(subspace),
            dimension,
            conjugation: None,
            submatrix: Mutex::default(),
            family: Mutex::default(),
            basis: Mutex::new(None),
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Eigenvalues chosen on the way from the root to this node.
    pub fn prefix(&self) -> &[i64] {
        &self.prefix
    }

    /// The eigenvalue this node was created for; `None` at the root.
    pub fn eigenvalue(&self) -> Option<i64> {
        self.prefix.last().copied()
    }

    pub fn parent(&self) -> Option<Arc<Node>> {
        self.parent.upgrade()
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Nested subspace; `None` at the root (the whole space).
    pub fn subspace(&self) -> Option<&Subspace> {
        self.subspace.as_ref()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn conjugation(&self) -> Option<&Matrix> {
        self.conjugation.as_ref()
    }

    pub fn status(&self) -> NodeStatus {
        self.family.lock().status
    }

    pub fn set_status(&self, status: NodeStatus) {
        self.family.lock().status = status;
    }

    pub fn child(&self, eigenvalue: i64) -> Option<Arc<Node>> {
        self.family.lock().children.get(&eigenvalue).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.family.lock().children.len()
    }

    /// Eigenvalues of the children currently attached, in increasing order.
    pub fn child_eigenvalues(&self) -> Vec<i64> {
        self.family.lock().children.keys().copied().collect()
    }

    /// Attach `child`, unless a child for the same eigenvalue already exists.
    ///
    /// Returns the node that ends up attached, so there is never more than one
    /// node per prefix.
    pub(crate) fn insert_child(&self, child: Arc<Node>) -> Arc<Node> {
        let Some(eigenvalue) = child.eigenvalue() else {
            return child;
        };
        let mut family = self.family.lock();
        Arc::clone(family.children.entry(eigenvalue).or_insert(child))
    }

    /// Detach a child, dropping its subtree unless someone still holds it.
    pub fn erase_child(&self, eigenvalue: i64) -> Option<Arc<Node>> {
        self.family.lock().children.remove(&eigenvalue)
    }

    /// Drop every child subtree.
    pub fn clear_children(&self) {
        let dropped = std::mem::take(&mut self.family.lock().children);
        drop(dropped);
    }

    /// Announce how many children will be tried below this node.
    pub(crate) fn expect_children(&self, count: usize) {
        {
            let mut family = self.family.lock();
            family.expected = count;
            family.completed = 0;
            family.explored = false;
        }
        self.submatrix.lock().expect_uses(count);
    }

    /// Detach a finished child and count it as completed.
    ///
    /// Returns true if this node has now completed too and should itself be
    /// detached from its parent: every expected child is done, the node's own
    /// exploration has finished, and it is not the root.
    pub(crate) fn complete_child(&self, eigenvalue: i64) -> bool {
        let mut family = self.family.lock();
        let child = family.children.remove(&eigenvalue);
        family.completed += 1;
        let done = family.explored && family.completed >= family.expected && !self.is_root();
        drop(family);
        // The detached subtree is freed outside the lock.
        drop(child);
        done
    }

    /// Mark this node's own exploration as finished.
    ///
    /// Returns true if no children are outstanding, in which case the caller is
    /// responsible for detaching the node. Exactly one of this call and the last
    /// [`complete_child`](Self::complete_child) reports completion.
    pub(crate) fn finish_exploring(&self) -> bool {
        let mut family = self.family.lock();
        family.explored = true;
        family.completed >= family.expected
    }

    /// True once every expected child has completed.
    pub fn complete(&self) -> bool {
        let family = self.family.lock();
        family.completed >= family.expected
    }

    pub fn basis(&self) -> Option<Basis> {
        self.basis.lock().clone()
    }

    pub(crate) fn set_basis(&self, basis: Basis) {
        *self.basis.lock() = Some(basis);
    }

    /// The cached restricted operator, computing it with `compute` if absent.
    ///
    /// The cache lock is held while computing, so concurrent callers never
    /// compute the same matrix twice. The flag reports whether the matrix had
    /// been released before and was regenerated.
    pub(crate) fn submatrix_or_insert_with<E>(
        &self,
        compute: impl FnOnce() -> Result<Matrix, E>,
    ) -> Result<(Arc<Matrix>, bool), E> {
        let mut cache = self.submatrix.lock();
        if let Some(matrix) = cache.get() {
            return Ok((matrix, false));
        }
        let matrix = compute()?;
        Ok(cache.store(matrix))
    }

    /// Record that a child has consumed the cached restricted operator.
    pub(crate) fn use_submatrix(&self) -> Usage {
        self.submatrix.lock().record_use()
    }

    /// Number of children that have consumed the restricted operator so far.
    pub fn submatrix_usage(&self) -> usize {
        self.submatrix.lock().usage()
    }

    pub fn has_submatrix(&self) -> bool {
        self.submatrix.lock().is_cached()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("depth", &self.depth)
            .field("prefix", &self.prefix)
            .field("dimension", &self.dimension)
            .field("status", &self.status())
            .field("children", &self.child_eigenvalues())
            .finish()
    }
}
