//! This crate provides an AVL tree, a self-balancing Binary Search Tree (BST),
//! mostly for educational purposes: every mutation reports the rotations it
//! performed, and the tree's shape can be inspected node by node.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key no greater than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key no less than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined as
//! the longest path from the root `Node` to a leaf `Node`).
//!
//! ## AVL Tree
//!
//! An AVL tree keeps its height `O(lg N)` by requiring that, for every `Node`,
//! the heights of its two subtrees differ by at most one. That difference
//! (`height(left) - height(right)`) is the node's _balance factor_. Whenever an
//! insertion or deletion pushes a balance factor to `2` or `-2`, the tree
//! restores the invariant with one or two _rotations_, local restructurings
//! that keep the in-order sequence of keys the same. Each mutation returns a
//! [`Report`] describing the rotations that happened.
//!
//! The [`menu`] module wraps a tree in an interactive text menu, which is what
//! the `avl-menu` binary runs.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod menu;
pub mod report;
pub mod shape;
pub mod tree;


pub use report::{Report, Rotation, RotationKind};
pub use shape::{Edge, NodeInfo, Shape, Side};
pub use tree::{Node, Tree, Violation};
