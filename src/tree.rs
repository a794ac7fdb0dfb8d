//! The balancing engine. An AVL tree built from owned `Box`ed nodes: every node owns its two
//! subtrees and nothing points back up, so rotations are just moving children out of one node and
//! into another.
//!
//! Keys are routed left when they are strictly less than a node's key and right otherwise, so
//! inserting a key that is already present adds another node rather than replacing anything.
//!
//! # Examples
//!
//! ```
//! use avl::{RotationKind, Tree};
//!
//! let mut tree = Tree::new();
//!
//! assert!(!tree.insert(10).rotated());
//! assert!(!tree.insert(20).rotated());
//!
//! // The third ascending key makes the root right heavy.
//! let report = tree.insert(30);
//! let rotation = report.first().unwrap();
//! assert_eq!(rotation.kind, RotationKind::SingleLeft);
//! assert_eq!(rotation.pivot, 10);
//! assert_eq!(rotation.balance, -2);
//!
//! assert_eq!(tree.root().map(|n| *n.key()), Some(20));
//! assert_eq!(tree.in_order(), [&10, &20, &30]);
//!
//! // Deleting a key that isn't there does nothing.
//! assert!(tree.delete(&42).is_none());
//! assert_eq!(tree.len(), 3);
//! ```

use std::cmp::Ordering;

use log::{debug, trace};
use thiserror::Error;

use crate::report::{Report, Rotation, RotationKind};
use crate::shape::Shape;

/// A self-balancing Binary Search Tree (specifically, an AVL tree) of keys. Duplicate keys are
/// allowed.
#[derive(Clone, Debug)]
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Tree<K> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            len: 0,
        }
    }

    /// How many keys (counting duplicates) are stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree has no root.
    pub fn is_empty(&self) -> bool {
        self.root.0.is_none()
    }

    /// The number of levels in the tree. An empty tree has height 0 and a lone root has height 1.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// The balance factor of the root, `height(left) - height(right)`. Zero for an empty tree.
    pub fn balance_factor(&self) -> isize {
        self.root.balance_factor()
    }

    /// The root node, if there is one.
    pub fn root(&self) -> Option<&Node<K>> {
        self.root.root()
    }

    /// Whether some node holds a key equal to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let _ = tree.insert(1);
    ///
    /// assert!(tree.contains(&1));
    /// assert!(!tree.contains(&42));
    /// ```
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = node.left(),
                Ordering::Equal => return true,
                Ordering::Greater => current = node.right(),
            }
        }
        false
    }

    /// Inserts `key` into the tree and rebalances it. Inserting a key equal to an existing one adds
    /// a second node for it in that node's right subtree.
    ///
    /// The returned [`Report`] says whether a rotation was needed and, if so, which.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::{RotationKind, Tree};
    ///
    /// let mut tree = Tree::new();
    /// let _ = tree.insert(30);
    /// let _ = tree.insert(10);
    ///
    /// let report = tree.insert(20);
    /// assert_eq!(report.first().unwrap().kind, RotationKind::DoubleLeftRight);
    ///
    /// // Duplicates are kept.
    /// let _ = tree.insert(20);
    /// assert_eq!(tree.in_order(), [&10, &20, &20, &30]);
    /// ```
    pub fn insert(&mut self, key: K) -> Report<K>
    where
        K: Ord + Clone,
    {
        let mut report = Report::new();
        let probe = key.clone();
        self.root.insert(key, &probe, &mut report);
        self.len += 1;
        report
    }

    /// Deletes one node holding `key` and rebalances the tree. A node with two children takes the
    /// key of its in-order predecessor, and the predecessor's node is removed instead.
    ///
    /// Returns `None` (and leaves the tree untouched) if no node holds `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for x in 1..=7 {
    ///     let _ = tree.insert(x);
    /// }
    ///
    /// let report = tree.delete(&4).unwrap();
    /// assert!(!report.rotated());
    /// // The root took its predecessor's key.
    /// assert_eq!(tree.root().map(|n| *n.key()), Some(3));
    ///
    /// assert!(tree.delete(&4).is_none());
    /// ```
    pub fn delete(&mut self, key: &K) -> Option<Report<K>>
    where
        K: Ord + Clone,
    {
        let mut report = Report::new();
        if self.root.delete(key, &mut report) {
            self.len -= 1;
            Some(report)
        } else {
            None
        }
    }

    /// Every key in non-decreasing order.
    pub fn in_order(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        self.root.collect(&mut keys);
        keys
    }

    /// A snapshot of the tree's nodes and edges for rendering.
    pub fn shape(&self) -> Shape<'_, K> {
        Shape::of(self.root())
    }

    /// Checks every invariant of the tree: keys in order, cached heights correct, every balance
    /// factor in `-1..=1`, and the node count matching [`len`][Self::len].
    ///
    /// The public API can't break these, so this only fails if there's a bug in the engine.
    pub fn audit(&self) -> Result<(), Violation<K>>
    where
        K: Ord + Clone,
    {
        let mut last = None;
        let mut counted = 0;
        self.root.audit(&mut last, &mut counted)?;
        if counted != self.len {
            return Err(Violation::Count {
                len: self.len,
                counted,
            });
        }
        Ok(())
    }
}

/// A broken tree invariant found by [`Tree::audit`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Violation<K> {
    /// A key is smaller than the key before it in an in-order walk.
    #[error("key {key:?} is smaller than its in-order predecessor")]
    Unordered {
        /// The out of place key.
        key: K,
    },
    /// A node's cached height doesn't match its children.
    #[error("node {key:?} caches height {cached} but its subtree has height {actual}")]
    StaleHeight {
        /// The node's key.
        key: K,
        /// The height stored in the node.
        cached: usize,
        /// The height computed from its children.
        actual: usize,
    },
    /// A node's subtrees differ in height by more than one.
    #[error("node {key:?} has balance factor {balance}")]
    Unbalanced {
        /// The node's key.
        key: K,
        /// `height(left) - height(right)`.
        balance: isize,
    },
    /// The tree's length doesn't match the number of nodes.
    #[error("tree reports {len} keys but holds {counted} nodes")]
    Count {
        /// The length the tree reports.
        len: usize,
        /// The number of nodes actually found.
        counted: usize,
    },
}

/// A node of a [`Tree`]. Nodes are only handed out by shared reference, for reading the tree's
/// structure.
#[derive(Clone, Debug)]
pub struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: Link(None),
            right: Link(None),
            height: 1,
        })
    }

    /// This node's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The left child.
    pub fn left(&self) -> Option<&Self> {
        self.left.root()
    }

    /// The right child.
    pub fn right(&self) -> Option<&Self> {
        self.right.root()
    }

    /// The number of levels in the subtree rooted here.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `height(left) - height(right)`.
    pub fn balance_factor(&self) -> isize {
        self.left.height() as isize - self.right.height() as isize
    }

    /// How many children this node has.
    pub fn degree(&self) -> usize {
        usize::from(self.left.0.is_some()) + usize::from(self.right.0.is_some())
    }

    fn fix_height(&mut self) {
        self.height = self.left.height().max(self.right.height()) + 1;
    }
}

/// What caused a rebalancing pass. Insertions pick the rotation by where the new key went,
/// deletions by how the taller child leans.
enum Trigger<'a, K> {
    Inserted(&'a K),
    Deleted,
}

/// An owned, possibly empty, subtree.
#[derive(Clone, Debug)]
struct Link<K>(Option<Box<Node<K>>>);

impl<K> Link<K> {
    fn root(&self) -> Option<&Node<K>> {
        self.0.as_deref()
    }

    fn root_mut(&mut self) -> Option<&mut Node<K>> {
        self.0.as_deref_mut()
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    fn height(&self) -> usize {
        self.root().map_or(0, |n| n.height)
    }

    fn balance_factor(&self) -> isize {
        self.root().map_or(0, Node::balance_factor)
    }

    fn collect<'a>(&'a self, keys: &mut Vec<&'a K>) {
        if let Some(node) = self.root() {
            node.left.collect(keys);
            keys.push(&node.key);
            node.right.collect(keys);
        }
    }

    fn insert(&mut self, key: K, probe: &K, report: &mut Report<K>)
    where
        K: Ord + Clone,
    {
        match self.root_mut() {
            None => {
                trace!("new leaf");
                self.0 = Some(Node::new_boxed(key));
            }
            Some(node) => {
                if key < node.key {
                    node.left.insert(key, probe, report);
                } else {
                    node.right.insert(key, probe, report);
                }
                self.balance(Trigger::Inserted(probe), report);
            }
        }
    }

    /// Deletes a node with the given key from this subtree, returning whether one was found.
    fn delete(&mut self, key: &K, report: &mut Report<K>) -> bool
    where
        K: Ord + Clone,
    {
        let Some(node) = self.root_mut() else {
            return false;
        };
        let deleted = match key.cmp(&node.key) {
            Ordering::Less => node.left.delete(key, report),
            Ordering::Greater => node.right.delete(key, report),
            Ordering::Equal => {
                if node.left.0.is_some() && node.right.0.is_some() {
                    // Promote this node's predecessor. That is, the largest key in this node's
                    // left subtree.
                    trace!("replacing deleted key with its predecessor");
                    node.key = node.left.delete_max(report);
                } else {
                    trace!("splicing out deleted node");
                    self.splice_out();
                }
                true
            }
        };

        if deleted {
            self.balance(Trigger::Deleted, report);
        }
        deleted
    }

    /// Removes the rightmost node of this (non-empty) subtree and returns its key.
    fn delete_max(&mut self, report: &mut Report<K>) -> K
    where
        K: Ord + Clone,
    {
        let node = self
            .root_mut()
            .expect("Predecessor search requires a left child");
        if node.right.0.is_some() {
            let key = node.right.delete_max(report);
            self.balance(Trigger::Deleted, report);
            key
        } else {
            self.splice_out()
        }
    }

    /// Replaces the root of this subtree with its only child (or nothing) and returns its key.
    /// Must only be called when the root has at most one child.
    fn splice_out(&mut self) -> K {
        let node = self.0.take().expect("Cannot splice out an empty tree/node.");
        let Node {
            key, left, right, ..
        } = *node;
        debug_assert!(left.0.is_none() || right.0.is_none());
        *self = if left.0.is_some() { left } else { right };
        key
    }

    /// Recomputes the root's height and, if it is out of balance, rotates to fix it.
    ///
    /// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology.
    fn balance(&mut self, trigger: Trigger<'_, K>, report: &mut Report<K>)
    where
        K: Ord + Clone,
    {
        let Some(root) = self.root_mut() else {
            return;
        };
        root.fix_height();
        let balance = root.balance_factor();

        let kind = if balance > 1 {
            let left = root.left().expect("Left heavy => left child");
            let outside = match trigger {
                Trigger::Inserted(key) => *key < left.key,
                Trigger::Deleted => left.balance_factor() >= 0,
            };
            if outside {
                RotationKind::SingleRight
            } else {
                RotationKind::DoubleLeftRight
            }
        } else if balance < -1 {
            let right = root.right().expect("Right heavy => right child");
            // A key equal to the right child's went into its right subtree, same as a larger one.
            let outside = match trigger {
                Trigger::Inserted(key) => *key >= right.key,
                Trigger::Deleted => right.balance_factor() <= 0,
            };
            if outside {
                RotationKind::SingleLeft
            } else {
                RotationKind::DoubleRightLeft
            }
        } else {
            return;
        };

        debug!(
            "rotation needed: {:?} ({}) with a balance factor of {}",
            kind,
            kind.case(),
            balance
        );
        report.push(Rotation {
            kind,
            pivot: root.key.clone(),
            balance,
        });
        match kind {
            RotationKind::SingleLeft => self.rotate_left(),
            RotationKind::SingleRight => self.rotate_right(),
            RotationKind::DoubleLeftRight => self.rotate_left_right(),
            RotationKind::DoubleRightLeft => self.rotate_right_left(),
        }

        if cfg!(debug_assertions) {
            let Some(root) = self.root() else {
                return;
            };
            let left_height = root.left.height();
            let right_height = root.right.height();
            assert_eq!(root.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
    }

    /// Rotate self to the right. This moves the left child up vertically and self down vertically.
    /// Used to rebalance the tree when the left child is too tall. As such, it must only be called
    /// when there _is_ a left child.
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///   old_root (i.e. "self")    new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self) {
        let mut old_root = self.0.take().expect("Cannot rotate empty tree/node.");
        let mut new_root = old_root.left.0.take().expect("Rotate right => left child");

        old_root.left = new_root.right.take();
        old_root.fix_height();

        new_root.right = Link(Some(old_root));
        new_root.fix_height();
        self.0 = Some(new_root);
    }

    /// Mirror image of [`rotate_right`][Self::rotate_right]: the right child moves up.
    fn rotate_left(&mut self) {
        let mut old_root = self.0.take().expect("Cannot rotate empty tree/node.");
        let mut new_root = old_root.right.0.take().expect("Rotate left => right child");

        old_root.right = new_root.left.take();
        old_root.fix_height();

        new_root.left = Link(Some(old_root));
        new_root.fix_height();
        self.0 = Some(new_root);
    }

    fn rotate_right_left(&mut self) {
        self.root_mut()
            .expect("Rotating a tree requires a root")
            .right
            .rotate_right();
        self.rotate_left();
    }

    fn rotate_left_right(&mut self) {
        self.root_mut()
            .expect("Rotating a tree requires a root")
            .left
            .rotate_left();
        self.rotate_right();
    }

    /// Walks the subtree in order, checking every invariant. Returns the subtree's real height.
    fn audit<'a>(
        &'a self,
        last: &mut Option<&'a K>,
        counted: &mut usize,
    ) -> Result<usize, Violation<K>>
    where
        K: Ord + Clone,
    {
        let Some(node) = self.root() else {
            return Ok(0);
        };

        let left_height = node.left.audit(last, counted)?;
        if last.is_some_and(|last| node.key < *last) {
            return Err(Violation::Unordered {
                key: node.key.clone(),
            });
        }
        *last = Some(&node.key);
        *counted += 1;
        let right_height = node.right.audit(last, counted)?;

        let actual = left_height.max(right_height) + 1;
        if node.height != actual {
            return Err(Violation::StaleHeight {
                key: node.key.clone(),
                cached: node.height,
                actual,
            });
        }
        let balance = left_height as isize - right_height as isize;
        if balance.abs() > 1 {
            return Err(Violation::Unbalanced {
                key: node.key.clone(),
                balance,
            });
        }
        Ok(actual)
    }
}
