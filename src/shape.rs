//! A borrowed snapshot of a tree's structure for presentation layers.
//!
//! The snapshot lists every node (with its key, height, balance factor, and degree) and every
//! parent/child edge. Nodes and edges are in pre-order: a node is listed before its left subtree,
//! which is listed before its right subtree.

use crate::tree::Node;

/// Which child of its parent a node is, or which side of a node is too tall.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The left child/subtree.
    Left,
    /// The right child/subtree.
    Right,
}

/// The structural facts about one node.
#[derive(Debug, PartialEq, Eq)]
pub struct NodeInfo<'a, K> {
    /// The node's key.
    pub key: &'a K,
    /// The node's cached height. A leaf has height 1.
    pub height: usize,
    /// `height(left) - height(right)`.
    pub balance: isize,
    /// How many children the node has (0, 1, or 2).
    pub degree: usize,
}

/// A parent/child link.
#[derive(Debug, PartialEq, Eq)]
pub struct Edge<'a, K> {
    /// The parent's key.
    pub parent: &'a K,
    /// The child's key.
    pub child: &'a K,
    /// Which child of `parent` this is.
    pub side: Side,
}

/// See the [module documentation](self).
#[derive(Debug, PartialEq, Eq)]
pub struct Shape<'a, K> {
    /// Every node, in pre-order.
    pub nodes: Vec<NodeInfo<'a, K>>,
    /// Every edge, in pre-order of the child.
    pub edges: Vec<Edge<'a, K>>,
}

impl<'a, K> Shape<'a, K> {
    pub(crate) fn of(root: Option<&'a Node<K>>) -> Self {
        let mut shape = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        };
        if let Some(root) = root {
            shape.visit(root);
        }
        shape
    }

    fn visit(&mut self, node: &'a Node<K>) {
        self.nodes.push(NodeInfo {
            key: node.key(),
            height: node.height(),
            balance: node.balance_factor(),
            degree: node.degree(),
        });
        for (side, child) in [(Side::Left, node.left()), (Side::Right, node.right())] {
            if let Some(child) = child {
                self.edges.push(Edge {
                    parent: node.key(),
                    child: child.key(),
                    side,
                });
                self.visit(child);
            }
        }
    }

    /// The root's key, if the tree wasn't empty.
    pub fn root(&self) -> Option<&'a K> {
        self.nodes.first().map(|n| n.key)
    }
}
