//! Rotation reports returned by the mutating operations on [`Tree`][crate::Tree].
//!
//! Every call to [`Tree::insert`][crate::Tree::insert] or [`Tree::delete`][crate::Tree::delete]
//! yields a [`Report`] listing each rotation the rebalancing pass performed, in the order they
//! happened (deepest node first). The engine only records these facts; deciding whether and how to
//! show them is up to the caller.

use crate::shape::Side;

/// Which of the four AVL rebalancing cases fired.
///
/// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for terminology. The "case" names
/// (`LL`, `RR`, `LR`, `RL`) describe where the excess height is, the variant names describe the
/// rotation(s) that fix it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RotationKind {
    /// A single left rotation, fixing a right-right (`RR`) imbalance.
    SingleLeft,
    /// A single right rotation, fixing a left-left (`LL`) imbalance.
    SingleRight,
    /// A left rotation of the left child followed by a right rotation, fixing a left-right (`LR`)
    /// imbalance.
    DoubleLeftRight,
    /// A right rotation of the right child followed by a left rotation, fixing a right-left
    /// (`RL`) imbalance.
    DoubleRightLeft,
}

impl RotationKind {
    /// The side of the pivot node that was too tall.
    pub fn heavy_side(self) -> Side {
        match self {
            Self::SingleRight | Self::DoubleLeftRight => Side::Left,
            Self::SingleLeft | Self::DoubleRightLeft => Side::Right,
        }
    }

    /// Whether this case needed two rotations.
    pub fn is_double(self) -> bool {
        matches!(self, Self::DoubleLeftRight | Self::DoubleRightLeft)
    }

    /// The conventional two letter name of the imbalance this rotation fixes.
    pub fn case(self) -> &'static str {
        match self {
            Self::SingleLeft => "RR",
            Self::SingleRight => "LL",
            Self::DoubleLeftRight => "LR",
            Self::DoubleRightLeft => "RL",
        }
    }
}

/// A single rebalancing event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotation<K> {
    /// Which case fired.
    pub kind: RotationKind,
    /// The key of the node that was out of balance (the root of the rotated subtree before the
    /// rotation).
    pub pivot: K,
    /// The balance factor of the pivot just before rotating. Always `2` or `-2`.
    pub balance: isize,
}

/// Everything the rebalancing pass did during one mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Report<K> {
    rotations: Vec<Rotation<K>>,
}

impl<K> Default for Report<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Report<K> {
    pub(crate) fn new() -> Self {
        Self {
            rotations: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, rotation: Rotation<K>) {
        self.rotations.push(rotation);
    }

    /// Whether any rotation occurred.
    pub fn rotated(&self) -> bool {
        !self.rotations.is_empty()
    }

    /// The rotations in the order they were performed.
    pub fn rotations(&self) -> &[Rotation<K>] {
        &self.rotations
    }

    /// The first (deepest) rotation, if any. An insertion never performs more than one.
    pub fn first(&self) -> Option<&Rotation<K>> {
        self.rotations.first()
    }

    /// Consumes the report, yielding its rotations.
    pub fn into_rotations(self) -> Vec<Rotation<K>> {
        self.rotations
    }
}
