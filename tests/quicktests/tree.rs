use avl::{RotationKind, Tree};

use quickcheck_macros::quickcheck;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::Op;

/// The worst case height of an AVL tree holding `len` keys.
fn max_height(len: usize) -> f64 {
    1.4405 * ((len + 2) as f64).log2()
}

fn balanced_everywhere<K>(tree: &Tree<K>) -> bool {
    tree.shape().nodes.iter().all(|n| n.balance.abs() <= 1)
}

/// Applies a set of operations to a tree, checking the invariants after each one.
fn do_ops<K>(ops: &[Op<K>], tree: &mut Tree<K>) -> bool
where
    K: Ord + Clone,
{
    ops.iter().all(|op| {
        match op {
            Op::Insert(k) => {
                let _ = tree.insert(k.clone());
            }
            Op::Delete(k) => {
                let _ = tree.delete(k);
            }
        }
        tree.audit().is_ok() && balanced_everywhere(tree)
    })
}

#[quickcheck]
fn invariants_hold_after_every_op(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    do_ops(&ops, &mut tree)
}

#[quickcheck]
fn in_order_is_sorted_multiset(xs: Vec<i16>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }

    let mut sorted = xs;
    sorted.sort();
    tree.in_order().into_iter().eq(sorted.iter()) && tree.len() == sorted.len()
}

#[quickcheck]
fn deleting_everything_empties(xs: Vec<i16>, seed: u64) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x);
    }

    let mut order = xs;
    order.shuffle(&mut StdRng::seed_from_u64(seed));
    let all_found = order.iter().all(|x| tree.delete(x).is_some());

    all_found && tree.is_empty() && tree.len() == 0 && tree.root().is_none()
}

#[quickcheck]
fn height_is_logarithmic(xs: Vec<i32>) -> bool {
    let mut tree = Tree::new();
    xs.into_iter().all(|x| {
        let _ = tree.insert(x);
        tree.height() as f64 <= max_height(tree.len())
    })
}

#[quickcheck]
fn missing_delete_changes_nothing(xs: Vec<i8>, missing: i8) -> bool {
    let mut tree = Tree::new();
    for x in xs.iter().filter(|x| **x != missing) {
        let _ = tree.insert(*x);
    }
    let before = format!("{:?}", tree);

    tree.delete(&missing).is_none() && format!("{:?}", tree) == before
}

#[test]
fn height_bound_over_thousands_of_keys() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut tree = Tree::new();
    let mut inserted = Vec::new();

    for round in 0..4000 {
        // Mostly inserts, with a deletion every few rounds.
        if round % 4 == 3 && !inserted.is_empty() {
            let victim = inserted.swap_remove(rng.gen_range(0..inserted.len()));
            assert!(tree.delete(&victim).is_some());
        } else {
            let key: i32 = rng.gen_range(-2000..2000);
            let _ = tree.insert(key);
            inserted.push(key);
        }

        assert!(tree.height() as f64 <= max_height(tree.len()));
    }

    assert_eq!(tree.len(), inserted.len());
    assert_eq!(tree.audit(), Ok(()));
    assert!(balanced_everywhere(&tree));
}

#[test]
fn ascending_keys_stay_balanced() {
    let mut tree = Tree::new();
    for x in 0..(1 << 12) - 1 {
        let _ = tree.insert(x);
    }

    // 2^12 - 1 ascending keys fill a perfect tree.
    assert_eq!(tree.height(), 12);
    assert_eq!(tree.root().map(|n| *n.key()), Some((1 << 11) - 1));
    assert_eq!(tree.audit(), Ok(()));
}

#[test]
fn rotation_cases() {
    let cases = [
        ([10, 20, 30], RotationKind::SingleLeft, 10, -2),
        ([30, 20, 10], RotationKind::SingleRight, 30, 2),
        ([30, 10, 20], RotationKind::DoubleLeftRight, 30, 2),
        ([10, 30, 20], RotationKind::DoubleRightLeft, 10, -2),
    ];

    for (keys, kind, pivot, balance) in cases {
        let mut tree = Tree::new();
        let _ = tree.insert(keys[0]);
        let _ = tree.insert(keys[1]);
        let report = tree.insert(keys[2]);

        let rotation = report.first().expect("third key should rotate");
        assert_eq!(rotation.kind, kind, "inserting {:?}", keys);
        assert_eq!(rotation.pivot, pivot);
        assert_eq!(rotation.balance, balance);

        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 20);
        assert_eq!(root.left().map(|n| *n.key()), Some(10));
        assert_eq!(root.right().map(|n| *n.key()), Some(30));
    }
}
