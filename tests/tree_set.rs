use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use bstree::{Error, TreeSet};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    EraseAt(i64),
    Contains(i64),
    LowerBound(i64),
    UpperBound(i64),
    First,
    Last,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        2 => value_strategy().prop_map(SetOp::Remove),
        2 => value_strategy().prop_map(SetOp::EraseAt),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => value_strategy().prop_map(SetOp::LowerBound),
        1 => value_strategy().prop_map(SetOp::UpperBound),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
    ]
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both TreeSet and BTreeSet and
    /// asserts identical results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut set: TreeSet<i64> = TreeSet::new();
        let mut model: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    let (pos, inserted) = set.insert(*v);
                    prop_assert_eq!(inserted, model.insert(*v), "insert({})", v);
                    prop_assert_eq!(set.get_at(pos), Ok(v));
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(set.remove(v), model.take(v), "remove({})", v);
                }
                SetOp::EraseAt(v) => {
                    let pos = set.find(v);
                    if model.remove(v) {
                        let next = set.erase(pos).unwrap();
                        let expected = model.range(v..).next();
                        prop_assert_eq!(set.get_at(next).ok(), expected, "erase({}) next", v);
                    } else {
                        prop_assert!(pos.is_end());
                        prop_assert_eq!(set.erase(pos), Err(Error::InvalidPosition));
                    }
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(set.contains(v), model.contains(v), "contains({})", v);
                    prop_assert_eq!(set.count(v), usize::from(model.contains(v)));
                }
                SetOp::LowerBound(v) => {
                    let expected = model.range(v..).next();
                    prop_assert_eq!(set.get_at(set.lower_bound(v)).ok(), expected, "lower_bound({})", v);
                }
                SetOp::UpperBound(v) => {
                    let expected = model.range((std::ops::Bound::Excluded(v), std::ops::Bound::Unbounded)).next();
                    prop_assert_eq!(set.get_at(set.upper_bound(v)).ok(), expected, "upper_bound({})", v);
                }
                SetOp::First => prop_assert_eq!(set.first(), model.first(), "first()"),
                SetOp::Last => prop_assert_eq!(set.last(), model.last(), "last()"),
            }
            prop_assert_eq!(set.len(), model.len());
        }

        prop_assert!(set.iter().eq(model.iter()));
    }

    /// Walking positions from begin() to end() visits the same elements as iter(),
    /// and walking predecessors from end() visits them in reverse.
    #[test]
    fn position_walks_match_iter(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let set: TreeSet<i64> = values.iter().copied().collect();

        let mut forward = Vec::new();
        let mut pos = set.begin();
        while !pos.is_end() {
            forward.push(*set.get_at(pos).unwrap());
            pos = set.successor(pos).unwrap();
        }
        prop_assert!(forward.iter().eq(set.iter()));

        let mut backward = Vec::new();
        let mut pos = set.predecessor(set.end()).unwrap();
        while !pos.is_end() {
            backward.push(*set.get_at(pos).unwrap());
            pos = set.predecessor(pos).unwrap();
        }
        prop_assert!(backward.iter().eq(set.iter().rev()));
    }

    #[test]
    fn iter_size_and_double_ended(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let set: TreeSet<i64> = values.iter().copied().collect();
        let model: BTreeSet<i64> = values.iter().copied().collect();

        let mut iter = set.iter();
        let mut expected = model.iter();
        prop_assert_eq!(iter.len(), expected.len());
        loop {
            let (a, b) = (iter.next(), expected.next());
            prop_assert_eq!(a, b);
            let (c, d) = (iter.next_back(), expected.next_back());
            prop_assert_eq!(c, d);
            prop_assert_eq!(iter.len(), expected.len());
            if a.is_none() || c.is_none() {
                break;
            }
        }
    }

    #[test]
    fn equal_range_matches_btreeset(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE), probe in value_strategy()) {
        let set: TreeSet<i64> = values.iter().copied().collect();
        let model: BTreeSet<i64> = values.iter().copied().collect();

        let (lower, upper) = set.equal_range(&probe);
        let span: Vec<i64> = set.iter_between(lower, upper).unwrap().copied().collect();
        let expected: Vec<i64> = model.range(probe..=probe).copied().collect();
        prop_assert_eq!(span, expected);
    }

    #[test]
    fn merge_matches_btreeset(
        a in proptest::collection::vec(value_strategy(), 0..500),
        b in proptest::collection::vec(value_strategy(), 0..500),
    ) {
        let mut left: TreeSet<i64> = a.iter().copied().collect();
        let mut right: TreeSet<i64> = b.iter().copied().collect();
        left.merge(&mut right);

        let a: BTreeSet<i64> = a.into_iter().collect();
        let b: BTreeSet<i64> = b.into_iter().collect();
        let union: Vec<i64> = a.union(&b).copied().collect();
        let kept: Vec<i64> = a.intersection(&b).copied().collect();

        prop_assert_eq!(left.iter().copied().collect::<Vec<_>>(), union);
        prop_assert_eq!(right.iter().copied().collect::<Vec<_>>(), kept);
    }

    #[test]
    fn clone_produces_equal_set(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let set: TreeSet<i64> = values.iter().copied().collect();
        let copy = set.clone();
        prop_assert_eq!(&copy, &set);
        prop_assert_eq!(hash_of(&copy), hash_of(&set));
        prop_assert!(copy.get_at(set.begin()).is_err(), "positions do not cross collections");
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn iterates_in_sorted_order_and_erases_root() {
    let mut set = TreeSet::new();
    for v in [5, 3, 8, 1, 4, 7, 9] {
        set.insert(v);
    }
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 7, 8, 9]);

    set.erase(set.find(&5)).unwrap();
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 7, 8, 9]);
    assert_eq!(set.len(), 6);
}

#[test]
fn reversed_span_iterates_the_same_from_both_ends() {
    let set = TreeSet::from([1, 2, 3, 4, 5]);
    let (four, two) = (set.find(&4), set.find(&2));

    let forward: Vec<i32> = set.iter_between(four, two).unwrap().copied().collect();
    let mut backward: Vec<i32> = set.iter_between(four, two).unwrap().rev().copied().collect();
    backward.reverse();
    assert_eq!(forward, vec![4, 5]);
    assert_eq!(backward, forward);

    let mut span = set.iter_between(four, two).unwrap();
    let mut alternating = Vec::new();
    loop {
        match (span.next(), span.next_back()) {
            (None, None) => break,
            (a, b) => alternating.extend(a.into_iter().chain(b).copied()),
        }
    }
    assert_eq!(alternating, vec![4, 5]);
}

#[test]
fn erasing_a_node_with_two_children_stales_only_its_successor() {
    let mut set = TreeSet::from([5, 3, 8, 1, 4, 7, 9]);
    let (five, seven, eight, three) = (set.find(&5), set.find(&7), set.find(&8), set.find(&3));

    assert_eq!(set.erase(five), Ok(five));
    assert_eq!(set.get_at(five), Ok(&7));
    assert_eq!(set.get_at(seven), Err(Error::InvalidPosition));
    assert_eq!(set.get_at(eight), Ok(&8));
    assert_eq!(set.get_at(three), Ok(&3));

    // A leaf takes only its own position with it.
    let next = set.erase(set.find(&9)).unwrap();
    assert!(next.is_end());
    assert_eq!(set.get_at(eight), Ok(&8));
}

#[test]
fn duplicate_insert_returns_existing_position() {
    let mut set = TreeSet::from([10, 20]);
    let (first, inserted) = set.insert(15);
    assert!(inserted);
    let (second, inserted) = set.insert(15);
    assert!(!inserted);
    assert_eq!(first, second);
    assert_eq!(set.len(), 3);
}

#[test]
fn merge_leaves_collisions_behind() {
    let mut a = TreeSet::from([1, 2, 3]);
    let mut b = TreeSet::from([3, 4, 5]);
    a.merge(&mut b);
    assert_eq!(a.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert_eq!(b.into_iter().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn stepping_is_circular() {
    let set = TreeSet::from([1, 2, 3]);
    let end = set.end();
    assert_eq!(set.successor(end), Ok(set.begin()));
    assert_eq!(set.get_at(set.predecessor(end).unwrap()), Ok(&3));
    assert_eq!(set.predecessor(set.begin()), Ok(end));
    assert_eq!(set.get_at(end), Err(Error::InvalidPosition));

    let empty: TreeSet<i32> = TreeSet::new();
    assert_eq!(empty.begin(), empty.end());
    assert_eq!(empty.successor(empty.end()), Ok(empty.end()));
    assert_eq!(empty.first(), None);
}

#[test]
fn swap_moves_positions_with_contents() {
    let mut a = TreeSet::from([1, 2, 3]);
    let mut b = TreeSet::from([9]);
    let two = a.find(&2);
    a.swap(&mut b);

    assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![9]);
    assert_eq!(b.get_at(two), Ok(&2));
    assert_eq!(a.get_at(two), Err(Error::InvalidPosition));
}

#[test]
fn clear_invalidates_positions() {
    let mut set = TreeSet::from(["a", "b"]);
    let a = set.find("a");
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.get_at(a), Err(Error::InvalidPosition));
    set.insert("a");
    assert_eq!(set.get_at(a), Err(Error::InvalidPosition));
    assert_eq!(set.get_at(set.find("a")), Ok(&"a"));
}

#[test]
fn sorted_input_builds_a_deep_tree_without_overflow() {
    let set: TreeSet<u32> = (0..10_000).collect();
    assert_eq!(set.len(), 10_000);
    assert_eq!(set.last(), Some(&9_999));
    let copy = set.clone();
    drop(set);
    assert_eq!(copy.iter().rev().next(), Some(&9_999));
}

#[test]
fn max_size_and_capacity() {
    let set: TreeSet<u8> = TreeSet::with_capacity(16);
    assert!(set.capacity() >= 16);
    assert!(set.max_size() >= usize::from(u16::MAX));
}

#[test]
fn debug_and_extend() {
    let mut set = TreeSet::new();
    set.extend([3, 1]);
    set.extend(&[2, 3]);
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    assert_eq!(format!("{:?}", set.iter()), "[1, 2, 3]");
}
