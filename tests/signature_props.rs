// Run:
//   cargo test --test signature_props
//
// Property and edge-case coverage for signature construction and the
// two-pointer subset test.

use std::collections::HashSet;

use proptest::prelude::*;

use govsim::Signature;

proptest! {
    /// The subset test agrees with a set-based reference implementation for
    /// arbitrary sorted, duplicate-free sequences.
    #[test]
    fn subset_test_matches_set_reference(
        a in proptest::collection::vec(0u32..200, 0..48),
        q in proptest::collection::vec(0u32..200, 0..48),
    ) {
        let arch = Signature::from_ids(a);
        let query = Signature::from_ids(q);

        let arch_set: HashSet<u32> = arch.ids().iter().copied().collect();
        let expected = query.ids().iter().all(|id| arch_set.contains(id));

        prop_assert_eq!(arch.has_components(&query), expected);
    }

    /// Construction is order-independent: any permutation of the input ids
    /// yields an identical signature.
    #[test]
    fn construction_is_order_independent(ids in proptest::collection::vec(0u32..200, 0..48)) {
        let canonical = Signature::from_ids(ids.clone());

        let mut reversed = ids.clone();
        reversed.reverse();
        prop_assert_eq!(&Signature::from_ids(reversed), &canonical);

        let mut rotated = ids;
        if !rotated.is_empty() {
            let pivot = rotated.len() / 2;
            rotated.rotate_left(pivot);
        }
        prop_assert_eq!(&Signature::from_ids(rotated), &canonical);
    }

    /// A signature always contains every id it was built from.
    #[test]
    fn contains_every_constituent(ids in proptest::collection::vec(0u32..200, 0..48)) {
        let signature = Signature::from_ids(ids.clone());
        for id in ids {
            prop_assert!(signature.contains(id));
        }
    }
}

#[test]
fn empty_query_is_subset_of_anything() {
    let empty = Signature::default();
    let arch = Signature::from_ids(vec![3, 1, 2]);

    assert!(arch.has_components(&empty));
    assert!(empty.has_components(&empty));
}

#[test]
fn nothing_but_the_empty_query_matches_an_empty_signature() {
    let empty = Signature::default();
    let query = Signature::from_ids(vec![0]);

    assert!(!empty.has_components(&query));
}

#[test]
fn exact_match_and_strict_superset_succeed() {
    let arch = Signature::from_ids(vec![0, 2, 5, 9]);

    assert!(arch.has_components(&Signature::from_ids(vec![0, 2, 5, 9])));
    assert!(arch.has_components(&Signature::from_ids(vec![2, 9])));
    assert!(arch.has_components(&Signature::from_ids(vec![0])));
}

#[test]
fn missing_or_interleaved_ids_fail() {
    let arch = Signature::from_ids(vec![0, 2, 5, 9]);

    // One absent id anywhere in the query fails the scan.
    assert!(!arch.has_components(&Signature::from_ids(vec![1])));
    assert!(!arch.has_components(&Signature::from_ids(vec![0, 3])));
    assert!(!arch.has_components(&Signature::from_ids(vec![2, 5, 10])));

    // A query longer than the archetype can never succeed.
    assert!(!arch.has_components(&Signature::from_ids(vec![0, 1, 2, 5, 9])));
}

#[test]
fn normalization_sorts_and_dedups() {
    let signature = Signature::from_ids(vec![7, 3, 7, 1, 3]);

    assert_eq!(signature.ids(), &[1, 3, 7]);
    assert_eq!(signature.len(), 3);
    assert_eq!(signature.to_string(), "[1, 3, 7]");
}
