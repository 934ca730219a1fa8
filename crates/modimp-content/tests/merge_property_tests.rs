//! Property tests for the merge engine

use indexmap::IndexMap;
use modimp_content::{Scalar, Tree, merge};
use proptest::prelude::*;

fn arb_scalar() -> impl Strategy<Value = Tree> {
    prop_oneof![
        Just(Tree::Scalar(Scalar::Null)),
        any::<bool>().prop_map(Tree::from),
        any::<i64>().prop_map(Tree::from),
        "[a-z]{0,6}".prop_map(Tree::from),
    ]
}

/// Finalized trees without reserved marker keys or values.
fn arb_tree() -> impl Strategy<Value = Tree> {
    arb_scalar().prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Tree::Sequence),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..5)
                .prop_map(|entries| Tree::Map(entries.into_iter().collect::<IndexMap<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn absent_patch_is_identity(base in arb_tree()) {
        prop_assert_eq!(merge(base.clone(), Tree::Absent), base);
    }

    #[test]
    fn merged_output_never_contains_absent(base in arb_tree(), patch in arb_tree()) {
        prop_assert!(!merge(base, patch).contains_absent());
    }

    #[test]
    fn merging_onto_itself_is_stable(base in arb_tree()) {
        prop_assert_eq!(merge(base.clone(), base.clone()), base);
    }

    #[test]
    fn append_keeps_base_prefix(
        base in prop::collection::vec(arb_scalar(), 0..6),
        extra in prop::collection::vec(arb_scalar(), 0..6),
    ) {
        let mut patch = vec![Tree::from("_append")];
        patch.extend(extra.iter().cloned());
        let merged = merge(Tree::Sequence(base.clone()), Tree::Sequence(patch));

        let mut expected = base;
        expected.extend(extra);
        prop_assert_eq!(merged, Tree::Sequence(expected));
    }
}
