//! Property tests for the list invariants and the splice merge: sorted
//! output, stability, cursor stability and allocation-freedom.

use node_list::{GhostToken, List, NodeKey, NodePool};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

fn sorted_values() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-999i32..1000, 0..40).prop_map(|mut values| {
        values.sort();
        values
    })
}

/// Check the links of every node of `list`, both sentinels included: the
/// node after `x` links back to `x`, and the node before `x` links forward
/// to it. The chain holds exactly `len()` content nodes between the head
/// and the tail.
fn check_links<'id, T>(
    list: &List<'_, 'id, T>,
    token: &GhostToken<'id>,
) -> Result<(), TestCaseError> {
    let graph = list.graph(token);
    let nodes: Vec<_> = graph.nodes().take(list.len() + 3).collect();
    prop_assert_eq!(nodes.len(), list.len() + 2);
    prop_assert_eq!(nodes[0].key(), graph.head());
    prop_assert_eq!(nodes[nodes.len() - 1].key(), graph.tail());
    prop_assert!(nodes[1..nodes.len() - 1].iter().all(|node| !node.is_sentinel()));

    let live = |key: NodeKey| {
        graph
            .resolve(key)
            .ok_or_else(|| TestCaseError::fail(format!("link to destroyed node {}", key)))
    };
    for node in &nodes {
        prop_assert_eq!(live(node.next())?.prev(), node.key());
        prop_assert_eq!(live(node.prev())?.next(), node.key());
    }
    prop_assert_eq!(live(graph.tail())?.next(), graph.head());
    Ok(())
}

proptest! {
    /// The merged list is the stable sort of the destination followed by the
    /// source: equal keys keep the destination elements first.
    #[test]
    fn prop_merge_is_stable_sort(a in sorted_values(), b in sorted_values()) {
        GhostToken::new(|mut token| -> Result<(), TestCaseError> {
            let pool = NodePool::new();
            let tagged_a: Vec<_> = a.iter().enumerate().map(|(i, &v)| (v, 'a', i)).collect();
            let tagged_b: Vec<_> = b.iter().enumerate().map(|(i, &v)| (v, 'b', i)).collect();
            let mut list_a = List::from_iter_in(&pool, tagged_a.clone(), &mut token).unwrap();
            let mut list_b = List::from_iter_in(&pool, tagged_b.clone(), &mut token).unwrap();

            list_a.merge_by(&mut list_b, |l, r| l.0.cmp(&r.0), &mut token).unwrap();

            let mut expected = tagged_a;
            expected.extend(tagged_b);
            expected.sort_by_key(|t| t.0);
            prop_assert_eq!(list_a.to_vec(&token), expected);
            prop_assert!(list_b.is_empty());
            check_links(&list_a, &token)?;
            check_links(&list_b, &token)?;
            Ok(())
        })?;
    }

    /// Merging allocates and frees nothing, and both lists stay usable.
    #[test]
    fn prop_merge_allocates_nothing(a in sorted_values(), b in sorted_values()) {
        GhostToken::new(|mut token| -> Result<(), TestCaseError> {
            let pool = NodePool::new();
            let mut list_a = List::from_iter_in(&pool, a.clone(), &mut token).unwrap();
            let mut list_b = List::from_iter_in(&pool, b.clone(), &mut token).unwrap();
            let live = pool.live_nodes(&token);
            prop_assert_eq!(live, a.len() + b.len() + 4);

            list_a.merge(&mut list_b, &mut token).unwrap();
            check_links(&list_a, &token)?;
            check_links(&list_b, &token)?;
            prop_assert_eq!(pool.live_nodes(&token), live);
            prop_assert_eq!(list_a.len(), a.len() + b.len());
            prop_assert!(list_a.is_sorted(&token));

            list_b.push_back(1, &mut token).unwrap();
            prop_assert_eq!(list_b.to_vec(&token), vec![1]);
            check_links(&list_b, &token)?;
            list_a.dispose(&mut token);
            list_b.dispose(&mut token);
            prop_assert_eq!(pool.live_nodes(&token), 0);
            Ok(())
        })?;
    }

    /// Every cursor taken before the merge still points to its element, and
    /// walking the merged list visits exactly those nodes.
    #[test]
    fn prop_merge_keeps_cursors(a in sorted_values(), b in sorted_values()) {
        GhostToken::new(|mut token| -> Result<(), TestCaseError> {
            let pool = NodePool::new();
            let mut list_a = List::from_iter_in(&pool, a.clone(), &mut token).unwrap();
            let mut list_b = List::from_iter_in(&pool, b.clone(), &mut token).unwrap();

            let mut cursors = vec![];
            for list in [&list_a, &list_b] {
                let mut cursor = list.cursor_front(&token);
                while cursor.get(&token).is_ok() {
                    cursors.push((*cursor.get(&token).unwrap(), cursor));
                    cursor.move_next(&token).unwrap();
                }
            }

            list_a.merge(&mut list_b, &mut token).unwrap();
            check_links(&list_a, &token)?;
            check_links(&list_b, &token)?;

            for (value, cursor) in &cursors {
                prop_assert_eq!(cursor.get(&token), Ok(value));
            }
            // Stable sort by value gives the node order of the merged list.
            cursors.sort_by_key(|(value, _)| *value);
            let mut walk = list_a.cursor_front(&token);
            for (_, cursor) in &cursors {
                prop_assert_eq!(walk, *cursor);
                walk.move_next(&token).unwrap();
            }
            prop_assert_eq!(walk, list_a.cursor_end());
            Ok(())
        })?;
    }

    /// Merging an empty list changes nothing.
    #[test]
    fn prop_merge_empty_is_noop(a in sorted_values()) {
        GhostToken::new(|mut token| -> Result<(), TestCaseError> {
            let pool = NodePool::new();
            let mut list_a = List::from_iter_in(&pool, a.clone(), &mut token).unwrap();
            let mut empty = List::new_in(&pool, &mut token).unwrap();
            let front = list_a.cursor_front(&token);

            list_a.merge(&mut empty, &mut token).unwrap();
            check_links(&list_a, &token)?;
            check_links(&empty, &token)?;
            prop_assert_eq!(list_a.to_vec(&token), a.clone());
            prop_assert_eq!(list_a.cursor_front(&token), front);

            empty.merge(&mut list_a, &mut token).unwrap();
            check_links(&empty, &token)?;
            check_links(&list_a, &token)?;
            prop_assert_eq!(empty.to_vec(&token), a);
            prop_assert!(list_a.is_empty());
            Ok(())
        })?;
    }

    /// Random inserts and erasures through cursors behave like the same
    /// edits on a `Vec`.
    #[test]
    fn prop_edits_match_vec(
        ops in prop::collection::vec(
            (any::<bool>(), any::<prop::sample::Index>(), any::<i32>()),
            0..60,
        )
    ) {
        GhostToken::new(|mut token| -> Result<(), TestCaseError> {
            let pool = NodePool::new();
            let mut list = List::new_in(&pool, &mut token).unwrap();
            let mut model: Vec<i32> = vec![];
            for (insert, index, value) in ops {
                if insert || model.is_empty() {
                    let at = index.index(model.len() + 1);
                    let mut position = list.cursor_front_mut(&token);
                    for _ in 0..at {
                        position.move_next(&token).unwrap();
                    }
                    let inserted = list.insert(position, value, &mut token).unwrap();
                    prop_assert_eq!(inserted.get(&token), Ok(&value));
                    model.insert(at, value);
                } else {
                    let at = index.index(model.len());
                    let mut position = list.cursor_front_mut(&token);
                    for _ in 0..at {
                        position.move_next(&token).unwrap();
                    }
                    let next = list.erase(position, &mut token).unwrap();
                    prop_assert_eq!(next.get(&token).ok(), model.get(at + 1));
                    model.remove(at);
                }
                check_links(&list, &token)?;
            }
            prop_assert_eq!(list.to_vec(&token), model.clone());
            prop_assert_eq!(pool.live_nodes(&token), model.len() + 2);
            Ok(())
        })?;
    }
}
