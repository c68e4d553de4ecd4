use mle_util::{PQ, PQElement, heap_sort};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(i32),
    Remove,
    DestroyAt(usize),
    Change(usize, i32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-1000i32..1000).prop_map(Op::Insert),
        1 => Just(Op::Remove),
        1 => any::<usize>().prop_map(Op::DestroyAt),
        1 => (any::<usize>(), -1000i32..1000).prop_map(|(k, p)| Op::Change(k, p)),
    ]
}

proptest! {
    #[test]
    fn heap_order_survives_any_interleaving(ops in prop::collection::vec(op(), 0..200)) {
        let mut pq: PQ<u32> = PQ::new();
        let mut model: Vec<i32> = Vec::new();

        for (seq, op) in ops.into_iter().enumerate() {
            match op {
                Op::Insert(key) => {
                    pq.insert(PQElement::new(key, seq as u32));
                    model.push(key);
                }
                Op::Remove => {
                    let removed = pq.remove().map(|e| e.key);
                    model.sort_unstable();
                    prop_assert_eq!(removed, model.pop());
                }
                Op::DestroyAt(raw) => {
                    if !pq.is_empty() {
                        let before = pq.len();
                        let removed = pq.destroy_item(raw % before);
                        prop_assert!(removed.is_some());
                        if let Some(item) = removed {
                            let pos = model.iter().position(|k| *k == item.key);
                            prop_assert!(pos.is_some());
                            if let Some(pos) = pos {
                                model.swap_remove(pos);
                            }
                        }
                        prop_assert_eq!(pq.len(), before - 1);
                    }
                }
                Op::Change(raw, priority) => {
                    if !pq.is_empty() {
                        let k = raw % pq.len();
                        let old = pq.peek(k).map(|e| e.key);
                        prop_assert!(pq.change_item(k, priority));
                        if let Some(pos) = old.and_then(|o| model.iter().position(|m| *m == o)) {
                            model[pos] = priority;
                        }
                    }
                }
            }
            prop_assert!(pq.is_heap_ordered());
            prop_assert_eq!(pq.len(), model.len());
        }
    }

    #[test]
    fn heap_sort_matches_std_sort(mut values in prop::collection::vec(any::<i32>(), 0..300)) {
        let sorted = heap_sort(values.clone());
        values.sort();
        prop_assert_eq!(sorted, values);
    }
}

#[test]
fn extract_max_then_heapsort_on_fixed_multiset() {
    let input = [3, 2, 1, 5, 4, 6, 8, 7, 8];

    let mut pq: PQ<()> = input.iter().map(|k| PQElement::new(*k, ())).collect();
    let drained: Vec<i32> = std::iter::from_fn(|| pq.remove()).map(|e| e.key).collect();
    assert_eq!(drained, vec![8, 8, 7, 6, 5, 4, 3, 2, 1]);

    assert_eq!(heap_sort(input), vec![1, 2, 3, 4, 5, 6, 7, 8, 8]);
}
