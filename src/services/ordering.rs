//! Ordered-collection reorder engine.
//!
//! Every ordered collection (songs in a playlist) keeps a dense 1-based
//! `order_key` per sibling: for N items the keys are exactly {1..N}. The
//! functions here are pure; persisting the rewritten keys in one transaction
//! is the caller's job, and that transaction is also what serializes
//! concurrent reorders against the same parent.

use crate::errors::AppError;

/// An item carrying a dense 1-based position among its siblings.
pub trait Ordered {
    fn item_id(&self) -> i64;
    fn order_key(&self) -> i32;
    fn set_order_key(&mut self, key: i32);
}

impl Ordered for crate::models::catalog::Song {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn order_key(&self) -> i32 {
        self.order_key
    }

    fn set_order_key(&mut self, key: i32) {
        self.order_key = key;
    }
}

/// Order key for a newly appended item: `max(existing) + 1`, or 1 when the
/// collection is empty. Tolerates gaps left by legacy data.
pub fn next_order_key<T: Ordered>(items: &[T]) -> i32 {
    items.iter().map(Ordered::order_key).max().unwrap_or(0) + 1
}

/// Move one item to a requested 1-based position and rewrite all keys densely.
///
/// The requested position is clamped into `[1, N]`; asking for a position past
/// the end appends. Relative order of the remaining items is preserved, and a
/// move to the item's current position returns an identical sequence. Keys in
/// the result are exactly {1..N} regardless of gaps or duplicates on input.
pub fn reorder<T: Ordered + Clone>(
    items: &[T],
    moved_id: i64,
    requested_position: i32,
) -> Result<Vec<T>, AppError> {
    let mut sequence: Vec<T> = items.to_vec();
    sequence.sort_by_key(Ordered::order_key);

    let current_index = sequence
        .iter()
        .position(|item| item.item_id() == moved_id)
        .ok_or_else(|| AppError::NotFound(format!("Item {moved_id} not found in collection")))?;

    let moved = sequence.remove(current_index);
    let insert_index = (requested_position.max(1) as usize - 1).min(sequence.len());
    sequence.insert(insert_index, moved);

    for (index, item) in sequence.iter_mut().enumerate() {
        item.set_order_key(index as i32 + 1);
    }
    Ok(sequence)
}

/// Rewrite keys densely without moving anything, preserving relative order.
/// Used after a deletion so the {1..N} invariant holds unconditionally.
pub fn densify<T: Ordered + Clone>(items: &[T]) -> Vec<T> {
    let mut sequence: Vec<T> = items.to_vec();
    sequence.sort_by_key(Ordered::order_key);
    for (index, item) in sequence.iter_mut().enumerate() {
        item.set_order_key(index as i32 + 1);
    }
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        key: i32,
    }

    impl Ordered for Item {
        fn item_id(&self) -> i64 {
            self.id
        }

        fn order_key(&self) -> i32 {
            self.key
        }

        fn set_order_key(&mut self, key: i32) {
            self.key = key;
        }
    }

    fn items(pairs: &[(i64, i32)]) -> Vec<Item> {
        pairs.iter().map(|&(id, key)| Item { id, key }).collect()
    }

    fn keys_of(sequence: &[Item]) -> Vec<(i64, i32)> {
        sequence.iter().map(|i| (i.id, i.key)).collect()
    }

    #[test]
    fn move_to_front() {
        let input = items(&[(10, 1), (20, 2), (30, 3)]);
        let result = reorder(&input, 30, 1).unwrap();
        assert_eq!(keys_of(&result), vec![(30, 1), (10, 2), (20, 3)]);
    }

    #[test]
    fn move_to_middle() {
        let input = items(&[(10, 1), (20, 2), (30, 3), (40, 4)]);
        let result = reorder(&input, 10, 3).unwrap();
        assert_eq!(keys_of(&result), vec![(20, 1), (30, 2), (10, 3), (40, 4)]);
    }

    #[test]
    fn huge_position_clamps_to_end() {
        let input = items(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        let result = reorder(&input, 1, 1_000_000).unwrap();
        assert_eq!(result.last().unwrap().id, 1);
        assert_eq!(result.last().unwrap().key, 5);
    }

    #[test]
    fn position_below_one_clamps_to_front() {
        let input = items(&[(1, 1), (2, 2), (3, 3)]);
        let result = reorder(&input, 3, -7).unwrap();
        assert_eq!(keys_of(&result), vec![(3, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn noop_move_is_idempotent() {
        let input = items(&[(10, 1), (20, 2), (30, 3)]);
        let result = reorder(&input, 20, 2).unwrap();
        assert_eq!(keys_of(&result), keys_of(&input));
    }

    #[test]
    fn density_restored_from_gapped_keys() {
        let input = items(&[(10, 2), (20, 5), (30, 9)]);
        let result = reorder(&input, 20, 3).unwrap();
        assert_eq!(keys_of(&result), vec![(10, 1), (30, 2), (20, 3)]);
    }

    #[test]
    fn density_invariant_holds_for_all_positions() {
        let input = items(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6)]);
        for id in 1..=6 {
            for position in -1..=8 {
                let result = reorder(&input, id, position).unwrap();
                let mut keys: Vec<i32> = result.iter().map(|i| i.key).collect();
                keys.sort_unstable();
                assert_eq!(keys, vec![1, 2, 3, 4, 5, 6], "id={id} pos={position}");
            }
        }
    }

    #[test]
    fn unknown_item_is_not_found() {
        let input = items(&[(1, 1), (2, 2)]);
        let err = reorder(&input, 99, 1).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn single_item_collection() {
        let input = items(&[(7, 1)]);
        let result = reorder(&input, 7, 42).unwrap();
        assert_eq!(keys_of(&result), vec![(7, 1)]);
    }

    #[test]
    fn next_key_appends_after_max() {
        assert_eq!(next_order_key(&items(&[])), 1);
        assert_eq!(next_order_key(&items(&[(1, 1), (2, 2)])), 3);
        // Gaps from legacy data still append after the maximum.
        assert_eq!(next_order_key(&items(&[(1, 2), (2, 7)])), 8);
    }

    #[test]
    fn densify_closes_gaps_after_delete() {
        let input = items(&[(10, 1), (30, 3), (40, 4)]);
        let result = densify(&input);
        assert_eq!(keys_of(&result), vec![(10, 1), (30, 2), (40, 3)]);
    }

    #[test]
    fn densify_on_dense_input_is_identity() {
        let input = items(&[(10, 1), (20, 2)]);
        assert_eq!(keys_of(&densify(&input)), keys_of(&input));
    }
}
