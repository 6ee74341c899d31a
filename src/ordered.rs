//! Keeping vectors sorted in descending key order as items arrive.
//!
//! Every view in the index (the global list, each tag, each month bucket
//! and the bucket sequence itself) goes through [`insert_sorted_desc`], so
//! they all share one ordering and one tie rule: an item whose key equals
//! existing keys lands after them, preserving arrival order.

/// Insert `item` into `items`, which must already be sorted by `key`
/// descending. Returns the position the item was inserted at.
///
/// The position is the first element whose key is strictly less than the
/// item's key, or the end of the vector if there is none.
pub fn insert_sorted_desc<T, K, F>(items: &mut Vec<T>, item: T, key: F) -> usize
where
    K: Ord + ?Sized,
    F: Fn(&T) -> &K,
{
    let pos = {
        let new_key = key(&item);
        items.partition_point(|existing| key(existing) >= new_key)
    };
    items.insert(pos, item);
    pos
}

/// Whether `items` is sorted by `key` descending.
#[cfg(test)]
pub(crate) fn is_sorted_desc<T, K, F>(items: &[T], key: F) -> bool
where
    K: Ord + ?Sized,
    F: Fn(&T) -> &K,
{
    items.windows(2).all(|pair| key(&pair[0]) >= key(&pair[1]))
}
