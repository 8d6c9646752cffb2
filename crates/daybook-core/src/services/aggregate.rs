//! Category / type aggregation
//!
//! Folds records into one value per distinct key. Keys keep the order in
//! which they were first seen, and keys no record produced never appear.

use std::hash::Hash;

use indexmap::IndexMap;

/// Fold `records` into a key -> value mapping.
///
/// Each record contributes `value_of(record)` to the entry for
/// `key_of(record)`, starting from `identity`. `combine` should be
/// associative and commutative (sums, counts) for the result to be
/// independent of input order.
pub fn aggregate_by_key<I, R, K, V, FK, FV, FC>(
    records: I,
    key_of: FK,
    value_of: FV,
    combine: FC,
    identity: V,
) -> IndexMap<K, V>
where
    I: IntoIterator<Item = R>,
    K: Hash + Eq,
    V: Clone,
    FK: Fn(&R) -> K,
    FV: Fn(&R) -> V,
    FC: Fn(V, V) -> V,
{
    let mut totals: IndexMap<K, V> = IndexMap::new();
    for record in records {
        let value = value_of(&record);
        let slot = totals.entry(key_of(&record)).or_insert_with(|| identity.clone());
        let current = std::mem::replace(slot, identity.clone());
        *slot = combine(current, value);
    }
    totals
}

/// Number of records per key
pub fn count_by_key<I, R, K, FK>(records: I, key_of: FK) -> IndexMap<K, usize>
where
    I: IntoIterator<Item = R>,
    K: Hash + Eq,
    FK: Fn(&R) -> K,
{
    aggregate_by_key(records, key_of, |_| 1usize, |a, b| a + b, 0)
}

/// Sum of a numeric field per key
pub fn sum_by_key<I, R, K, FK, FV>(records: I, key_of: FK, value_of: FV) -> IndexMap<K, f64>
where
    I: IntoIterator<Item = R>,
    K: Hash + Eq,
    FK: Fn(&R) -> K,
    FV: Fn(&R) -> f64,
{
    aggregate_by_key(records, key_of, value_of, |a, b| a + b, 0.0)
}
