use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Brute-force answer for `find_unique` over a sorted map: an exact key wins,
/// an unstored empty prefix is ambiguous, otherwise the keys extending
/// `prefix` decide.
fn oracle_unique(m: &BTreeMap<String, u64>, prefix: &str) -> Result<u64, PrefixError> {
    if let Some(v) = m.get(prefix) {
        return Ok(*v);
    }
    if prefix.is_empty() {
        return Err(PrefixError::Ambiguous);
    }
    let mut extending = m
        .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(|(k, _)| k.starts_with(prefix));
    match (extending.next(), extending.next()) {
        (None, _) => Err(PrefixError::NotFound),
        (Some((_, v)), None) => Ok(*v),
        _ => Err(PrefixError::Ambiguous),
    }
}

fn oracle_all(m: &BTreeMap<String, u64>, prefix: &str) -> Vec<(String, u64)> {
    if let Some(v) = m.get(prefix) {
        return vec![(prefix.to_string(), *v)];
    }
    m.range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k.clone(), *v))
        .collect()
}

fn all_of(index: &PrefixIndex<u64>, prefix: &str) -> Vec<(String, u64)> {
    index
        .find_all_key_values(prefix)
        .into_iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

/// Prefixes of `key` at every char boundary, `""` and `key` included.
fn prefixes(key: &str) -> impl Iterator<Item = &str> {
    key.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(key.len()))
        .map(move |i| &key[..i])
}

fn assert_valid<V>(index: &PrefixIndex<V>) {
    let issues = index.verify_integrity();
    assert!(issues.is_empty(), "integrity issues: {issues:#?}");
}

// A small alphabet forces shared prefixes, splits and keys nested in keys; the
// multi-byte chars exercise splitting on char boundaries.
fn key_strategy() -> impl Strategy<Value = String> + Clone {
    prop::collection::vec(
        prop::sample::select(vec!['a', 'b', 'c', '-', '\u{e9}', '\u{e8}', '\u{1f600}']),
        0..=8,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn entries_strategy() -> impl Strategy<Value = Vec<(String, u64)>> {
    prop::collection::vec((key_strategy(), any::<u64>()), 0..=200)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(
        entries in entries_strategy(),
        queries in prop::collection::vec(key_strategy(), 0..=50),
    ) {
        let mut t: PrefixIndex<u64> = PrefixIndex::new();
        let mut m: BTreeMap<String, u64> = BTreeMap::new();

        for (key, value) in &entries {
            prop_assert_eq!(t.insert(key, *value), m.insert(key.clone(), *value));
            prop_assert_eq!(t.len(), m.len());
        }
        assert_valid(&t);

        let probes = queries
            .iter()
            .map(String::as_str)
            .chain(entries.iter().flat_map(|(k, _)| prefixes(k)));
        for prefix in probes {
            prop_assert_eq!(
                t.find_unique(prefix).copied(),
                oracle_unique(&m, prefix),
                "prefix {:?}",
                prefix
            );
            prop_assert_eq!(all_of(&t, prefix), oracle_all(&m, prefix), "prefix {:?}", prefix);
            prop_assert_eq!(t.get(prefix).copied(), m.get(prefix).copied());
        }

        let got: Vec<(String, u64)> = t.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let expected: Vec<(String, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_insertion_order_independent(
        keys in prop::collection::btree_set(key_strategy(), 0..=60),
        seed in any::<u64>(),
    ) {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let sorted: Vec<(String, u64)> = keys.iter().cloned().zip(0..).collect();
        let mut shuffled = sorted.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let a: PrefixIndex<u64> = sorted.iter().map(|(k, v)| (k, *v)).collect();
        let b: PrefixIndex<u64> = shuffled.iter().map(|(k, v)| (k, *v)).collect();
        assert_valid(&a);
        assert_valid(&b);

        // Same set of keys, same shape.
        prop_assert_eq!(a.dump().to_string(), b.dump().to_string());
        for (key, _) in &sorted {
            for prefix in prefixes(key) {
                prop_assert_eq!(a.find_key_value(prefix), b.find_key_value(prefix));
                prop_assert_eq!(a.find_all_keys(prefix), b.find_all_keys(prefix));
            }
        }
    }

    #[test]
    fn prop_binary_search_matches_linear_scan(
        entries in entries_strategy(),
        queries in prop::collection::vec(key_strategy(), 0..=50),
    ) {
        let mut linear = PrefixIndex::with_config(Config { binary_search_threshold: usize::MAX });
        let mut binary = PrefixIndex::with_config(Config { binary_search_threshold: 0 });
        linear.extend(entries.iter().map(|(k, v)| (k, *v)));
        binary.extend(entries.iter().map(|(k, v)| (k, *v)));

        let probes = queries
            .iter()
            .map(String::as_str)
            .chain(entries.iter().flat_map(|(k, _)| prefixes(k)));
        for prefix in probes {
            prop_assert_eq!(linear.resolve(prefix), binary.resolve(prefix));
            prop_assert_eq!(linear.find_key_value(prefix), binary.find_key_value(prefix));
            prop_assert_eq!(linear.find_all_keys(prefix), binary.find_all_keys(prefix));
        }
    }

    #[test]
    fn prop_monotone_disambiguation(keys in prop::collection::btree_set(key_strategy(), 1..=60)) {
        let index: PrefixIndex<u64> = keys.iter().zip(0..).collect();

        for key in &keys {
            // A unique match on a prefix that is not itself stored pins down
            // the only key extending it.
            let mut pinned: Option<&str> = None;
            for prefix in prefixes(key) {
                let outcome = index.resolve(prefix);
                prop_assert_ne!(
                    outcome,
                    Outcome::NotFound,
                    "{:?} is a prefix of {:?}",
                    prefix,
                    key
                );
                if let Some(found) = pinned {
                    prop_assert_eq!(index.find_key(prefix), Ok(found));
                } else if outcome == Outcome::Unique && !index.contains_key(prefix) {
                    pinned = index.find_key(prefix).ok();
                }
            }
            prop_assert_eq!(index.find_key(key), Ok(key.as_str()));
        }
    }

    #[test]
    fn prop_find_all_sorted_and_distinct(
        keys in prop::collection::vec(key_strategy(), 0..=100),
        prefix in key_strategy(),
    ) {
        let index: PrefixIndex<()> = keys.iter().map(|k| (k, ())).collect();
        let all = index.find_all_keys(&prefix);
        prop_assert!(all.windows(2).all(|w| w[0] < w[1]), "{:?}", all);
        prop_assert!(all.iter().all(|k| k.starts_with(prefix.as_str())));
    }
}

#[test]
fn round_trip_single_key() {
    for key in ["", "a", "apple", "\u{1f600}\u{1f601}", "-dog"] {
        let mut t = PrefixIndex::new();
        t.insert(key, 17u64);
        assert_eq!(t.find_unique(key), Ok(&17));
        let expected = if key.is_empty() { Ok(&17) } else { Err(PrefixError::Ambiguous) };
        assert_eq!(t.find_unique(""), expected);
        assert_eq!(t.find_all_values(""), vec![&17]);
        assert_valid(&t);
    }
}

#[test]
fn randomized_against_oracle() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ALPHABET: &[u8] = b"abcdef";

    let mut rng = StdRng::seed_from_u64(7);
    let mut t: PrefixIndex<u64> = PrefixIndex::new();
    let mut m: BTreeMap<String, u64> = BTreeMap::new();

    for _ in 0..20_000 {
        let len = rng.gen_range(0..10);
        let key: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();

        if rng.gen_bool(0.5) {
            let v: u64 = rng.gen();
            assert_eq!(t.insert(&key, v), m.insert(key, v));
        } else {
            assert_eq!(t.find_unique(&key).copied(), oracle_unique(&m, &key), "prefix {key:?}");
        }
    }

    assert_eq!(t.len(), m.len());
    assert_valid(&t);
}
