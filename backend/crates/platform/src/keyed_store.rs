//! Keyed In-Memory Store
//!
//! Concurrent map of entities keyed by UUID, with point lookups and
//! cursor-paginated range scans over a secondary partition key.
//!
//! Writes to a single key are atomic with respect to reads of that key.
//! Scans are not linearizable with concurrent writes: each page sees
//! whatever the shards hold while they are visited.

use dashmap::DashMap;
use uuid::Uuid;

use crate::pagination::{Cursor, Page, normalize_limit};

/// An entity that can live in a [`KeyedStore`]
pub trait Keyed: Clone + Send + Sync + 'static {
    /// Unique identity
    fn key(&self) -> Uuid;

    /// Secondary key used to group entities for listing (e.g. owning user id)
    fn partition(&self) -> &str;

    /// Primary ordering timestamp, in ticks
    fn ordering_ticks(&self) -> i64;

    /// Position of this entity in listing order
    fn position(&self) -> Cursor {
        Cursor::new(self.ordering_ticks(), self.key())
    }
}

/// Sharded concurrent store
#[derive(Debug)]
pub struct KeyedStore<T: Keyed> {
    entries: DashMap<Uuid, T>,
}

impl<T: Keyed> Default for KeyedStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> KeyedStore<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace by key, returning the replaced entity
    pub fn upsert(&self, item: T) -> Option<T> {
        self.entries.insert(item.key(), item)
    }

    pub fn get(&self, key: &Uuid) -> Option<T> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// First entity matching `predicate`, in no particular order
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.entries
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    /// Matching entity that comes first in listing order (newest)
    pub fn find_latest(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.entries
            .iter()
            .filter(|entry| predicate(entry.value()))
            .max_by_key(|entry| {
                let item = entry.value();
                (item.ordering_ticks(), Keyed::key(item))
            })
            .map(|entry| entry.value().clone())
    }

    /// One page of a partition, newest first
    ///
    /// Entities are ordered by `(ordering_ticks, key)` descending. With a
    /// cursor, only entities strictly past it are returned, so items inserted
    /// ahead of an already-returned position are never repeated.
    pub fn page(&self, partition: &str, limit: i64, cursor: Option<&Cursor>) -> Page<T> {
        let limit = normalize_limit(limit);

        let mut candidates: Vec<T> = self
            .entries
            .iter()
            .filter(|entry| {
                let item = entry.value();
                item.partition() == partition
                    && cursor.is_none_or(|c| c.is_past(item.ordering_ticks(), &Keyed::key(item)))
            })
            .map(|entry| entry.value().clone())
            .collect();

        candidates.sort_unstable_by(|a, b| {
            b.ordering_ticks()
                .cmp(&a.ordering_ticks())
                .then_with(|| b.key().cmp(&a.key()))
        });
        candidates.truncate(limit + 1);

        Page::from_candidates(candidates, limit, Keyed::position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        owner: String,
        ticks: i64,
    }

    impl Keyed for Note {
        fn key(&self) -> Uuid {
            self.id
        }

        fn partition(&self) -> &str {
            &self.owner
        }

        fn ordering_ticks(&self) -> i64 {
            self.ticks
        }
    }

    fn note(owner: &str, ticks: i64) -> Note {
        Note {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            ticks,
        }
    }

    fn drain(store: &KeyedStore<Note>, owner: &str, limit: i64) -> Vec<Note> {
        let mut seen = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = store.page(owner, limit, cursor.as_ref());
            seen.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Cursor::decode(Some(&next)).unwrap(),
                None => break,
            }
        }
        seen
    }

    #[test]
    fn test_upsert_and_get() {
        let store = KeyedStore::new();
        let n = note("u1", 10);
        assert!(store.upsert(n.clone()).is_none());
        assert_eq!(store.get(&n.id), Some(n.clone()));

        let replaced = Note { ticks: 11, ..n.clone() };
        assert_eq!(store.upsert(replaced.clone()), Some(n));
        assert_eq!(store.get(&replaced.id), Some(replaced));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_and_find_latest() {
        let store = KeyedStore::new();
        let old = note("u1", 1);
        let new = note("u1", 5);
        store.upsert(old.clone());
        store.upsert(new.clone());
        store.upsert(note("u2", 9));

        assert_eq!(store.find(|n| n.ticks == 1), Some(old));
        assert_eq!(store.find_latest(|n| n.owner == "u1"), Some(new));
        assert!(store.find(|n| n.owner == "nobody").is_none());
    }

    #[test]
    fn test_find_latest_breaks_tie_by_key() {
        let store = KeyedStore::new();
        let low = Note {
            id: Uuid::from_u128(1),
            owner: "u1".to_string(),
            ticks: 7,
        };
        let high = Note {
            id: Uuid::from_u128(2),
            ..low.clone()
        };
        store.upsert(high.clone());
        store.upsert(low);

        assert_eq!(store.find_latest(|n| n.owner == "u1"), Some(high));
    }

    #[test]
    fn test_page_filters_partition_and_orders_desc() {
        let store = KeyedStore::new();
        for ticks in [3, 1, 2] {
            store.upsert(note("u1", ticks));
        }
        store.upsert(note("u2", 100));

        let page = store.page("u1", 10, None);
        let ticks: Vec<i64> = page.items.iter().map(|n| n.ticks).collect();
        assert_eq!(ticks, vec![3, 2, 1]);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_pagination_visits_every_item_once_for_any_limit() {
        let store = KeyedStore::new();
        // Colliding timestamps force the id tie-breaker to matter.
        for i in 0..37 {
            store.upsert(note("u1", i / 4));
        }

        for limit in [1, 2, 3, 5, 10, 36, 37, 100] {
            let seen = drain(&store, "u1", limit);
            assert_eq!(seen.len(), 37, "limit {limit}");

            let ids: HashSet<Uuid> = seen.iter().map(|n| n.id).collect();
            assert_eq!(ids.len(), 37, "duplicates with limit {limit}");

            for pair in seen.windows(2) {
                let a = (pair[0].ticks, pair[0].id);
                let b = (pair[1].ticks, pair[1].id);
                assert!(a > b, "not strictly descending with limit {limit}");
            }
        }
    }

    #[test]
    fn test_limit_is_normalized() {
        let store = KeyedStore::new();
        for i in 0..150 {
            store.upsert(note("u1", i));
        }

        assert_eq!(store.page("u1", 0, None).items.len(), 20);
        assert_eq!(store.page("u1", -3, None).items.len(), 20);
        assert_eq!(store.page("u1", 500, None).items.len(), 100);
        assert_eq!(store.page("u1", 7, None).items.len(), 7);
    }

    #[test]
    fn test_insert_ahead_of_cursor_is_not_repeated() {
        let store = KeyedStore::new();
        for i in 0..4 {
            store.upsert(note("u1", i));
        }

        let first = store.page("u1", 2, None);
        let cursor = Cursor::decode(first.next_cursor.as_deref()).unwrap();

        // Newer than anything already returned
        store.upsert(note("u1", 1_000));

        let second = store.page("u1", 2, cursor.as_ref());
        let ticks: Vec<i64> = second.items.iter().map(|n| n.ticks).collect();
        assert_eq!(ticks, vec![1, 0]);
        assert!(second.next_cursor.is_none());
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(KeyedStore::new());
        std::thread::scope(|scope| {
            for t in 0..8 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for i in 0..50 {
                        store.upsert(note("u1", t * 1_000 + i));
                    }
                });
            }
        });

        assert_eq!(store.len(), 400);
        assert_eq!(drain(&store, "u1", 33).len(), 400);
    }
}
