//! # MemorySkipList Tests
//!
//! Covers the search contract (prev/next/found), id stability across
//! re-keying, largest-entry and head traversal, and agreement with an
//! ordered reference under random workloads.

use std::sync::Arc;

use shiori_core::config::SkipListConfig;
use shiori_core::traits::SkipListStore;
use shiori_store::MemorySkipList;

fn filled(keys: &[&str]) -> MemorySkipList {
    let list = MemorySkipList::default();
    for key in keys {
        list.insert_by_key(key.as_bytes(), None).unwrap();
    }
    list
}

fn key_of(entry: &shiori_core::types::SkipEntry) -> String {
    String::from_utf8(entry.key.to_vec()).unwrap()
}

#[test]
fn test_insert_and_find_exact() {
    let list = filled(&["b", "d", "f"]);
    let search = list.find_greater_or_equal(b"d").unwrap();
    assert!(search.found);
    let next = search.next.unwrap();
    assert_eq!(key_of(&next), "d");
    // An exact hit may come without a predecessor; the entry's own back
    // reference covers it.
    if let Some(prev) = search.prev {
        assert_eq!(key_of(&prev), "b");
    } else {
        let prev_ref = next.prev.unwrap();
        let prev = list.load(&prev_ref).unwrap().unwrap();
        assert_eq!(key_of(&prev), "b");
    }
}

#[test]
fn test_find_between_keys() {
    let list = filled(&["b", "d", "f"]);
    let search = list.find_greater_or_equal(b"c").unwrap();
    assert!(search.found);
    assert_eq!(key_of(&search.next.unwrap()), "d");
    assert_eq!(key_of(&search.prev.unwrap()), "b");
}

#[test]
fn test_find_past_end() {
    let list = filled(&["b", "d", "f"]);
    let search = list.find_greater_or_equal(b"zz").unwrap();
    assert!(!search.found);
    assert!(search.next.is_none());

    let largest = list.largest().unwrap().unwrap();
    assert_eq!(key_of(&largest), "f");
}

#[test]
fn test_find_before_first() {
    let list = filled(&["b", "d"]);
    let search = list.find_greater_or_equal(b"a").unwrap();
    assert!(search.found);
    let next = search.next.unwrap();
    assert_eq!(key_of(&next), "b");
    assert!(search.prev.is_none());
    assert!(next.prev.is_none());
}

#[test]
fn test_empty_list() {
    let list = MemorySkipList::default();
    assert!(list.is_empty());
    assert!(list.head().unwrap().is_none());
    assert!(list.largest().unwrap().is_none());
    let search = list.find_greater_or_equal(b"a").unwrap();
    assert!(!search.found);
    assert!(search.prev.is_none());
    assert!(search.next.is_none());
}

#[test]
fn test_insert_existing_key_returns_same_id() {
    let list = MemorySkipList::default();
    let id = list.insert_by_key(b"a", None).unwrap();
    let again = list.insert_by_key(b"a", None).unwrap();
    assert_eq!(id, again);
    assert_eq!(list.len(), 1);
}

#[test]
fn test_id_hint_reuse_across_rekey() {
    let list = filled(&["b", "d", "f"]);
    let id = list.delete_by_key(b"d").unwrap().unwrap();
    let reinserted = list.insert_by_key(b"c", Some(id)).unwrap();
    assert_eq!(reinserted, id);

    // Fresh allocations never collide with the reused id.
    let fresh = list.insert_by_key(b"e", None).unwrap();
    assert_ne!(fresh, id);
}

#[test]
fn test_delete_by_key() {
    let list = filled(&["b", "d", "f"]);
    assert!(list.delete_by_key(b"d").unwrap().is_some());
    assert!(list.delete_by_key(b"d").unwrap().is_none());
    assert_eq!(list.len(), 2);

    // Neighbors relink at level 0.
    let search = list.find_greater_or_equal(b"c").unwrap();
    let next = search.next.unwrap();
    assert_eq!(key_of(&next), "f");
    assert_eq!(key_of(&list.load(&next.prev.unwrap()).unwrap().unwrap()), "b");
}

#[test]
fn test_delete_entry() {
    let list = filled(&["b", "d"]);
    let entry = list.find_greater_or_equal(b"b").unwrap().next.unwrap();
    list.delete_entry(&entry).unwrap();
    assert_eq!(list.len(), 1);
    // Deleting a stale entry is a no-op.
    list.delete_entry(&entry).unwrap();
    assert_eq!(list.len(), 1);
}

#[test]
fn test_load_missing_node() {
    let list = filled(&["b"]);
    let entry = list.find_greater_or_equal(b"b").unwrap().next.unwrap();
    list.delete_by_key(b"b").unwrap();
    assert!(list.load(&entry.node_ref()).unwrap().is_none());
}

#[test]
fn test_forward_walk_is_ordered() {
    let list = filled(&["e", "a", "c", "b", "d"]);
    let mut keys = Vec::new();
    let mut cursor = list.head().unwrap();
    while let Some(node_ref) = cursor {
        let entry = list.load(&node_ref).unwrap().unwrap();
        keys.push(key_of(&entry));
        cursor = entry.next;
    }
    assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn test_config_validation() {
    assert!(MemorySkipList::new(SkipListConfig {
        max_height: 0,
        level_probability: 0.25,
    })
    .is_err());
    assert!(MemorySkipList::new(SkipListConfig {
        max_height: 12,
        level_probability: 1.0,
    })
    .is_err());
    assert!(MemorySkipList::new(SkipListConfig::default()).is_ok());
}

#[test]
fn test_shared_across_threads() {
    let list = Arc::new(MemorySkipList::default());
    let mut handles = Vec::new();
    for t in 0..4 {
        let list = Arc::clone(&list);
        handles.push(std::thread::spawn(move || {
            for i in 0..50 {
                let key = format!("{:02}-{:02}", t, i);
                list.insert_by_key(key.as_bytes(), None).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(list.len(), 200);
}

// Property-based tests
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    proptest! {
        #[test]
        fn find_greater_or_equal_matches_reference(
            keys in prop::collection::btree_set("[a-f]{1,3}", 0..40),
            probe in "[a-f]{1,3}",
        ) {
            let list = MemorySkipList::default();
            for key in &keys {
                list.insert_by_key(key.as_bytes(), None).unwrap();
            }
            let reference: BTreeSet<&String> = keys.iter().collect();
            let expected = reference.iter().find(|k| k.as_str() >= probe.as_str());

            let search = list.find_greater_or_equal(probe.as_bytes()).unwrap();
            match expected {
                Some(key) => {
                    prop_assert!(search.found);
                    prop_assert_eq!(&key_of(&search.next.unwrap()), *key);
                }
                None => {
                    prop_assert!(!search.found);
                    prop_assert!(search.next.is_none());
                }
            }
        }

        #[test]
        fn inserts_and_deletes_keep_level0_ordered(
            ops in prop::collection::vec(("[a-e]{1,2}", any::<bool>()), 1..80),
        ) {
            let list = MemorySkipList::default();
            let mut model = BTreeSet::new();
            for (key, is_insert) in &ops {
                if *is_insert {
                    list.insert_by_key(key.as_bytes(), None).unwrap();
                    model.insert(key.clone());
                } else {
                    list.delete_by_key(key.as_bytes()).unwrap();
                    model.remove(key);
                }
            }
            let mut walked = Vec::new();
            let mut cursor = list.head().unwrap();
            while let Some(node_ref) = cursor {
                let entry = list.load(&node_ref).unwrap().unwrap();
                walked.push(key_of(&entry));
                cursor = entry.next;
            }
            let expected: Vec<String> = model.into_iter().collect();
            prop_assert_eq!(walked, expected);
        }
    }
}
