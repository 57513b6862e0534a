//! SharedStore Tests
//!
//! Tests verify:
//! - The locked wrapper exposes the same semantics as OrderedStore
//! - Concurrent writers end in the state a serial replay of the lock order
//!   produces
//! - Listings never observe a half-applied multi-step change

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relaykv::store::{OrderedStore, SharedStore};

fn key_list(store: &SharedStore) -> Vec<String> {
    store
        .snapshot()
        .into_iter()
        .map(|e| e.into_parts().0)
        .collect()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_put_get_remove() {
    let store = SharedStore::new();

    assert_eq!(store.put("k", "v1"), None);
    assert_eq!(store.put("k", "v2"), Some("v1".to_string()));
    assert_eq!(store.get("k"), Some("v2".to_string()));
    assert_eq!(store.len(), 1);

    assert_eq!(store.remove("k"), Some("v2".to_string()));
    assert_eq!(store.get("k"), None);
    assert!(store.is_empty());
}

#[test]
fn test_reference_scenario() {
    let store = SharedStore::new();

    store.put("big power", "big responsibility");
    store.put("why you", "so serious");
    store.put("only one", "lord of the ring");
    store.put("bond", "james bond");
    store.remove("why you");
    store.put("only one", "hour a night");

    let listed: Vec<(String, String)> = store
        .snapshot()
        .into_iter()
        .map(|e| e.into_parts())
        .collect();

    assert_eq!(
        listed,
        vec![
            ("big power".to_string(), "big responsibility".to_string()),
            ("only one".to_string(), "hour a night".to_string()),
            ("bond".to_string(), "james bond".to_string()),
        ]
    );
    assert_eq!(store.front().map(|e| e.key().clone()), Some("big power".to_string()));
    assert_eq!(store.back().map(|e| e.key().clone()), Some("bond".to_string()));
}

#[test]
fn test_for_each_in_order_counts_entries() {
    let store = SharedStore::new();
    store.put("a", "1");
    store.put("b", "2");
    store.put("c", "3");

    let mut seen = Vec::new();
    let visited = store.for_each_in_order(|e| seen.push(e.key().clone()));

    assert_eq!(visited, 3);
    assert_eq!(seen, vec!["a", "b", "c"]);
}

#[test]
fn test_with_mut_applies_atomically() {
    let store = SharedStore::new();
    store.put("old", "1");

    let removed = store.with_mut(|s| {
        s.put("new".to_string(), "2".to_string());
        s.remove("old")
    });

    assert_eq!(removed, Some("1".to_string()));
    assert_eq!(key_list(&store), vec!["new"]);
    assert_eq!(store.with(|s| s.len()), 1);
}

// =============================================================================
// Concurrent Access Tests
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Put(String, String),
    Get(String),
    Remove(String),
}

fn apply_op(store: &mut OrderedStore<String, String>, op: &Op) {
    match op {
        Op::Put(k, v) => {
            store.put(k.clone(), v.clone());
        }
        Op::Get(k) => {
            store.get(k.as_str());
        }
        Op::Remove(k) => {
            store.remove(k.as_str());
        }
    }
}

#[test]
fn test_concurrent_apply_matches_serial_replay() {
    const THREADS: u64 = 8;
    const OPS_PER_THREAD: usize = 2_000;

    let store = Arc::new(SharedStore::new());
    let applied: Arc<Mutex<Vec<Op>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handles = vec![];
    for t in 0..THREADS {
        let store = Arc::clone(&store);
        let applied = Arc::clone(&applied);
        handles.push(thread::spawn(move || {
            let mut rng = StdRng::seed_from_u64(t);
            for i in 0..OPS_PER_THREAD {
                let key = format!("key{}", rng.gen_range(0..64));
                let op = match rng.gen_range(0..10) {
                    0..=5 => Op::Put(key, format!("t{}-{}", t, i)),
                    6..=7 => Op::Get(key),
                    _ => Op::Remove(key),
                };

                // Record under the store lock so the log is the delivery order
                store.with_mut(|s| {
                    apply_op(s, &op);
                    applied.lock().push(op);
                });
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let log = applied.lock();
    assert_eq!(log.len(), THREADS as usize * OPS_PER_THREAD);

    let mut serial = OrderedStore::new();
    for op in log.iter() {
        apply_op(&mut serial, op);
    }

    let expected: Vec<(String, String)> = serial
        .iter()
        .map(|e| (e.key().clone(), e.value().clone()))
        .collect();
    let actual: Vec<(String, String)> = store
        .snapshot()
        .into_iter()
        .map(|e| e.into_parts())
        .collect();

    assert_eq!(actual, expected);
}

#[test]
fn test_concurrent_writes_disjoint_keys() {
    let store = Arc::new(SharedStore::new());

    let mut handles = vec![];
    for i in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for j in 0..100 {
                store.put(format!("key{}_{}", i, j), format!("value{}_{}", i, j));
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 1_000);

    // Per-thread program order survives in the global order
    let keys = key_list(&store);
    for i in 0..10 {
        let prefix = format!("key{}_", i);
        let own: Vec<&String> = keys.iter().filter(|k| k.starts_with(&prefix)).collect();
        let expected: Vec<String> = (0..100).map(|j| format!("key{}_{}", i, j)).collect();
        assert_eq!(own.len(), 100);
        for (got, want) in own.iter().zip(expected.iter()) {
            assert_eq!(*got, want);
        }
    }
}

#[test]
fn test_listing_never_sees_partial_change() {
    let store = Arc::new(SharedStore::new());
    store.put("slot-0", "0");

    // Writer keeps exactly one key live by swapping it in one locked step
    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 1..2_000 {
                store.with_mut(|s| {
                    s.remove(format!("slot-{}", i - 1).as_str());
                    s.put(format!("slot-{}", i), i.to_string());
                });
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let count = store.for_each_in_order(|_| {});
                    assert_eq!(count, 1);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(key_list(&store), vec!["slot-1999"]);
}
