//! Integration test: end-to-end container scenarios over both providers.

use strata_arena::{ArenaAllocator, FreeListAllocator};
use strata_collections::{ArenaVec, OrderedMap};
use strata_test_utils::FACTORIALS;

#[test]
fn ten_appends_into_default_capacity() {
    let alloc = ArenaAllocator::with_capacity(10).unwrap();
    let mut v = ArenaVec::new_in(alloc).unwrap();
    for i in 0..10 {
        v.push(i).unwrap();
    }
    assert_eq!(v.len(), 10);
    assert_eq!(v.capacity(), 10);
    assert_eq!(v.allocator().growth_count(), 0);
    assert_eq!(v.iter().copied().collect::<Vec<i32>>(), (0..10).collect::<Vec<_>>());
}

#[test]
fn eleven_appends_grow_once_to_twenty() {
    let alloc = ArenaAllocator::with_capacity(10).unwrap();
    let mut v = ArenaVec::with_capacity_in(10, alloc).unwrap();
    let mut growths = 0;
    for i in 0..11 {
        let before = v.capacity();
        v.push(i).unwrap();
        if v.capacity() != before {
            growths += 1;
        }
    }
    assert_eq!(growths, 1);
    assert!(v.capacity() >= 20);
    assert_eq!(v.iter().copied().collect::<Vec<i32>>(), (0..11).collect::<Vec<_>>());
}

#[test]
fn same_sequence_over_either_provider() {
    let mut over_arena = ArenaVec::new_in(ArenaAllocator::default()).unwrap();
    let mut over_free_list = ArenaVec::new_in(FreeListAllocator::default()).unwrap();
    over_arena.try_extend((0..50).map(|i| i * i)).unwrap();
    over_free_list.try_extend((0..50).map(|i| i * i)).unwrap();
    assert!(over_arena.iter().eq(over_free_list.iter()));
    // The arena keeps every abandoned range; the free list does not.
    assert!(over_arena.allocator().used() > over_free_list.allocator().allocated());
}

#[test]
fn factorial_map_over_arena_matches_btreemap() {
    let mut std_map = std::collections::BTreeMap::new();
    let mut map = OrderedMap::new_in(ArenaAllocator::with_capacity(10).unwrap()).unwrap();
    for i in 0..10u64 {
        let value = FACTORIALS[i as usize];
        std_map.insert(i, value);
        *map.get_or_insert_with(i, || 0).unwrap() = value;
    }
    assert!(map.iter().eq(std_map.iter()));
}

#[test]
fn map_of_vectors_shares_one_provider_flavour() {
    let mut map = OrderedMap::new_in(FreeListAllocator::default()).unwrap();
    for key in ["b", "a", "c"] {
        let mut v = ArenaVec::new_in(ArenaAllocator::with_capacity(2).unwrap()).unwrap();
        v.try_extend(key.bytes()).unwrap();
        map.insert(key, v).unwrap();
    }
    let keys: Vec<&str> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(map.get("a").and_then(|v| v.get(0)), Some(&b'a'));
}
