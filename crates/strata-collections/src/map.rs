//! Ordered map whose nodes live in a rebound storage provider.
//!
//! [`OrderedMap`] is handed an allocator for its value type `(K, V)` and
//! rebinds it to its own node type, the way a standard associative
//! container would. The provider never learns the node layout; the map
//! only ever passes back slots it obtained from the rebound instance.
//!
//! Balancing uses an AA tree (Andersson): every node carries a level,
//! left children sit exactly one level below their parent, and right
//! children sit at most at the parent's level with no two consecutive
//! horizontal links. Nodes reference each other by [`Slot`], so arena
//! growth relocating the nodes does not disturb the tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use smallvec::SmallVec;
use strata_arena::FreeListAllocator;
use strata_core::{Allocator, ArenaError, Slot};

/// Tree node stored in the map's rebound allocator.
pub struct Node<K, V> {
    key: K,
    value: V,
    level: u32,
    left: Option<Slot>,
    right: Option<Slot>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            level: 1,
            left: None,
            right: None,
        }
    }
}

/// Where an insert landed and what it displaced.
struct Inserted<V> {
    slot: Slot,
    previous: Option<V>,
}

/// A sorted key/value map generic over its storage provider.
///
/// Each entry costs one `allocate(1)` on the rebound provider; removing an
/// entry destroys its node and deallocates the slot. Over an
/// [`ArenaAllocator`](strata_arena::ArenaAllocator) removal therefore never
/// frees space, while a [`FreeListAllocator`] reuses it.
pub struct OrderedMap<K, V, A = FreeListAllocator<(K, V)>>
where
    A: Allocator<Value = (K, V)>,
{
    nodes: A::Rebind<Node<K, V>>,
    root: Option<Slot>,
    len: usize,
    _marker: PhantomData<(K, V)>,
}

impl<K, V, A> OrderedMap<K, V, A>
where
    A: Allocator<Value = (K, V)>,
{
    /// Create an empty map, rebinding `alloc` to the node type.
    pub fn new_in(alloc: A) -> Result<Self, ArenaError> {
        Ok(Self {
            nodes: alloc.rebind::<Node<K, V>>()?,
            root: None,
            len: 0,
            _marker: PhantomData,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The rebound provider holding the nodes.
    pub fn node_allocator(&self) -> &A::Rebind<Node<K, V>> {
        &self.nodes
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, A> {
        let mut iter = Iter {
            map: self,
            stack: SmallVec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Destroy and release every node.
    pub fn clear(&mut self) -> Result<(), ArenaError> {
        let mut pending: SmallVec<[Slot; 32]> = self.root.take().into_iter().collect();
        while let Some(slot) = pending.pop() {
            let node = self.release(slot)?;
            pending.extend(node.left);
            pending.extend(node.right);
        }
        Ok(())
    }

    fn node(&self, slot: Slot) -> Result<&Node<K, V>, ArenaError> {
        self.nodes.get(slot).ok_or(ArenaError::VacantSlot {
            index: slot.index(),
        })
    }

    fn node_mut(&mut self, slot: Slot) -> Result<&mut Node<K, V>, ArenaError> {
        self.nodes.get_mut(slot).ok_or(ArenaError::VacantSlot {
            index: slot.index(),
        })
    }

    fn level(&self, slot: Option<Slot>) -> Result<u32, ArenaError> {
        match slot {
            Some(slot) => Ok(self.node(slot)?.level),
            None => Ok(0),
        }
    }

    /// Move a node out of its slot and hand the slot back.
    fn release(&mut self, slot: Slot) -> Result<Node<K, V>, ArenaError> {
        let node = self.nodes.take(slot)?;
        self.nodes.deallocate(slot.into())?;
        self.len -= 1;
        Ok(node)
    }

    /// Rotate right when the left child shares this node's level.
    fn skew(&mut self, t: Slot) -> Result<Slot, ArenaError> {
        let node = self.node(t)?;
        let level = node.level;
        let Some(l) = node.left else {
            return Ok(t);
        };
        let left = self.node(l)?;
        if left.level != level {
            return Ok(t);
        }
        let l_right = left.right;
        self.node_mut(t)?.left = l_right;
        self.node_mut(l)?.right = Some(t);
        Ok(l)
    }

    /// Rotate left and promote when two horizontal right links chain.
    fn split(&mut self, t: Slot) -> Result<Slot, ArenaError> {
        let node = self.node(t)?;
        let level = node.level;
        let Some(r) = node.right else {
            return Ok(t);
        };
        let right = self.node(r)?;
        let r_left = right.left;
        if self.level(right.right)? != level {
            return Ok(t);
        }
        self.node_mut(t)?.right = r_left;
        let right = self.node_mut(r)?;
        right.left = Some(t);
        right.level += 1;
        Ok(r)
    }

    /// Restore levels after a removal below `t`.
    fn rebalance(&mut self, t: Slot) -> Result<Slot, ArenaError> {
        let node = self.node(t)?;
        let (left, right, level) = (node.left, node.right, node.level);
        let should_be = self.level(left)?.min(self.level(right)?) + 1;
        if should_be < level {
            self.node_mut(t)?.level = should_be;
            if let Some(r) = right {
                let right = self.node_mut(r)?;
                right.level = right.level.min(should_be);
            }
        }

        let t = self.skew(t)?;
        let right = self.node(t)?.right;
        if let Some(r) = right {
            let r = self.skew(r)?;
            self.node_mut(t)?.right = Some(r);
            let right_right = self.node(r)?.right;
            if let Some(rr) = right_right {
                let rr = self.skew(rr)?;
                self.node_mut(r)?.right = Some(rr);
            }
        }

        let t = self.split(t)?;
        let right = self.node(t)?.right;
        if let Some(r) = right {
            let r = self.split(r)?;
            self.node_mut(t)?.right = Some(r);
        }
        Ok(t)
    }

    /// Unlink the smallest node under `t`.
    fn remove_min(&mut self, t: Slot) -> Result<(Option<Slot>, Node<K, V>), ArenaError> {
        let node = self.node(t)?;
        match node.left {
            None => {
                let right = node.right;
                let min = self.release(t)?;
                Ok((right, min))
            }
            Some(l) => {
                let (child, min) = self.remove_min(l)?;
                self.node_mut(t)?.left = child;
                Ok((Some(self.rebalance(t)?), min))
            }
        }
    }
}

impl<K, V, A> OrderedMap<K, V, A>
where
    K: Ord,
    A: Allocator<Value = (K, V)>,
{
    /// Insert `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, ArenaError> {
        let (root, inserted) = self.insert_at(self.root, key, value)?;
        self.root = Some(root);
        Ok(inserted.previous)
    }

    /// The value under `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> Result<&mut V, ArenaError>
    where
        F: FnOnce() -> V,
    {
        let slot = match self.find(&key) {
            Some(slot) => slot,
            None => {
                let (root, inserted) = self.insert_at(self.root, key, default())?;
                self.root = Some(root);
                inserted.slot
            }
        };
        Ok(&mut self.node_mut(slot)?.value)
    }

    /// Borrow the value under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = self.find(key)?;
        self.nodes.get(slot).map(|node| &node.value)
    }

    /// Mutably borrow the value under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = self.find(key)?;
        self.nodes.get_mut(slot).map(|node| &mut node.value)
    }

    /// Whether an entry exists under `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Remove the entry under `key`, returning its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>, ArenaError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Ok(self.remove_entry(key)?.map(|(_, value)| value))
    }

    /// Remove the entry under `key`, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<Option<(K, V)>, ArenaError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = self.remove_at(self.root, key)?;
        self.root = root;
        Ok(removed)
    }

    fn find<Q>(&self, key: &Q) -> Option<Slot>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while let Some(slot) = cur {
            let node = self.nodes.get(slot)?;
            cur = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(slot),
            };
        }
        None
    }

    fn insert_at(
        &mut self,
        tree: Option<Slot>,
        key: K,
        value: V,
    ) -> Result<(Slot, Inserted<V>), ArenaError> {
        let Some(t) = tree else {
            let slot = self.nodes.allocate(1)?.nth(0);
            self.nodes.construct(slot, Node::leaf(key, value))?;
            self.len += 1;
            return Ok((
                slot,
                Inserted {
                    slot,
                    previous: None,
                },
            ));
        };

        let node = self.node(t)?;
        let (left, right) = (node.left, node.right);
        let inserted = match key.cmp(&node.key) {
            Ordering::Less => {
                let (child, inserted) = self.insert_at(left, key, value)?;
                self.node_mut(t)?.left = Some(child);
                inserted
            }
            Ordering::Greater => {
                let (child, inserted) = self.insert_at(right, key, value)?;
                self.node_mut(t)?.right = Some(child);
                inserted
            }
            Ordering::Equal => {
                let previous = mem::replace(&mut self.node_mut(t)?.value, value);
                return Ok((
                    t,
                    Inserted {
                        slot: t,
                        previous: Some(previous),
                    },
                ));
            }
        };
        let t = self.skew(t)?;
        let t = self.split(t)?;
        Ok((t, inserted))
    }

    fn remove_at<Q>(
        &mut self,
        tree: Option<Slot>,
        key: &Q,
    ) -> Result<(Option<Slot>, Option<(K, V)>), ArenaError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(t) = tree else {
            return Ok((None, None));
        };

        let node = self.node(t)?;
        let (left, right) = (node.left, node.right);
        let removed = match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let (child, removed) = self.remove_at(left, key)?;
                self.node_mut(t)?.left = child;
                removed
            }
            Ordering::Greater => {
                let (child, removed) = self.remove_at(right, key)?;
                self.node_mut(t)?.right = child;
                removed
            }
            Ordering::Equal => match right {
                None => {
                    // No right child means no left child either in a valid
                    // AA tree; splice in `left` regardless.
                    let node = self.release(t)?;
                    return Ok((left, Some((node.key, node.value))));
                }
                Some(r) => {
                    let (child, successor) = self.remove_min(r)?;
                    let node = self.node_mut(t)?;
                    node.right = child;
                    let key = mem::replace(&mut node.key, successor.key);
                    let value = mem::replace(&mut node.value, successor.value);
                    Some((key, value))
                }
            },
        };
        if removed.is_none() {
            return Ok((Some(t), None));
        }
        Ok((Some(self.rebalance(t)?), removed))
    }
}

impl<K, V, A> Drop for OrderedMap<K, V, A>
where
    A: Allocator<Value = (K, V)>,
{
    fn drop(&mut self) {
        if let Err(err) = self.clear() {
            tracing::warn!(%err, "failed to release map nodes");
        }
    }
}

impl<K, V, A> fmt::Debug for OrderedMap<K, V, A>
where
    K: fmt::Debug,
    V: fmt::Debug,
    A: Allocator<Value = (K, V)>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, A> IntoIterator for &'a OrderedMap<K, V, A>
where
    A: Allocator<Value = (K, V)>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`OrderedMap`].
pub struct Iter<'a, K, V, A>
where
    A: Allocator<Value = (K, V)>,
{
    map: &'a OrderedMap<K, V, A>,
    /// Nodes whose left subtree has been visited but which have not been yielded.
    stack: SmallVec<[Slot; 32]>,
    remaining: usize,
}

impl<'a, K, V, A> Iter<'a, K, V, A>
where
    A: Allocator<Value = (K, V)>,
{
    fn push_left_spine(&mut self, mut cur: Option<Slot>) {
        let map = self.map;
        while let Some(slot) = cur {
            self.stack.push(slot);
            cur = map.nodes.get(slot).and_then(|node| node.left);
        }
    }
}

impl<'a, K, V, A> Iterator for Iter<'a, K, V, A>
where
    A: Allocator<Value = (K, V)>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let map = self.map;
        let slot = self.stack.pop()?;
        let node = map.nodes.get(slot)?;
        self.push_left_spine(node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
