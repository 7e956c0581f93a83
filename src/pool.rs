//! The node pool shared by lists.
//!
//! A [`NodePool`] is a slab of node slots. Lists created in the same pool
//! link their nodes by [`NodeKey`] and can hand nodes to each other without
//! moving the elements. Freed slots are chained into a free list and reused;
//! every slot carries a generation that is bumped on free, so keys to
//! destroyed nodes are recognised as dangling.

use crate::error::{ListError, Result};
use ghost_cell::{GhostCell, GhostToken};
use std::cell::{Cell, RefCell};
use std::fmt;
use tracing::{debug, warn};

/// A handle to a node slot in a [`NodePool`].
///
/// Keys compare by slot index and generation, so a key taken before a node
/// was destroyed never equals a key of a node that later reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    index: u32,
    generation: u32,
}

impl NodeKey {
    /// A key that never resolves to a live node.
    pub(crate) const DANGLING: NodeKey = NodeKey {
        index: u32::MAX,
        generation: 0,
    };

    /// Slot index inside the pool.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Number of times the slot had been freed when this key was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == NodeKey::DANGLING {
            return f.write_str("NodeKey(dangling)");
        }
        write!(f, "NodeKey({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}v{}", self.index, self.generation)
    }
}

/// Identifies the list owning a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct ListId(u32);

/// A node of some list. Sentinels carry no element.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) prev: NodeKey,
    pub(crate) next: NodeKey,
    pub(crate) owner: ListId,
    pub(crate) element: Option<T>,
}

impl<T> Node<T> {
    pub(crate) fn sentinel(owner: ListId) -> Self {
        Node {
            prev: NodeKey::DANGLING,
            next: NodeKey::DANGLING,
            owner,
            element: None,
        }
    }

    pub(crate) fn new(prev: NodeKey, next: NodeKey, owner: ListId, element: T) -> Self {
        Node {
            prev,
            next,
            owner,
            element: Some(element),
        }
    }

    pub(crate) fn is_sentinel(&self) -> bool {
        self.element.is_none()
    }
}

#[derive(Debug)]
enum Slot<T> {
    Free { next_free: Option<u32> },
    Occupied(Node<T>),
}

#[derive(Debug)]
pub(crate) struct Entry<T> {
    generation: u32,
    slot: Slot<T>,
}

#[cold]
#[inline(never)]
fn broken_link(key: NodeKey) -> ! {
    panic!("list links reference a free slot: {:?}", key);
}

/// Storage behind a [`NodePool`].
#[derive(Debug)]
pub(crate) struct Slab<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
    live: usize,
    /// upper bound on `entries.len()`, never above `u32::MAX`
    max_slots: usize,
    next_list: u32,
}

impl<T> Slab<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self::bounded(capacity, u32::MAX as usize)
    }

    fn bounded(capacity: usize, max_slots: usize) -> Self {
        let max_slots = max_slots.min(u32::MAX as usize);
        Slab {
            entries: Vec::with_capacity(capacity.min(max_slots)),
            free_head: None,
            live: 0,
            max_slots,
            next_list: 0,
        }
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> usize {
        self.entries.len()
    }

    /// Issue the owner tag of a new list. Tags are never reused, so once
    /// they run out no further list can be created in this pool.
    pub(crate) fn new_list_id(&mut self) -> Result<ListId> {
        let id = ListId(self.next_list);
        self.next_list = match self.next_list.checked_add(1) {
            Some(next) => next,
            None => {
                warn!("node pool ran out of list ids");
                return Err(ListError::AllocFailed);
            }
        };
        Ok(id)
    }

    /// Store `node` in a free slot, growing the slab if there is none.
    ///
    /// Nothing is modified when the slab cannot grow.
    pub(crate) fn alloc(&mut self, node: Node<T>) -> Result<NodeKey> {
        if let Some(index) = self.free_head {
            let entry = &mut self.entries[index as usize];
            let next_free = match entry.slot {
                Slot::Free { next_free } => next_free,
                Slot::Occupied(_) => panic!("free list references an occupied slot"),
            };
            entry.slot = Slot::Occupied(node);
            self.free_head = next_free;
            self.live += 1;
            return Ok(NodeKey {
                index,
                generation: entry.generation,
            });
        }

        let index = match u32::try_from(self.entries.len()) {
            Ok(index) if (index as usize) < self.max_slots => index,
            _ => {
                warn!(slots = self.entries.len(), "node pool is full");
                return Err(ListError::AllocFailed);
            }
        };
        if let Err(err) = self.entries.try_reserve(1) {
            warn!(slots = self.entries.len(), error = %err, "node pool cannot grow");
            return Err(ListError::AllocFailed);
        }
        self.entries.push(Entry {
            generation: 0,
            slot: Slot::Occupied(node),
        });
        self.live += 1;
        Ok(NodeKey {
            index,
            generation: 0,
        })
    }

    /// Release the slot of `key` and return its node.
    ///
    /// # Panics
    ///
    /// Panics if `key` does not refer to a live node.
    pub(crate) fn free(&mut self, key: NodeKey) -> Node<T> {
        if self.get(key).is_none() {
            broken_link(key);
        }
        let entry = &mut self.entries[key.index()];
        let slot = std::mem::replace(
            &mut entry.slot,
            Slot::Free {
                next_free: self.free_head,
            },
        );
        entry.generation = entry.generation.wrapping_add(1);
        self.free_head = Some(key.index);
        self.live -= 1;
        match slot {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => broken_link(key),
        }
    }

    pub(crate) fn get(&self, key: NodeKey) -> Option<&Node<T>> {
        match self.entries.get(key.index()) {
            Some(Entry {
                generation,
                slot: Slot::Occupied(node),
            }) if *generation == key.generation => Some(node),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node<T>> {
        match self.entries.get_mut(key.index()) {
            Some(Entry {
                generation,
                slot: Slot::Occupied(node),
            }) if *generation == key.generation => Some(node),
            _ => None,
        }
    }

    /// Like [`Slab::get`], for keys read from list links, which are always live.
    pub(crate) fn node(&self, key: NodeKey) -> &Node<T> {
        match self.get(key) {
            Some(node) => node,
            None => broken_link(key),
        }
    }

    pub(crate) fn node_mut(&mut self, key: NodeKey) -> &mut Node<T> {
        match self.get_mut(key) {
            Some(node) => node,
            None => broken_link(key),
        }
    }

    pub(crate) fn next(&self, key: NodeKey) -> NodeKey {
        self.node(key).next
    }

    pub(crate) fn prev(&self, key: NodeKey) -> NodeKey {
        self.node(key).prev
    }

    /// Element of a content node. Sentinels are never passed here.
    pub(crate) fn element(&self, key: NodeKey) -> &T {
        match &self.node(key).element {
            Some(element) => element,
            None => panic!("sentinel {:?} has no element", key),
        }
    }

    pub(crate) fn element_mut(&mut self, key: NodeKey) -> &mut T {
        match &mut self.node_mut(key).element {
            Some(element) => element,
            None => panic!("sentinel {:?} has no element", key),
        }
    }

    pub(crate) fn connect(&mut self, prev: NodeKey, next: NodeKey) {
        self.node_mut(prev).next = next;
        self.node_mut(next).prev = prev;
    }

    /// Move the linked run `front..=back` so that it sits right before `to`.
    ///
    /// `to` must not lie inside the run.
    pub(crate) fn move_nodes(&mut self, front: NodeKey, back: NodeKey, to: NodeKey) {
        let (before, after) = (self.prev(front), self.next(back));
        self.connect(before, after);
        let to_prev = self.prev(to);
        self.connect(to_prev, front);
        self.connect(back, to);
    }

    /// Free every node of the closed chain `head..=tail`, front to back.
    fn release_chain(&mut self, head: NodeKey, tail: NodeKey) {
        let mut node = head;
        loop {
            let next = self.next(node);
            drop(self.free(node));
            if node == tail {
                return;
            }
            node = next;
        }
    }

    #[cfg(debug_assertions)]
    pub(crate) fn assert_adjacent(&self, prev: NodeKey, next: NodeKey) {
        assert_eq!(self.next(prev), next);
        assert_eq!(self.prev(next), prev);
    }

    pub(crate) fn entries_ptr(&mut self) -> *mut Entry<T> {
        self.entries.as_mut_ptr()
    }
}

impl<T> Entry<T> {
    pub(crate) fn node_mut(&mut self) -> Option<&mut Node<T>> {
        match &mut self.slot {
            Slot::Occupied(node) => Some(node),
            Slot::Free { .. } => None,
        }
    }
}

/// Storage for the nodes of any number of lists.
///
/// The pool is branded with the lifetime `'id` of a [`GhostToken`]: reading
/// a node requires `&GhostToken<'id>`, changing one `&mut GhostToken<'id>`.
/// Lists borrow the pool, so it outlives all of them and all their cursors.
///
/// A list dropped without [`List::dispose`](crate::List::dispose) cannot
/// reach the token, so it queues its chain on the pool instead. Queued
/// chains are released by the next write to the pool and are not counted
/// by [`NodePool::live_nodes`].
///
/// # Examples
///
/// ```
/// use node_list::{GhostToken, List, NodePool};
///
/// GhostToken::new(|mut token| {
///     let pool = NodePool::new();
///     let mut list = List::new_in(&pool, &mut token).unwrap();
///     // head and tail sentinels
///     assert_eq!(pool.live_nodes(&token), 2);
///
///     list.push_back(1, &mut token).unwrap();
///     assert_eq!(pool.live_nodes(&token), 3);
///
///     list.dispose(&mut token);
///     assert_eq!(pool.live_nodes(&token), 0);
///
///     let dropped = List::from_iter_in(&pool, [1, 2], &mut token).unwrap();
///     drop(dropped);
///     assert_eq!(pool.live_nodes(&token), 0);
/// });
/// ```
pub struct NodePool<'id, T> {
    slab: GhostCell<'id, Slab<T>>,
    /// `(head, tail)` of every list dropped since the last write
    dropped: RefCell<Vec<(NodeKey, NodeKey)>>,
    /// number of nodes in the `dropped` chains
    dropped_nodes: Cell<usize>,
}

impl<'id, T> NodePool<'id, T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty pool with room for `capacity` nodes, sentinels
    /// included, before it has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_slab(Slab::with_capacity(capacity))
    }

    /// Create an empty pool that never holds more than `max_nodes` nodes,
    /// sentinels included. Allocating past the limit fails with
    /// [`ListError::AllocFailed`].
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, ListError, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::with_max_nodes(3);
    ///     let mut list = List::new_in(&pool, &mut token).unwrap();
    ///     list.push_back(1, &mut token).unwrap();
    ///     assert_eq!(list.push_back(2, &mut token), Err(ListError::AllocFailed));
    ///     assert_eq!(list.to_vec(&token), vec![1]);
    /// });
    /// ```
    pub fn with_max_nodes(max_nodes: usize) -> Self {
        Self::from_slab(Slab::bounded(0, max_nodes))
    }

    fn from_slab(slab: Slab<T>) -> Self {
        NodePool {
            slab: GhostCell::new(slab),
            dropped: RefCell::new(Vec::new()),
            dropped_nodes: Cell::new(0),
        }
    }

    /// Number of occupied node slots, sentinels included. Nodes of dropped
    /// lists waiting to be released are not counted.
    pub fn live_nodes(&self, token: &GhostToken<'id>) -> usize {
        self.slab(token).live() - self.dropped_nodes.get()
    }

    pub(crate) fn slab<'a>(&'a self, token: &'a GhostToken<'id>) -> &'a Slab<T> {
        self.slab.borrow(token)
    }

    /// Write access to the slab. Chains of dropped lists are released first.
    pub(crate) fn slab_mut<'a>(&'a self, token: &'a mut GhostToken<'id>) -> &'a mut Slab<T> {
        let slab = self.slab.borrow_mut(token);
        if self.dropped_nodes.get() != 0 {
            // Taken out first: dropping an element may drop and queue another list.
            let chains = self.dropped.take();
            self.dropped_nodes.set(0);
            debug!(lists = chains.len(), "releasing dropped lists");
            for (head, tail) in chains {
                slab.release_chain(head, tail);
            }
        }
        slab
    }

    /// Queue the chain `head..=tail` of a dropped list, holding `nodes`
    /// nodes, for release.
    pub(crate) fn defer_release(&self, head: NodeKey, tail: NodeKey, nodes: usize) {
        self.dropped.borrow_mut().push((head, tail));
        self.dropped_nodes.set(self.dropped_nodes.get() + nodes);
    }

    pub(crate) fn same_pool(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<'id, T> Default for NodePool<'id, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(owner: ListId, value: i32) -> Node<i32> {
        Node::new(NodeKey::DANGLING, NodeKey::DANGLING, owner, value)
    }

    #[test]
    fn slab_alloc_and_get() {
        let mut slab = Slab::with_capacity(4);
        let owner = slab.new_list_id().unwrap();
        let a = slab.alloc(content(owner, 1)).unwrap();
        let b = slab.alloc(content(owner, 2)).unwrap();

        assert_ne!(a, b);
        assert_eq!(slab.live(), 2);
        assert_eq!(slab.element(a), &1);
        assert_eq!(slab.element(b), &2);
        assert_eq!(slab.node(a).owner, owner);
    }

    #[test]
    fn slab_free_and_reuse() {
        let mut slab = Slab::with_capacity(0);
        let owner = slab.new_list_id().unwrap();
        let a = slab.alloc(content(owner, 1)).unwrap();
        let _b = slab.alloc(content(owner, 2)).unwrap();

        let node = slab.free(a);
        assert_eq!(node.element, Some(1));
        assert_eq!(slab.live(), 1);
        assert!(slab.get(a).is_none());

        let c = slab.alloc(content(owner, 3)).unwrap();
        assert_eq!(c.index(), a.index());
        assert_eq!(c.generation(), a.generation() + 1);
        assert_ne!(a, c);
        // The stale key does not see the new occupant.
        assert!(slab.get(a).is_none());
        assert_eq!(slab.element(c), &3);
    }

    #[test]
    fn slab_sentinel() {
        let mut slab = Slab::<i32>::with_capacity(0);
        let owner = slab.new_list_id().unwrap();
        let s = slab.alloc(Node::sentinel(owner)).unwrap();
        assert!(slab.node(s).is_sentinel());
        assert_eq!(slab.node(s).owner, owner);
    }

    #[test]
    fn slab_list_ids_are_distinct() {
        let mut slab = Slab::<i32>::with_capacity(0);
        let a = slab.new_list_id().unwrap();
        let b = slab.new_list_id().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn slab_list_ids_are_never_reused() {
        let mut slab = Slab::<i32>::with_capacity(0);
        slab.next_list = u32::MAX - 1;
        assert_eq!(slab.new_list_id(), Ok(ListId(u32::MAX - 1)));
        assert_eq!(slab.new_list_id(), Err(ListError::AllocFailed));
        assert_eq!(slab.new_list_id(), Err(ListError::AllocFailed));
    }

    #[test]
    fn slab_bounded_alloc() {
        let mut slab = Slab::bounded(0, 2);
        let owner = slab.new_list_id().unwrap();
        let a = slab.alloc(content(owner, 1)).unwrap();
        let _b = slab.alloc(content(owner, 2)).unwrap();
        assert_eq!(slab.alloc(content(owner, 3)), Err(ListError::AllocFailed));
        assert_eq!(slab.live(), 2);

        // A freed slot is reused even when the slab is full.
        slab.free(a);
        let c = slab.alloc(content(owner, 4)).unwrap();
        assert_eq!(c.index(), a.index());
        assert_eq!(slab.element(c), &4);
    }

    #[test]
    fn slab_release_chain() {
        let mut slab = Slab::with_capacity(0);
        let owner = slab.new_list_id().unwrap();
        let keys: Vec<_> = (0..4)
            .map(|i| slab.alloc(content(owner, i)).unwrap())
            .collect();
        for pair in keys.windows(2) {
            slab.connect(pair[0], pair[1]);
        }
        slab.connect(keys[3], keys[0]);

        slab.release_chain(keys[0], keys[3]);
        assert_eq!(slab.live(), 0);
        assert!(keys.iter().all(|&key| slab.get(key).is_none()));
    }

    #[test]
    fn slab_move_nodes() {
        let mut slab = Slab::with_capacity(0);
        let owner = slab.new_list_id().unwrap();
        let keys: Vec<_> = (0..5)
            .map(|i| slab.alloc(content(owner, i)).unwrap())
            .collect();
        for pair in keys.windows(2) {
            slab.connect(pair[0], pair[1]);
        }
        slab.connect(keys[4], keys[0]);

        // [0 1 2 3 4] -> [0 3 1 2 4]
        slab.move_nodes(keys[3], keys[3], keys[1]);
        let mut order = vec![];
        let mut key = keys[0];
        for _ in 0..5 {
            order.push(*slab.element(key));
            key = slab.next(key);
        }
        assert_eq!(order, vec![0, 3, 1, 2, 4]);
        assert_eq!(slab.prev(keys[3]), keys[0]);
        assert_eq!(slab.next(keys[2]), keys[4]);
        assert_eq!(slab.prev(keys[4]), keys[2]);
    }

    #[test]
    #[should_panic]
    fn slab_double_free() {
        let mut slab = Slab::with_capacity(0);
        let owner = slab.new_list_id().unwrap();
        let a = slab.alloc(content(owner, 1)).unwrap();
        slab.free(a);
        slab.free(a);
    }

    #[test]
    fn key_formatting() {
        let mut slab = Slab::with_capacity(0);
        let owner = slab.new_list_id().unwrap();
        let a = slab.alloc(content(owner, 1)).unwrap();
        assert_eq!(format!("{:?}", a), "NodeKey(0v0)");
        assert_eq!(a.to_string(), "n0v0");
        assert_eq!(format!("{:?}", NodeKey::DANGLING), "NodeKey(dangling)");
    }
}
