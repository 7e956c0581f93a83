use std::fmt::{self, Debug, Formatter};

use ghost_cell::GhostToken;

use crate::error::{ListError, Result};
use crate::list::cursor::{Cursor, CursorMut};
use crate::list::iterator::{Iter, IterMut};
use crate::pool::{ListId, Node, NodeKey, NodePool, Slab};

pub mod cursor;
pub mod iterator;

mod algorithms;

/// The `List` is a doubly-linked list whose nodes live in a [`NodePool`].
/// It allows inserting and removing elements at a known position in
/// constant time, and merging another sorted list of the same pool in
/// linear time without moving a single element.
///
/// The `List` contains:
/// - a reference to the pool holding its nodes;
/// - the keys of its two sentinel nodes, `head` and `tail`;
/// - the number of content nodes between them.
///
/// Every read of the list takes a `&GhostToken<'id>`, every write a
/// `&mut GhostToken<'id>` of the brand the pool was created with.
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of list nodes, both inclusive;
/// - `head`, `tail`: the sentinels, which hold no element. The tail is the
///   end position.
pub struct List<'p, 'id, T> {
    pool: &'p NodePool<'id, T>,
    id: ListId,
    head: NodeKey,
    tail: NodeKey,
    /// the number of content nodes
    len: usize,
}

// private methods
impl<'p, 'id, T> List<'p, 'id, T> {
    pub(crate) fn head_node(&self) -> NodeKey {
        self.head
    }

    pub(crate) fn tail_node(&self) -> NodeKey {
        self.tail
    }

    pub(crate) fn front_node(&self, slab: &Slab<T>) -> NodeKey {
        slab.next(self.head)
    }

    pub(crate) fn back_node(&self, slab: &Slab<T>) -> NodeKey {
        slab.prev(self.tail)
    }

    /// Allocate a node for `element` and link it right before `next`.
    ///
    /// Nothing is linked if the allocation fails.
    fn attach_node(&mut self, slab: &mut Slab<T>, next: NodeKey, element: T) -> Result<NodeKey> {
        let prev = slab.prev(next);
        #[cfg(debug_assertions)]
        slab.assert_adjacent(prev, next);
        let node = slab.alloc(Node::new(prev, next, self.id, element))?;
        slab.connect(prev, node);
        slab.connect(node, next);
        self.len += 1;
        #[cfg(debug_assertions)]
        {
            slab.assert_adjacent(prev, node);
            slab.assert_adjacent(node, next);
        }
        Ok(node)
    }

    /// Unlink the content node `node` and destroy it, returning its element.
    fn detach_node(&mut self, slab: &mut Slab<T>, node: NodeKey) -> T {
        let (prev, next) = (slab.prev(node), slab.next(node));
        slab.connect(prev, next);
        self.len -= 1;
        match slab.free(node).element {
            Some(element) => element,
            None => panic!("sentinel {:?} detached from a list", node),
        }
    }

    /// Hand the linked run `front..=back` over to this list, returning its
    /// length. The run must already be detached from, or about to be
    /// spliced out of, its previous owner.
    pub(crate) fn adopt_nodes(&self, slab: &mut Slab<T>, front: NodeKey, back: NodeKey) -> usize {
        let mut node = front;
        let mut count = 1;
        loop {
            slab.node_mut(node).owner = self.id;
            if node == back {
                return count;
            }
            node = slab.next(node);
            count += 1;
        }
    }

    /// Check that a cursor handed in by the caller points to a live node of
    /// this list.
    fn check_position(&self, slab: &Slab<T>, position: &CursorMut<'p, 'id, T>) -> Result<NodeKey> {
        match position.pool() {
            None => return Err(ListError::InvalidCursor),
            Some(pool) if !pool.same_pool(self.pool) => return Err(ListError::ForeignCursor),
            Some(_) => {}
        }
        let key = position.node();
        let node = slab.get(key).ok_or(ListError::DanglingCursor)?;
        if node.owner != self.id {
            return Err(ListError::ForeignCursor);
        }
        if key == self.head {
            return Err(ListError::BeforeBegin);
        }
        Ok(key)
    }

    /// Pop content nodes from the back until only `len` remain.
    fn truncate(&mut self, len: usize, token: &mut GhostToken<'id>) {
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        while self.len > len {
            let back = self.back_node(slab);
            self.detach_node(slab, back);
        }
    }
}

impl<'p, 'id, T> List<'p, 'id, T> {
    /// Create an empty `List` in `pool`.
    ///
    /// The two sentinel nodes are allocated right away; if that fails the
    /// pool is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let list: List<u32> = List::new_in(&pool, &mut token).unwrap();
    ///     assert!(list.is_empty());
    /// });
    /// ```
    pub fn new_in(pool: &'p NodePool<'id, T>, token: &mut GhostToken<'id>) -> Result<Self> {
        let slab = pool.slab_mut(token);
        let id = slab.new_list_id()?;
        let head = slab.alloc(Node::sentinel(id))?;
        let tail = match slab.alloc(Node::sentinel(id)) {
            Ok(tail) => tail,
            Err(err) => {
                slab.free(head);
                return Err(err);
            }
        };
        // The sentinels close a cycle: head -> tail -> head.
        slab.connect(head, tail);
        slab.connect(tail, head);
        Ok(List {
            pool,
            id,
            head,
            tail,
            len: 0,
        })
    }

    /// Create a `List` in `pool` holding the elements of `iter` in order.
    ///
    /// This is the entry point for input builders: the elements are appended
    /// with [`List::push_back`] and no ordering is required. On failure every
    /// node allocated so far is released again.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let list = List::from_iter_in(&pool, [3, 1, 2], &mut token).unwrap();
    ///     assert_eq!(list.to_vec(&token), vec![3, 1, 2]);
    /// });
    /// ```
    pub fn from_iter_in<I>(
        pool: &'p NodePool<'id, T>,
        iter: I,
        token: &mut GhostToken<'id>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut list = List::new_in(pool, token)?;
        if let Err(err) = list.extend(iter, token) {
            list.dispose(token);
            return Err(err);
        }
        Ok(list)
    }

    /// Append every element of `iter` to the back of the list.
    ///
    /// Either all elements are appended, or none: if a node cannot be
    /// allocated the elements appended by this call are removed again.
    pub fn extend<I>(&mut self, iter: I, token: &mut GhostToken<'id>) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len;
        for element in iter {
            if let Err(err) = self.push_back(element, token) {
                self.truncate(len, token);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Returns the pool the list allocates its nodes from.
    pub fn pool(&self) -> &'p NodePool<'id, T> {
        self.pool
    }

    /// Returns `true` if the `List` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the length of the `List`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::new_in(&pool, &mut token).unwrap();
    ///
    ///     list.push_back(2, &mut token).unwrap();
    ///     list.push_front(1, &mut token).unwrap();
    ///     assert_eq!(list.len(), 2);
    /// });
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Removes all elements from the `List`. The sentinels stay.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn clear(&mut self, token: &mut GhostToken<'id>) {
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        while !self.is_empty() {
            let front = self.front_node(slab);
            self.detach_node(slab, front);
        }
    }

    /// Destroy the list: every content node and both sentinels go back to
    /// the pool, and the elements are dropped front to back.
    ///
    /// Dropping the list does the same, except that the nodes are released
    /// by the next write to the pool, since releasing them needs the token.
    ///
    /// Cursors into the list report [`ListError::DanglingCursor`] afterwards.
    pub fn dispose(mut self, token: &mut GhostToken<'id>) {
        self.clear(token);
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        slab.free(self.head);
        slab.free(self.tail);
        // Everything is released already.
        std::mem::forget(self);
    }

    /// Provides a reference to the front element, or
    /// [`ListError::Empty`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, ListError, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::new_in(&pool, &mut token).unwrap();
    ///     assert_eq!(list.front(&token), Err(ListError::Empty));
    ///
    ///     list.push_front(1, &mut token).unwrap();
    ///     assert_eq!(list.front(&token), Ok(&1));
    /// });
    /// ```
    pub fn front<'a>(&'a self, token: &'a GhostToken<'id>) -> Result<&'a T> {
        if self.is_empty() {
            return Err(ListError::Empty);
        }
        let slab = self.pool.slab(token);
        Ok(slab.element(self.front_node(slab)))
    }

    /// Provides a mutable reference to the front element, or
    /// [`ListError::Empty`] if the list is empty.
    pub fn front_mut<'a>(&'a mut self, token: &'a mut GhostToken<'id>) -> Result<&'a mut T> {
        if self.is_empty() {
            return Err(ListError::Empty);
        }
        let slab = self.pool.slab_mut(token);
        let front = self.front_node(slab);
        Ok(slab.element_mut(front))
    }

    /// Provides a reference to the back element, or
    /// [`ListError::Empty`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, ListError, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::new_in(&pool, &mut token).unwrap();
    ///     assert_eq!(list.back(&token), Err(ListError::Empty));
    ///
    ///     list.push_back(1, &mut token).unwrap();
    ///     assert_eq!(list.back(&token), Ok(&1));
    /// });
    /// ```
    pub fn back<'a>(&'a self, token: &'a GhostToken<'id>) -> Result<&'a T> {
        if self.is_empty() {
            return Err(ListError::Empty);
        }
        let slab = self.pool.slab(token);
        Ok(slab.element(self.back_node(slab)))
    }

    /// Provides a mutable reference to the back element, or
    /// [`ListError::Empty`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::from_iter_in(&pool, [1, 2], &mut token).unwrap();
    ///     *list.back_mut(&mut token).unwrap() = 5;
    ///     assert_eq!(list.to_vec(&token), vec![1, 5]);
    /// });
    /// ```
    pub fn back_mut<'a>(&'a mut self, token: &'a mut GhostToken<'id>) -> Result<&'a mut T> {
        if self.is_empty() {
            return Err(ListError::Empty);
        }
        let slab = self.pool.slab_mut(token);
        let back = self.back_node(slab);
        Ok(slab.element_mut(back))
    }

    /// Adds an element first in the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn push_front(&mut self, elt: T, token: &mut GhostToken<'id>) -> Result<()> {
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let front = self.front_node(slab);
        self.attach_node(slab, front, elt).map(drop)
    }

    /// Appends an element to the back of a list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn push_back(&mut self, elt: T, token: &mut GhostToken<'id>) -> Result<()> {
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let tail = self.tail;
        self.attach_node(slab, tail, elt).map(drop)
    }

    /// Removes the first element and returns it, or [`ListError::Empty`] if
    /// the list is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, ListError, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::new_in(&pool, &mut token).unwrap();
    ///     assert_eq!(list.pop_front(&mut token), Err(ListError::Empty));
    ///
    ///     list.push_front(1, &mut token).unwrap();
    ///     list.push_front(3, &mut token).unwrap();
    ///     assert_eq!(list.pop_front(&mut token), Ok(3));
    ///     assert_eq!(list.pop_front(&mut token), Ok(1));
    /// });
    /// ```
    pub fn pop_front(&mut self, token: &mut GhostToken<'id>) -> Result<T> {
        if self.is_empty() {
            return Err(ListError::Empty);
        }
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let front = self.front_node(slab);
        Ok(self.detach_node(slab, front))
    }

    /// Removes the last element and returns it, or [`ListError::Empty`] if
    /// the list is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn pop_back(&mut self, token: &mut GhostToken<'id>) -> Result<T> {
        if self.is_empty() {
            return Err(ListError::Empty);
        }
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let back = self.back_node(slab);
        Ok(self.detach_node(slab, back))
    }

    /// Provides a read-only cursor at the first element, or at the end
    /// position if the list is empty.
    pub fn cursor_front(&self, token: &GhostToken<'id>) -> Cursor<'p, 'id, T> {
        let front = self.front_node(self.pool.slab(token));
        Cursor::new(self.pool, front)
    }

    /// Provides a read-only cursor at the end position (the tail sentinel).
    pub fn cursor_end(&self) -> Cursor<'p, 'id, T> {
        Cursor::new(self.pool, self.tail)
    }

    /// Provides a cursor at the first element that can mutate the element
    /// and serve as a position for [`List::insert`] and [`List::erase`].
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
    ///     let cursor = list.cursor_front_mut(&token);
    ///
    ///     *cursor.get_mut(&mut token).unwrap() *= 5;
    ///     assert_eq!(list.to_vec(&token), vec![5, 2, 3]);
    /// });
    /// ```
    pub fn cursor_front_mut(&mut self, token: &GhostToken<'id>) -> CursorMut<'p, 'id, T> {
        let front = self.front_node(self.pool.slab(token));
        CursorMut::new(self.pool, front)
    }

    /// Provides a mutable cursor at the end position (the tail sentinel).
    pub fn cursor_end_mut(&mut self) -> CursorMut<'p, 'id, T> {
        CursorMut::new(self.pool, self.tail)
    }

    /// Inserts `elt` right before `position` and returns a cursor to it.
    ///
    /// `position` may be the end position, which appends to the list.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::InvalidCursor`], [`ListError::DanglingCursor`]
    /// or [`ListError::ForeignCursor`] if `position` is not a live position
    /// of this list, and with [`ListError::AllocFailed`] if no node can be
    /// allocated. The list is unchanged on failure.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::from_iter_in(&pool, [1, 3], &mut token).unwrap();
    ///
    ///     let three = list.cursor_front_mut(&token).next(&token).unwrap();
    ///     let two = list.insert(three, 2, &mut token).unwrap();
    ///     assert_eq!(two.get(&token), Ok(&2));
    ///
    ///     let end = list.cursor_end_mut();
    ///     list.insert(end, 4, &mut token).unwrap();
    ///     assert_eq!(list.to_vec(&token), vec![1, 2, 3, 4]);
    /// });
    /// ```
    pub fn insert(
        &mut self,
        position: CursorMut<'p, 'id, T>,
        elt: T,
        token: &mut GhostToken<'id>,
    ) -> Result<CursorMut<'p, 'id, T>> {
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let next = self.check_position(slab, &position)?;
        let node = self.attach_node(slab, next, elt)?;
        Ok(CursorMut::new(pool, node))
    }

    /// Removes the element at `position` and returns a cursor to the
    /// position that followed it (possibly the end position).
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::EndPosition`] if `position` is the end
    /// position, and like [`List::insert`] if it is not a live position of
    /// this list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, ListError, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::from_iter_in(&pool, [1, 2], &mut token).unwrap();
    ///
    ///     let one = list.cursor_front_mut(&token);
    ///     let two = list.erase(one, &mut token).unwrap();
    ///     assert_eq!(two.get(&token), Ok(&2));
    ///
    ///     // The erased position is gone for good.
    ///     assert_eq!(one.get(&token), Err(ListError::DanglingCursor));
    ///     let end = list.cursor_end_mut();
    ///     assert_eq!(list.erase(end, &mut token), Err(ListError::EndPosition));
    /// });
    /// ```
    pub fn erase(
        &mut self,
        position: CursorMut<'p, 'id, T>,
        token: &mut GhostToken<'id>,
    ) -> Result<CursorMut<'p, 'id, T>> {
        self.remove(position, token).map(|(next, _)| next)
    }

    /// Like [`List::erase`], but hands the removed element back to the
    /// caller together with the cursor to the following position.
    pub fn remove(
        &mut self,
        position: CursorMut<'p, 'id, T>,
        token: &mut GhostToken<'id>,
    ) -> Result<(CursorMut<'p, 'id, T>, T)> {
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let node = self.check_position(slab, &position)?;
        if node == self.tail {
            return Err(ListError::EndPosition);
        }
        let next = slab.next(node);
        let element = self.detach_node(slab, node);
        Ok((CursorMut::new(pool, next), element))
    }

    /// Moves all elements from `other` to the end of the list.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`.
    /// After this operation, `other` becomes empty. Cursors into `other`
    /// keep pointing to the same elements, now in `self`.
    ///
    /// # Errors
    ///
    /// Fails with [`ListError::ForeignPool`] if the lists live in different
    /// pools.
    ///
    /// # Complexity
    ///
    /// This operation relinks in *O*(1) time and updates the owner of the
    /// moved nodes in *O*(*m*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list1 = List::from_iter_in(&pool, ['a'], &mut token).unwrap();
    ///     let mut list2 = List::from_iter_in(&pool, ['b', 'c'], &mut token).unwrap();
    ///
    ///     list1.append(&mut list2, &mut token).unwrap();
    ///     assert_eq!(list1.to_vec(&token), vec!['a', 'b', 'c']);
    ///     assert!(list2.is_empty());
    /// });
    /// ```
    pub fn append(&mut self, other: &mut Self, token: &mut GhostToken<'id>) -> Result<()> {
        if !self.pool.same_pool(other.pool) {
            return Err(ListError::ForeignPool);
        }
        if other.is_empty() {
            return Ok(());
        }
        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let (front, back) = (other.front_node(slab), other.back_node(slab));
        let moved = self.adopt_nodes(slab, front, back);
        slab.move_nodes(front, back, self.tail);
        self.len += moved;
        other.len -= moved;
        #[cfg(debug_assertions)]
        slab.assert_adjacent(other.head, other.tail);
        Ok(())
    }

    /// Provides a forward iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let list = List::from_iter_in(&pool, 0..3, &mut token).unwrap();
    ///
    ///     let mut iter = list.iter(&token);
    ///     assert_eq!(iter.next(), Some(&0));
    ///     assert_eq!(iter.next(), Some(&1));
    ///     assert_eq!(iter.next(), Some(&2));
    ///     assert_eq!(iter.next(), None);
    /// });
    /// ```
    #[inline]
    pub fn iter<'a>(&'a self, token: &'a GhostToken<'id>) -> Iter<'a, T> {
        let slab = self.pool.slab(token);
        Iter::new(slab, self.front_node(slab), self.back_node(slab), self.len)
    }

    /// Provides a forward iterator with mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::from_iter_in(&pool, 0..3, &mut token).unwrap();
    ///
    ///     for element in list.iter_mut(&mut token) {
    ///         *element += 10;
    ///     }
    ///     assert_eq!(list.to_vec(&token), vec![10, 11, 12]);
    /// });
    /// ```
    #[inline]
    pub fn iter_mut<'a>(&'a mut self, token: &'a mut GhostToken<'id>) -> IterMut<'a, T> {
        let slab = self.pool.slab_mut(token);
        let (front, back) = (self.front_node(slab), self.back_node(slab));
        IterMut::new(slab, front, back, self.len)
    }

    /// Returns `true` if the `List` contains an element equal to the given value.
    pub fn contains(&self, x: &T, token: &GhostToken<'id>) -> bool
    where
        T: PartialEq,
    {
        self.iter(token).any(|e| e == x)
    }

    /// Copies the elements into a `Vec`, front to back.
    pub fn to_vec(&self, token: &GhostToken<'id>) -> Vec<T>
    where
        T: Clone,
    {
        self.iter(token).cloned().collect()
    }

    /// A [`Debug`] adapter printing the elements of the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let list = List::from_iter_in(&pool, [1, 2], &mut token).unwrap();
    ///     assert_eq!(format!("{:?}", list.debug(&token)), "[1, 2]");
    /// });
    /// ```
    pub fn debug<'a>(&'a self, token: &'a GhostToken<'id>) -> DebugList<'a, T> {
        DebugList {
            iter: self.iter(token),
        }
    }

    /// Copy construction: a new list in the same pool holding clones of
    /// every element, in order. No node is shared with `self`.
    pub fn duplicate(&self, token: &mut GhostToken<'id>) -> Result<Self>
    where
        T: Clone,
    {
        self.duplicate_in(self.pool, token)
    }

    /// Like [`List::duplicate`], with the copy allocated in `pool`.
    ///
    /// On failure every node of the partial copy is released again.
    pub fn duplicate_in<'q>(
        &self,
        pool: &'q NodePool<'id, T>,
        token: &mut GhostToken<'id>,
    ) -> Result<List<'q, 'id, T>>
    where
        T: Clone,
    {
        let mut copy = List::new_in(pool, token)?;
        let mut node = self.front_node(self.pool.slab(token));
        while node != self.tail {
            let (element, next) = {
                let slab = self.pool.slab(token);
                (slab.element(node).clone(), slab.next(node))
            };
            if let Err(err) = copy.push_back(element, token) {
                copy.dispose(token);
                return Err(err);
            }
            node = next;
        }
        Ok(copy)
    }

    /// Assignment: replace the contents of `self` with clones of the
    /// elements of `source`.
    ///
    /// The copy is built before anything is removed, so on failure `self`
    /// still holds its old elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
    ///     let source = List::from_iter_in(&pool, [7, 8], &mut token).unwrap();
    ///
    ///     list.assign_from(&source, &mut token).unwrap();
    ///     assert_eq!(list.to_vec(&token), vec![7, 8]);
    ///     assert_eq!(source.to_vec(&token), vec![7, 8]);
    /// });
    /// ```
    pub fn assign_from(
        &mut self,
        source: &List<'_, 'id, T>,
        token: &mut GhostToken<'id>,
    ) -> Result<()>
    where
        T: Clone,
    {
        let mut copy = source.duplicate_in(self.pool, token)?;
        self.clear(token);
        let appended = self.append(&mut copy, token);
        copy.dispose(token);
        appended
    }
}

/// Debug view of a list, see [`List::debug`].
pub struct DebugList<'a, T> {
    iter: Iter<'a, T>,
}

impl<T: Debug> Debug for DebugList<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter.clone()).finish()
    }
}

impl<T> Drop for List<'_, '_, T> {
    fn drop(&mut self) {
        self.pool.defer_release(self.head, self.tail, self.len + 2);
    }
}

impl<T> Debug for List<'_, '_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("List")
            .field("id", &self.id)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("len", &self.len)
            .finish()
    }
}
