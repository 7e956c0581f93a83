use crate::pool::{Entry, NodeKey, Slab};
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// An iterator over the elements of a `List`.
///
/// It uses a pair of nodes `front..=back` to represent a closed subrange of
/// the list, together with the number of elements left in it.
///
/// The `Iter` borrows the token immutably, so the list cannot be written
/// while it is alive.
///
/// # Examples
///
/// ```compile_fail
/// use node_list::{GhostToken, List, NodePool};
///
/// GhostToken::new(|mut token| {
///     let pool = NodePool::new();
///     let mut list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
///     let mut iter = list.iter(&token);
///
///     // Won't compile, because the token is already borrowed immutably.
///     list.push_back(4, &mut token).unwrap();
///     println!("{:?}", iter.next());
/// });
/// ```
pub struct Iter<'a, T> {
    slab: &'a Slab<T>,
    front: NodeKey,
    back: NodeKey,
    len: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(slab: &'a Slab<T>, front: NodeKey, back: NodeKey, len: usize) -> Self {
        Self {
            slab,
            front,
            back,
            len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_tuple("Iter");
        for element in self.clone() {
            f.field(element);
        }
        f.finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    /// Return `*front` and shrink the range to `(front.next)..=back`,
    /// or return `None` if the range is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.slab.node(self.front);
        self.front = node.next;
        self.len -= 1;
        node.element.as_ref()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    /// Shrink the range to `front..=(back.prev)` and return `*back`,
    /// or return `None` if the range is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let node = self.slab.node(self.back);
        self.back = node.prev;
        self.len -= 1;
        node.element.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// A mutable iterator over the elements of a `List`.
///
/// `front..=back` denotes a closed subrange of the list.
///
/// Though the `IterMut` only holds a raw pointer into the pool, it actually
/// *borrows* the token mutably, so a phantom marker of `&'a mut T` is added
/// to keep the list from being read while it is alive.
///
/// # Examples
///
/// The list is not readable after an `IterMut` is created.
/// ```compile_fail
/// use node_list::{GhostToken, List, NodePool};
///
/// GhostToken::new(|mut token| {
///     let pool = NodePool::new();
///     let mut list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
///     let mut iter = list.iter_mut(&mut token);
///     println!("{:?}", list.back(&token));
///     println!("{:?}", iter.next());
/// });
/// ```
pub struct IterMut<'a, T> {
    entries: *mut Entry<T>,
    front: NodeKey,
    back: NodeKey,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(slab: &'a mut Slab<T>, front: NodeKey, back: NodeKey, len: usize) -> Self {
        Self {
            entries: slab.entries_ptr(),
            front,
            back,
            len,
            _marker: PhantomData,
        }
    }

    /// Split the node `key` into its element and its `(prev, next)` links.
    ///
    /// # Safety
    ///
    /// `key` must be a content node inside `front..=back` that has not been
    /// yielded yet. Every node of the range is visited at most once, since
    /// `len` counts the nodes left, so no two calls alias.
    unsafe fn take(&mut self, key: NodeKey) -> (&'a mut T, NodeKey, NodeKey) {
        // SAFETY: the slab is mutably borrowed for `'a` and not resized while
        // the iterator lives; `key` is a live link of the list.
        let entry = unsafe { &mut *self.entries.add(key.index()) };
        match entry.node_mut() {
            Some(node) => match node.element.as_mut() {
                Some(element) => (element, node.prev, node.next),
                None => panic!("sentinel {:?} inside an element range", key),
            },
            None => panic!("list links reference a free slot: {:?}", key),
        }
    }
}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.len).finish()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    /// Return `*front` and shrink the range to `(front.next)..=back`,
    /// or return `None` if the range is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: `len > 0`, so `front` has not been yielded from either end.
        let (element, _, next) = unsafe { self.take(self.front) };
        self.front = next;
        self.len -= 1;
        Some(element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    /// Shrink the range to `front..=(back.prev)` and return `*back`,
    /// or return `None` if the range is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: `len > 0`, so `back` has not been yielded from either end.
        let (element, prev, _) = unsafe { self.take(self.back) };
        self.back = prev;
        self.len -= 1;
        Some(element)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

unsafe impl<T: Send> Send for IterMut<'_, T> {}

unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::list::List;
    use crate::pool::NodePool;
    use ghost_cell::GhostToken;

    #[test]
    fn test_iter() {
        GhostToken::new(|mut token| {
            let pool = NodePool::new();
            let list = List::from_iter_in(&pool, 0..5, &mut token).unwrap();
            let mut iter = list.iter(&token);
            assert_eq!(iter.len(), 5);
            assert_eq!(iter.next(), Some(&0));
            assert_eq!(iter.next_back(), Some(&4));
            assert_eq!(iter.len(), 3);
            assert_eq!(iter.clone().collect::<Vec<_>>(), vec![&1, &2, &3]);
            assert_eq!(iter.next_back(), Some(&3));
            assert_eq!(iter.next(), Some(&1));
            assert_eq!(iter.next(), Some(&2));
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next_back(), None);

            assert_eq!(list.iter(&token).rev().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
            assert_eq!(list.iter(&token).last(), Some(&4));
        })
    }

    #[test]
    fn test_iter_empty() {
        GhostToken::new(|mut token| {
            let pool = NodePool::<i32>::new();
            let mut list = List::new_in(&pool, &mut token).unwrap();
            assert_eq!(list.iter(&token).next(), None);
            assert_eq!(list.iter(&token).next_back(), None);
            assert_eq!(list.iter_mut(&mut token).next(), None);
        })
    }

    #[test]
    fn test_iter_mut() {
        GhostToken::new(|mut token| {
            let pool = NodePool::new();
            let mut list = List::from_iter_in(&pool, 0..5, &mut token).unwrap();
            let mut iter = list.iter_mut(&mut token);
            let first = iter.next().unwrap();
            let last = iter.next_back().unwrap();
            // Both ends stay usable at the same time.
            std::mem::swap(first, last);
            for element in iter {
                *element *= 10;
            }
            assert_eq!(list.to_vec(&token), vec![4, 10, 20, 30, 0]);

            for element in list.iter_mut(&mut token).rev().take(2) {
                *element += 1;
            }
            assert_eq!(list.to_vec(&token), vec![4, 10, 20, 31, 1]);
        })
    }
}
