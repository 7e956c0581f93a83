use crate::error::{ListError, Result};
use crate::list::List;
use ghost_cell::GhostToken;
use std::cmp::Ordering;
use tracing::{debug, trace};

impl<'p, 'id, T> List<'p, 'id, T> {
    /// Returns `true` if the elements of the list are in non-decreasing
    /// order. An empty list and a single element are sorted.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let sorted = List::from_iter_in(&pool, [1, 2, 2, 9], &mut token).unwrap();
    ///     let unsorted = List::from_iter_in(&pool, [1, 3, 2], &mut token).unwrap();
    ///     assert!(sorted.is_sorted(&token));
    ///     assert!(!unsorted.is_sorted(&token));
    /// });
    /// ```
    pub fn is_sorted(&self, token: &GhostToken<'id>) -> bool
    where
        T: Ord,
    {
        self.is_sorted_by(|a, b| a.cmp(b), token)
    }

    /// Returns `true` if no element compares greater than its successor
    /// under `compare`.
    pub fn is_sorted_by<F>(&self, mut compare: F, token: &GhostToken<'id>) -> bool
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut iter = self.iter(token);
        let Some(mut prev) = iter.next() else {
            return true;
        };
        for element in iter {
            if compare(prev, element) == Ordering::Greater {
                return false;
            }
            prev = element;
        }
        true
    }

    /// Merge the sorted list `other` into this sorted list.
    ///
    /// Afterwards `self` holds every element of both lists in sorted order,
    /// and `other` is empty. The merge is stable: elements of each list keep
    /// their relative order, and among equal elements those of `self` come
    /// first.
    ///
    /// No element is cloned, moved in memory or dropped, and no node is
    /// allocated or freed: the nodes of `other` are relinked into `self`.
    /// Cursors to elements of `other` stay valid and now point into `self`.
    ///
    /// # Errors
    ///
    /// - [`ListError::ForeignPool`] if the lists live in different pools;
    /// - [`ListError::Unsorted`] if either list is not sorted (only with the
    ///   `sorted-check` feature, enabled by default).
    ///
    /// Both lists are untouched on error.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* + *m*) time and *O*(1)
    /// memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut a = List::from_iter_in(&pool, [1, 3, 5], &mut token).unwrap();
    ///     let mut b = List::from_iter_in(&pool, [2, 4, 6], &mut token).unwrap();
    ///     let live = pool.live_nodes(&token);
    ///
    ///     a.merge(&mut b, &mut token).unwrap();
    ///     assert_eq!(a.to_vec(&token), vec![1, 2, 3, 4, 5, 6]);
    ///     assert!(b.is_empty());
    ///     assert_eq!(pool.live_nodes(&token), live);
    /// });
    /// ```
    pub fn merge(&mut self, other: &mut Self, token: &mut GhostToken<'id>) -> Result<()>
    where
        T: Ord,
    {
        self.merge_by(other, |a, b| a.cmp(b), token)
    }

    /// Merge the list `other`, sorted by `compare`, into this list sorted by
    /// the same comparator. See [`List::merge`] for details.
    ///
    /// The comparator must define a total order on the elements. If it does
    /// not, or if the lists are not sorted and the `sorted-check` feature is
    /// disabled, the resulting order is unspecified, but the lists stay well
    /// formed and no element is lost.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let mut a = List::from_iter_in(&pool, [9, 4, 1], &mut token).unwrap();
    ///     let mut b = List::from_iter_in(&pool, [8, 4, 0], &mut token).unwrap();
    ///
    ///     // descending order
    ///     a.merge_by(&mut b, |x, y| y.cmp(x), &mut token).unwrap();
    ///     assert_eq!(a.to_vec(&token), vec![9, 8, 4, 4, 1, 0]);
    /// });
    /// ```
    pub fn merge_by<F>(
        &mut self,
        other: &mut Self,
        mut compare: F,
        token: &mut GhostToken<'id>,
    ) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if !self.pool.same_pool(other.pool) {
            return Err(ListError::ForeignPool);
        }
        if other.is_empty() {
            return Ok(());
        }
        #[cfg(feature = "sorted-check")]
        if !self.is_sorted_by(&mut compare, token) || !other.is_sorted_by(&mut compare, token) {
            return Err(ListError::Unsorted);
        }

        let pool = self.pool;
        let slab = pool.slab_mut(token);
        let (tail, other_tail) = (self.tail, other.tail);
        // `a` walks the destination, `b` the front of what is left of `other`.
        let (mut a, mut b) = (self.front_node(slab), other.front_node(slab));
        let (mut moved, mut runs) = (0_usize, 0_usize);
        while b != other_tail {
            // Find a position `a` in the destination, where the element
            // of `b` < `*a`. Equal elements stay behind.
            while a != tail && compare(slab.element(b), slab.element(a)) != Ordering::Less {
                a = slab.next(a);
            }

            // Find a run `b..=back` in `other`, where every element < `*a`.
            // Past the back of the destination, that is all of `other`.
            let back = if a == tail {
                other.back_node(slab)
            } else {
                let mut back = b;
                loop {
                    let next = slab.next(back);
                    if next == other_tail
                        || compare(slab.element(next), slab.element(a)) != Ordering::Less
                    {
                        break back;
                    }
                    back = next;
                }
            };
            let next = slab.next(back);

            // Move the run `b..=back` to the node before `a`.
            let count = self.adopt_nodes(slab, b, back);
            slab.move_nodes(b, back, a);
            self.len += count;
            other.len -= count;
            #[cfg(debug_assertions)]
            {
                slab.assert_adjacent(back, a);
                slab.assert_adjacent(other.head, next);
            }
            trace!(count, before = %a, "spliced a run");

            moved += count;
            runs += 1;
            b = next;
        }
        debug!(moved, runs, len = self.len, "merged lists");
        Ok(())
    }
}
