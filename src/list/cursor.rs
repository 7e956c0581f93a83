use crate::error::{ListError, Result};
use crate::pool::{Node, NodeKey, NodePool, Slab};
use ghost_cell::GhostToken;
use std::fmt;
use std::fmt::Formatter;

/// A read-only cursor over a `List`.
///
/// A `Cursor` is a position in a list: it names one node, either an element
/// or the end position (the tail sentinel). It is a plain `Copy` handle that
/// does not borrow the list, so it stays usable while the list is changed.
/// Inserting or erasing other elements, and merging the list with another
/// one, never moves it. Only erasing its own element invalidates it; every
/// operation on it then fails with [`ListError::DanglingCursor`].
///
/// In a list with length *n*, there are *n* + 1 valid positions for the
/// cursor: the *n* elements and the end position.
///
/// # Examples
///
/// Here is a simple example showing how the cursors work. (The end position
/// of the list is denoted by `#`).
/// ```
/// use node_list::{GhostToken, List, ListError, NodePool};
///
/// GhostToken::new(|mut token| {
///     let pool = NodePool::new();
///     // Create a list: [ A B C D #]
///     let list = List::from_iter_in(&pool, ['A', 'B', 'C', 'D'], &mut token).unwrap();
///
///     // Create a cursor at the front: [|A B C D #]
///     let mut cursor = list.cursor_front(&token);
///     assert_eq!(cursor.get(&token), Ok(&'A'));
///
///     // Move cursor forward: [ A|B C D #]
///     assert!(cursor.move_next(&token).is_ok());
///     assert_eq!(cursor.get(&token), Ok(&'B'));
///
///     // Create a cursor at the end: [ A B C D|#]
///     let mut cursor = list.cursor_end();
///     assert_eq!(cursor.get(&token), Err(ListError::EndPosition));
///     assert_eq!(cursor.move_next(&token), Err(ListError::EndPosition));
///
///     // Move cursor backward: [ A B C|D #]
///     assert!(cursor.move_prev(&token).is_ok());
///     assert_eq!(cursor.get(&token), Ok(&'D'));
/// });
/// ```
pub struct Cursor<'p, 'id, T> {
    pool: Option<&'p NodePool<'id, T>>,
    key: NodeKey,
}

/// A cursor over a `List` that can mutate the element it points to.
///
/// A `CursorMut` is what [`List::insert`](crate::List::insert) and
/// [`List::erase`](crate::List::erase) take as a position. Like [`Cursor`] it
/// is a `Copy` handle; writing through it needs the `&mut GhostToken`, which
/// rules out holding any other reference into the pool at the same time.
///
/// # Examples
///
/// ```
/// use node_list::{GhostToken, List, NodePool};
///
/// GhostToken::new(|mut token| {
///     let pool = NodePool::new();
///     let mut list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
///
///     let mut cursor = list.cursor_front_mut(&token);
///     cursor.move_next(&token).unwrap();
///     *cursor.get_mut(&mut token).unwrap() *= 5;
///     assert_eq!(list.to_vec(&token), vec![1, 10, 3]);
/// });
/// ```
///
/// A mutable reference obtained through a cursor keeps the token borrowed,
/// so the list cannot be read until it is gone:
///
/// ```compile_fail
/// use node_list::{GhostToken, List, NodePool};
///
/// GhostToken::new(|mut token| {
///     let pool = NodePool::new();
///     let mut list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
///     let cursor = list.cursor_front_mut(&token);
///     let first = cursor.get_mut(&mut token).unwrap();
///     println!("{:?}", list.back(&token));
///     *first = 0;
/// });
/// ```
pub struct CursorMut<'p, 'id, T> {
    pool: Option<&'p NodePool<'id, T>>,
    key: NodeKey,
}

macro_rules! impl_cursor {
    ($CURSOR:ident) => {
        // Private methods
        impl<'p, 'id, T> $CURSOR<'p, 'id, T> {
            pub(crate) fn new(pool: &'p NodePool<'id, T>, key: NodeKey) -> Self {
                Self {
                    pool: Some(pool),
                    key,
                }
            }

            pub(crate) fn pool(&self) -> Option<&'p NodePool<'id, T>> {
                self.pool
            }

            /// Resolve the cursor to its pool and its live node.
            fn resolve<'a>(
                &'a self,
                token: &'a GhostToken<'id>,
            ) -> Result<(&'a Slab<T>, &'a Node<T>)> {
                let pool = self.pool.ok_or(ListError::InvalidCursor)?;
                let slab = pool.slab(token);
                let node = slab.get(self.key).ok_or(ListError::DanglingCursor)?;
                Ok((slab, node))
            }

            fn next_key(&self, token: &GhostToken<'id>) -> Result<NodeKey> {
                let (_, node) = self.resolve(token)?;
                if node.is_sentinel() {
                    return Err(ListError::EndPosition);
                }
                Ok(node.next)
            }

            fn prev_key(&self, token: &GhostToken<'id>) -> Result<NodeKey> {
                let (slab, node) = self.resolve(token)?;
                // The node before the first element is the head sentinel.
                if slab.node(node.prev).is_sentinel() {
                    return Err(ListError::BeforeBegin);
                }
                Ok(node.prev)
            }
        }

        impl<'p, 'id, T> $CURSOR<'p, 'id, T> {
            /// Return a reference to the element at the cursor.
            ///
            /// # Errors
            ///
            /// - [`ListError::InvalidCursor`] for a default-constructed cursor;
            /// - [`ListError::DanglingCursor`] if the element has been erased;
            /// - [`ListError::EndPosition`] at the end position.
            pub fn get<'a>(&self, token: &'a GhostToken<'id>) -> Result<&'a T>
            where
                'p: 'a,
            {
                let pool = self.pool.ok_or(ListError::InvalidCursor)?;
                let node = pool.slab(token).get(self.key).ok_or(ListError::DanglingCursor)?;
                node.element.as_ref().ok_or(ListError::EndPosition)
            }

            /// Returns `true` if the cursor is at the end position.
            ///
            /// # Examples
            ///
            /// ```
            /// use node_list::{GhostToken, List, NodePool};
            ///
            /// GhostToken::new(|mut token| {
            ///     let pool = NodePool::new();
            ///     let list = List::from_iter_in(&pool, [1], &mut token).unwrap();
            ///     let mut cursor = list.cursor_front(&token);
            ///     assert_eq!(cursor.is_end(&token), Ok(false));
            ///     cursor.move_next(&token).unwrap();
            ///     assert_eq!(cursor.is_end(&token), Ok(true));
            /// });
            /// ```
            pub fn is_end(&self, token: &GhostToken<'id>) -> Result<bool> {
                let (_, node) = self.resolve(token)?;
                Ok(node.is_sentinel())
            }

            /// The key of the node the cursor points to.
            pub fn node(&self) -> NodeKey {
                self.key
            }

            /// Move the cursor to the next position.
            ///
            /// Fails with [`ListError::EndPosition`] at the end position, in
            /// which case the cursor stays put.
            ///
            /// This operation should compute in *O*(1) time.
            pub fn move_next(&mut self, token: &GhostToken<'id>) -> Result<()> {
                self.key = self.next_key(token)?;
                Ok(())
            }

            /// Move the cursor to the previous position.
            ///
            /// Fails with [`ListError::BeforeBegin`] at the first element (or at
            /// the end position of an empty list), in which case the cursor
            /// stays put.
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
            ///     let list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
            ///     let mut cursor = list.cursor_front(&token);
            ///
            ///     assert_eq!(cursor.move_prev(&token), Err(ListError::BeforeBegin));
            ///     // The cursor is still at the first element
            ///     assert_eq!(cursor.get(&token), Ok(&1));
            /// });
            /// ```
            pub fn move_prev(&mut self, token: &GhostToken<'id>) -> Result<()> {
                self.key = self.prev_key(token)?;
                Ok(())
            }

            /// Return a cursor at the next position, leaving `self` as is.
            ///
            /// Fails like [`move_next`](Self::move_next).
            pub fn next(&self, token: &GhostToken<'id>) -> Result<Self> {
                Ok(Self {
                    pool: self.pool,
                    key: self.next_key(token)?,
                })
            }

            /// Return a cursor at the previous position, leaving `self` as is.
            ///
            /// Fails like [`move_prev`](Self::move_prev).
            pub fn prev(&self, token: &GhostToken<'id>) -> Result<Self> {
                Ok(Self {
                    pool: self.pool,
                    key: self.prev_key(token)?,
                })
            }
        }

        impl<T> Clone for $CURSOR<'_, '_, T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $CURSOR<'_, '_, T> {}

        /// An invalid cursor, pointing into no list.
        impl<T> Default for $CURSOR<'_, '_, T> {
            fn default() -> Self {
                Self {
                    pool: None,
                    key: NodeKey::DANGLING,
                }
            }
        }

        /// Cursors are equal when they name the same node of the same pool.
        impl<T> PartialEq for $CURSOR<'_, '_, T> {
            fn eq(&self, other: &Self) -> bool {
                let same_pool = match (self.pool, other.pool) {
                    (Some(a), Some(b)) => a.same_pool(b),
                    (None, None) => true,
                    _ => false,
                };
                same_pool && self.key == other.key
            }
        }

        impl<T> Eq for $CURSOR<'_, '_, T> {}

        impl<T> fmt::Debug for $CURSOR<'_, '_, T> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($CURSOR))
                    .field("pool", &self.pool.map(|pool| pool as *const NodePool<'_, T>))
                    .field("node", &self.key)
                    .finish()
            }
        }
    };
}

impl_cursor!(CursorMut);
impl_cursor!(Cursor);

impl<'p, 'id, T> CursorMut<'p, 'id, T> {
    /// Return a mutable reference to the element at the cursor.
    ///
    /// Fails like [`CursorMut::get`].
    pub fn get_mut<'a>(&self, token: &'a mut GhostToken<'id>) -> Result<&'a mut T>
    where
        'p: 'a,
    {
        let pool = self.pool.ok_or(ListError::InvalidCursor)?;
        let node = pool.slab_mut(token).get_mut(self.key).ok_or(ListError::DanglingCursor)?;
        node.element.as_mut().ok_or(ListError::EndPosition)
    }

    /// Convert the mutable cursor to a read-only one at the same position.
    pub fn as_cursor(&self) -> Cursor<'p, 'id, T> {
        Cursor {
            pool: self.pool,
            key: self.key,
        }
    }
}

impl<'p, 'id, T> From<CursorMut<'p, 'id, T>> for Cursor<'p, 'id, T> {
    fn from(cursor: CursorMut<'p, 'id, T>) -> Self {
        cursor.as_cursor()
    }
}
