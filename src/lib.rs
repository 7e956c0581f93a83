//! This crate provides a doubly-linked list whose nodes live in a shared node
//! pool, with a header and a trailer sentinel on each list.
//!
//! The [`List`] allows inserting, removing elements at any given position in
//! constant time, and merging another sorted list of the same pool in linear
//! time by relinking its nodes. In compromise, accessing or mutating elements
//! at any position take *O*(*n*) time.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use node_list::{GhostToken, List, NodePool};
//!
//! GhostToken::new(|mut token| {
//!     let pool = NodePool::new();
//!     let mut list = List::from_iter_in(&pool, [1, 2, 3, 4], &mut token).unwrap();
//!
//!     let front = list.cursor_front_mut(&token);
//!     list.insert(front, 0, &mut token).unwrap(); // insert 0 at the beginning of the list
//!     assert_eq!(front.get(&token), Ok(&1));
//!     assert_eq!(list.to_vec(&token), vec![0, 1, 2, 3, 4]);
//!
//!     let mut three = front;
//!     three.move_next(&token).unwrap();
//!     three.move_next(&token).unwrap();
//!     let four = list.erase(three, &mut token).unwrap(); // remove 3
//!     assert_eq!(four.get(&token), Ok(&4));
//!     assert_eq!(list.to_vec(&token), vec![0, 1, 2, 4]);
//! });
//! ```
//!
//! # Ownership
//!
//! Nodes are stored in a [`NodePool`], and the pool is wrapped in a
//! [`GhostCell`](ghost_cell::GhostCell): reading any node needs a shared
//! borrow of the [`GhostToken`] of the same brand, writing needs a mutable
//! one. The brand is the lifetime `'id` given by [`GhostToken::new`].
//!
//! Lists and cursors only hold a shared reference to the pool. Cursors are
//! `Copy` handles that do not borrow the list, so a cursor taken before an
//! insertion, an erasure or a merge is still usable afterwards, as long as
//! its own node was not erased.
//!
//! [`List::dispose`] returns the nodes of a list to the pool right away.
//! Dropping a list cannot reach the token, so the list queues its nodes on
//! the pool instead, and the next write to the pool releases them.
//!
//! # Memory Layout
//!
//! The memory layout of a list is like the following graph:
//! ```text
//!     ┌────────────────────────────────────────────────────────────────────────┐
//!     ↓   (Head)                                                    (Tail)     │
//!  ┌───────────┐       ╔═══════════╗                             ┌───────────┐ │
//!  │   next    │ ────→ ║   next    ║ ────→ ┄┄ ────────────────→  │   next    │ ┘
//!  ├───────────┤       ╟───────────╢       Node 1, 2, ...        ├───────────┤
//! ┌│   prev    │ ←──── ║   prev    ║ ←──── ┄┄ ←────────────────  │   prev    │
//! │├───────────┤       ╟───────────╢                             ├───────────┤
//! │┊No payload ┊       ║ payload T ║                             ┊No payload ┊
//! │└╌╌╌╌╌╌╌╌╌╌╌┘       ╚═══════════╝                             └╌╌╌╌╌╌╌╌╌╌╌╌┘
//! │      ↑                Node 0                                   ↑     ↑
//! └──────┼─────────────────────────────────────────────────────────┘     │
//! ╔═══════════╗                                                          │
//! ║   head    ║ ─────────────────────────────────────────────────────────┘
//! ╟───────────╢          (head → tail)
//! ║   tail    ║
//! ╟───────────╢
//! ║    len    ║
//! ╚═══════════╝
//!     List
//! ```
//! The `List` contains:
//! - the keys `head` and `tail` of its two sentinel nodes in the pool;
//! - a length field `len` indicating the number of elements.
//!
//! Each node of the list is a slot of the pool, which contains:
//! - the `next` key of the next node (the tail sentinel after the last
//!   element);
//! - the `prev` key of the previous node (the head sentinel before the first
//!   element);
//! - the list owning the node;
//! - the actual payload `T`, except in the sentinels.
//!
//! Initially, there are only the two sentinels in an empty list, linked to
//! each other in both directions. As elements are inserted into the list,
//! `head.next` points to the first element, and `tail.prev` points to the
//! last element of the list. The tail sentinel is the end position.
//!
//! Node keys carry a generation. Erasing a node frees its slot and bumps the
//! generation, so a cursor to an erased element reports
//! [`ListError::DanglingCursor`] rather than reaching whatever reuses the
//! slot.
//!
//! # Iteration
//!
//! Iterating over a list is by the [`Iter`] and [`IterMut`] iterators. These are
//! double-ended iterators and iterate the list like an array (fused and non-cyclic).
//! [`IterMut`] provides mutability of the elements (but not the linked structure of
//! the list).
//!
//! ## Examples
//!
//! ```
//! use node_list::{GhostToken, List, NodePool};
//!
//! GhostToken::new(|mut token| {
//!     let pool = NodePool::new();
//!     let mut list = List::from_iter_in(&pool, [1, 2, 3], &mut token).unwrap();
//!     let mut iter = list.iter(&token);
//!     assert_eq!(iter.next(), Some(&1));
//!     assert_eq!(iter.next(), Some(&2));
//!     assert_eq!(iter.next(), Some(&3));
//!     assert_eq!(iter.next(), None);
//!     assert_eq!(iter.next(), None); // Fused and non-cyclic
//!
//!     list.iter_mut(&mut token).for_each(|item| *item *= 2);
//!     assert_eq!(list.to_vec(&token), vec![2, 4, 6]);
//! });
//! ```
//!
//! # Merging
//!
//! [`List::merge`] takes two sorted lists of the same pool and moves every
//! node of the second one into the first, keeping it sorted. It allocates
//! nothing and never touches an element except to compare it; cursors into
//! either list keep their elements.
//!
//! ```
//! use node_list::{GhostToken, List, NodePool};
//!
//! GhostToken::new(|mut token| {
//!     let pool = NodePool::new();
//!     let mut a = List::from_iter_in(&pool, [1, 3, 5], &mut token).unwrap();
//!     let mut b = List::from_iter_in(&pool, [2, 4, 6], &mut token).unwrap();
//!     let four = b.cursor_front(&token).next(&token).unwrap();
//!
//!     a.merge(&mut b, &mut token).unwrap();
//!     assert_eq!(a.to_vec(&token), vec![1, 2, 3, 4, 5, 6]);
//!     assert!(b.is_empty());
//!     assert_eq!(four.next(&token).unwrap().get(&token), Ok(&5));
//! });
//! ```
//!
//! # Features
//!
//! - `sorted-check` (default): [`List::merge`] checks both inputs in
//!   *O*(*n* + *m*) time and fails with [`ListError::Unsorted`] instead of
//!   producing an unspecified order.
//!
//! [`List`]: crate::List
//! [`Iter`]: crate::Iter
//! [`IterMut`]: crate::IterMut

pub use ghost_cell::GhostToken;

#[doc(inline)]
pub use error::{ListError, Result};
#[doc(inline)]
pub use graph::{Dot, GraphView, NodeRef};
#[doc(inline)]
pub use list::cursor::{Cursor, CursorMut};
#[doc(inline)]
pub use list::iterator::{Iter, IterMut};
#[doc(inline)]
pub use list::List;
#[doc(inline)]
pub use pool::{NodeKey, NodePool};

pub mod error;
pub mod graph;
pub mod list;
pub mod pool;
