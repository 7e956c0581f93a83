//! Read-only views of the node structure of lists, for diagnostics.
//!
//! A [`GraphView`] exposes the raw links of one list, sentinels included.
//! [`Dot`] renders any number of views as a Graphviz digraph:
//!
//! ```
//! use node_list::{Dot, GhostToken, List, NodePool};
//!
//! GhostToken::new(|mut token| {
//!     let pool = NodePool::new();
//!     let a = List::from_iter_in(&pool, [1, 3], &mut token).unwrap();
//!     let b = List::from_iter_in(&pool, [2], &mut token).unwrap();
//!
//!     let dot = Dot::new().with("A", a.graph(&token)).with("B", b.graph(&token));
//!     let text = dot.to_string();
//!     assert!(text.starts_with("digraph lists {"));
//!     assert!(text.contains("label=\"A\""));
//! });
//! ```

use crate::list::List;
use crate::pool::{NodeKey, Slab};
use ghost_cell::GhostToken;
use std::fmt::{self, Display, Formatter, Write};
use std::iter::FusedIterator;

/// The nodes and links of one list.
pub struct GraphView<'a, T> {
    slab: &'a Slab<T>,
    head: NodeKey,
    tail: NodeKey,
}

/// One node seen through a [`GraphView`].
pub struct NodeRef<'a, T> {
    key: NodeKey,
    element: Option<&'a T>,
    prev: NodeKey,
    next: NodeKey,
}

impl<'p, 'id, T> List<'p, 'id, T> {
    /// A read-only view of the nodes of the list, sentinels included.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_list::{GhostToken, List, NodePool};
    ///
    /// GhostToken::new(|mut token| {
    ///     let pool = NodePool::new();
    ///     let list = List::from_iter_in(&pool, [7], &mut token).unwrap();
    ///     let graph = list.graph(&token);
    ///
    ///     let head = graph.resolve(graph.head()).unwrap();
    ///     assert!(head.is_sentinel());
    ///     let seven = graph.resolve(head.next()).unwrap();
    ///     assert_eq!(seven.element(), Some(&7));
    ///     assert_eq!(seven.next(), graph.tail());
    /// });
    /// ```
    pub fn graph<'a>(&'a self, token: &'a GhostToken<'id>) -> GraphView<'a, T> {
        GraphView {
            slab: self.pool().slab(token),
            head: self.head_node(),
            tail: self.tail_node(),
        }
    }
}

impl<'a, T> GraphView<'a, T> {
    /// Key of the head sentinel.
    pub fn head(&self) -> NodeKey {
        self.head
    }

    /// Key of the tail sentinel, the end position.
    pub fn tail(&self) -> NodeKey {
        self.tail
    }

    /// Look up any node of the pool. Returns `None` for a destroyed node.
    pub fn resolve(&self, key: NodeKey) -> Option<NodeRef<'a, T>> {
        self.slab.get(key).map(|node| NodeRef {
            key,
            element: node.element.as_ref(),
            prev: node.prev,
            next: node.next,
        })
    }

    /// The nodes of the list from the head sentinel to the tail sentinel,
    /// following `next` links.
    pub fn nodes(&self) -> Nodes<'a, T> {
        Nodes {
            view: *self,
            current: Some(self.head),
        }
    }
}

impl<T> Clone for GraphView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for GraphView<'_, T> {}

impl<'a, T> NodeRef<'a, T> {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// The element, or `None` for a sentinel.
    pub fn element(&self) -> Option<&'a T> {
        self.element
    }

    pub fn prev(&self) -> NodeKey {
        self.prev
    }

    pub fn next(&self) -> NodeKey {
        self.next
    }

    pub fn is_sentinel(&self) -> bool {
        self.element.is_none()
    }
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key)
            .field("element", &self.element)
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}

/// Iterator over the nodes of a [`GraphView`], see [`GraphView::nodes`].
pub struct Nodes<'a, T> {
    view: GraphView<'a, T>,
    current: Option<NodeKey>,
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.view.resolve(self.current?)?;
        self.current = (node.key != self.view.tail).then_some(node.next);
        Some(node)
    }
}

impl<T> FusedIterator for Nodes<'_, T> {}

/// Graphviz DOT rendering of one or more lists.
///
/// Every list becomes a cluster labelled with its name. Sentinels are drawn
/// as boxes labelled `head` and `tail`, elements with their `Display` text.
/// Solid edges follow `next` links, dashed edges `prev` links; the links
/// closing the sentinel cycle are left out.
pub struct Dot<'a, T> {
    graphs: Vec<(String, GraphView<'a, T>)>,
}

impl<'a, T> Dot<'a, T> {
    pub fn new() -> Self {
        Dot { graphs: Vec::new() }
    }

    /// Add a list named `name`.
    pub fn with(mut self, name: impl Into<String>, view: GraphView<'a, T>) -> Self {
        self.graphs.push((name.into(), view));
        self
    }
}

impl<T> Default for Dot<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

struct NodeId(usize, NodeKey);

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "l{}_{}", self.0, self.1)
    }
}

/// Escape `text` for a double-quoted DOT string.
struct Escaped<D>(D);

impl<D: Display> Display for Escaped<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        write!(text, "{}", self.0)?;
        for c in text.chars() {
            match c {
                '"' | '\\' => write!(f, "\\{}", c)?,
                '\n' => f.write_str("\\n")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

impl<T: Display> Display for Dot<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph lists {{")?;
        writeln!(f, "    rankdir=LR;")?;
        for (i, (name, view)) in self.graphs.iter().enumerate() {
            writeln!(f, "    subgraph cluster_{} {{", i)?;
            writeln!(f, "        label=\"{}\";", Escaped(name))?;
            for node in view.nodes() {
                let id = NodeId(i, node.key);
                match node.element {
                    Some(element) => {
                        writeln!(f, "        {} [label=\"{}\"];", id, Escaped(element))?
                    }
                    None => {
                        let label = if node.key == view.head { "head" } else { "tail" };
                        writeln!(f, "        {} [label=\"{}\", shape=box];", id, label)?
                    }
                }
            }
            for node in view.nodes() {
                let id = NodeId(i, node.key);
                if node.key != view.tail {
                    writeln!(f, "        {} -> {};", id, NodeId(i, node.next))?;
                }
                if node.key != view.head {
                    writeln!(f, "        {} -> {} [style=dashed];", id, NodeId(i, node.prev))?;
                }
            }
            writeln!(f, "    }}")?;
        }
        writeln!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::Dot;
    use crate::list::List;
    use crate::pool::NodePool;
    use ghost_cell::GhostToken;

    #[test]
    fn graph_nodes_follow_links() {
        GhostToken::new(|mut token| {
            let pool = NodePool::new();
            let list = List::from_iter_in(&pool, [1, 2], &mut token).unwrap();
            let graph = list.graph(&token);

            let nodes: Vec<_> = graph.nodes().collect();
            assert_eq!(nodes.len(), 4);
            assert_eq!(nodes[0].key(), graph.head());
            assert_eq!(nodes[3].key(), graph.tail());
            let elements: Vec<_> = nodes.iter().map(|node| node.element()).collect();
            assert_eq!(elements, vec![None, Some(&1), Some(&2), None]);
            for pair in nodes.windows(2) {
                assert_eq!(pair[0].next(), pair[1].key());
                assert_eq!(pair[1].prev(), pair[0].key());
            }
            // The sentinels close the cycle.
            assert_eq!(nodes[3].next(), graph.head());
            assert_eq!(nodes[0].prev(), graph.tail());
        })
    }

    #[test]
    fn graph_resolve_stale_key() {
        GhostToken::new(|mut token| {
            let pool = NodePool::new();
            let mut list = List::from_iter_in(&pool, [1, 2], &mut token).unwrap();
            let front = list.cursor_front_mut(&token);
            list.erase(front, &mut token).unwrap();
            let graph = list.graph(&token);
            assert!(graph.resolve(front.node()).is_none());
            assert_eq!(graph.nodes().count(), 3);
        })
    }

    #[test]
    fn dot_output() {
        GhostToken::new(|mut token| {
            let pool = NodePool::new();
            let list = List::from_iter_in(&pool, ["a\"b"], &mut token).unwrap();
            // head = n0v0, tail = n1v0, element = n2v0
            let text = Dot::new().with("L", list.graph(&token)).to_string();
            let expected = "\
digraph lists {
    rankdir=LR;
    subgraph cluster_0 {
        label=\"L\";
        l0_n0v0 [label=\"head\", shape=box];
        l0_n2v0 [label=\"a\\\"b\"];
        l0_n1v0 [label=\"tail\", shape=box];
        l0_n0v0 -> l0_n2v0;
        l0_n2v0 -> l0_n1v0;
        l0_n2v0 -> l0_n0v0 [style=dashed];
        l0_n1v0 -> l0_n2v0 [style=dashed];
    }
}
";
            assert_eq!(text, expected);
        })
    }

    #[test]
    fn dot_empty() {
        let dot = Dot::<i32>::default();
        assert_eq!(dot.to_string(), "digraph lists {\n    rankdir=LR;\n}\n");
    }
}
