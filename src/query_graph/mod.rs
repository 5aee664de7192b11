//! Query hypergraph.
//!
//! Nodes are base relations, edges are predicates. An edge may have more than one relation on
//! either side (a hyperedge), in which case it only connects two relation sets when each side
//! lies wholly in one of them.

use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};

use crate::node_set::NodeSet;

mod builder;
pub use builder::*;
mod graph;
pub use graph::*;

/// How an edge takes part in plan construction.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Display, EnumIter)]
pub enum EdgeType {
    /// Ordinary join or filter predicate, applied by the plan joining both sides.
    Default,
    /// The single relation on the right is evaluated as a dependent step on top of the other
    /// side instead of being joined with it.
    Implicit,
    /// Required for connectivity only. Joining across it keeps the plan of the left side.
    Ignore,
    /// Forced cross product without a predicate.
    Cross,
}

/// A base relation.
#[derive(Clone, Debug)]
pub struct Node<O> {
    id: usize,
    op: O,
    /// Single relation predicates applied whenever the relation is scanned.
    additional_predicates: Vec<O>,
}

impl<O> Node<O> {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn op(&self) -> &O {
        &self.op
    }

    pub fn additional_predicates(&self) -> &[O] {
        &self.additional_predicates
    }
}

#[derive(Clone, Debug)]
pub struct Edge<O> {
    left: NodeSet,
    right: NodeSet,
    /// Relations that must be present for the predicate to be evaluable, on either side.
    arbitrary: NodeSet,
    edge_type: EdgeType,
    op: Option<O>,
}

impl<O> Edge<O> {
    pub fn new(edge_type: EdgeType, left: NodeSet, right: NodeSet, op: Option<O>) -> Self {
        Self {
            left,
            right,
            arbitrary: NodeSet::empty(),
            edge_type,
            op,
        }
    }

    /// Sets the relations the predicate also references besides `left` and `right`.
    ///
    /// They don't take part in [`connects`](Self::connects): a `Default` edge joins its sides
    /// as soon as `left` and `right` meet, even when the `arbitrary` relations are not joined
    /// yet. Once a later pair covers the whole [`span`](Self::span) without the edge connecting
    /// it, the predicate is collected again as a residual, so the plan applies it twice.
    pub fn with_arbitrary(mut self, arbitrary: NodeSet) -> Self {
        self.arbitrary = arbitrary;
        self
    }

    pub fn left(&self) -> NodeSet {
        self.left
    }

    pub fn right(&self) -> NodeSet {
        self.right
    }

    pub fn arbitrary(&self) -> NodeSet {
        self.arbitrary
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge_type
    }

    pub fn op(&self) -> Option<&O> {
        self.op.as_ref()
    }

    /// All relations the edge's predicate refers to.
    pub fn span(&self) -> NodeSet {
        self.left | self.right | self.arbitrary
    }

    /// Whether one side lies in `s1` and the other in `s2`, in either orientation.
    pub fn connects(&self, s1: NodeSet, s2: NodeSet) -> bool {
        if self.left.is_empty() || self.right.is_empty() {
            return false;
        }
        (self.left.is_subset_of(&s1) && self.right.is_subset_of(&s2))
            || (self.left.is_subset_of(&s2) && self.right.is_subset_of(&s1))
    }

    /// Whether the edge connects `s1` and `s2` with its left side in `s2`.
    pub fn is_inverted(&self, s1: NodeSet, s2: NodeSet) -> bool {
        self.left.is_subset_of(&s2) && self.right.is_subset_of(&s1)
    }
}

/// Hypergraph handed to the join enumerator.
///
/// Built and validated by [`QueryGraphBuilder`], so relation indices are dense and every edge is
/// well formed.
#[derive(Clone, Debug)]
pub struct QueryHypergraph<O> {
    nodes: Vec<Node<O>>,
    edges: Vec<Edge<O>>,
    /// Edge indices incident to each node through `left` or `right`.
    node_edges: Vec<SmallVec<[usize; 4]>>,
}

impl<O> QueryHypergraph<O> {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node<O>] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> &Node<O> {
        &self.nodes[id]
    }

    pub fn edges(&self) -> &[Edge<O>] {
        &self.edges
    }

    /// Set of all relations.
    pub fn all_nodes(&self) -> NodeSet {
        NodeSet::ones(self.num_nodes())
    }

    fn incident_edges(&self, s: NodeSet) -> impl Iterator<Item = &Edge<O>> + '_ {
        let mut seen = SmallVec::<[usize; 16]>::new();
        s.iter()
            .flat_map(move |n| self.node_edges[n].iter().copied())
            .filter(move |e| {
                if seen.contains(e) {
                    false
                } else {
                    seen.push(*e);
                    true
                }
            })
            .map(move |e| &self.edges[e])
    }

    /// Relations outside `s` and `excluded` directly reachable from `s`.
    ///
    /// For every edge with one side inside `s` and the other side disjoint from `s | excluded`,
    /// the lowest relation of the other side is added as representative of that side.
    pub fn neighbors(&self, s: NodeSet, excluded: NodeSet) -> NodeSet {
        let forbidden = s | excluded;
        self.incident_edges(s)
            .filter_map(|edge| {
                if edge.left.is_subset_of(&s) && edge.right.is_disjoint(&forbidden) {
                    edge.right.find_first()
                } else if edge.right.is_subset_of(&s) && edge.left.is_disjoint(&forbidden) {
                    edge.left.find_first()
                } else {
                    None
                }
            })
            .collect()
    }

    /// Whether some edge connects `s1` and `s2`.
    pub fn is_connected(&self, s1: NodeSet, s2: NodeSet) -> bool {
        self.incident_edges(s1).any(|edge| edge.connects(s1, s2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::LogicalOperator;

    fn set(ids: &[usize]) -> NodeSet {
        ids.iter().copied().collect()
    }

    fn edge(left: &[usize], right: &[usize]) -> Edge<LogicalOperator> {
        Edge::new(
            EdgeType::Default,
            set(left),
            set(right),
            Some(LogicalOperator::inner_join("p")),
        )
    }

    #[test]
    fn test_connects_requires_whole_sides() {
        let hyper = edge(&[0, 1], &[2]);

        assert!(hyper.connects(set(&[0, 1]), set(&[2])));
        assert!(hyper.connects(set(&[2, 3]), set(&[0, 1])));
        assert!(!hyper.connects(set(&[0]), set(&[1, 2])));
        assert!(!hyper.connects(set(&[0, 1, 2]), set(&[3])));

        assert!(!hyper.is_inverted(set(&[0, 1]), set(&[2])));
        assert!(hyper.is_inverted(set(&[2]), set(&[0, 1])));
    }

    #[test]
    fn test_connects_ignores_arbitrary() {
        let e = edge(&[0], &[1]).with_arbitrary(set(&[2]));

        assert!(e.connects(set(&[0]), set(&[1])));
        assert_eq!(set(&[0, 1, 2]), e.span());
    }

    fn chain(n: usize) -> QueryHypergraph<LogicalOperator> {
        let mut builder = QueryGraphBuilder::new();
        for i in 0..n {
            builder.node(LogicalOperator::scan(format!("t{}", i)));
        }
        for i in 1..n {
            builder.join(
                NodeSet::single(i - 1),
                NodeSet::single(i),
                LogicalOperator::inner_join(format!("t{}.id = t{}.id", i - 1, i)),
            );
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_neighbors_on_chain() {
        let graph = chain(4);

        assert_eq!(set(&[1]), graph.neighbors(set(&[0]), NodeSet::empty()));
        assert_eq!(set(&[0, 2]), graph.neighbors(set(&[1]), NodeSet::empty()));
        assert_eq!(set(&[2]), graph.neighbors(set(&[1]), set(&[0])));
        assert_eq!(set(&[0, 3]), graph.neighbors(set(&[1, 2]), NodeSet::empty()));
        assert!(graph.neighbors(set(&[3]), set(&[2])).is_empty());
    }

    #[test]
    fn test_neighbors_uses_hypernode_representative() {
        let mut builder = QueryGraphBuilder::new();
        for name in ["a", "b", "c", "d"] {
            builder.node(LogicalOperator::scan(name));
        }
        builder
            .join(set(&[0]), set(&[1]), LogicalOperator::inner_join("a.x = b.x"))
            .join(set(&[2]), set(&[3]), LogicalOperator::inner_join("c.x = d.x"))
            .join(
                set(&[0, 1]),
                set(&[2, 3]),
                LogicalOperator::inner_join("a.y + b.y = c.y + d.y"),
            );
        let graph = builder.build().unwrap();

        assert_eq!(set(&[2]), graph.neighbors(set(&[0, 1]), NodeSet::empty()));
        // Part of the other hypernode is excluded, so the hyperedge yields nothing.
        assert!(graph.neighbors(set(&[0, 1]), set(&[3])).is_empty());
        // Only half of the left hypernode is present.
        assert_eq!(set(&[1]), graph.neighbors(set(&[0]), NodeSet::empty()));
    }

    #[test]
    fn test_is_connected() {
        let graph = chain(4);

        assert!(graph.is_connected(set(&[0]), set(&[1])));
        assert!(graph.is_connected(set(&[0, 1]), set(&[2, 3])));
        assert!(graph.is_connected(set(&[2, 3]), set(&[1])));
        assert!(!graph.is_connected(set(&[0]), set(&[2, 3])));
    }
}
