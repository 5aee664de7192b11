use smallvec::SmallVec;

use crate::error::{OptError, OptResult};
use crate::node_set::{NodeSet, MAX_RELATIONS};
use crate::query_graph::{Edge, EdgeType, Node, QueryHypergraph};

/// Builds a [`QueryHypergraph`].
///
/// Relations get dense ids in insertion order, starting from 0. Edges may reference relations
/// added later; everything is checked in [`QueryGraphBuilder::build`].
pub struct QueryGraphBuilder<O> {
    nodes: Vec<Node<O>>,
    edges: Vec<Edge<O>>,
}

impl<O> Default for QueryGraphBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> QueryGraphBuilder<O> {
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            edges: vec![],
        }
    }

    /// Id the next added relation will get.
    pub fn next_node_id(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&mut self, op: O) -> &mut Self {
        self.node_with_predicates(op, vec![])
    }

    pub fn node_with_predicates<I>(&mut self, op: O, predicates: I) -> &mut Self
    where
        I: IntoIterator<Item = O>,
    {
        let node = Node {
            id: self.nodes.len(),
            op,
            additional_predicates: predicates.into_iter().collect(),
        };
        self.nodes.push(node);
        self
    }

    pub fn edge(&mut self, edge: Edge<O>) -> &mut Self {
        self.edges.push(edge);
        self
    }

    /// Ordinary predicate between `left` and `right`.
    pub fn join(&mut self, left: NodeSet, right: NodeSet, op: O) -> &mut Self {
        self.edge(Edge::new(EdgeType::Default, left, right, Some(op)))
    }

    /// Forced cross product between `left` and `right`.
    pub fn cross(&mut self, left: NodeSet, right: NodeSet) -> &mut Self {
        self.edge(Edge::new(EdgeType::Cross, left, right, None))
    }

    /// Relation `node` is evaluated on top of `left` instead of being joined with it.
    pub fn implicit(&mut self, left: NodeSet, node: usize) -> &mut Self {
        // Out of range ids leave the side empty, which `build` rejects.
        let right = if node < MAX_RELATIONS {
            NodeSet::single(node)
        } else {
            NodeSet::empty()
        };
        self.edge(Edge::new(EdgeType::Implicit, left, right, None))
    }

    /// Connectivity-only edge. Joining across it yields the plan of `left`.
    pub fn ignore(&mut self, left: NodeSet, right: NodeSet) -> &mut Self {
        self.edge(Edge::new(EdgeType::Ignore, left, right, None))
    }

    pub fn build(self) -> OptResult<QueryHypergraph<O>> {
        let num_nodes = self.nodes.len();
        if num_nodes == 0 {
            return Err(OptError::EmptyQuery);
        }
        if num_nodes > MAX_RELATIONS {
            return Err(OptError::TooManyRelations {
                count: num_nodes,
                max: MAX_RELATIONS,
            });
        }

        let all = NodeSet::ones(num_nodes);
        let mut node_edges = vec![SmallVec::new(); num_nodes];
        for (idx, edge) in self.edges.iter().enumerate() {
            validate_edge(idx, edge, all)?;
            for n in (edge.left | edge.right).iter() {
                node_edges[n].push(idx);
            }
        }

        Ok(QueryHypergraph {
            nodes: self.nodes,
            edges: self.edges,
            node_edges,
        })
    }
}

fn validate_edge<O>(idx: usize, edge: &Edge<O>, all: NodeSet) -> OptResult<()> {
    let malformed = |reason: String| OptError::MalformedHyperedge { edge: idx, reason };

    if edge.left.is_empty() || edge.right.is_empty() {
        return Err(malformed("both sides must name at least one relation".to_string()));
    }
    if !edge.span().is_subset_of(&all) {
        return Err(malformed(format!(
            "relations {} are out of range",
            edge.span() - all
        )));
    }
    if edge.left.intersects(&edge.right) {
        return Err(malformed(format!(
            "left {} and right {} overlap",
            edge.left, edge.right
        )));
    }

    match edge.edge_type {
        EdgeType::Implicit if edge.right.len() != 1 => Err(malformed(format!(
            "implicit edge must name exactly one dependent relation, got {}",
            edge.right
        ))),
        EdgeType::Implicit | EdgeType::Cross if edge.op.is_some() => Err(malformed(format!(
            "{} edge can't carry an operator",
            edge.edge_type
        ))),
        _ => Ok(()),
    }
}
