use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;

use crate::node_set::NodeSet;
use crate::query_graph::QueryHypergraph;

/// Relation graph with node weight as relation id and edge weight as hyperedge index.
type RelGraph = UnGraph<usize, usize>;

/// Ordinary graph obtained by linking every relation of an edge's span with each other.
///
/// Any plan covering a set of relations must be connected in this projection, so a
/// disconnected projection proves the hypergraph can't be solved without a cross product.
pub struct RelationGraph {
    graph: RelGraph,
}

impl RelationGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Connected components, ordered by their lowest relation.
    pub fn components(&self) -> Vec<NodeSet> {
        let mut visited = NodeSet::empty();
        let mut components = vec![];

        for start in self.graph.node_indices() {
            if visited.contains(self.graph[start]) {
                continue;
            }
            let mut component = NodeSet::empty();
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(node_id) = bfs.next(&self.graph) {
                component = component | NodeSet::single(self.graph[node_id]);
            }
            visited = visited | component;
            components.push(component);
        }

        components
    }
}

impl<'a, O> From<&'a QueryHypergraph<O>> for RelationGraph {
    fn from(query_graph: &'a QueryHypergraph<O>) -> Self {
        let mut graph = RelGraph::default();
        for node in query_graph.nodes() {
            let idx = graph.add_node(node.id());
            debug_assert_eq!(idx.index(), node.id());
        }

        for (edge_idx, edge) in query_graph.edges().iter().enumerate() {
            let mut span = edge.span().iter();
            if let Some(first) = span.next() {
                for other in span {
                    graph.add_edge(NodeIndex::new(first), NodeIndex::new(other), edge_idx);
                }
            }
        }

        Self { graph }
    }
}

impl<O> QueryHypergraph<O> {
    pub fn relation_graph(&self) -> RelationGraph {
        RelationGraph::from(self)
    }

    /// Connected components of the relation graph.
    pub fn components(&self) -> Vec<NodeSet> {
        self.relation_graph().components()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::LogicalOperator;
    use crate::query_graph::QueryGraphBuilder;

    fn set(ids: &[usize]) -> NodeSet {
        ids.iter().copied().collect()
    }

    fn scans(n: usize) -> QueryGraphBuilder<LogicalOperator> {
        let mut builder = QueryGraphBuilder::new();
        for i in 0..n {
            builder.node(LogicalOperator::scan(format!("t{}", i)));
        }
        builder
    }

    #[test]
    fn test_components_of_disconnected_graph() {
        let mut builder = scans(5);
        builder
            .join(set(&[0]), set(&[3]), LogicalOperator::inner_join("t0.x = t3.x"))
            .join(set(&[1]), set(&[2]), LogicalOperator::inner_join("t1.x = t2.x"));
        let graph = builder.build().unwrap();

        assert_eq!(
            vec![set(&[0, 3]), set(&[1, 2]), set(&[4])],
            graph.components()
        );
    }

    #[test]
    fn test_hyperedge_and_arbitrary_link_whole_span() {
        let mut builder = scans(4);
        builder.edge(
            crate::query_graph::Edge::new(
                crate::query_graph::EdgeType::Default,
                set(&[0, 1]),
                set(&[2]),
                Some(LogicalOperator::filter("t0.x + t1.x = t2.x + t3.x")),
            )
            .with_arbitrary(set(&[3])),
        );
        let graph = builder.build().unwrap();
        let relation_graph = graph.relation_graph();

        assert_eq!(4, relation_graph.node_count());
        assert_eq!(3, relation_graph.edge_count());
        assert_eq!(vec![set(&[0, 1, 2, 3])], relation_graph.components());
    }
}
