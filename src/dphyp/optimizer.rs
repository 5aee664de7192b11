use std::rc::Rc;

use itertools::Itertools;
use log::{debug, trace};

use crate::cost::CostModel;
use crate::dphyp::DpTable;
use crate::error::{OptError, OptResult};
use crate::node_set::NodeSet;
use crate::operator::{OperatorKind, RelOperator};
use crate::optimizer::OptimizerContext;
use crate::plan::{Plan, PlanBuilder, PlanRef};
use crate::query_graph::{EdgeType, QueryHypergraph};

/// Finds the cheapest bushy join tree of a query hypergraph.
///
/// The memo table is owned by the optimizer and rebuilt by every [`solve`](Self::solve), so one
/// optimizer must not be shared between concurrent searches.
pub struct DPhypOptimizer<O, M>
where
    M: CostModel<O>,
{
    graph: QueryHypergraph<O>,
    cost_model: M,
    context: OptimizerContext,
    table: DpTable<O, M::Cost>,
}

impl<O, M> DPhypOptimizer<O, M>
where
    O: RelOperator,
    M: CostModel<O>,
{
    pub fn new(graph: QueryHypergraph<O>, cost_model: M, context: OptimizerContext) -> Self {
        Self {
            graph,
            cost_model,
            context,
            table: DpTable::new(),
        }
    }

    pub fn graph(&self) -> &QueryHypergraph<O> {
        &self.graph
    }

    pub fn context(&self) -> &OptimizerContext {
        &self.context
    }

    /// Memo table of the last search.
    pub fn table(&self) -> &DpTable<O, M::Cost> {
        &self.table
    }

    pub fn find_best_plan(mut self) -> OptResult<PlanRef<O, M::Cost>> {
        self.solve()
    }

    /// Runs the search and returns the plan covering all relations.
    pub fn solve(&mut self) -> OptResult<PlanRef<O, M::Cost>> {
        let num_nodes = self.graph.num_nodes();
        debug!(
            "Beginning join enumeration over {} relations and {} edges",
            num_nodes,
            self.graph.edges().len()
        );

        if self.context.connectivity_precheck() {
            let components = self.graph.components();
            if components.len() > 1 {
                debug!("Relation graph has {} components", components.len());
                return Err(OptError::DisconnectedQuery { components });
            }
        }

        self.table.clear();
        for id in 0..num_nodes {
            let leaf = self.leaf_plan(id);
            self.table.offer(Rc::new(leaf));
        }

        for v in (0..num_nodes).rev() {
            let only_v = NodeSet::single(v);
            self.emit_csg(only_v)?;
            self.enumerate_csg_rec(only_v, NodeSet::fill_until(v))?;
        }

        let stats = self.table.stats();
        debug!(
            "Join enumeration finished: {} pairs emitted, {} sets solved, {} improvements",
            stats.emitted_pairs,
            self.table.len(),
            stats.improvements
        );
        if self.context.dump_memo() {
            debug!("Memo table:\n{}", self.table.render());
        }

        self.table
            .get(&self.graph.all_nodes())
            .cloned()
            .ok_or_else(|| OptError::DisconnectedQuery {
                components: self.table.maximal_sets(),
            })
    }

    fn leaf_plan(&self, id: usize) -> Plan<O, M::Cost> {
        let node = self.graph.node(id);
        let builder = PlanBuilder::new(NodeSet::single(id))
            .with_operator(Some(node.op().clone()))
            .add_residual_predicates(node.additional_predicates().iter().cloned())
            .with_scans(NodeSet::single(id))
            .with_descriptor(id.to_string());
        let cost = self.cost_model.cost(&builder.cost_context());
        builder.build(cost)
    }

    /// Emits `s1` with every connected complement among its neighbors.
    fn emit_csg(&mut self, s1: NodeSet) -> OptResult<()> {
        let first = s1.find_first().ok_or(OptError::MissingSubplan(s1))?;
        let x = s1 | NodeSet::fill_until(first);
        let neighbors = self.graph.neighbors(s1, x);

        for pos in neighbors.iter_desc() {
            let s2 = NodeSet::single(pos);
            if self.graph.is_connected(s1, s2) {
                self.emit_csg_cmp(s1, s2)?;
            }
            // Complements grown from `pos` must not absorb lower neighbors, they start their own.
            let lower_neighbors = neighbors & NodeSet::fill_until(pos + 1);
            self.enumerate_cmp_rec(s1, s2, x | lower_neighbors)?;
        }
        Ok(())
    }

    /// Grows the connected subgraph `s1` and emits every solved extension.
    fn enumerate_csg_rec(&mut self, s1: NodeSet, x: NodeSet) -> OptResult<()> {
        let neighbors = self.graph.neighbors(s1, x);
        for n in neighbors.subsets() {
            let s1n = s1 | n;
            if self.table.contains(&s1n) {
                self.emit_csg(s1n)?;
            }
        }
        for n in neighbors.subsets() {
            self.enumerate_csg_rec(s1 | n, x | neighbors)?;
        }
        Ok(())
    }

    /// Grows the complement `s2` of `s1` and emits every solved extension connected to `s1`.
    fn enumerate_cmp_rec(&mut self, s1: NodeSet, s2: NodeSet, x: NodeSet) -> OptResult<()> {
        let neighbors = self.graph.neighbors(s2, x);
        for n in neighbors.subsets() {
            let s2n = s2 | n;
            if self.table.contains(&s2n) && self.graph.is_connected(s1, s2n) {
                self.emit_csg_cmp(s1, s2n)?;
            }
        }
        let x = x | neighbors;
        for n in neighbors.subsets() {
            self.enumerate_cmp_rec(s1, s2 | n, x)?;
        }
        Ok(())
    }

    fn emit_csg_cmp(&mut self, s1: NodeSet, s2: NodeSet) -> OptResult<()> {
        let plan = self.build_pair_plan(s1, s2)?;
        self.table.record_emit();
        trace!("Emitted csg-cmp pair {} {}: {}", s1, s2, plan.descriptor());
        if self.table.offer(Rc::new(plan)) {
            trace!("New best plan for {}", s1 | s2);
        }
        Ok(())
    }

    /// Builds the plan joining the stored plans of `s1` and `s2`.
    ///
    /// Connecting edges decide the shape: an ignore edge makes the result a passthrough of one
    /// side, an implicit edge evaluates the implicit relation on top of one side, a non inner
    /// join operator joins both sides, and otherwise the first ordinary predicate does. Every
    /// other collected predicate becomes residual.
    pub(crate) fn build_pair_plan(&self, s1: NodeSet, s2: NodeSet) -> OptResult<Plan<O, M::Cost>> {
        let p1 = self.table.get(&s1).cloned().ok_or(OptError::MissingSubplan(s1))?;
        let p2 = self.table.get(&s2).cloned().ok_or(OptError::MissingSubplan(s2))?;
        let s = s1 | s2;

        let mut predicates: Vec<O> = vec![];
        let mut residuals: Vec<O> = vec![];
        // (relation, inverted)
        let mut implicit: Option<(usize, bool)> = None;
        // inverted
        let mut ignore: Option<bool> = None;
        let mut special_join: Option<&O> = None;

        for edge in self.graph.edges() {
            if edge.connects(s1, s2) {
                let inverted = edge.is_inverted(s1, s2);
                match (edge.edge_type(), edge.op()) {
                    (EdgeType::Implicit, _) => {
                        if let Some(relation) = edge.right().find_first() {
                            let node = self.graph.node(relation);
                            predicates.extend(node.additional_predicates().iter().cloned());
                            implicit = Some((relation, inverted));
                        }
                    }
                    (EdgeType::Ignore, _) => ignore = Some(inverted),
                    (EdgeType::Cross, _) | (EdgeType::Default, None) => {}
                    (EdgeType::Default, Some(op)) => match op.kind() {
                        OperatorKind::Selection | OperatorKind::InnerJoin => {
                            predicates.push(op.clone())
                        }
                        OperatorKind::Other => special_join = Some(op),
                    },
                }
            } else {
                let span = edge.span();
                if span.is_subset_of(&s) && !span.is_subset_of(&s1) && !span.is_subset_of(&s2) {
                    if let Some(op) = edge.op().filter(|op| op.kind().is_ordinary_predicate()) {
                        residuals.push(op.clone());
                    }
                }
            }
        }
        predicates.extend(residuals);
        let predicates: Vec<O> = predicates.into_iter().unique().collect();

        let descriptor = format!("({}) join ({})", p1.descriptor(), p2.descriptor());
        let builder = if let Some(inverted) = ignore {
            let child = if inverted { &p2 } else { &p1 };
            let residuals = child
                .residual_predicates()
                .iter()
                .cloned()
                .chain(predicates)
                .unique();
            PlanBuilder::new(s)
                .with_operator(child.operator().cloned())
                .add_children(child.children().iter().cloned())
                .add_residual_predicates(residuals)
                .with_scans(child.scans())
        } else if let Some((relation, inverted)) = implicit {
            let child = if inverted { p2 } else { p1 };
            PlanBuilder::new(s)
                .with_operator(Some(self.graph.node(relation).op().clone()))
                .add_children([child])
                .add_residual_predicates(predicates)
                .with_scans(NodeSet::single(relation))
        } else if let Some(op) = special_join {
            PlanBuilder::new(s)
                .with_operator(Some(op.clone()))
                .add_children([p1, p2])
                .add_residual_predicates(predicates)
        } else {
            // Cross product when there is no predicate at all.
            let mut predicates = predicates.into_iter();
            PlanBuilder::new(s)
                .with_operator(predicates.next())
                .add_children([p1, p2])
                .add_residual_predicates(predicates)
        };

        let builder = builder.with_descriptor(descriptor);
        let cost = self.cost_model.cost(&builder.cost_context());
        Ok(builder.build(cost))
    }
}
