use std::fmt::Debug;
use std::mem::swap;
use std::rc::Rc;

use itertools::Itertools;
use smallvec::SmallVec;

use crate::cost::CostContext;
use crate::node_set::NodeSet;

pub type PlanRef<O, C> = Rc<Plan<O, C>>;

pub type Children<O, C> = SmallVec<[PlanRef<O, C>; 2]>;

/// Candidate join tree for exactly one set of relations.
///
/// A plan is never mutated once built. The memo table replaces its entry with a cheaper plan
/// instead, while plans already used as children keep pointing at the old one.
#[derive(Debug)]
pub struct Plan<O, C> {
    /// `None` when the node only combines its children, e.g. a cross product.
    operator: Option<O>,
    /// Empty for a leaf, one for a dependent step, two for a join.
    children: Children<O, C>,
    /// Predicates applied after the children are combined.
    residual_predicates: Vec<O>,
    relations: NodeSet,
    /// Relations whose base operator is `operator`.
    scans: NodeSet,
    cost: C,
    descriptor: String,
}

impl<O, C> Plan<O, C> {
    pub fn operator(&self) -> Option<&O> {
        self.operator.as_ref()
    }

    pub fn children(&self) -> &[PlanRef<O, C>] {
        &self.children
    }

    pub fn residual_predicates(&self) -> &[O] {
        &self.residual_predicates
    }

    pub fn relations(&self) -> NodeSet {
        self.relations
    }

    pub fn scans(&self) -> NodeSet {
        self.scans
    }

    pub fn cost(&self) -> &C {
        &self.cost
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Operator followed by residual predicates of this node only.
    pub fn operators(&self) -> impl Iterator<Item = &O> {
        self.operator.iter().chain(self.residual_predicates.iter())
    }
}

impl<O, C> Plan<O, C>
where
    O: Debug,
    C: Debug,
{
    /// Indented text rendering of the plan tree, root first.
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        let operator = match &self.operator {
            Some(op) => format!("{:?}", op),
            None => "CrossProduct".to_string(),
        };
        out.push_str(&format!(
            "{:indent$}{} relations={} cost={:?}",
            "",
            operator,
            self.relations,
            self.cost,
            indent = depth * 2
        ));
        if !self.residual_predicates.is_empty() {
            out.push_str(&format!(
                " residual=[{}]",
                self.residual_predicates
                    .iter()
                    .map(|p| format!("{:?}", p))
                    .join(", ")
            ));
        }
        out.push('\n');
        for child in &self.children {
            child.explain_into(out, depth + 1);
        }
    }
}

/// Breadth first iterator over a plan tree.
struct BFSPlanIter<O, C> {
    cur_level: Vec<PlanRef<O, C>>,
    next_level: Vec<PlanRef<O, C>>,
}

impl<O, C> Iterator for BFSPlanIter<O, C> {
    type Item = PlanRef<O, C>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur_level.is_empty() {
            swap(&mut self.cur_level, &mut self.next_level);
            self.cur_level.reverse();
        }

        if let Some(p) = self.cur_level.pop() {
            self.next_level.extend(p.children.iter().cloned());
            Some(p)
        } else {
            None
        }
    }
}

/// Breadth first iterator starting at `root`, children visited left to right.
pub fn bfs_iter<O, C>(root: &PlanRef<O, C>) -> impl Iterator<Item = PlanRef<O, C>> {
    BFSPlanIter {
        cur_level: vec![root.clone()],
        next_level: vec![],
    }
}

pub struct PlanBuilder<O, C> {
    operator: Option<O>,
    children: Children<O, C>,
    residual_predicates: Vec<O>,
    relations: NodeSet,
    scans: NodeSet,
    descriptor: String,
}

impl<O, C> PlanBuilder<O, C> {
    pub fn new(relations: NodeSet) -> Self {
        Self {
            operator: None,
            children: SmallVec::new(),
            residual_predicates: vec![],
            relations,
            scans: NodeSet::empty(),
            descriptor: String::new(),
        }
    }

    pub fn with_operator(mut self, operator: Option<O>) -> Self {
        self.operator = operator;
        self
    }

    pub fn add_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = PlanRef<O, C>>,
    {
        self.children.extend(children);
        self
    }

    pub fn add_residual_predicates<I>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = O>,
    {
        self.residual_predicates.extend(predicates);
        self
    }

    pub fn with_scans(mut self, scans: NodeSet) -> Self {
        self.scans = scans;
        self
    }

    pub fn with_descriptor<S: Into<String>>(mut self, descriptor: S) -> Self {
        self.descriptor = descriptor.into();
        self
    }

    /// View handed to the cost model before the plan is built.
    pub fn cost_context(&self) -> CostContext<'_, O, C> {
        CostContext::new(
            self.operator.as_ref(),
            &self.children,
            &self.residual_predicates,
            self.relations,
            self.scans,
        )
    }

    pub fn build(self, cost: C) -> Plan<O, C> {
        Plan {
            operator: self.operator,
            children: self.children,
            residual_predicates: self.residual_predicates,
            relations: self.relations,
            scans: self.scans,
            cost,
            descriptor: self.descriptor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::LogicalOperator;

    type TestPlan = Plan<LogicalOperator, u32>;

    fn leaf(id: usize, table: &str) -> PlanRef<LogicalOperator, u32> {
        Rc::new(
            PlanBuilder::new(NodeSet::single(id))
                .with_operator(Some(LogicalOperator::scan(table)))
                .with_scans(NodeSet::single(id))
                .with_descriptor(id.to_string())
                .build(1),
        )
    }

    fn join(
        left: PlanRef<LogicalOperator, u32>,
        right: PlanRef<LogicalOperator, u32>,
        condition: &str,
    ) -> PlanRef<LogicalOperator, u32> {
        let relations = left.relations() | right.relations();
        let descriptor = format!("({}) join ({})", left.descriptor(), right.descriptor());
        Rc::new(
            PlanBuilder::new(relations)
                .with_operator(Some(LogicalOperator::inner_join(condition)))
                .add_children([left, right])
                .with_descriptor(descriptor)
                .build(10),
        )
    }

    #[test]
    fn test_builder() {
        let a = leaf(0, "a");
        let b = leaf(1, "b");
        let builder: PlanBuilder<LogicalOperator, u32> = PlanBuilder::new(NodeSet::ones(2))
            .with_operator(Some(LogicalOperator::inner_join("a.x = b.x")))
            .add_children([a.clone(), b.clone()])
            .add_residual_predicates([LogicalOperator::filter("a.y < b.y")]);

        let ctx = builder.cost_context();
        assert_eq!(2, ctx.children().len());
        assert_eq!(NodeSet::ones(2), ctx.relations());

        let plan: TestPlan = builder.build(3);
        assert_eq!(3, *plan.cost());
        assert!(!plan.is_leaf());
        assert_eq!(2, plan.operators().count());
        assert!(a.is_leaf());
        assert_eq!(NodeSet::single(0), a.scans());
    }

    #[test]
    fn test_bfs_iter() {
        let ab = join(leaf(0, "a"), leaf(1, "b"), "a.x = b.x");
        let abc = join(ab, leaf(2, "c"), "b.y = c.y");

        let descriptors: Vec<String> = bfs_iter(&abc)
            .map(|p| p.descriptor().to_string())
            .collect();
        assert_eq!(
            vec![
                "((0) join (1)) join (2)".to_string(),
                "(0) join (1)".to_string(),
                "2".to_string(),
                "0".to_string(),
                "1".to_string(),
            ],
            descriptors
        );
    }

    #[test]
    fn test_explain() {
        let plan = join(leaf(0, "a"), leaf(1, "b"), "a.x = b.x");
        let text = plan.explain();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(3, lines.len());
        assert!(lines[0].starts_with("LogicalJoin"));
        assert!(lines[0].contains("relations={0, 1}"));
        assert!(lines[1].starts_with("  LogicalScan"));
        assert!(lines[2].contains("cost=1"));
    }

    #[test]
    fn test_explain_residuals_and_cross_product() {
        let plan: TestPlan = PlanBuilder::new(NodeSet::ones(2))
            .add_children([leaf(0, "a"), leaf(1, "b")])
            .add_residual_predicates([LogicalOperator::filter("a.y < b.y")])
            .build(42);
        let text = plan.explain();
        let first = text.lines().next().unwrap();

        assert!(first.starts_with("CrossProduct relations={0, 1} cost=42 residual=["));
        assert!(first.contains("a.y < b.y"));
        assert!(text.ends_with('\n'));
        assert_eq!(3, text.lines().count());
    }
}
