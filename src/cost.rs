//! Cost models.
//!
//! The join enumerator only compares costs. What a cost is and how it's computed is up to the
//! [`CostModel`] handed to it.

use std::cmp::Ordering;
use std::fmt::Debug;

use derive_more::{Add, Display, From};

use crate::node_set::NodeSet;
use crate::plan::PlanRef;

/// Everything known about a candidate plan before it is built.
pub struct CostContext<'a, O, C> {
    operator: Option<&'a O>,
    children: &'a [PlanRef<O, C>],
    residual_predicates: &'a [O],
    relations: NodeSet,
    scans: NodeSet,
}

impl<'a, O, C> CostContext<'a, O, C> {
    pub fn new(
        operator: Option<&'a O>,
        children: &'a [PlanRef<O, C>],
        residual_predicates: &'a [O],
        relations: NodeSet,
        scans: NodeSet,
    ) -> Self {
        Self {
            operator,
            children,
            residual_predicates,
            relations,
            scans,
        }
    }

    pub fn operator(&self) -> Option<&'a O> {
        self.operator
    }

    /// Children, whose costs are already known.
    pub fn children(&self) -> &'a [PlanRef<O, C>] {
        self.children
    }

    pub fn residual_predicates(&self) -> &'a [O] {
        self.residual_predicates
    }

    pub fn relations(&self) -> NodeSet {
        self.relations
    }

    /// Relations whose base operator is the candidate's operator.
    pub fn scans(&self) -> NodeSet {
        self.scans
    }

    /// Operator followed by residual predicates.
    pub fn operators(&self) -> impl Iterator<Item = &'a O> {
        self.operator.into_iter().chain(self.residual_predicates.iter())
    }
}

/// Computes the cost of a candidate plan.
///
/// Implementations must be deterministic: the same candidate must always get the same cost,
/// and costs must be totally ordered among themselves. The memo table keeps a plan only if it's
/// strictly cheaper than the one it replaces, which is meaningless otherwise.
pub trait CostModel<O> {
    type Cost: Clone + Debug + PartialOrd;

    fn cost(&self, ctx: &CostContext<'_, O, Self::Cost>) -> Self::Cost;
}

/// Scalar cost.
#[derive(Clone, Copy, Debug, Default, Add, From, Display)]
pub struct Cost(f64);

impl Cost {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Every plan costs the same, so the first plan found for a relation set is kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformCostModel;

impl<O> CostModel<O> for UniformCostModel {
    type Cost = Cost;

    fn cost(&self, _ctx: &CostContext<'_, O, Cost>) -> Cost {
        Cost::default()
    }
}

/// Cost and estimated output cardinality. Ordered by cost only.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoutCost {
    pub cost: Cost,
    pub cardinality: f64,
}

impl PartialEq for CoutCost {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl PartialOrd for CoutCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.cost.partial_cmp(&other.cost)
    }
}

/// The C_out cost function: the sum of the cardinalities of all intermediate results.
///
/// Cardinality of a plan is the product of its children's cardinalities and the base
/// cardinality of every relation it scans, scaled by the selectivity of its operator and each
/// residual predicate. `selectivity` must return 1.0 for operators that don't filter, such as
/// scans. Leaves cost nothing.
pub struct CoutCostModel<F> {
    cardinalities: Vec<f64>,
    selectivity: F,
}

impl<F> CoutCostModel<F> {
    /// `cardinalities[i]` is the base cardinality of relation `i`, missing entries count as 1.
    pub fn new(cardinalities: Vec<f64>, selectivity: F) -> Self {
        Self {
            cardinalities,
            selectivity,
        }
    }

    fn base_cardinality(&self, relation: usize) -> f64 {
        self.cardinalities.get(relation).copied().unwrap_or(1.0)
    }
}

impl<O, F> CostModel<O> for CoutCostModel<F>
where
    F: Fn(&O) -> f64,
{
    type Cost = CoutCost;

    fn cost(&self, ctx: &CostContext<'_, O, CoutCost>) -> CoutCost {
        let input: f64 = ctx
            .children()
            .iter()
            .map(|child| child.cost().cardinality)
            .chain(ctx.scans().iter().map(|r| self.base_cardinality(r)))
            .product();
        let selectivity: f64 = ctx.operators().map(|op| (self.selectivity)(op)).product();
        let cardinality = input * selectivity;

        if ctx.children().is_empty() {
            return CoutCost {
                cost: Cost::default(),
                cardinality,
            };
        }

        let children_cost = ctx
            .children()
            .iter()
            .fold(Cost::default(), |acc, child| acc + child.cost().cost);
        CoutCost {
            cost: children_cost + Cost::from(cardinality),
            cardinality,
        }
    }
}
