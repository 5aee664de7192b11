use std::collections::HashMap;
use std::fmt::Debug;

use prettytable::Table;

use crate::node_set::NodeSet;
use crate::plan::PlanRef;

/// Counters of one search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of csg-cmp pairs for which a plan was built.
    pub emitted_pairs: usize,
    /// Relation sets that got their first plan, leaves included.
    pub inserts: usize,
    /// Times a stored plan was replaced by a cheaper one.
    pub improvements: usize,
}

/// Best plan found so far for each connected relation set.
pub struct DpTable<O, C> {
    plans: HashMap<NodeSet, PlanRef<O, C>>,
    stats: SearchStats,
}

impl<O, C> Default for DpTable<O, C> {
    fn default() -> Self {
        Self {
            plans: HashMap::new(),
            stats: SearchStats::default(),
        }
    }
}

impl<O, C> DpTable<O, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.plans.clear();
        self.stats = SearchStats::default();
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn contains(&self, relations: &NodeSet) -> bool {
        self.plans.contains_key(relations)
    }

    pub fn get(&self, relations: &NodeSet) -> Option<&PlanRef<O, C>> {
        self.plans.get(relations)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub(crate) fn record_emit(&mut self) {
        self.stats.emitted_pairs += 1;
    }

    /// Entries ordered by set size, then by relation bits.
    pub fn entries(&self) -> Vec<(NodeSet, &PlanRef<O, C>)> {
        let mut entries: Vec<_> = self.plans.iter().map(|(s, p)| (*s, p)).collect();
        entries.sort_by_key(|(s, _)| (s.len(), s.bits()));
        entries
    }

    /// Solved sets not contained in a larger solved set.
    pub fn maximal_sets(&self) -> Vec<NodeSet> {
        let mut sets: Vec<NodeSet> = self
            .plans
            .keys()
            .filter(|s| {
                !self
                    .plans
                    .keys()
                    .any(|other| other != *s && s.is_subset_of(other))
            })
            .copied()
            .collect();
        sets.sort();
        sets
    }
}

impl<O, C: PartialOrd> DpTable<O, C> {
    /// Stores `plan` under its relation set unless an equal or cheaper plan is already there.
    ///
    /// Returns whether the plan was stored.
    pub fn offer(&mut self, plan: PlanRef<O, C>) -> bool {
        let relations = plan.relations();
        match self.plans.get(&relations) {
            None => {
                self.stats.inserts += 1;
            }
            Some(existing) if plan.cost() < existing.cost() => {
                self.stats.improvements += 1;
            }
            Some(_) => return false,
        }
        self.plans.insert(relations, plan);
        true
    }
}

impl<O, C: Debug> DpTable<O, C> {
    /// Renders the table, one row per relation set.
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.set_titles(row!["relations", "cost", "plan"]);
        for (relations, plan) in self.entries() {
            table.add_row(row![
                relations.to_string(),
                format!("{:?}", plan.cost()),
                plan.descriptor()
            ]);
        }
        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::operator::LogicalOperator;
    use crate::plan::PlanBuilder;

    fn plan(ids: &[usize], cost: u32, descriptor: &str) -> PlanRef<LogicalOperator, u32> {
        Rc::new(
            PlanBuilder::new(ids.iter().copied().collect())
                .with_descriptor(descriptor)
                .build(cost),
        )
    }

    #[test]
    fn test_offer_keeps_strictly_cheaper() {
        let mut table = DpTable::new();

        assert!(table.offer(plan(&[0, 1], 10, "first")));
        assert!(!table.offer(plan(&[0, 1], 10, "tie")));
        assert!(!table.offer(plan(&[0, 1], 11, "worse")));
        assert!(table.offer(plan(&[0, 1], 9, "better")));

        let relations: NodeSet = [0, 1].into_iter().collect();
        assert_eq!("better", table.get(&relations).unwrap().descriptor());
        assert_eq!(
            SearchStats {
                emitted_pairs: 0,
                inserts: 1,
                improvements: 1,
            },
            table.stats()
        );
    }

    #[test]
    fn test_entries_and_maximal_sets() {
        let mut table = DpTable::new();
        table.offer(plan(&[2], 0, "2"));
        table.offer(plan(&[0], 0, "0"));
        table.offer(plan(&[1], 0, "1"));
        table.offer(plan(&[0, 1], 1, "(0) join (1)"));

        let order: Vec<String> = table
            .entries()
            .into_iter()
            .map(|(_, p)| p.descriptor().to_string())
            .collect();
        assert_eq!(vec!["0", "1", "2", "(0) join (1)"], order);

        let set = |ids: &[usize]| ids.iter().copied().collect::<NodeSet>();
        assert_eq!(vec![set(&[0, 1]), set(&[2])], table.maximal_sets());
    }

    #[test]
    fn test_render_and_clear() {
        let mut table = DpTable::new();
        table.offer(plan(&[0], 0, "0"));
        table.record_emit();

        let text = table.render();
        assert!(text.contains("relations"));
        assert!(text.contains("{0}"));

        table.clear();
        assert!(table.is_empty());
        assert_eq!(SearchStats::default(), table.stats());
    }
}
