//! Fixed-capacity relation sets.
//!
//! A [`NodeSet`] is a bitmask over relation indices. All sets used by one search share the same
//! capacity, which is the number of relations of the query graph and never exceeds
//! [`MAX_RELATIONS`].

use std::fmt::{Debug, Display, Formatter};
use std::ops::{BitAnd, BitOr, Sub};

use itertools::Itertools;

/// Largest number of relations a single search can handle.
pub const MAX_RELATIONS: usize = u64::BITS as usize;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeSet(u64);

impl NodeSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// Set containing only `idx`.
    pub fn single(idx: usize) -> Self {
        debug_assert!(idx < MAX_RELATIONS, "relation index {} out of range", idx);
        Self(1u64 << idx)
    }

    /// Set of all relations `0..num_nodes`.
    pub fn ones(num_nodes: usize) -> Self {
        if num_nodes >= MAX_RELATIONS {
            Self(u64::MAX)
        } else {
            Self((1u64 << num_nodes) - 1)
        }
    }

    /// Set of all relations with an index strictly lower than `idx`.
    pub fn fill_until(idx: usize) -> Self {
        Self::ones(idx)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(&self, idx: usize) -> bool {
        idx < MAX_RELATIONS && self.0 & (1u64 << idx) != 0
    }

    /// Lowest relation index in the set.
    pub fn find_first(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }

    pub fn is_subset_of(&self, other: &NodeSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn intersects(&self, other: &NodeSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_disjoint(&self, other: &NodeSet) -> bool {
        !self.intersects(other)
    }

    pub fn union(&self, other: &NodeSet) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersection(&self, other: &NodeSet) -> Self {
        Self(self.0 & other.0)
    }

    pub fn difference(&self, other: &NodeSet) -> Self {
        Self(self.0 & !other.0)
    }

    /// Relations of `0..num_nodes` not in this set.
    pub fn complement(&self, num_nodes: usize) -> Self {
        Self::ones(num_nodes).difference(self)
    }

    /// Relation indices in ascending order.
    pub fn iter(&self) -> Iter {
        Iter { bits: self.0 }
    }

    /// Relation indices in descending order.
    pub fn iter_desc(&self) -> IterDesc {
        IterDesc { bits: self.0 }
    }

    /// All non-empty subsets, in ascending order of their bit patterns.
    pub fn subsets(&self) -> Subsets {
        Subsets {
            mask: self.0,
            current: 0,
        }
    }
}

impl BitOr for NodeSet {
    type Output = NodeSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(&rhs)
    }
}

impl BitAnd for NodeSet {
    type Output = NodeSet;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(&rhs)
    }
}

impl Sub for NodeSet {
    type Output = NodeSet;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(&rhs)
    }
}

impl FromIterator<usize> for NodeSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        iter.into_iter()
            .fold(NodeSet::empty(), |acc, idx| acc | NodeSet::single(idx))
    }
}

impl Display for NodeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}

impl Debug for NodeSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeSet{}", self)
    }
}

pub struct Iter {
    bits: u64,
}

impl Iterator for Iter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let idx = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(idx)
    }
}

pub struct IterDesc {
    bits: u64,
}

impl Iterator for IterDesc {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let idx = (u64::BITS - 1 - self.bits.leading_zeros()) as usize;
        self.bits &= !(1u64 << idx);
        Some(idx)
    }
}

/// Enumerates subsets with the `(s - mask) & mask` step, which visits every non-empty subset
/// exactly once and ends when it wraps back to zero.
pub struct Subsets {
    mask: u64,
    current: u64,
}

impl Iterator for Subsets {
    type Item = NodeSet;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.current.wrapping_sub(self.mask) & self.mask;
        if next == 0 {
            // Park on zero mask so the iterator stays fused.
            self.mask = 0;
            self.current = 0;
            None
        } else {
            self.current = next;
            Some(NodeSet(next))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[usize]) -> NodeSet {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_basic_set_operations() {
        let a = set(&[0, 2]);
        let b = set(&[2, 3]);

        assert_eq!(set(&[0, 2, 3]), a | b);
        assert_eq!(set(&[2]), a & b);
        assert_eq!(set(&[0]), a - b);
        assert!(set(&[2]).is_subset_of(&a));
        assert!(!b.is_subset_of(&a));
        assert!(NodeSet::empty().is_subset_of(&a));
        assert!(a.intersects(&b));
        assert!(set(&[1]).is_disjoint(&a));
        assert_eq!(set(&[1, 3]), a.complement(4));
    }

    #[test]
    fn test_single_ones_and_fill_until() {
        assert_eq!(set(&[3]), NodeSet::single(3));
        assert_eq!(set(&[0, 1, 2, 3]), NodeSet::ones(4));
        assert_eq!(u64::MAX, NodeSet::ones(64).bits());
        assert_eq!(set(&[0, 1]), NodeSet::fill_until(2));
        assert!(NodeSet::fill_until(0).is_empty());
        assert_eq!(Some(63), NodeSet::single(63).find_first());
    }

    #[test]
    fn test_find_first_and_len() {
        assert_eq!(None, NodeSet::empty().find_first());
        assert_eq!(Some(1), set(&[5, 1, 9]).find_first());
        assert_eq!(3, set(&[5, 1, 9]).len());
        assert!(set(&[5]).contains(5));
        assert!(!set(&[5]).contains(4));
    }

    #[test]
    fn test_iteration_orders() {
        let s = set(&[0, 3, 7, 63]);
        assert_eq!(vec![0, 3, 7, 63], s.iter().collect::<Vec<_>>());
        assert_eq!(vec![63, 7, 3, 0], s.iter_desc().collect::<Vec<_>>());
        assert_eq!(0, NodeSet::empty().iter_desc().count());
    }

    #[test]
    fn test_subsets_visits_each_subset_once() {
        let s = set(&[1, 3, 4]);
        let subsets: Vec<NodeSet> = s.subsets().collect();

        assert_eq!(7, subsets.len());
        assert_eq!(set(&[1]), subsets[0]);
        assert_eq!(s, *subsets.last().unwrap());
        assert!(subsets.windows(2).all(|w| w[0].bits() < w[1].bits()));
        assert!(subsets.iter().all(|sub| sub.is_subset_of(&s) && !sub.is_empty()));
        assert_eq!(0, NodeSet::empty().subsets().count());

        let mut it = set(&[2]).subsets();
        assert_eq!(Some(set(&[2])), it.next());
        assert_eq!(None, it.next());
        assert_eq!(None, it.next());
    }

    #[test]
    fn test_display() {
        assert_eq!("{0, 2}", set(&[0, 2]).to_string());
        assert_eq!("{}", NodeSet::empty().to_string());
        assert_eq!("NodeSet{1}", format!("{:?}", set(&[1])));
    }
}
