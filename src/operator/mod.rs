//! Relational operators.
//!
//! The join enumerator never looks inside an operator. It only needs to tell ordinary
//! predicates (selections and inner joins, which may be freely reordered) apart from everything
//! else, which is what [`RelOperator::kind`] reports. [`LogicalOperator`] is a ready-made
//! vocabulary for callers without their own operator representation.

use std::fmt::Debug;
use std::hash::Hash;

use strum_macros::{Display, EnumIter};

mod dependent;
pub use dependent::*;
mod join;
pub use join::*;
mod logical;
pub use logical::*;
mod selection;
pub use selection::*;
mod table_scan;
pub use table_scan::*;

/// Coarse classification of an operator as seen by join enumeration.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Display, EnumIter)]
pub enum OperatorKind {
    Selection,
    InnerJoin,
    /// Scans, outer/semi/anti joins, dependent evaluation and anything else that can't be
    /// treated as a freely movable predicate.
    Other,
}

impl OperatorKind {
    pub fn is_ordinary_predicate(self) -> bool {
        match self {
            OperatorKind::Selection | OperatorKind::InnerJoin => true,
            OperatorKind::Other => false,
        }
    }
}

/// Operator handled by the join enumerator.
///
/// Operators are compared by value: two predicates that are equal are the same predicate and are
/// only applied once.
pub trait RelOperator: Clone + Debug + Eq + Hash {
    fn kind(&self) -> OperatorKind;
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_ordinary_predicates() {
        let ordinary: Vec<OperatorKind> = OperatorKind::iter()
            .filter(|k| k.is_ordinary_predicate())
            .collect();
        assert_eq!(vec![OperatorKind::Selection, OperatorKind::InnerJoin], ordinary);
        assert_eq!("InnerJoin", OperatorKind::InnerJoin.to_string());
    }
}
