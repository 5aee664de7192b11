use std::fmt::{Display, Formatter};

use enum_as_inner::EnumAsInner;

use crate::operator::{
    Dependent, Join, JoinType, OperatorKind, RelOperator, Selection, TableScan,
};

/// Logical relational operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq, EnumAsInner)]
pub enum LogicalOperator {
    LogicalScan(TableScan),
    LogicalSelection(Selection),
    LogicalJoin(Join),
    LogicalDependent(Dependent),
}

impl LogicalOperator {
    pub fn scan<S: Into<String>>(table_name: S) -> Self {
        LogicalOperator::LogicalScan(TableScan::new(table_name))
    }

    pub fn filter<S: Into<String>>(predicate: S) -> Self {
        LogicalOperator::LogicalSelection(Selection::new(predicate))
    }

    pub fn join<S: Into<String>>(join_type: JoinType, condition: S) -> Self {
        LogicalOperator::LogicalJoin(Join::new(join_type, condition))
    }

    pub fn inner_join<S: Into<String>>(condition: S) -> Self {
        LogicalOperator::LogicalJoin(Join::inner(condition))
    }

    pub fn dependent<S: Into<String>>(name: S) -> Self {
        LogicalOperator::LogicalDependent(Dependent::new(name))
    }
}

impl RelOperator for LogicalOperator {
    fn kind(&self) -> OperatorKind {
        match self {
            LogicalOperator::LogicalScan(op) => op.kind(),
            LogicalOperator::LogicalSelection(op) => op.kind(),
            LogicalOperator::LogicalJoin(op) => op.kind(),
            LogicalOperator::LogicalDependent(op) => op.kind(),
        }
    }
}

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOperator::LogicalScan(op) => op.fmt(f),
            LogicalOperator::LogicalSelection(op) => op.fmt(f),
            LogicalOperator::LogicalJoin(op) => op.fmt(f),
            LogicalOperator::LogicalDependent(op) => op.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch() {
        assert_eq!(OperatorKind::Other, LogicalOperator::scan("t").kind());
        assert_eq!(OperatorKind::Selection, LogicalOperator::filter("t.x > 1").kind());
        assert_eq!(
            OperatorKind::InnerJoin,
            LogicalOperator::inner_join("a.x = b.x").kind()
        );
        assert_eq!(
            OperatorKind::Other,
            LogicalOperator::join(JoinType::Left, "a.x = b.x").kind()
        );
        assert_eq!(OperatorKind::Other, LogicalOperator::dependent("f(a.x)").kind());
    }

    #[test]
    fn test_as_inner() {
        let op = LogicalOperator::scan("orders");
        assert_eq!("orders", op.as_logical_scan().unwrap().table_name());
        assert!(op.as_logical_join().is_none());
        assert_eq!("scan orders", op.to_string());
    }
}
