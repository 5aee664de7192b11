use std::fmt::{Display, Formatter};

use strum_macros::{EnumIter, EnumString};

use crate::operator::{OperatorKind, RelOperator};

#[derive(
    Clone, Copy, Debug, Hash, Eq, PartialEq, strum_macros::Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Semi,
    Anti,
    Mark,
}

/// Logical join operator.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Join {
    join_type: JoinType,
    condition: String,
}

impl Join {
    pub fn new<S: Into<String>>(join_type: JoinType, condition: S) -> Self {
        Self {
            join_type,
            condition: condition.into(),
        }
    }

    pub fn inner<S: Into<String>>(condition: S) -> Self {
        Self::new(JoinType::Inner, condition)
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }
}

impl RelOperator for Join {
    fn kind(&self) -> OperatorKind {
        match self.join_type {
            JoinType::Inner => OperatorKind::InnerJoin,
            _ => OperatorKind::Other,
        }
    }
}

impl Display for Join {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} join on {}", self.join_type, self.condition)
    }
}
