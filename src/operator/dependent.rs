use std::fmt::{Display, Formatter};

use crate::operator::{OperatorKind, RelOperator};

/// Relation evaluated once per input tuple, e.g. a table function or a decorrelated subquery
/// whose arguments come from another relation.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Dependent {
    name: String,
}

impl Dependent {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RelOperator for Dependent {
    fn kind(&self) -> OperatorKind {
        OperatorKind::Other
    }
}

impl Display for Dependent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "dependent {}", self.name)
    }
}
