use std::fmt::{Display, Formatter};

use crate::operator::{OperatorKind, RelOperator};

/// Filter predicate.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Selection {
    predicate: String,
}

impl Selection {
    pub fn new<S: Into<String>>(predicate: S) -> Self {
        Self {
            predicate: predicate.into(),
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }
}

impl RelOperator for Selection {
    fn kind(&self) -> OperatorKind {
        OperatorKind::Selection
    }
}

impl Display for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "filter {}", self.predicate)
    }
}
