use std::fmt::{Display, Formatter};

use crate::operator::{OperatorKind, RelOperator};

/// Base relation access.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TableScan {
    table_name: String,
    alias: Option<String>,
}

impl TableScan {
    pub fn new<S: Into<String>>(table_name: S) -> Self {
        Self {
            table_name: table_name.into(),
            alias: None,
        }
    }

    /// Scan of a table under an alias, for self joins.
    pub fn with_alias<S: Into<String>, A: Into<String>>(table_name: S, alias: A) -> Self {
        Self {
            table_name: table_name.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl RelOperator for TableScan {
    fn kind(&self) -> OperatorKind {
        OperatorKind::Other
    }
}

impl Display for TableScan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "scan {} as {}", self.table_name, alias),
            None => write!(f, "scan {}", self.table_name),
        }
    }
}
