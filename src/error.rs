use itertools::Itertools;
use thiserror::Error;

use crate::node_set::NodeSet;

pub type OptResult<T> = Result<T, OptError>;

/// Errors surfaced by graph construction and join enumeration.
///
/// None of them is recoverable by retrying: the search is deterministic and exhaustive, so the
/// same input always fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptError {
    #[error("query graph has no relations")]
    EmptyQuery,
    #[error("query graph has {count} relations, at most {max} are supported")]
    TooManyRelations { count: usize, max: usize },
    #[error("malformed hyperedge #{edge}: {reason}")]
    MalformedHyperedge { edge: usize, reason: String },
    #[error(
        "query graph is disconnected, connected parts: [{}]",
        .components.iter().join(", ")
    )]
    DisconnectedQuery { components: Vec<NodeSet> },
    #[error("no plan recorded for relation set {0}")]
    MissingSubplan(NodeSet),
}
