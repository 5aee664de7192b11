//! Join enumeration with DPhyp.
//!
//! DPhyp [1] is a bottom-up dynamic programming join enumerator working directly on the query
//! hypergraph. Instead of looking at all `3^n` pairs of relation sets, it grows connected
//! subgraphs (csg) from each relation and, for each of them, grows connected complements (cmp)
//! among its neighbors. Every csg-cmp pair is emitted exactly once, and only connected sets ever
//! get a plan, so cross products are never considered unless the graph asks for them with a
//! [`Cross`](crate::query_graph::EdgeType::Cross) edge.
//!
//! Exclusion sets do the bookkeeping: a subgraph grown from relation `v` never absorbs a relation
//! with a smaller index, since pairs containing it are found when starting from that relation.
//!
//! ## Reference
//!
//! 1. Moerkotte, G. and Neumann, T., 2008. Dynamic programming strikes back. In Proceedings of
//! the 2008 ACM SIGMOD international conference on Management of data (pp. 539-552).

mod memo;
pub use memo::*;
mod optimizer;
pub use optimizer::*;
