//! ## Background
//!
//! Join ordering is the core of cost based query optimization: given the base relations of a
//! query and the predicates connecting them, find the join tree with the lowest cost. The
//! problem is NP-hard in the number of relations, but dynamic programming keeps it tractable
//! for the query sizes found in practice by memoizing the best plan of every relation subset.
//!
//! Classic dynamic programming enumerates relation subsets by size [1] or by bit pattern, and
//! throws most of the pairs it looks at away because they are not connected by any predicate.
//! DPhyp [2] instead enumerates connected subgraphs of the query graph directly, so it only ever
//! looks at pairs it can use. It also works on hypergraphs, which makes it possible to express
//! complex predicates over more than two relations and non-inner joins whose operands must not
//! be reordered freely.
//!
//! ## Design
//!
//! * [`node_set`] Relation sets as fixed-capacity bitsets.
//! * [`query_graph`] Query hypergraph, its builder and connectivity queries.
//! * [`operator`] What the enumerator needs to know about operators, plus a ready-made logical
//! operator vocabulary.
//! * [`plan`] Join trees produced by the search.
//! * [`cost`] Injected cost models.
//! * [`dphyp`] The join enumerator and its memo table.
//!
//! The crate doesn't estimate cardinalities, parse queries or perform any I/O. A caller builds a
//! [`QueryHypergraph`](query_graph::QueryHypergraph) from its own representation, picks a
//! [`CostModel`](cost::CostModel) and runs a [`DPhypOptimizer`](dphyp::DPhypOptimizer) on it.
//!
//! ## Reference
//!
//! 1. Selinger, P. Griffiths, et al. "Access path selection in a relational database management
//! system." Readings in Artificial Intelligence and Databases. Morgan Kaufmann, 1989. 511-522.
//! 2. Moerkotte, G. and Neumann, T., 2008. Dynamic programming strikes back. In Proceedings of
//! the 2008 ACM SIGMOD international conference on Management of data (pp. 539-552).

#[macro_use]
extern crate prettytable;

pub mod cost;
pub mod dphyp;
pub mod error;
pub mod node_set;
pub mod operator;
pub mod optimizer;
pub mod plan;
pub mod query_graph;
