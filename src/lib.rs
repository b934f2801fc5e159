//! # even-reach: even-step reachability with Binary Decision Diagrams
//!
//! **`even-reach`** answers one question about a finite directed graph: does every
//! element of a SOURCE set reach some element of a TARGET set by a walk of
//! *positive even* length? The graph, the sets, and the reachability relation are
//! all represented symbolically as BDDs.
//!
//! ## How it works
//!
//! - Elements of `[0, N)` are encoded as bit vectors, most significant bit first
//!   ([`domain`]). Three interleaved variable families share that width: *row*
//!   (the source of a pair), *column* (its target), and *aux* (scratch space).
//! - Sets and relations are built by disjoining one cube per element or pair
//!   ([`relation`]).
//! - Composition renames the inner families onto *aux* and eliminates them with a
//!   relational product ([`compose`]).
//! - The even-step closure is a bounded fixpoint over the two-step relation
//!   ([`fixpoint`]). Convergence is decided by **semantic** equivalence, which is
//!   a pointer comparison on canonical BDDs.
//! - The final statement `∀s. SOURCE(s) → ∃t. TARGET(t) ∧ closure(s, t)` is
//!   classified as a tautology, a contradiction, or merely satisfiable
//!   ([`statement`]).
//!
//! ## Basic Usage
//!
//! ```rust
//! use even_reach::config::GraphConfig;
//! use even_reach::pipeline::Pipeline;
//! use even_reach::statement::Verdict;
//!
//! // 32 nodes, edges i -> i+3 and i -> i+8 (mod 32),
//! // SOURCE = odd primes, TARGET = even numbers.
//! let pipeline = Pipeline::new(GraphConfig::default())?;
//! assert_eq!(pipeline.run()?, Verdict::Tautology);
//! # Ok::<(), even_reach::error::Error>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`bdd`]**: The [`Bdd`][crate::bdd::Bdd] manager: hash-consed nodes with
//!   complement edges, ITE, quantification, relational product, and renaming.
//! - **[`sat`]** and **[`paths`]**: model counting and satisfying-assignment enumeration.
//! - **[`pipeline`]**: the end-to-end run and its cross-check against an
//!   explicit graph ([`explicit`]).

pub mod bdd;
pub mod cache;
pub mod compose;
pub mod config;
pub mod domain;
pub mod error;
pub mod explicit;
pub mod fixpoint;
pub mod harness;
pub mod node;
pub mod paths;
pub mod pipeline;
pub mod reference;
pub mod relation;
pub mod sat;
pub mod statement;
pub mod table;
pub mod types;
pub mod utils;
