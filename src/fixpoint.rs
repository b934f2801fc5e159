//! Even-step transitive closure as a bounded fixpoint iteration.
//!
//! Starting from the two-step relation `R2 = R ∘ R`, the accumulator is
//! repeatedly extended with `acc ∘ R2` until it stops changing:
//!
//! ```text
//! acc_0     = R2
//! acc_{k+1} = (acc_k ∘ R2) ∨ acc_k
//! ```
//!
//! After `k` changing iterations the accumulator holds every pair connected by
//! a walk of `2, 4, ..., 2(k+1)` edges. The chain is monotone and bounded by
//! the full `N × N` relation, so it converges; `N` iterations (counting the
//! one that observes convergence) always suffice.

use log::{debug, info};
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::compose::Composer;
use crate::domain::Encoding;
use crate::error::{Error, Result};
use crate::relation::Relation;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FixpointState {
    Initializing,
    Iterating,
    Converged,
}

/// Snapshot of the accumulator after one iteration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FixpointStep {
    /// Iteration index; `0` is the initial two-step relation.
    pub iteration: usize,
    pub relation: Relation,
    /// Number of pairs in the accumulator.
    pub pairs: BigUint,
    /// Size of the accumulator BDD.
    pub nodes: usize,
}

/// Result of a converged fixpoint.
#[derive(Debug, Clone)]
pub struct Closure {
    relation: Relation,
    two_step: Relation,
    iterations: usize,
    steps: Vec<FixpointStep>,
}

impl Closure {
    /// Pairs connected by a walk of positive even length.
    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn two_step(&self) -> Relation {
        self.two_step
    }

    /// Loop iterations performed, including the one that observed convergence.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn steps(&self) -> &[FixpointStep] {
        &self.steps
    }

    /// Whether every accumulator implies its successor.
    pub fn is_monotone(&self, bdd: &Bdd) -> bool {
        self.steps
            .windows(2)
            .all(|w| bdd.is_implies(w[0].relation.get(), w[1].relation.get()))
    }

    /// Whether one more extension step leaves the closure unchanged.
    pub fn is_stable(&self, bdd: &Bdd, encoding: &Encoding) -> Result<bool> {
        let composer = Composer::new(bdd, encoding);
        let extended = composer.compose(self.relation, self.two_step)?.union(bdd, self.relation);
        Ok(extended.is_equivalent(bdd, self.relation))
    }
}

pub struct Fixpoint<'a> {
    bdd: &'a Bdd,
    encoding: &'a Encoding,
    base: Relation,
    limit: usize,
    state: FixpointState,
    two_step: Relation,
    acc: Relation,
    iteration: usize,
    steps: Vec<FixpointStep>,
}

impl<'a> Fixpoint<'a> {
    /// Prepare the closure of `base`, allowing at most `limit` iterations.
    pub fn new(bdd: &'a Bdd, encoding: &'a Encoding, base: Relation, limit: usize) -> Self {
        Self {
            bdd,
            encoding,
            base,
            limit,
            state: FixpointState::Initializing,
            two_step: Relation::new(bdd.zero()),
            acc: Relation::new(bdd.zero()),
            iteration: 0,
            steps: Vec::new(),
        }
    }

    pub fn state(&self) -> FixpointState {
        self.state
    }

    /// Current accumulator.
    pub fn accumulator(&self) -> Relation {
        self.acc
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Perform one transition of the state machine and return the new state.
    pub fn advance(&mut self) -> Result<FixpointState> {
        let composer = Composer::new(self.bdd, self.encoding);
        match self.state {
            FixpointState::Initializing => {
                self.two_step = composer.compose(self.base, self.base)?;
                self.acc = self.two_step;
                self.record();
                self.state = FixpointState::Iterating;
            }
            FixpointState::Iterating => {
                if self.iteration >= self.limit {
                    return Err(Error::IterationLimit { limit: self.limit });
                }
                self.iteration += 1;

                let next = composer.compose(self.acc, self.two_step)?.union(self.bdd, self.acc);
                debug_assert!(self.bdd.is_implies(self.acc.get(), next.get()));

                if next.is_equivalent(self.bdd, self.acc) {
                    debug!("iteration {}: converged", self.iteration);
                    self.state = FixpointState::Converged;
                } else {
                    self.acc = next;
                    self.record();
                }
            }
            FixpointState::Converged => {}
        }
        Ok(self.state)
    }

    /// Iterate until convergence.
    pub fn run(mut self) -> Result<Closure> {
        while self.advance()? != FixpointState::Converged {}
        info!(
            "Closure converged after {} iterations: {} pairs, {} nodes",
            self.iteration,
            self.acc.count(self.bdd, self.encoding),
            self.bdd.size(self.acc.get())
        );
        Ok(Closure {
            relation: self.acc,
            two_step: self.two_step,
            iterations: self.iteration,
            steps: self.steps,
        })
    }

    fn record(&mut self) {
        let step = FixpointStep {
            iteration: self.iteration,
            relation: self.acc,
            pairs: self.acc.count(self.bdd, self.encoding),
            nodes: self.bdd.size(self.acc.get()),
        };
        debug!("iteration {}: {} pairs, {} nodes", step.iteration, step.pairs, step.nodes);
        self.steps.push(step);
    }
}
