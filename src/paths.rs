//! Enumeration of satisfying assignments.
//!
//! [`BddPaths`] walks the paths to TRUE of a BDD, yielding one cube per path.
//! [`SatAssignments`] expands those cubes into full assignments over a given
//! list of variables. Both iterators are lazy and finite; calling the
//! constructor again restarts the enumeration.
//!
//! Note: the number of paths can be exponential in the number of variables.

use crate::bdd::Bdd;
use crate::reference::Ref;
use crate::types::{Lit, Var};

impl Bdd {
    /// Returns an iterator over all satisfying paths (paths to TRUE) in the BDD.
    ///
    /// Each path is a `Vec<Lit>`, ordered by variable. Constant TRUE has
    /// exactly one (empty) path, constant FALSE has none.
    pub fn paths(&self, f: Ref) -> BddPaths<'_> {
        BddPaths::new(self, f)
    }

    /// Returns an iterator over all full assignments to `vars` satisfying `f`.
    ///
    /// Each item lists the values of `vars` in the given order.
    ///
    /// # Panics
    ///
    /// The iterator panics if `f` depends on a variable outside `vars`.
    pub fn sat_assignments(&self, f: Ref, vars: &[Var]) -> SatAssignments<'_> {
        SatAssignments {
            paths: self.paths(f),
            vars: vars.to_vec(),
            current: None,
        }
    }
}

/// Frame on the exploration stack: a node to visit, the path length at which
/// it was reached, and the literal of the edge leading to it.
#[derive(Debug)]
struct Frame {
    node: Ref,
    depth: usize,
    lit: Option<Lit>,
}

/// An iterator over satisfying paths in a BDD.
///
/// Uses depth-first traversal with backtracking; the current path lives in a
/// single vector that is truncated when the search backtracks.
pub struct BddPaths<'a> {
    bdd: &'a Bdd,
    stack: Vec<Frame>,
    path: Vec<Lit>,
}

impl<'a> BddPaths<'a> {
    fn new(bdd: &'a Bdd, f: Ref) -> Self {
        let mut stack = Vec::new();
        if !bdd.is_zero(f) {
            stack.push(Frame {
                node: f,
                depth: 0,
                lit: None,
            });
        }
        Self {
            bdd,
            stack,
            path: Vec::new(),
        }
    }
}

impl Iterator for BddPaths<'_> {
    type Item = Vec<Lit>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Frame { node, depth, lit }) = self.stack.pop() {
            self.path.truncate(depth);
            if let Some(lit) = lit {
                self.path.push(lit);
            }

            if self.bdd.is_one(node) {
                return Some(self.path.clone());
            }

            let var = Var::new(self.bdd.variable(node));
            let depth = self.path.len();
            let low = self.bdd.low_node(node);
            let high = self.bdd.high_node(node);

            // Pushed last, popped first: high before low.
            if !self.bdd.is_zero(low) {
                self.stack.push(Frame {
                    node: low,
                    depth,
                    lit: Some(var.neg()),
                });
            }
            if !self.bdd.is_zero(high) {
                self.stack.push(Frame {
                    node: high,
                    depth,
                    lit: Some(var.pos()),
                });
            }
        }
        None
    }
}

/// A cube being expanded into full assignments.
struct Expansion {
    template: Vec<bool>,
    free: Vec<usize>,
    next: u64,
}

/// An iterator over full satisfying assignments.
///
/// Created by [`Bdd::sat_assignments()`].
pub struct SatAssignments<'a> {
    paths: BddPaths<'a>,
    vars: Vec<Var>,
    current: Option<Expansion>,
}

impl SatAssignments<'_> {
    fn expand(&self, cube: &[Lit]) -> Expansion {
        let mut template = vec![false; self.vars.len()];
        let mut fixed = vec![false; self.vars.len()];
        for lit in cube {
            let pos = self
                .vars
                .iter()
                .position(|&v| v == lit.var())
                .unwrap_or_else(|| panic!("Variable {} is not among the enumerated variables", lit.var()));
            template[pos] = lit.is_positive();
            fixed[pos] = true;
        }
        let free = (0..self.vars.len()).filter(|&i| !fixed[i]).collect();
        Expansion { template, free, next: 0 }
    }
}

impl Iterator for SatAssignments<'_> {
    type Item = Vec<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(exp) = &mut self.current {
                if exp.next < (1u64 << exp.free.len()) {
                    let mut values = exp.template.clone();
                    for (k, &pos) in exp.free.iter().enumerate() {
                        // Most significant free position varies slowest.
                        let shift = exp.free.len() - 1 - k;
                        values[pos] = (exp.next >> shift) & 1 == 1;
                    }
                    exp.next += 1;
                    return Some(values);
                }
                self.current = None;
            }

            let cube = self.paths.next()?;
            self.current = Some(self.expand(&cube));
        }
    }
}
