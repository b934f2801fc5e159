//! Explicit adjacency-list model of the graph, used to cross-check the
//! symbolic results.

use std::collections::{BTreeSet, VecDeque};

use log::debug;

use crate::config::{GraphConfig, NamedSet};
use crate::domain::Domain;
use crate::error::Result;
use crate::statement::Verdict;

#[derive(Debug, Clone)]
pub struct ExplicitGraph {
    domain: Domain,
    successors: Vec<Vec<u32>>,
}

impl ExplicitGraph {
    pub fn new(domain: Domain, edges: impl IntoIterator<Item = (u32, u32)>) -> Result<Self> {
        let mut successors = vec![Vec::new(); domain.size() as usize];
        for (u, v) in edges {
            successors[domain.check(u)? as usize].push(domain.check(v)?);
        }
        for succ in successors.iter_mut() {
            succ.sort_unstable();
            succ.dedup();
        }
        Ok(Self { domain, successors })
    }

    pub fn from_config(config: &GraphConfig) -> Result<Self> {
        let domain = config.validate()?;
        Self::new(domain, config.edges.edges(&domain)?)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn num_edges(&self) -> usize {
        self.successors.iter().map(|s| s.len()).sum()
    }

    pub fn successors(&self, u: u32) -> &[u32] {
        &self.successors[u as usize]
    }

    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        self.successors(u).binary_search(&v).is_ok()
    }

    /// Endpoints of walks of exactly two edges from `u`.
    pub fn two_step(&self, u: u32) -> BTreeSet<u32> {
        self.successors(u)
            .iter()
            .flat_map(|&v| self.successors(v).iter().copied())
            .collect()
    }

    /// Endpoints of walks of positive even length from `u`.
    ///
    /// Breadth-first search over `(node, parity)` states.
    pub fn even_reachable(&self, u: u32) -> BTreeSet<u32> {
        let n = self.domain.size() as usize;
        let mut visited = vec![[false; 2]; n];
        let mut queue = VecDeque::new();

        for &v in self.successors(u) {
            if !visited[v as usize][1] {
                visited[v as usize][1] = true;
                queue.push_back((v, 1));
            }
        }
        while let Some((v, parity)) = queue.pop_front() {
            let next = 1 - parity;
            for &w in self.successors(v) {
                if !visited[w as usize][next] {
                    visited[w as usize][next] = true;
                    queue.push_back((w, next));
                }
            }
        }

        (0..n as u32).filter(|&v| visited[v as usize][0]).collect()
    }

    /// All pairs joined by a walk of positive even length.
    pub fn even_closure(&self) -> BTreeSet<(u32, u32)> {
        self.domain
            .elements()
            .flat_map(|u| self.even_reachable(u).into_iter().map(move |v| (u, v)))
            .collect()
    }

    /// Source elements that reach no target element.
    pub fn counterexamples(&self, source: &NamedSet, target: &NamedSet) -> Vec<u32> {
        source
            .elements()
            .iter()
            .copied()
            .filter(|&u| !self.even_reachable(u).iter().any(|&v| target.contains(v)))
            .collect()
    }

    /// The verdict the symbolic evaluator must produce for the same sets.
    ///
    /// A contradiction means every element is a source without a target.
    pub fn verdict(&self, source: &NamedSet, target: &NamedSet) -> Verdict {
        let failing = self.counterexamples(source, target);
        debug!("explicit model: {} of {} sources fail", failing.len(), source.elements().len());
        if failing.is_empty() {
            Verdict::Tautology
        } else if failing.len() == self.domain.size() as usize {
            Verdict::Contradiction
        } else {
            Verdict::Satisfiable
        }
    }
}
