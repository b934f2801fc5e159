//! Graph configuration: domain size, edge rule, and the two named sets.

use std::collections::BTreeSet;

use crate::bdd::BddConfig;
use crate::domain::Domain;
use crate::error::{Error, Result};

/// PRIME as listed for the 32-element graph (2 is deliberately absent).
pub const DEFAULT_PRIMES: [u32; 10] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31];

/// Default domain size.
pub const DEFAULT_SIZE: u32 = 32;

/// Default edge offsets: `i -> i + 3` and `i -> i + 8` (mod N).
pub const DEFAULT_OFFSETS: [u32; 2] = [3, 8];

/// How the edges of the graph are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeRule {
    /// `i -> (i + k) mod N` for every offset `k`.
    Offsets(Vec<u32>),
    /// An explicit list of `(source, target)` edges.
    Explicit(Vec<(u32, u32)>),
}

impl EdgeRule {
    /// Enumerate the edges over `domain`.
    pub fn edges(&self, domain: &Domain) -> Result<BTreeSet<(u32, u32)>> {
        let n = domain.size() as u64;
        match self {
            EdgeRule::Offsets(offsets) => Ok(domain
                .elements()
                .flat_map(|i| offsets.iter().map(move |&k| (i, ((i as u64 + k as u64) % n) as u32)))
                .collect()),
            EdgeRule::Explicit(edges) => edges
                .iter()
                .map(|&(u, v)| Ok((domain.check(u)?, domain.check(v)?)))
                .collect(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            EdgeRule::Offsets(offsets) => offsets.is_empty(),
            EdgeRule::Explicit(edges) => edges.is_empty(),
        }
    }
}

/// A named finite subset of the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSet {
    name: String,
    elements: BTreeSet<u32>,
}

impl NamedSet {
    pub fn new(name: impl Into<String>, elements: impl IntoIterator<Item = u32>) -> Self {
        Self {
            name: name.into(),
            elements: elements.into_iter().collect(),
        }
    }

    /// Multiples of `k` below `size`. The only multiple of zero is zero.
    pub fn multiples(name: impl Into<String>, k: u32, size: u32) -> Self {
        if k == 0 {
            return Self::new(name, (0..size).take(1));
        }
        Self::new(name, (0..size).step_by(k as usize))
    }

    /// Odd primes below `size`.
    pub fn odd_primes(name: impl Into<String>, size: u32) -> Self {
        let is_prime = |p: u32| p >= 2 && (2..).take_while(|d| d * d <= p).all(|d| p % d != 0);
        Self::new(name, (3..size).filter(|&p| is_prime(p)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &BTreeSet<u32> {
        &self.elements
    }

    pub fn contains(&self, element: u32) -> bool {
        self.elements.contains(&element)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    pub size: u32,
    pub edges: EdgeRule,
    /// Every element of this set must reach the target set.
    pub source: NamedSet,
    pub target: NamedSet,
    /// Bound on fixpoint iterations; defaults to the domain size.
    pub max_iterations: Option<usize>,
    pub bdd: BddConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            edges: EdgeRule::Offsets(DEFAULT_OFFSETS.to_vec()),
            source: NamedSet::new("PRIME", DEFAULT_PRIMES),
            target: NamedSet::multiples("EVEN", 2, DEFAULT_SIZE),
            max_iterations: None,
            bdd: BddConfig::default(),
        }
    }
}

impl GraphConfig {
    /// The default graph shape scaled to `size` elements: offsets `{3, 8}`,
    /// PRIME = odd primes below `size`, EVEN = multiples of two.
    pub fn for_size(size: u32) -> Self {
        Self {
            size,
            source: NamedSet::odd_primes("PRIME", size),
            target: NamedSet::multiples("EVEN", 2, size),
            ..Self::default()
        }
    }

    pub fn with_edges(mut self, edges: EdgeRule) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_source(mut self, source: NamedSet) -> Self {
        self.source = source;
        self
    }

    pub fn with_target(mut self, target: NamedSet) -> Self {
        self.target = target;
        self
    }

    pub fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    pub fn with_bdd_config(mut self, bdd: BddConfig) -> Self {
        self.bdd = bdd;
        self
    }

    /// Check the configuration and return its domain.
    pub fn validate(&self) -> Result<Domain> {
        let domain = Domain::new(self.size)?;
        self.bdd.validate()?;
        if self.edges.is_empty() {
            return Err(Error::EmptyRelation);
        }
        for &x in self.source.elements().iter().chain(self.target.elements()) {
            domain.check(x)?;
        }
        self.edges.edges(&domain)?;
        Ok(domain)
    }

    pub fn iteration_limit(&self) -> usize {
        self.max_iterations.unwrap_or(self.size as usize)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_default_sets() {
        let config = GraphConfig::default();
        assert!(config.target.contains(14));
        assert!(!config.target.contains(13));
        assert!(config.source.contains(7));
        assert!(!config.source.contains(2));
        assert_eq!(config.target.elements().len(), 16);
    }

    #[test]
    fn test_for_size_matches_default() {
        assert_eq!(GraphConfig::for_size(32), GraphConfig::default());
        let small = GraphConfig::for_size(8);
        assert_eq!(small.source.elements(), &BTreeSet::from([3, 5, 7]));
        assert_eq!(small.target.elements(), &BTreeSet::from([0, 2, 4, 6]));
    }

    #[test]
    fn test_offset_edges() {
        let domain = Domain::new(32).unwrap();
        let edges = EdgeRule::Offsets(vec![3, 8]).edges(&domain).unwrap();
        assert_eq!(edges.len(), 64);
        assert!(edges.contains(&(27, 3)));
        assert!(edges.contains(&(29, 0)));
        assert!(!edges.contains(&(16, 20)));
    }

    #[test]
    fn test_offsets_collapse_duplicates() {
        // 0 and 4 coincide modulo 4.
        let domain = Domain::new(4).unwrap();
        let edges = EdgeRule::Offsets(vec![0, 4]).edges(&domain).unwrap();
        assert_eq!(edges.len(), 4);
    }

    #[test]
    fn test_validate() {
        assert!(GraphConfig::default().validate().is_ok());

        let config = GraphConfig::default().with_edges(EdgeRule::Offsets(vec![]));
        assert_eq!(config.validate(), Err(Error::EmptyRelation));

        let config = GraphConfig::default().with_source(NamedSet::new("BAD", [40]));
        assert_eq!(config.validate(), Err(Error::InvalidDomainValue { value: 40, bound: 32 }));

        let config = GraphConfig::default().with_edges(EdgeRule::Explicit(vec![(1, 33)]));
        assert_eq!(config.validate(), Err(Error::InvalidDomainValue { value: 33, bound: 32 }));
    }

    #[test]
    fn test_multiples_of_zero() {
        assert_eq!(NamedSet::multiples("Z", 0, 8).elements(), &BTreeSet::from([0]));
        assert!(NamedSet::multiples("Z", 0, 0).elements().is_empty());
        assert_eq!(NamedSet::multiples("T", 3, 10).elements(), &BTreeSet::from([0, 3, 6, 9]));
    }

    #[test]
    fn test_validate_bdd_config() {
        let config = GraphConfig::default().with_bdd_config(BddConfig::default().with_storage_bits(40));
        assert_eq!(
            config.validate(),
            Err(Error::InvalidBddConfig {
                field: "storage",
                bits: 40
            })
        );

        let config = GraphConfig::default().with_bdd_config(BddConfig::default().with_cache_bits(32));
        assert_eq!(
            config.validate(),
            Err(Error::InvalidBddConfig {
                field: "cache",
                bits: 32
            })
        );

        let config = GraphConfig::default().with_bdd_config(BddConfig::default().with_cache_bits(31));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_iteration_limit() {
        assert_eq!(GraphConfig::default().iteration_limit(), 32);
        assert_eq!(GraphConfig::default().with_max_iterations(3).iteration_limit(), 3);
    }
}
