//! End-to-end run over a [`GraphConfig`]: build the base relation and the two
//! sets, close the relation under even-length walks, and evaluate
//! `∀s. SOURCE(s) → ∃t. TARGET(t) ∧ closure(s, t)`.

use log::info;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::bdd::Bdd;
use crate::config::GraphConfig;
use crate::domain::{Encoding, Family};
use crate::error::Result;
use crate::explicit::ExplicitGraph;
use crate::fixpoint::{Closure, Fixpoint};
use crate::relation::{Builder, NodeSet, Relation};
use crate::statement::{evaluate_implication, Evaluation, Verdict};

/// Everything computed by [`Pipeline::analyze`].
#[derive(Debug, Clone)]
pub struct Analysis {
    pub base: Relation,
    /// SOURCE placed on the row family.
    pub source: NodeSet,
    /// TARGET placed on the column family.
    pub target: NodeSet,
    pub closure: Closure,
    pub evaluation: Evaluation,
}

impl Analysis {
    pub fn verdict(&self) -> Verdict {
        self.evaluation.verdict()
    }
}

/// Agreement between the symbolic run and the explicit model.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CrossCheck {
    pub symbolic: Verdict,
    pub explicit: Verdict,
    /// Whether both sides produced the same set of even-reachable pairs.
    pub closure_agrees: bool,
}

impl CrossCheck {
    pub fn agrees(&self) -> bool {
        self.symbolic == self.explicit && self.closure_agrees
    }
}

pub struct Pipeline {
    config: GraphConfig,
    bdd: Bdd,
    encoding: Encoding,
}

impl Pipeline {
    pub fn new(config: GraphConfig) -> Result<Self> {
        let domain = config.validate()?;
        let bdd = Bdd::new(config.bdd);
        let encoding = Encoding::new(domain);
        info!(
            "Domain of {} elements encoded with {} bits per family",
            domain.size(),
            domain.bits()
        );
        Ok(Self { config, bdd, encoding })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn bdd(&self) -> &Bdd {
        &self.bdd
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn builder(&self) -> Builder<'_> {
        Builder::new(&self.bdd, &self.encoding)
    }

    /// One-step edge relation.
    pub fn base_relation(&self) -> Result<Relation> {
        let edges = self.config.edges.edges(self.encoding.domain())?;
        self.builder().relation(edges)
    }

    pub fn source_set(&self, family: Family) -> Result<NodeSet> {
        self.builder().set(family, self.config.source.elements().iter().copied())
    }

    pub fn target_set(&self, family: Family) -> Result<NodeSet> {
        self.builder().set(family, self.config.target.elements().iter().copied())
    }

    pub fn closure(&self, base: Relation) -> Result<Closure> {
        Fixpoint::new(&self.bdd, &self.encoding, base, self.config.iteration_limit()).run()
    }

    pub fn analyze(&self) -> Result<Analysis> {
        let base = self.base_relation()?;
        info!(
            "Base relation: {} pairs, {} nodes",
            base.count(&self.bdd, &self.encoding),
            self.bdd.size(base.get())
        );

        let source = self.source_set(Family::Row)?;
        let target = self.target_set(Family::Column)?;
        let closure = self.closure(base)?;
        let evaluation = evaluate_implication(&self.bdd, &self.encoding, source, target, closure.relation())?;

        Ok(Analysis {
            base,
            source,
            target,
            closure,
            evaluation,
        })
    }

    /// Verdict of `∀s. SOURCE(s) → ∃t. TARGET(t) ∧ closure(s, t)`.
    pub fn run(&self) -> Result<Verdict> {
        Ok(self.analyze()?.verdict())
    }

    /// Number of closure pairs, if it fits in `u64`.
    pub fn closure_size(&self, analysis: &Analysis) -> Option<u64> {
        let count: BigUint = analysis.closure.relation().count(&self.bdd, &self.encoding);
        count.to_u64()
    }

    /// Compare `analysis` with breadth-first search on the explicit graph.
    pub fn cross_check(&self, analysis: &Analysis) -> Result<CrossCheck> {
        let graph = ExplicitGraph::from_config(&self.config)?;
        let explicit = graph.verdict(&self.config.source, &self.config.target);
        let symbolic_pairs = analysis.closure.relation().pairs(&self.bdd, &self.encoding);
        let closure_agrees = symbolic_pairs.into_iter().eq(graph.even_closure());

        let check = CrossCheck {
            symbolic: analysis.verdict(),
            explicit,
            closure_agrees,
        };
        info!("Cross-check: {:?}", check);
        Ok(check)
    }
}
